//! Arming, the capture state machine, and the post-capture download.

use super::sample_rate::SR_MHZ_50;
use super::{CaptureState, Sigma};
use crate::datafeed::{Datafeed, Packet};
use crate::link::SigmaLink;
use sigma_globals::Result;
use sigma_proto::dram::{
    Cluster, EVENTS_PER_ROW, ROW_COUNT, ROW_LENGTH_BYTES, ROW_MASK, ROW_SHIFT,
};
use sigma_proto::lut::build_basic_trigger;
use sigma_proto::{
    WriteReg, RMR_POSTTRIGGERED, RMR_ROUND, RMR_TRIGGERED, WMR_FORCESTOP, WMR_SDRAMREADEN,
    WMR_SDRAMWRITEEN,
};

/// Up to this many DRAM rows travel in one burst read.
const ROWS_PER_READ: usize = 32;

/// Outcome of a periodic tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Keep polling.
    Continue,
    /// The acquisition finished and the end marker was sent.
    Stopped,
}

impl<L: SigmaLink> Sigma<L> {
    /// Compile the trigger, upload the look-up tables where they apply,
    /// and arm the capture. `now_us` is the caller's monotonic clock in
    /// microseconds, the same clock later handed to [`Sigma::tick`].
    pub fn start_acquisition(&mut self, now_us: u64) -> Result<()> {
        // The samplerate pick implies the firmware; make sure one runs.
        if self.cur_firmware.is_none() {
            self.set_samplerate(self.samplerate)?;
        }

        self.convert_trigger()?;

        // The look-up tables drive the match units at 50 MHz and below.
        // The fast firmwares watch a single pin edge without them.
        if self.samplerate <= SR_MHZ_50 {
            let lut = build_basic_trigger(&self.trigger);
            self.write_trigger_lut(&lut)?;
        }

        // Start storing clusters to DRAM.
        self.set_register(WriteReg::Mode, WMR_SDRAMWRITEEN)?;

        self.start_time_us = now_us;
        self.state.state = CaptureState::Capture;
        log::info!("acquisition started");
        Ok(())
    }

    /// Ask for the capture to end; the next tick downloads the samples.
    pub fn stop_acquisition(&mut self) {
        self.state.state = CaptureState::Stopping;
    }

    /// Periodic service entry point for the host's event loop. Checks the
    /// capture deadline, runs the download when due, and reports whether
    /// polling should continue. An error aborts the capture.
    pub fn tick(&mut self, now_us: u64, feed: &mut dyn Datafeed) -> Result<Tick> {
        let outcome = self.tick_inner(now_us, feed);
        if outcome.is_err() {
            self.state.state = CaptureState::Idle;
        }
        outcome
    }

    fn tick_inner(&mut self, now_us: u64, feed: &mut dyn Datafeed) -> Result<Tick> {
        match self.state.state {
            CaptureState::Idle | CaptureState::Download => Ok(Tick::Continue),
            CaptureState::Stopping => {
                self.download(feed)?;
                Ok(Tick::Stopped)
            }
            CaptureState::Capture => {
                // The configured duration covers the sample count limit as
                // well. Without a limit the capture runs until stopped.
                let running_msec = now_us.saturating_sub(self.start_time_us) / 1000;
                if self.limit_msec != 0 && running_msec >= self.limit_msec {
                    self.download(feed)?;
                    return Ok(Tick::Stopped);
                }
                Ok(Tick::Continue)
            }
        }
    }

    /// Stop the hardware, read back the capture ring, and feed the decoded
    /// samples to the sink.
    fn download(&mut self, feed: &mut dyn Datafeed) -> Result<()> {
        log::info!("downloading sample data");
        self.state.state = CaptureState::Download;

        // FORCESTOP makes the hardware store a cluster for every timestamp
        // from here on (no more RLE) and raise POSTTRIGGERED once its
        // pipeline has drained into DRAM.
        self.set_register(WriteReg::Mode, WMR_FORCESTOP | WMR_SDRAMWRITEEN)?;
        while self.read_mode()? & RMR_POSTTRIGGERED == 0 {}

        self.set_register(WriteReg::Mode, WMR_SDRAMREADEN)?;

        let (stop_pos, trigger_pos) = self.read_positions()?;

        // Find out whether the trigger fired and whether the ring wrapped.
        let status = self.read_mode()?;
        let mut trg_row = !0u32;
        let mut trg_event = !0u32;
        if status & RMR_TRIGGERED != 0 {
            trg_row = trigger_pos >> ROW_SHIFT;
            trg_event = trigger_pos & ROW_MASK;
        }

        self.sent_samples = 0;

        // Rows needed for a complete sample set; the last one may be
        // partially filled. After a wraparound the row beyond the stop
        // position is being overwritten concurrently, so skip it and
        // shorten the total accordingly.
        let mut first_row = 0u32;
        let mut rows_total = (stop_pos >> ROW_SHIFT) + 1;
        if status & RMR_ROUND != 0 {
            first_row = rows_total + 1;
            rows_total = ROW_COUNT - 2;
        }

        let mut buf = vec![0u8; ROWS_PER_READ * ROW_LENGTH_BYTES];
        let mut events_in_row = EVENTS_PER_ROW;
        let mut rows_done = 0u32;
        while rows_done < rows_total {
            let batch = ROWS_PER_READ.min((rows_total - rows_done) as usize);
            let row = (first_row + rows_done) % ROW_COUNT;

            let wanted = batch * ROW_LENGTH_BYTES;
            let got = self.read_dram(row as u16, batch, &mut buf)?;
            if got < wanted {
                // Decode what arrived anyway rather than dropping the
                // capture; the tail of the buffer holds stale data.
                log::error!("short DRAM read: {got} of {wanted} bytes");
            }

            // The first row seeds the decoder's timestamp tracking.
            if rows_done == 0 {
                self.state.last_ts = Cluster::of_row(&buf, 0).timestamp();
                self.state.last_sample = 0;
            }

            for i in 0..batch {
                let line = &buf[i * ROW_LENGTH_BYTES..][..ROW_LENGTH_BYTES];

                if rows_done + i as u32 == rows_total - 1 {
                    events_in_row = (stop_pos & ROW_MASK) as usize;
                }

                let trigger_event = if rows_done + i as u32 == trg_row {
                    trg_event
                } else {
                    !0u32
                };

                self.decode_row(line, events_in_row, trigger_event, feed);
            }

            rows_done += batch as u32;
        }

        feed.send(Packet::End);
        self.state.state = CaptureState::Idle;
        Ok(())
    }
}
