//! Decoding of captured DRAM rows into the datafeed's sample stream.
//!
//! Events are 16 bit entities; at 100 and 200 MHz an event packs two or
//! four sample points with their bits interleaved. Gaps between cluster
//! timestamps mean the inputs sat still and the hardware suppressed
//! clusters, so the gap is re-expanded by repeating the previous value.

use super::sample_rate::{SR_MHZ_100, SR_MHZ_200, SR_MHZ_50};
use super::Sigma;
use crate::datafeed::{Datafeed, Packet};
use crate::link::SigmaLink;
use sigma_proto::dram::{self, Cluster, EVENTS_PER_CLUSTER, EVENTS_PER_ROW, ROW_LENGTH_U16};
use sigma_proto::lut::Trigger;

/// Staging area for decoded samples: up to 512 entities per row, four
/// sample points per event at the top rate.
const SAMPLES_BUFFER_SIZE: usize = ROW_LENGTH_U16 * 2 * 4;

/// Logic samples are 16 bit channel vectors.
const UNIT_SIZE: usize = 2;

fn store_sample(samples: &mut [u8], index: usize, value: u16) {
    samples[2 * index..2 * index + 2].copy_from_slice(&value.to_le_bytes());
}

fn load_sample(samples: &[u8], index: usize) -> u16 {
    u16::from_le_bytes([samples[2 * index], samples[2 * index + 1]])
}

/// Software re-scan for the exact trigger sample.
///
/// The hardware's reported position is off by a little because of pipeline
/// delay, but it always lies before the actual event. Look at the next
/// eight samples for the first one matching the compiled condition; when
/// none does, stick with the reported position.
fn trigger_offset(samples: &[u8], mut last_sample: u16, trigger: &Trigger) -> usize {
    let mut sample = 0u16;
    for i in 0..8 {
        if i > 0 {
            last_sample = sample;
        }
        sample = load_sample(samples, i);

        if sample & trigger.simple_mask != trigger.simple_value {
            continue;
        }
        if last_sample & trigger.rising_mask != 0
            || sample & trigger.rising_mask != trigger.rising_mask
        {
            continue;
        }
        if last_sample & trigger.falling_mask != trigger.falling_mask
            || sample & trigger.falling_mask != 0
        {
            continue;
        }
        return i;
    }
    0
}

impl<L: SigmaLink> Sigma<L> {
    /// Forward a logic payload to the datafeed, truncating or dropping it
    /// so a configured sample count limit is never exceeded.
    fn session_send(&mut self, feed: &mut dyn Datafeed, data: &[u8]) {
        let mut data = data;
        if self.limit_samples != 0 {
            let mut send_now = (data.len() / UNIT_SIZE) as u64;
            if self.sent_samples + send_now > self.limit_samples {
                send_now = self.limit_samples - self.sent_samples;
                data = &data[..send_now as usize * UNIT_SIZE];
            }
            if send_now == 0 {
                return;
            }
            self.sent_samples += send_now;
        }

        feed.send(Packet::Logic {
            unit_size: UNIT_SIZE,
            data,
        });
    }

    /// Decode one 1024 byte DRAM row of up to 64 clusters.
    pub(crate) fn decode_row(
        &mut self,
        row: &[u8],
        events_in_row: usize,
        trigger_event: u32,
        feed: &mut dyn Datafeed,
    ) {
        let clusters_in_row = (events_in_row + EVENTS_PER_CLUSTER - 1) / EVENTS_PER_CLUSTER;

        // Locate the trigger cluster, if the trigger lies in this row. The
        // reported event is past the match, so back off within the cluster
        // at the low rates; the per-cluster re-scan pinpoints the sample.
        let mut trigger_cluster = None;
        if (trigger_event as usize) < EVENTS_PER_ROW {
            let mut event = trigger_event as usize;
            if self.samplerate <= SR_MHZ_50 {
                event -= (EVENTS_PER_CLUSTER - 1).min(event);
            }
            trigger_cluster = Some(event / EVENTS_PER_CLUSTER);
        }

        for i in 0..clusters_in_row {
            let cluster = Cluster::of_row(row, i);

            // The last cluster of a partial row is itself partial.
            let events_in_cluster =
                if i == clusters_in_row - 1 && events_in_row % EVENTS_PER_CLUSTER != 0 {
                    events_in_row % EVENTS_PER_CLUSTER
                } else {
                    EVENTS_PER_CLUSTER
                };

            self.decode_cluster(cluster, events_in_cluster, trigger_cluster == Some(i), feed);
        }
    }

    fn decode_cluster(
        &mut self,
        cluster: Cluster<'_>,
        events_in_cluster: usize,
        triggered: bool,
        feed: &mut dyn Datafeed,
    ) {
        let mut samples = [0u8; SAMPLES_BUFFER_SIZE];

        let ts = cluster.timestamp();
        let tsdiff = ts.wrapping_sub(self.state.last_ts);
        self.state.last_ts = ts.wrapping_add(EVENTS_PER_CLUSTER as u16);

        // Re-expand the run length: repeat the previous value across the
        // timestamp gap, in packets of up to 1024 samples. Above 50 MHz
        // the same 16 bit pattern stands for several sample points, which
        // for constant data simply means sending the packet once per
        // sample point.
        for t in 0..tsdiff {
            let i = (t % 1024) as usize;
            store_sample(&mut samples, i, self.state.last_sample);

            if i == 1023 || t == tsdiff - 1 {
                for _ in 0..self.samples_per_event {
                    self.session_send(feed, &samples[..(i + 1) * UNIT_SIZE]);
                }
            }
        }

        // The cluster payload, deinterlaced according to the memory layout
        // of the current samplerate.
        let mut send_count = 0usize;
        let mut sample = 0u16;
        for event in 0..events_in_cluster {
            let item = cluster.item(event);
            if self.samplerate == SR_MHZ_200 {
                for index in 0..4 {
                    sample = dram::deinterlace_200mhz(item, index);
                    store_sample(&mut samples, send_count, sample);
                    send_count += 1;
                }
            } else if self.samplerate == SR_MHZ_100 {
                for index in 0..2 {
                    sample = dram::deinterlace_100mhz(item, index);
                    store_sample(&mut samples, send_count, sample);
                    send_count += 1;
                }
            } else {
                sample = item;
                store_sample(&mut samples, send_count, sample);
                send_count += 1;
            }
        }

        // When the trigger lies in this cluster, split the payload at the
        // exact trigger sample and mark the spot.
        let mut send_from = 0usize;
        if triggered {
            let offset = trigger_offset(&samples, self.state.last_sample, &self.trigger);
            if offset > 0 {
                let trig_count = (offset * self.samples_per_event).min(send_count);
                self.session_send(feed, &samples[..trig_count * UNIT_SIZE]);
                send_from = trig_count;
                send_count -= trig_count;
            }

            // Only announce the trigger when explicitly enabled.
            if self.use_triggers {
                feed.send(Packet::Trigger);
            }
        }

        if send_count > 0 {
            let from = send_from * UNIT_SIZE;
            self.session_send(feed, &samples[from..from + send_count * UNIT_SIZE]);
        }

        self.state.last_sample = sample;
    }
}
