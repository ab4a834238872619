use super::{CaptureState, Sigma};
use crate::hardware::spartan3::Firmware;
use crate::link::SigmaLink;
use sigma_globals::{Error, Result};

/// Supported rates. The 50 MHz firmware accepts any integer divider in
/// 1..=256; only this canonical subset is exposed. The two top rates need
/// their own firmware images.
pub const SAMPLERATES: [u64; 10] = [
    200_000,     // div=250
    250_000,     // div=200
    500_000,     // div=100
    1_000_000,   // div=50
    5_000_000,   // div=10
    10_000_000,  // div=5
    25_000_000,  // div=2
    50_000_000,  // div=1
    100_000_000, // special FW
    200_000_000, // special FW
];

pub(crate) const SR_MHZ_50: u64 = 50_000_000;
pub(crate) const SR_MHZ_100: u64 = 100_000_000;
pub(crate) const SR_MHZ_200: u64 = 200_000_000;

impl<L: SigmaLink> Sigma<L> {
    /// Select the samplerate, uploading the matching firmware when needed.
    /// The higher rates reduce the number of usable channels.
    pub fn set_samplerate(&mut self, samplerate: u64) -> Result<()> {
        if !SAMPLERATES.contains(&samplerate) {
            return Err(Error::UnsupportedSamplerate(samplerate));
        }

        let (firmware, num_channels) = if samplerate <= SR_MHZ_50 {
            (Firmware::Mhz50, 16)
        } else if samplerate == SR_MHZ_100 {
            (Firmware::Mhz100, 8)
        } else {
            (Firmware::Mhz200, 4)
        };
        self.upload_firmware(firmware)?;

        self.num_channels = num_channels;
        self.samplerate = samplerate;
        // The device groups sample memory into "events"; above 50 MHz one
        // event carries more than one sample point.
        self.samples_per_event = 16 / self.num_channels;
        self.state.state = CaptureState::Idle;

        // The sample count limit is enforced as elapsed time; recompute it
        // in case the limit was configured before the rate.
        if self.limit_samples != 0 {
            self.limit_msec = self.limit_samples_to_msec(self.limit_samples);
        }

        log::info!(
            "samplerate set to {samplerate} Hz, {} channels",
            self.num_channels
        );
        Ok(())
    }

    /// Stop after roughly this many samples; 0 removes the limit. The
    /// datafeed never receives more than the requested count.
    pub fn set_limit_samples(&mut self, limit_samples: u64) {
        self.limit_samples = limit_samples;
        self.limit_msec = if limit_samples != 0 {
            self.limit_samples_to_msec(limit_samples)
        } else {
            0
        };
    }

    /// The hardware cannot stop after a sample count, so the limit becomes
    /// a capture duration. Two worst-case cluster times are added on top:
    /// with static inputs the RLE hardware only emits a cluster once the
    /// 16 bit timestamp delta saturates, and a single cluster time does not
    /// flush the pipeline at the low rates.
    fn limit_samples_to_msec(&self, limit_samples: u64) -> u64 {
        limit_samples * 1000 / self.samplerate + 2 * 65536 * 1000 / self.samplerate
    }
}
