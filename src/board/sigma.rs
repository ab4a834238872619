mod acquisition;
mod decode;
mod registers;
mod sample_rate;
mod trigger;

pub use acquisition::Tick;
pub use sample_rate::SAMPLERATES;
pub use trigger::{PinMatch, TriggerMatch, TriggerSpec, TriggerStage};

use crate::datafeed::FirmwareSource;
use crate::hardware::spartan3::{self, Firmware};
use crate::link::SigmaLink;
use sigma_globals::Result;
use sigma_proto::lut::Trigger;

/// Capture progress, advanced by the periodic [`Sigma::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    /// No acquisition in progress.
    Idle,
    /// Armed and sampling into the DRAM ring.
    Capture,
    /// Stop requested; the next tick starts the download.
    Stopping,
    /// Sample download and decoding in progress.
    Download,
}

/// Decoder bookkeeping carried across clusters within one capture.
struct DecoderState {
    state: CaptureState,
    last_ts: u16,
    last_sample: u16,
}

/// An open SIGMA/SIGMA2 device.
///
/// The handle is single threaded by design: the register pipe cannot
/// interleave commands, and the capture state machine expects `tick`,
/// `start_acquisition` and `stop_acquisition` to be serialized by the
/// host's event loop.
pub struct Sigma<L: SigmaLink> {
    link: L,
    firmware_source: Box<dyn FirmwareSource>,

    samplerate: u64,
    num_channels: usize,
    /// Sample points per memory event, 16 / num_channels.
    samples_per_event: usize,
    cur_firmware: Option<Firmware>,

    limit_samples: u64,
    limit_msec: u64,
    sent_samples: u64,
    start_time_us: u64,

    trigger_spec: TriggerSpec,
    trigger: Trigger,
    use_triggers: bool,

    state: DecoderState,
}

impl<L: SigmaLink> Sigma<L> {
    /// Wrap an opened link. Device enumeration and open/close belong to
    /// the embedding application; this is also the seam for injecting a
    /// scripted transport under test.
    pub fn from_link(link: L, firmware_source: Box<dyn FirmwareSource>) -> Self {
        Self {
            link,
            firmware_source,
            samplerate: SAMPLERATES[0],
            num_channels: 16,
            samples_per_event: 1,
            cur_firmware: None,
            limit_samples: 0,
            limit_msec: 0,
            sent_samples: 0,
            start_time_us: 0,
            trigger_spec: TriggerSpec::default(),
            trigger: Trigger::default(),
            use_triggers: false,
            state: DecoderState {
                state: CaptureState::Idle,
                last_ts: 0,
                last_sample: 0,
            },
        }
    }

    /// Access the underlying link, mainly for diagnostics.
    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn samplerate(&self) -> u64 {
        self.samplerate
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn capture_state(&self) -> CaptureState {
        self.state.state
    }

    /// Samples delivered to the datafeed so far in this capture.
    pub fn sent_samples(&self) -> u64 {
        self.sent_samples
    }

    /// Capture duration the configured sample limit translates to.
    pub fn limit_msec(&self) -> u64 {
        self.limit_msec
    }

    /// Whether the compiled trigger is armed in hardware and announced to
    /// the datafeed.
    pub fn set_use_triggers(&mut self, use_triggers: bool) {
        self.use_triggers = use_triggers;
    }

    /// Load a firmware image into the FPGA, skipping the work when that
    /// image is already running.
    pub fn upload_firmware(&mut self, firmware: Firmware) -> Result<()> {
        if self.cur_firmware == Some(firmware) {
            log::info!("not uploading firmware file '{}' again", firmware.file_name());
            return Ok(());
        }

        spartan3::configure(&mut self.link, self.firmware_source.as_mut(), firmware)?;

        self.cur_firmware = Some(firmware);
        log::info!("firmware uploaded");
        Ok(())
    }
}
