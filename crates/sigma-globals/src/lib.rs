//! Shared error type for the `libsigma-rs` workspace.

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The FTDI transport reported a failure.
    #[error("ftdi: {0:?}")]
    Ftdi(#[from] libftd2xx::FtStatus),
    /// I/O error occurred.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// Transfer ended early.
    #[error("short transfer: {actual} of {expected} bytes")]
    ShortTransfer {
        /// Number of bytes the operation needed.
        expected: usize,
        /// Number of bytes that actually moved.
        actual: usize,
    },
    /// A register command sequence does not fit the device's command frame.
    /// This is a caller bug and is reported before any I/O happens.
    #[error("register command of {0} bytes exceeds the device frame")]
    FrameOverflow(usize),
    /// The device did not answer within the allotted polling window.
    #[error("timeout waiting for the device")]
    Timeout,
    /// The FPGA did not come up in logic-analyzer mode after configuration.
    #[error("FPGA configuration check failed")]
    FpgaInit,
    /// Requested rate is not in the supported set.
    #[error("unsupported samplerate: {0} Hz")]
    UnsupportedSamplerate(u64),
    /// Requested trigger cannot be expressed at the current samplerate.
    #[error("unsupported trigger: {0}")]
    UnsupportedTrigger(&'static str),
    /// A firmware image could not be obtained.
    #[error("firmware resource '{0}' unavailable")]
    Resource(String),
}

/// Result type for operations that may return an `Error`.
pub type Result<T> = std::result::Result<T, Error>;
