//! Seams to the surrounding application: the sample sink fed during a
//! download, and the provider of firmware images. Both are supplied by
//! the embedding session; the driver only defines their shape.

use sigma_globals::Result;

/// One packet handed to the session's sample sink.
#[derive(Debug)]
pub enum Packet<'a> {
    /// Decoded channel vectors, `unit_size` bytes per sample, little
    /// endian. The buffer is only valid for the duration of the call.
    Logic { unit_size: usize, data: &'a [u8] },
    /// The exact trigger position within the sample stream: everything
    /// before this marker is pre-trigger data.
    Trigger,
    /// No further packets will follow for this acquisition.
    End,
}

/// Receives the decoded capture, in sample order.
pub trait Datafeed {
    fn send(&mut self, packet: Packet<'_>);
}

/// Resolves the vendor's firmware files by name.
pub trait FirmwareSource {
    fn load(&mut self, name: &str) -> Result<Vec<u8>>;
}
