//! Byte-pipe access to the FTDI bridge.
//!
//! Enumerating and opening the cable is the embedding application's
//! business; this module only defines what the driver needs from an
//! already opened handle, and provides that surface for [`libftd2xx`]
//! handles.

use libftd2xx::{BitMode, Ftdi, FtdiCommon};
use sigma_globals::{Error, Result};

/// The cable as seen by the driver: a byte pipe with a bitbang escape
/// hatch for FPGA configuration.
///
/// A multi-byte command and its response own the pipe for their duration;
/// interleaving a second command corrupts both.
pub trait SigmaLink {
    /// Write the whole buffer. A partial write is an error.
    fn write_all(&mut self, buf: &[u8]) -> Result<()>;
    /// Read up to `buf.len()` bytes, returning how many arrived.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;
    /// Discard buffered input and output.
    fn purge(&mut self) -> Result<()>;
    /// Drive the data pins in `pin_mask` directly at the configured baud.
    fn set_bitbang(&mut self, pin_mask: u8) -> Result<()>;
    fn set_baud(&mut self, rate: u32) -> Result<()>;
    /// Return to plain byte-pipe operation.
    fn reset_mode(&mut self) -> Result<()>;
}

impl SigmaLink for Ftdi {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        let actual = FtdiCommon::write(self, buf)?;
        if actual != buf.len() {
            log::error!("cable write did not complete: {actual} of {} bytes", buf.len());
            return Err(Error::ShortTransfer {
                expected: buf.len(),
                actual,
            });
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(FtdiCommon::read(self, buf)?)
    }

    fn purge(&mut self) -> Result<()> {
        Ok(self.purge_all()?)
    }

    fn set_bitbang(&mut self, pin_mask: u8) -> Result<()> {
        Ok(self.set_bit_mode(pin_mask, BitMode::AsyncBitbang)?)
    }

    fn set_baud(&mut self, rate: u32) -> Result<()> {
        Ok(self.set_baud_rate(rate)?)
    }

    fn reset_mode(&mut self) -> Result<()> {
        Ok(self.set_bit_mode(0, BitMode::Reset)?)
    }
}
