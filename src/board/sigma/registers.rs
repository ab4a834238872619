//! Register access over the byte pipe, built on the `sigma-proto` encoders.

use super::Sigma;
use crate::link::SigmaLink;
use sigma_globals::{Error, Result};
use sigma_proto::{command, dram, ReadReg, WriteReg};

impl<L: SigmaLink> Sigma<L> {
    pub(crate) fn write_register(&mut self, reg: WriteReg, data: &[u8]) -> Result<()> {
        let cmd = command::write_register(reg as u8, data)?;
        self.link.write_all(&cmd)
    }

    pub(crate) fn set_register(&mut self, reg: WriteReg, value: u8) -> Result<()> {
        self.write_register(reg, &[value])
    }

    pub(crate) fn read_register(&mut self, reg: ReadReg, buf: &mut [u8]) -> Result<usize> {
        self.link.write_all(&command::read_register(reg as u8))?;
        self.link.read(buf)
    }

    pub(crate) fn read_mode(&mut self) -> Result<u8> {
        let mut status = [0u8; 1];
        let actual = self.read_register(ReadReg::Mode, &mut status)?;
        if actual != status.len() {
            log::error!("failed to read the mode register");
            return Err(Error::ShortTransfer {
                expected: status.len(),
                actual,
            });
        }
        Ok(status[0])
    }

    /// Fetch the corrected `(stop, trigger)` position counters.
    pub(crate) fn read_positions(&mut self) -> Result<(u32, u32)> {
        self.link.write_all(&command::position_request())?;

        let mut raw = [0u8; 6];
        let actual = self.link.read(&mut raw)?;
        if actual != raw.len() {
            return Err(Error::ShortTransfer {
                expected: raw.len(),
                actual,
            });
        }

        Ok(command::decode_positions(&raw))
    }

    /// Burst-read `row_count` DRAM rows starting at `start_row` into `out`.
    /// Returns the number of bytes received, which a congested bus can cut
    /// short.
    pub(crate) fn read_dram(
        &mut self,
        start_row: u16,
        row_count: usize,
        out: &mut [u8],
    ) -> Result<usize> {
        self.write_register(WriteReg::MemRow, &command::memrow_bytes(start_row))?;
        self.link.write_all(&command::dram_read(row_count))?;
        self.link.read(&mut out[..dram::ROW_LENGTH_BYTES * row_count])
    }
}
