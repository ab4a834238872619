//! Wire formats of the SIGMA's FPGA register pipe and sample memory.
//!
//! Everything in this crate is pure data transformation: command sequences
//! are rendered into byte buffers and captured DRAM content is interpreted
//! in place, so all of it can be exercised without a cable attached. The
//! actual byte pipe lives in the `libsigma-rs` crate.

pub mod command;
pub mod dram;
pub mod lut;

/// Command opcodes, carried in the high nibble of every byte written to the
/// register pipe. The low nibble is the operand.
pub const OP_ADDR_LOW: u8 = 0x0 << 4;
pub const OP_ADDR_HIGH: u8 = 0x1 << 4;
pub const OP_DATA_LOW: u8 = 0x2 << 4;
/// Stages the high data nibble and commits the write.
pub const OP_DATA_HIGH_WRITE: u8 = 0x3 << 4;
/// Emits one byte from the addressed register onto the read pipe.
pub const OP_READ_ADDR: u8 = 0x4 << 4;
pub const OP_DRAM_WAIT_ACK: u8 = 0x5 << 4;

/// DRAM block access. Bit (1 << 4) picks one of the two FPGA-internal row
/// buffers, which lets a DRAM fetch overlap the USB drain of the other one.
pub const OP_DRAM_BLOCK: u8 = 0x6 << 4;
pub const OP_DRAM_BLOCK_BEGIN: u8 = 0x8 << 4;
pub const OP_DRAM_BLOCK_DATA: u8 = 0xa << 4;
pub const OP_DRAM_SEL_N: u8 = 0x1 << 4;

/// Auto-increments the register address after an [`OP_READ_ADDR`].
pub const OP_ADDR_INC: u8 = 0x01;

/// Row buffer selector for the DRAM opcodes.
pub const fn dram_sel(second: bool) -> u8 {
    if second { OP_DRAM_SEL_N } else { 0 }
}

/// Writable register addresses.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteReg {
    TriggerSelect = 1,
    TriggerSelect2 = 2,
    Mode = 3,
    MemRow = 4,
    /// Scratch register, used for the post-configuration echo check.
    Test = 15,
}

/// Readable register addresses. The two 24 bit position counters occupy
/// six consecutive addresses and are meant to be read with address
/// auto-increment.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadReg {
    Id = 0,
    TriggerPosLow = 1,
    TriggerPosHigh = 2,
    TriggerPosUp = 3,
    StopPosLow = 4,
    StopPosHigh = 5,
    StopPosUp = 6,
    Mode = 7,
    Test = 15,
}

/// The ID register reads back this value on a healthy device.
pub const REG_ID_VALUE: u8 = 0xa6;

/// `WriteReg::Mode` bits.
pub const WMR_SDRAMWRITEEN: u8 = 1 << 0;
pub const WMR_SDRAMREADEN: u8 = 1 << 1;
/// Stop the acquisition and store clusters for every timestamp from here
/// on, i.e. no more run length encoding.
pub const WMR_FORCESTOP: u8 = 1 << 4;
pub const WMR_SDRAMINIT: u8 = 1 << 7;

/// `ReadReg::Mode` bits.
/// The capture ring wrapped around at least once.
pub const RMR_ROUND: u8 = 1 << 4;
pub const RMR_TRIGGERED: u8 = 1 << 5;
pub const RMR_POSTTRIGGERED: u8 = 1 << 6;

/// `WriteReg::TriggerSelect2` strobe for loading one transposed LUT
/// slice; the low nibble carries the slice index.
pub const TRGSEL2_LUT_WRITE: u8 = 0x30;
pub const TRGSEL2_LUT_ADDR_MASK: u8 = 0x0f;
