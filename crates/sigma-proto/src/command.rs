//! Builders for the nibble-framed command sequences of the register pipe,
//! and the decode side of the multi-byte reads.

use crate::dram::{ROW_LENGTH_BYTES, ROW_MASK};
use crate::{
    dram_sel, ReadReg, OP_ADDR_HIGH, OP_ADDR_INC, OP_ADDR_LOW, OP_DATA_HIGH_WRITE, OP_DATA_LOW,
    OP_DRAM_BLOCK, OP_DRAM_BLOCK_DATA, OP_DRAM_WAIT_ACK, OP_READ_ADDR,
};
use sigma_globals::{Error, Result};

/// Longest command sequence the device accepts in one go.
pub const COMMAND_FRAME_BYTES: usize = 80;

/// Render a register write: one address preamble, then a low/high nibble
/// pair per data byte. Sequences beyond the command frame are a caller bug
/// and get rejected before any I/O.
pub fn write_register(reg: u8, data: &[u8]) -> Result<Vec<u8>> {
    let len = 2 * data.len() + 2;
    if len > COMMAND_FRAME_BYTES {
        return Err(Error::FrameOverflow(len));
    }

    let mut buf = Vec::with_capacity(len);
    buf.push(OP_ADDR_LOW | (reg & 0xf));
    buf.push(OP_ADDR_HIGH | (reg >> 4));
    for byte in data {
        buf.push(OP_DATA_LOW | (byte & 0xf));
        buf.push(OP_DATA_HIGH_WRITE | (byte >> 4));
    }
    Ok(buf)
}

/// Address a register and emit one byte of it onto the read pipe. Longer
/// reads repeat the emit opcode with address auto-increment instead, see
/// [`position_request`].
pub fn read_register(reg: u8) -> [u8; 3] {
    [
        OP_ADDR_LOW | (reg & 0xf),
        OP_ADDR_HIGH | (reg >> 4),
        OP_READ_ADDR,
    ]
}

/// Request both position counters: six registers starting at the trigger
/// position LSB, which yields two 24 bit values.
pub fn position_request() -> [u8; 7] {
    [
        OP_ADDR_LOW | ReadReg::TriggerPosLow as u8,
        OP_READ_ADDR | OP_ADDR_INC,
        OP_READ_ADDR | OP_ADDR_INC,
        OP_READ_ADDR | OP_ADDR_INC,
        OP_READ_ADDR | OP_ADDR_INC,
        OP_READ_ADDR | OP_ADDR_INC,
        OP_READ_ADDR | OP_ADDR_INC,
    ]
}

/// Assemble `(stop, trigger)` from the raw six byte register block and
/// apply the end-of-event correction to each.
///
/// The counters point past the event that produced them, hence the
/// decrement. Sample memory consists of 512-entity chunks with meta data
/// in the upper 64 entities, so a decrement that lands in that upper part
/// moves further back to the end of the chunk's data part.
///
/// The layout claim behind the second adjustment does not hold up against
/// the row format (64 timestamps spread through a row, not clustered at
/// the top), but the arithmetic matches the device and stays as is.
pub fn decode_positions(raw: &[u8; 6]) -> (u32, u32) {
    let trigger = u32::from(raw[0]) | u32::from(raw[1]) << 8 | u32::from(raw[2]) << 16;
    let stop = u32::from(raw[3]) | u32::from(raw[4]) << 8 | u32::from(raw[5]) << 16;
    (correct_position(stop), correct_position(trigger))
}

fn correct_position(pos: u32) -> u32 {
    let pos = pos.wrapping_sub(1);
    if pos & ROW_MASK == ROW_MASK {
        pos.wrapping_sub(64)
    } else {
        pos
    }
}

/// Operand bytes for `WriteReg::MemRow`, high byte first on the wire.
pub fn memrow_bytes(start_row: u16) -> [u8; 2] {
    [(start_row >> 8) as u8, (start_row & 0xff) as u8]
}

/// Command stream for a burst read of `row_count` DRAM rows.
///
/// The FPGA fetches a row from DRAM into one of its two internal buffers
/// while the USB pipe drains the other; the stream toggles the buffer
/// selector accordingly and gates every row on a wait-for-ack. The caller
/// must have programmed the start row first and reads
/// `row_count * ROW_LENGTH_BYTES` bytes afterwards.
pub fn dram_read(row_count: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(3 * row_count + 2);
    buf.push(OP_DRAM_BLOCK);
    buf.push(OP_DRAM_WAIT_ACK);
    for row in 0..row_count {
        let sel = row % 2 == 1;
        let is_last = row == row_count - 1;
        if !is_last {
            buf.push(OP_DRAM_BLOCK | dram_sel(!sel));
        }
        buf.push(OP_DRAM_BLOCK_DATA | dram_sel(sel));
        if !is_last {
            buf.push(OP_DRAM_WAIT_ACK);
        }
    }
    buf
}

/// Number of bytes a burst read of `row_count` rows produces.
pub fn dram_read_len(row_count: usize) -> usize {
    row_count * ROW_LENGTH_BYTES
}
