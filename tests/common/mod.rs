#![allow(dead_code)]
/// This module lives in a subfolder as common/mod.rs instead of a plain
/// common.rs, so the test runner does not look for runnable tests in it.
use libsigma_rs::{Datafeed, FirmwareSource, Packet, Result, SigmaLink};
use std::collections::VecDeque;

pub fn logging_init(module: &str) {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Error)
        .filter_module(module, log::LevelFilter::Trace)
        .try_init();
}

/// Scripted stand-in for the FTDI cable. Writes are recorded, reads are
/// served from a queue of prepared responses, one entry per read call; an
/// empty entry makes that read return zero bytes.
#[derive(Default)]
pub struct MockLink {
    pub reads: VecDeque<Vec<u8>>,
    pub writes: Vec<Vec<u8>>,
    pub bitbang_mask: Option<u8>,
    pub baud: Option<u32>,
    pub purges: usize,
    pub resets: usize,
}

impl MockLink {
    pub fn push_read(&mut self, bytes: &[u8]) {
        self.reads.push_back(bytes.to_vec());
    }
}

impl SigmaLink for MockLink {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.writes.push(buf.to_vec());
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.reads.pop_front() {
            Some(response) => {
                let n = response.len().min(buf.len());
                buf[..n].copy_from_slice(&response[..n]);
                Ok(n)
            }
            None => Ok(0),
        }
    }

    fn purge(&mut self) -> Result<()> {
        self.purges += 1;
        Ok(())
    }

    fn set_bitbang(&mut self, pin_mask: u8) -> Result<()> {
        self.bitbang_mask = Some(pin_mask);
        Ok(())
    }

    fn set_baud(&mut self, rate: u32) -> Result<()> {
        self.baud = Some(rate);
        Ok(())
    }

    fn reset_mode(&mut self) -> Result<()> {
        self.resets += 1;
        Ok(())
    }
}

/// Firmware source returning the same image for every request.
pub struct StaticFirmware(pub Vec<u8>);

impl FirmwareSource for StaticFirmware {
    fn load(&mut self, _name: &str) -> Result<Vec<u8>> {
        Ok(self.0.clone())
    }
}

/// Queue the responses one firmware upload consumes: the INIT_B poll (bit
/// D5 asserted), the stale-input drain finding the pipe empty, and the
/// ID/scratch echo.
pub fn script_firmware_upload(link: &mut MockLink) {
    link.push_read(&[0x20]);
    link.push_read(&[]);
    link.push_read(&[0xa6, 0x55, 0xaa]);
}

#[derive(Debug, PartialEq, Eq)]
pub enum OwnedPacket {
    Logic(Vec<u8>),
    Trigger,
    End,
}

/// Collects everything the driver feeds to the session.
#[derive(Default)]
pub struct CaptureFeed {
    pub packets: Vec<OwnedPacket>,
}

impl Datafeed for CaptureFeed {
    fn send(&mut self, packet: Packet<'_>) {
        self.packets.push(match packet {
            Packet::Logic { data, .. } => OwnedPacket::Logic(data.to_vec()),
            Packet::Trigger => OwnedPacket::Trigger,
            Packet::End => OwnedPacket::End,
        });
    }
}

impl CaptureFeed {
    /// All logic payloads flattened into 16 bit samples.
    pub fn samples(&self) -> Vec<u16> {
        let mut samples = Vec::new();
        for packet in &self.packets {
            if let OwnedPacket::Logic(data) = packet {
                for pair in data.chunks_exact(2) {
                    samples.push(u16::from_le_bytes([pair[0], pair[1]]));
                }
            }
        }
        samples
    }

    pub fn ended(&self) -> bool {
        matches!(self.packets.last(), Some(OwnedPacket::End))
    }
}

/// Render a DRAM row image from `(timestamp, items)` clusters. Sample
/// items are stored byte-swapped on the wire.
pub fn encode_row(clusters: &[(u16, Vec<u16>)]) -> Vec<u8> {
    assert!(clusters.len() <= 64);
    let mut row = vec![0u8; 1024];
    for (i, (ts, items)) in clusters.iter().enumerate() {
        assert!(items.len() <= 7);
        let base = i * 16;
        row[base..base + 2].copy_from_slice(&ts.to_le_bytes());
        for (j, item) in items.iter().enumerate() {
            row[base + 2 + 2 * j..base + 4 + 2 * j].copy_from_slice(&item.to_be_bytes());
        }
    }
    row
}

/// Raw position register block as read from the device: trigger counter
/// first, both little endian, 24 bits each.
pub fn positions_raw(trigger: u32, stop: u32) -> Vec<u8> {
    vec![
        (trigger & 0xff) as u8,
        ((trigger >> 8) & 0xff) as u8,
        ((trigger >> 16) & 0xff) as u8,
        (stop & 0xff) as u8,
        ((stop >> 8) & 0xff) as u8,
        ((stop >> 16) & 0xff) as u8,
    ]
}
