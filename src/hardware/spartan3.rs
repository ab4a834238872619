//! Spartan-3 slave-serial configuration through the cable's bitbang mode.
//!
//! See Xilinx UG332 for the configuration protocol: the host pulses PROG_B,
//! waits for the FPGA to raise INIT_B, then clocks the netlist in bit by
//! bit on DIN/CCLK. The cable's level shifters invert some pins, which is
//! why a high CCLK level here is idle from the FPGA's point of view.
//!
//! The vendor's firmware files carry the netlist XOR-masked with a fixed
//! keystream, and prescribe a "suicide sequence" of pin toggles that ends
//! regular FPGA execution before reconfiguration.

use crate::datafeed::FirmwareSource;
use crate::link::SigmaLink;
use sigma_globals::{Error, Result};
use sigma_proto::{
    command, ReadReg, WriteReg, OP_ADDR_LOW, OP_DATA_HIGH_WRITE, OP_DATA_LOW, OP_READ_ADDR,
    REG_ID_VALUE, WMR_SDRAMINIT,
};
use std::thread::sleep;
use std::time::Duration;

/// The firmware images, selected by samplerate class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Firmware {
    /// Up to 50 MHz sample rate, 8 bit clock divider, 16 channels.
    Mhz50,
    /// 100 MHz fixed, 8 channels.
    Mhz100,
    /// 200 MHz fixed, 4 channels.
    Mhz200,
    /// Synchronous clock from an external pin.
    Sync50,
    /// Frequency counter / phasor mode.
    Phasor,
}

impl Firmware {
    pub fn file_name(self) -> &'static str {
        match self {
            Firmware::Mhz50 => "asix-sigma-50.fw",
            Firmware::Mhz100 => "asix-sigma-100.fw",
            Firmware::Mhz200 => "asix-sigma-200.fw",
            Firmware::Sync50 => "asix-sigma-50sync.fw",
            Firmware::Phasor => "asix-sigma-phasor.fw",
        }
    }
}

pub const FIRMWARE_SIZE_LIMIT: usize = 256 * 1024;

/// Bitbang pin assignment. Everything is an output during configuration
/// download except INIT_B.
const BB_PIN_CCLK: u8 = 1 << 0; // D0
const BB_PIN_PROG: u8 = 1 << 1; // D1
const BB_PIN_D2: u8 = 1 << 2; // part of SUICIDE
const BB_PIN_D3: u8 = 1 << 3; // part of SUICIDE
const BB_PIN_INIT: u8 = 1 << 5; // input pin
const BB_PIN_DIN: u8 = 1 << 6;
const BB_PIN_D7: u8 = 1 << 7; // part of SUICIDE

const BB_BITRATE: u32 = 750 * 1000;
const BB_PINMASK: u8 = 0xff & !BB_PIN_INIT;

const INIT_RETRIES: u32 = 10;
const INIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Strip the XOR keystream off the on-disk netlist, in place.
pub fn unscramble(firmware: &mut [u8]) {
    let mut imm: u32 = 0x3f6d_f2ab;
    for byte in firmware.iter_mut() {
        imm = (imm.wrapping_add(0x0a85_3753) % 177).wrapping_add(imm.wrapping_mul(0x0803_4052));
        *byte ^= imm as u8;
    }
}

/// Expand the netlist into bitbang samples: two per configuration bit, MSB
/// first, providing the DIN level and both CCLK edges. CCLK is set first
/// and cleared second; behind the inverting level shifter that clears the
/// FPGA pin and then produces the rising edge which samples DIN, meeting
/// the setup time.
pub fn bitbang_stream(firmware: &[u8]) -> Vec<u8> {
    let mut stream = Vec::with_capacity(firmware.len() * 8 * 2);
    for byte in firmware {
        for bit in (0..8).rev() {
            let din = if byte & (1u8 << bit) != 0 { BB_PIN_DIN } else { 0 };
            stream.push(din | BB_PIN_CCLK);
            stream.push(din);
        }
    }
    stream
}

/// End regular FPGA execution, pulse PROG_B, and wait for INIT_B.
fn init_bitbang<L: SigmaLink>(link: &mut L) -> Result<()> {
    // Hold D7, toggle D2/D3.
    const SUICIDE: [u8; 8] = [
        BB_PIN_D7 | BB_PIN_D2,
        BB_PIN_D7 | BB_PIN_D2,
        BB_PIN_D7 | BB_PIN_D3,
        BB_PIN_D7 | BB_PIN_D2,
        BB_PIN_D7 | BB_PIN_D3,
        BB_PIN_D7 | BB_PIN_D2,
        BB_PIN_D7 | BB_PIN_D3,
        BB_PIN_D7 | BB_PIN_D2,
    ];
    // CCLK idles high from the cable's point of view; pulse PROG.
    const PROG_PULSE: [u8; 10] = [
        BB_PIN_CCLK,
        BB_PIN_CCLK | BB_PIN_PROG,
        BB_PIN_CCLK | BB_PIN_PROG,
        BB_PIN_CCLK,
        BB_PIN_CCLK,
        BB_PIN_CCLK,
        BB_PIN_CCLK,
        BB_PIN_CCLK,
        BB_PIN_CCLK,
        BB_PIN_CCLK,
    ];

    for _ in 0..4 {
        link.write_all(&SUICIDE)?;
    }

    link.write_all(&PROG_PULSE)?;
    link.purge()?;

    // In bitbang mode every read byte mirrors the pin state.
    let mut pins = [0u8; 1];
    for _ in 0..INIT_RETRIES {
        if link.read(&mut pins)? == 1 && pins[0] & BB_PIN_INIT != 0 {
            return Ok(());
        }
        sleep(INIT_POLL_INTERVAL);
    }

    Err(Error::Timeout)
}

/// Check that the FPGA came up in logic-analyzer mode: the ID register
/// reads back its magic and the scratch register echoes two test patterns.
/// Finishes by starting SDRAM initialization through the mode register.
fn init_logic_analyzer<L: SigmaLink>(link: &mut L) -> Result<()> {
    let mut sequence = Vec::with_capacity(13);

    // Read the ID register.
    sequence.extend_from_slice(&command::read_register(ReadReg::Id as u8));

    // Write 0x55 to the scratch register, read it back.
    sequence.push(OP_ADDR_LOW | (WriteReg::Test as u8 & 0xf));
    sequence.push(OP_DATA_LOW | 0x5);
    sequence.push(OP_DATA_HIGH_WRITE | 0x5);
    sequence.push(OP_READ_ADDR);

    // Write 0xaa to the scratch register, read it back.
    sequence.push(OP_DATA_LOW | 0xa);
    sequence.push(OP_DATA_HIGH_WRITE | 0xa);
    sequence.push(OP_READ_ADDR);

    // Initiate SDRAM initialization in the mode register.
    sequence.push(OP_ADDR_LOW | (WriteReg::Mode as u8 & 0xf));
    sequence.push(OP_DATA_LOW | (WMR_SDRAMINIT & 0xf));
    sequence.push(OP_DATA_HIGH_WRITE | (WMR_SDRAMINIT >> 4));

    link.write_all(&sequence)?;

    // Three read requests went out, expect their three response bytes.
    let mut result = [0u8; 3];
    let actual = link.read(&mut result)?;
    if actual != result.len() || result != [REG_ID_VALUE, 0x55, 0xaa] {
        log::error!("configuration failed, invalid reply received: {result:02x?}");
        return Err(Error::FpgaInit);
    }

    Ok(())
}

/// Full configuration download of `firmware` through the cable. On return
/// the FPGA runs the netlist and its SDRAM is initializing.
pub(crate) fn configure<L: SigmaLink>(
    link: &mut L,
    source: &mut dyn FirmwareSource,
    firmware: Firmware,
) -> Result<()> {
    let name = firmware.file_name();
    let mut netlist = source.load(name)?;
    if netlist.len() > FIRMWARE_SIZE_LIMIT {
        log::error!(
            "firmware {name} is {} bytes, the device takes at most {FIRMWARE_SIZE_LIMIT}",
            netlist.len()
        );
        return Err(Error::Resource(name.to_string()));
    }

    link.set_bitbang(BB_PINMASK)?;
    link.set_baud(BB_BITRATE)?;

    init_bitbang(link)?;

    unscramble(&mut netlist);
    let stream = bitbang_stream(&netlist);

    log::info!("uploading firmware file '{name}'");
    link.write_all(&stream)?;

    // Back to the byte pipe; drain whatever the bitbang phase left behind.
    link.reset_mode()?;
    link.purge()?;
    let mut stale = [0u8; 1];
    while link.read(&mut stale)? == 1 {}

    init_logic_analyzer(link)
}
