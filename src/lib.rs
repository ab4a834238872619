//! A Rust driver core for the ASIX SIGMA and SIGMA2 USB logic analyzers.
//!
//! The SIGMA is a Spartan-3 FPGA behind an FTDI USB bridge. The bridge is
//! used two ways: in bitbang mode to push an FPGA netlist through the
//! slave-serial configuration pins, and as a plain byte pipe for a
//! nibble-framed register command language once the netlist runs. Captured
//! samples land in a DRAM ring on the device and are downloaded and decoded
//! after the acquisition ends; there is no streaming mode.
//!
//! ## Usage overview
//!
//! Device enumeration and open/close stay with the embedding application:
//! hand an opened cable handle (the crate implements [`SigmaLink`] for
//! `libftd2xx::Ftdi`) to [`Sigma::from_link`], together with a
//! [`FirmwareSource`] that resolves the vendor's firmware files. Configure
//! with [`Sigma::set_samplerate`] (which picks and uploads the matching
//! FPGA netlist), [`Sigma::set_limit_samples`] and [`Sigma::set_triggers`],
//! then call [`Sigma::start_acquisition`]. Drive [`Sigma::tick`] from your
//! event loop with a monotonic microsecond clock; decoded samples, the
//! trigger marker and the end-of-capture notice arrive at your [`Datafeed`]
//! sink.
//!
//! ```no_run
//! use libsigma_rs::{Datafeed, FirmwareSource, Packet, Result, Sigma, SigmaLink, Tick};
//!
//! # struct Pipe;
//! # impl SigmaLink for Pipe {
//! #     fn write_all(&mut self, _: &[u8]) -> Result<()> { Ok(()) }
//! #     fn read(&mut self, _: &mut [u8]) -> Result<usize> { Ok(0) }
//! #     fn purge(&mut self) -> Result<()> { Ok(()) }
//! #     fn set_bitbang(&mut self, _: u8) -> Result<()> { Ok(()) }
//! #     fn set_baud(&mut self, _: u32) -> Result<()> { Ok(()) }
//! #     fn reset_mode(&mut self) -> Result<()> { Ok(()) }
//! # }
//! # fn open_cable() -> Result<Pipe> { Ok(Pipe) }
//! struct Disk;
//! impl FirmwareSource for Disk {
//!     fn load(&mut self, name: &str) -> Result<Vec<u8>> {
//!         Ok(std::fs::read(name)?)
//!     }
//! }
//!
//! struct Printer;
//! impl Datafeed for Printer {
//!     fn send(&mut self, packet: Packet<'_>) {
//!         if let Packet::Logic { data, .. } = packet {
//!             println!("{} bytes of samples", data.len());
//!         }
//!     }
//! }
//!
//! # fn now_us() -> u64 { 0 }
//! # fn main() -> libsigma_rs::Result<()> {
//! let mut sigma = Sigma::from_link(open_cable()?, Box::new(Disk));
//! sigma.set_samplerate(1_000_000)?;
//! sigma.set_limit_samples(100_000);
//! sigma.start_acquisition(now_us())?;
//!
//! let mut sink = Printer;
//! while sigma.tick(now_us(), &mut sink)? == Tick::Continue {
//!     std::thread::sleep(std::time::Duration::from_millis(10));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Limitations
//!
//! - Only the trigger forms the hardware evaluates directly are exposed:
//!   a value/mask condition plus up to two edges below 100 MHz, a single
//!   pin edge at 100/200 MHz. The device's boolean trigger expressions are
//!   not implemented.
//! - The device has no sample count register; count limits are enforced as
//!   a capture duration plus drain margin.
//! - The `50sync` and `phasor` firmware images can be uploaded but no
//!   dedicated operating mode is provided for them.

pub mod board;
pub mod datafeed;
pub mod hardware;
pub mod link;

pub use board::sigma::*;
pub use datafeed::{Datafeed, FirmwareSource, Packet};
pub use hardware::spartan3::Firmware;
pub use link::SigmaLink;

pub use sigma_globals::*;
