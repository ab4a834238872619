//! Symbolic trigger descriptions and their translation into the hardware's
//! mask form, plus the LUT upload.

use super::sample_rate::SR_MHZ_100;
use super::Sigma;
use crate::link::SigmaLink;
use sigma_globals::{Error, Result};
use sigma_proto::lut::{Trigger, TriggerLut};
use sigma_proto::{WriteReg, TRGSEL2_LUT_ADDR_MASK, TRGSEL2_LUT_WRITE};

/// Per-channel match condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerMatch {
    Low,
    High,
    Rising,
    Falling,
}

/// One channel's entry within a stage.
#[derive(Clone, Copy, Debug)]
pub struct PinMatch {
    pub channel: u8,
    /// Matches on disabled channels are ignored.
    pub enabled: bool,
    pub kind: TriggerMatch,
}

/// A set of conditions that must hold simultaneously.
#[derive(Clone, Debug, Default)]
pub struct TriggerStage {
    pub matches: Vec<PinMatch>,
}

/// Symbolic trigger description handed in by the application. The hardware
/// evaluates a single condition set, so only the first stage is honored.
#[derive(Clone, Debug, Default)]
pub struct TriggerSpec {
    pub stages: Vec<TriggerStage>,
}

impl<L: SigmaLink> Sigma<L> {
    /// Record the symbolic trigger description. It is compiled against the
    /// samplerate in effect when the acquisition starts.
    pub fn set_triggers(&mut self, spec: TriggerSpec) {
        self.trigger_spec = spec;
    }

    /// Compile the stored description into mask form.
    ///
    /// In 100 and 200 MHz mode only a single pin edge can be the trigger.
    /// Below that, a value/mask condition over any number of channels can
    /// be combined with up to two edges, which the hardware ORs.
    pub(crate) fn convert_trigger(&mut self) -> Result<()> {
        self.trigger = Trigger::default();

        let Some(stage) = self.trigger_spec.stages.first() else {
            return Ok(());
        };

        let mut edges = 0;
        for pin in stage.matches.iter().filter(|m| m.enabled) {
            let channelbit = 1u16 << pin.channel;
            if self.samplerate >= SR_MHZ_100 {
                if edges > 0 {
                    log::error!("only a single pin trigger is supported in 100 and 200 MHz mode");
                    return Err(Error::UnsupportedTrigger(
                        "one pin trigger in 100 and 200 MHz mode",
                    ));
                }
                match pin.kind {
                    TriggerMatch::Falling => self.trigger.falling_mask |= channelbit,
                    TriggerMatch::Rising => self.trigger.rising_mask |= channelbit,
                    _ => {
                        log::error!(
                            "only rising/falling trigger is supported in 100 and 200 MHz mode"
                        );
                        return Err(Error::UnsupportedTrigger(
                            "rising/falling only in 100 and 200 MHz mode",
                        ));
                    }
                }
                edges += 1;
            } else {
                match pin.kind {
                    TriggerMatch::High => {
                        self.trigger.simple_value |= channelbit;
                        self.trigger.simple_mask |= channelbit;
                    }
                    TriggerMatch::Low => {
                        self.trigger.simple_value &= !channelbit;
                        self.trigger.simple_mask |= channelbit;
                    }
                    TriggerMatch::Falling => {
                        self.trigger.falling_mask |= channelbit;
                        edges += 1;
                    }
                    TriggerMatch::Rising => {
                        self.trigger.rising_mask |= channelbit;
                        edges += 1;
                    }
                }
                // The hardware has two edge slots, ORed together.
                if edges > 2 {
                    log::error!("only two rising/falling triggers are supported");
                    return Err(Error::UnsupportedTrigger("at most two edge triggers"));
                }
            }
        }

        Ok(())
    }

    /// Upload the look-up tables to the FPGA match units, one transposed
    /// slice at a time, followed by the parameter block.
    pub(crate) fn write_trigger_lut(&mut self, lut: &TriggerLut) -> Result<()> {
        for step in 0..16 {
            self.write_register(WriteReg::TriggerSelect, &lut.select_entry(step))?;
            self.set_register(
                WriteReg::TriggerSelect2,
                TRGSEL2_LUT_WRITE | (step as u8 & TRGSEL2_LUT_ADDR_MASK),
            )?;
        }

        self.write_register(WriteReg::TriggerSelect, &lut.params_bytes())?;
        Ok(())
    }
}
