//! Model-load sanity check

use super::{Entity, Model, ModelError};
use crate::funcgen::{FunctionGenerator, PeriodMode, Waveform};
use crate::limits::NUM_CUSTOM_CURVES;
use crate::mixer::MixerSlot;
use crate::source::SourceId;
use crate::switch::SwitchRef;

fn check_source(source: SourceId, entity: Entity, index: usize) -> Result<(), ModelError> {
    if source.is_in_range() {
        Ok(())
    } else {
        Err(ModelError::SourceOutOfRange { entity, index })
    }
}

fn check_switch(switch: SwitchRef, entity: Entity, index: usize) -> Result<(), ModelError> {
    if switch.is_in_range() {
        Ok(())
    } else {
        Err(ModelError::SwitchOutOfRange { entity, index })
    }
}

fn check_slot(slot: &MixerSlot, index: usize) -> Result<(), ModelError> {
    if slot.output != SourceId::None && !slot.output.is_mixer_output() {
        return Err(ModelError::InvalidOutput { index });
    }
    check_source(slot.output, Entity::MixerSlot, index)?;
    check_source(slot.input, Entity::MixerSlot, index)?;
    check_switch(slot.switch, Entity::MixerSlot, index)?;
    if !slot.curve.is_in_range() {
        return Err(ModelError::CurveOutOfRange {
            entity: Entity::MixerSlot,
            index,
        });
    }
    if !slot.flight_modes.is_valid() {
        return Err(ModelError::InvalidFlightModeMask { index });
    }
    Ok(())
}

fn has_zero_period(generator: &FunctionGenerator) -> bool {
    let variable = generator.waveform != Waveform::Pulse
        && generator.period_mode == PeriodMode::Variable;
    generator.period1 == 0 || (variable && generator.period2 == 0)
}

impl Model {
    /// Checks the model for references and values the evaluators cannot
    /// handle.
    ///
    /// # Returns
    ///
    /// The first error found, scanning entities in evaluation order.
    pub fn validate(&self) -> Result<(), ModelError> {
        let roles = &self.roles;
        for (index, rate) in [roles.rud_dual_rate, roles.ail_dual_rate, roles.ele_dual_rate]
            .iter()
            .enumerate()
        {
            check_switch(rate.switch, Entity::DualRate, index)?;
        }
        if !roles.throttle_curve.is_valid() {
            return Err(ModelError::InvalidCurve {
                entity: Entity::ThrottleCurve,
                index: 0,
            });
        }

        for (index, curve) in self.curves.iter().enumerate() {
            if !curve.is_valid() {
                return Err(ModelError::InvalidCurve {
                    entity: Entity::CustomCurve,
                    index,
                });
            }
        }

        for (index, generator) in self.function_generators.iter().enumerate() {
            check_source(generator.modulator, Entity::FunctionGenerator, index)?;
            if has_zero_period(generator) {
                return Err(ModelError::ZeroPeriod { index });
            }
        }

        for (index, counter) in self.counters.iter().enumerate() {
            check_switch(counter.clock, Entity::Counter, index)?;
            check_switch(counter.clear, Entity::Counter, index)?;
            if !counter.is_valid() {
                return Err(ModelError::InvalidModulus { index });
            }
        }

        for (index, timer) in self.timers.iter().enumerate() {
            check_switch(timer.run, Entity::Timer, index)?;
            check_switch(timer.reset, Entity::Timer, index)?;
        }

        for (index, logical) in self.logical_switches.iter().enumerate() {
            if !logical.function.is_in_range() {
                return Err(ModelError::SourceOutOfRange {
                    entity: Entity::LogicalSwitch,
                    index,
                });
            }
        }

        for (index, mode) in self.flight_modes.iter().enumerate() {
            check_switch(mode.switch, Entity::FlightMode, index)?;
        }

        for (index, slot) in self.mixer.iter().enumerate() {
            check_slot(slot, index)?;
        }

        for (index, channel) in self.channels.iter().enumerate() {
            check_switch(channel.override_switch, Entity::Channel, index)?;
            if channel.curve.is_some_and(|c| c as usize >= NUM_CUSTOM_CURVES) {
                return Err(ModelError::CurveOutOfRange {
                    entity: Entity::Channel,
                    index,
                });
            }
            if !channel.endpoints_valid() {
                return Err(ModelError::InvalidEndpoints { index });
            }
        }
        Ok(())
    }
}
