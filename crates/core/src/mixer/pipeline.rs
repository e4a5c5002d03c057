use super::{MixCurve, MixOperation, MixerSlot};
use crate::curve::CustomCurve;
use crate::limits::{duration_ms, saturate, FULL_SCALE, LOOP_TIME_MS};
use crate::roles::RoleSources;
use crate::shaping::{apply_slow, differential, expo, weight_and_offset};
use crate::source::{SourceId, SourceTable, TrimAxis};

/// Fixed-point factor of the slewed contribution
const SLEW_SCALE: i32 = 4096;

/// Shared, read-only inputs of one mixer pass
#[derive(Debug, Clone, Copy)]
pub struct MixContext<'a> {
    pub curves: &'a [CustomCurve],
    pub roles: &'a RoleSources,
    /// Time since reinitialize
    pub now_ms: u32,
    /// First pass after a reinitialize
    pub reinitialize: bool,
}

/// Runtime state of one mixer slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MixerSlotRuntime {
    raw_gate: bool,
    effective_gate: bool,
    gate_changed_at: u32,
    /// Contribution scaled by `SLEW_SCALE`
    slewed: i32,
    /// Share of the slot's effect applied, 0..=`SLEW_SCALE`
    blend: i32,
    hold_active: bool,
    hold_value: i16,
    /// Contribution of the last pass
    pub last_output: i16,
}

impl MixerSlotRuntime {
    /// Returns the debounced gate state.
    pub fn is_gate_effective(&self) -> bool {
        self.effective_gate
    }
}

fn shape(slot: &MixerSlot, ctx: &MixContext<'_>, sources: &SourceTable) -> i16 {
    let mut value = sources.mix_value(slot.input);

    value = match slot.curve {
        MixCurve::Expo(e) => expo(value, e),
        MixCurve::Function(f) => f.apply(value),
        MixCurve::Custom(index) => match ctx.curves.get(index as usize) {
            Some(curve) => curve.evaluate(value),
            None => value,
        },
        MixCurve::Differential(_) => value,
    };

    value = weight_and_offset(value, slot.weight, slot.offset);

    if let MixCurve::Differential(diff) = slot.curve {
        if diff != 0 {
            value = differential(value, diff);
        }
    }

    let mut result = value as i32;
    if slot.trim_enabled {
        if let SourceId::Stick(axis) = ctx.roles.resolve(slot.input) {
            if let Some(trim_axis) = TrimAxis::from_stick(axis) {
                let trim = sources.mix_value(SourceId::Trim(trim_axis)) as i32;
                result += trim * slot.weight as i32 / 100;
            }
        }
    }
    saturate(result)
}

fn combine(operation: MixOperation, accumulator: i16, operand: i16) -> i16 {
    let (acc, op) = (accumulator as i32, operand as i32);
    let result = match operation {
        MixOperation::Add => acc + op,
        MixOperation::Multiply => acc * op / FULL_SCALE,
        MixOperation::Replace => op,
        MixOperation::Hold => acc,
    };
    saturate(result)
}

impl MixerSlotRuntime {
    fn hold(&mut self, slot: &MixerSlot, gate: bool, sources: &mut SourceTable) {
        if !gate {
            self.hold_active = false;
            return;
        }
        if !self.hold_active {
            self.hold_active = true;
            self.hold_value = sources.mix_value(slot.output);
        }
        sources.set_mix_output(slot.output, self.hold_value);
        self.last_output = self.hold_value;
    }

    fn debounce(&mut self, slot: &MixerSlot, gate: bool, ctx: &MixContext<'_>) {
        if ctx.reinitialize {
            self.raw_gate = gate;
            self.effective_gate = gate;
            self.gate_changed_at = ctx.now_ms;
            return;
        }
        if gate != self.raw_gate {
            self.raw_gate = gate;
            self.gate_changed_at = ctx.now_ms;
        }
        if self.effective_gate != gate {
            let delay = if gate { slot.delay_up } else { slot.delay_down };
            if ctx.now_ms.wrapping_sub(self.gate_changed_at) >= duration_ms(delay) {
                self.effective_gate = gate;
            }
        }
    }

    fn slew(&mut self, slot: &MixerSlot, target: i16, ctx: &MixContext<'_>) -> i16 {
        let target = target as i32 * SLEW_SCALE;
        if ctx.reinitialize || (slot.slow_up == 0 && slot.slow_down == 0) {
            self.slewed = target;
        } else {
            self.slewed = apply_slow(
                self.slewed,
                target,
                SLEW_SCALE,
                duration_ms(slot.slow_up),
                duration_ms(slot.slow_down),
            );
        }
        (self.slewed / SLEW_SCALE) as i16
    }

    /// Moves the effect blend toward the gate state at the slow rates, the
    /// full 0..1 span taking `slow_up` / `slow_down`.
    fn fade(&mut self, slot: &MixerSlot, ctx: &MixContext<'_>) -> i32 {
        let target = if self.effective_gate { SLEW_SCALE } else { 0 };
        let ms = if target > self.blend {
            duration_ms(slot.slow_up)
        } else {
            duration_ms(slot.slow_down)
        };
        if ctx.reinitialize || ms == 0 {
            self.blend = target;
        } else {
            let step = (SLEW_SCALE as u32 * LOOP_TIME_MS / ms).max(1) as i32;
            self.blend = if target > self.blend {
                (self.blend + step).min(target)
            } else {
                (self.blend - step).max(target)
            };
        }
        self.blend
    }

    /// Evaluates one slot and folds its contribution into the output
    /// accumulator.
    pub fn evaluate(&mut self, slot: &MixerSlot, ctx: &MixContext<'_>, sources: &mut SourceTable) {
        if ctx.reinitialize {
            self.hold_active = false;
        }
        if !slot.output.is_mixer_output() || !slot.output.is_in_range() {
            return;
        }

        let gate = slot.switch.is_active(sources)
            && slot.flight_modes.includes(sources.active_flight_mode());

        if slot.operation == MixOperation::Hold {
            self.hold(slot, gate, sources);
            return;
        }
        if slot.input == SourceId::None {
            return;
        }

        self.debounce(slot, gate, ctx);
        let shaped = shape(slot, ctx, sources);
        let accumulator = sources.mix_value(slot.output);

        let output = if slot.operation == MixOperation::Add {
            let target = if self.effective_gate { shaped } else { 0 };
            let contribution = self.slew(slot, target, ctx);
            if !self.effective_gate && self.slewed == 0 {
                self.last_output = 0;
                return;
            }
            self.last_output = contribution;
            combine(slot.operation, accumulator, contribution)
        } else {
            let contribution = self.slew(slot, shaped, ctx);
            let blend = self.fade(slot, ctx);
            if blend == 0 {
                self.last_output = 0;
                return;
            }
            self.last_output = contribution;
            let full = combine(slot.operation, accumulator, contribution) as i32;
            let acc = accumulator as i32;
            saturate(acc + (full - acc) * blend / SLEW_SCALE)
        };
        sources.set_mix_output(slot.output, output);
    }
}

/// Clears the channel accumulators and runs every slot in ascending order.
pub fn run_mixer(
    slots: &[MixerSlot],
    runtimes: &mut [MixerSlotRuntime],
    ctx: &MixContext<'_>,
    sources: &mut SourceTable,
) {
    sources.clear_mix_outputs();
    for (slot, runtime) in slots.iter().zip(runtimes.iter_mut()) {
        runtime.evaluate(slot, ctx, sources);
    }
}

/// Resets every slot record.
pub fn reinitialize_mixer(runtimes: &mut [MixerSlotRuntime]) {
    for runtime in runtimes.iter_mut() {
        *runtime = MixerSlotRuntime::default();
    }
}
