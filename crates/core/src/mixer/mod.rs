//! Mixer slots
//!
//! A mixer slot maps one input source onto a channel (or virtual channel)
//! accumulator with shaping, gating and temporal behavior. Slots run in
//! ascending order and a later slot reads the accumulators earlier slots just
//! wrote, so the configured order is part of the model's meaning.
//!
//! # Shaping order
//!
//! 1. Curve (expo, function or custom curve)
//! 2. Weight and offset
//! 3. Differential
//! 4. Trim (only for inputs backed by a trimmable stick axis)
//!
//! # Temporal behavior
//!
//! The gate (switch AND flight-mode mask) is debounced by `delay_up` /
//! `delay_down`. For `Add` the contribution then slews toward its target
//! (the shaped value while the gate is on, 0 while off) bounded by `slow_up` /
//! `slow_down`. `Multiply` and `Replace` have no neutral operand, so their
//! operand slews toward the shaped value and the gate instead fades the
//! slot's effect on the accumulator in or out over the same times.

mod pipeline;
pub mod reorder;

pub use pipeline::{reinitialize_mixer, run_mixer, MixContext, MixerSlotRuntime};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::limits::{NUM_CUSTOM_CURVES, NUM_FLIGHT_MODES};
use crate::source::SourceId;
use crate::switch::SwitchRef;

/// How a slot's result combines into its output accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MixOperation {
    #[default]
    Add,
    /// `acc * value / 500`
    Multiply,
    Replace,
    /// Freeze the output while the gate is active
    Hold,
}

/// Built-in curve functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveFunction {
    /// Negative inputs become 0
    Positive,
    /// Positive inputs become 0
    Negative,
    Absolute,
}

impl CurveFunction {
    pub fn apply(self, input: i16) -> i16 {
        match self {
            CurveFunction::Positive => input.max(0),
            CurveFunction::Negative => input.min(0),
            CurveFunction::Absolute => input.saturating_abs(),
        }
    }
}

/// Curve selector of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MixCurve {
    /// Differential percentage, applied after weight and offset
    Differential(i8),
    /// Expo percentage
    Expo(i8),
    Function(CurveFunction),
    /// Index of a custom curve
    Custom(u8),
}

impl Default for MixCurve {
    fn default() -> Self {
        MixCurve::Differential(0)
    }
}

impl MixCurve {
    pub fn is_in_range(&self) -> bool {
        match *self {
            MixCurve::Custom(index) => (index as usize) < NUM_CUSTOM_CURVES,
            _ => true,
        }
    }
}

bitflags! {
    /// Flight modes a slot is active in
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct FlightModeMask: u8 {
        const FM0 = 0b0000_0001;
        const FM1 = 0b0000_0010;
        const FM2 = 0b0000_0100;
        const FM3 = 0b0000_1000;
        const FM4 = 0b0001_0000;
        /// Sentinel meaning every mode
        const ALL = 0xFF;
    }
}

impl Default for FlightModeMask {
    fn default() -> Self {
        FlightModeMask::ALL
    }
}

impl FlightModeMask {
    /// Returns true if flight mode `index` is included.
    pub fn includes(&self, index: usize) -> bool {
        self.bits() == 0xFF || (index < 8 && self.bits() & (1 << index) != 0)
    }

    /// Returns true for the sentinel or a mask using only configured modes.
    pub fn is_valid(&self) -> bool {
        self.bits() == 0xFF || self.bits() >> NUM_FLIGHT_MODES == 0
    }
}

/// Mixer slot configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixerSlot {
    /// Channel or virtual channel written by the slot (None disables it)
    pub output: SourceId,
    pub operation: MixOperation,
    pub switch: SwitchRef,
    pub input: SourceId,
    /// Weight in percent
    pub weight: i8,
    /// Offset in percent
    pub offset: i8,
    pub curve: MixCurve,
    pub trim_enabled: bool,
    pub flight_modes: FlightModeMask,
    /// Gate debounce on activation (tenths of a second)
    pub delay_up: u16,
    /// Gate debounce on deactivation (tenths of a second)
    pub delay_down: u16,
    /// Full-span rise time (tenths of a second)
    pub slow_up: u16,
    /// Full-span fall time (tenths of a second)
    pub slow_down: u16,
}

impl Default for MixerSlot {
    fn default() -> Self {
        Self {
            output: SourceId::None,
            operation: MixOperation::Add,
            switch: SwitchRef::None,
            input: SourceId::None,
            weight: 100,
            offset: 0,
            curve: MixCurve::default(),
            trim_enabled: true,
            flight_modes: FlightModeMask::ALL,
            delay_up: 0,
            delay_down: 0,
            slow_up: 0,
            slow_down: 0,
        }
    }
}

impl MixerSlot {
    /// Pass-through slot from `input` to `output` with the given weight
    pub fn simple(output: SourceId, input: SourceId, weight: i8) -> Self {
        Self {
            output,
            input,
            weight,
            ..Self::default()
        }
    }
}
