//! Source identifiers and the per-tick source table
//!
//! Every signal a mixer slot or logical switch can read is addressed by a
//! [`SourceId`]. The [`SourceTable`] holds the current value of each one and
//! is threaded through the whole evaluation pass in a fixed order, so a later
//! stage (or a later mixer slot) observes what an earlier one just wrote.
//!
//! # Ownership
//!
//! Collaborators only supply [`RawInputs`](crate::input::RawInputs) through
//! [`SourceTable::apply_inputs`]. Every other entry (roles, generators,
//! logical switches, counters, timers, trims, channels) is written by the
//! evaluators in this crate.

use serde::{Deserialize, Serialize};

use crate::input::{RawInputs, TELEMETRY_NO_DATA};
use crate::limits::{
    saturate, FULL_SCALE, NUM_COUNTERS, NUM_FLIGHT_MODES, NUM_FUNCGEN, NUM_KNOBS,
    NUM_LOGICAL_SWITCHES, NUM_PHYSICAL_SWITCHES, NUM_RC_CHANNELS, NUM_TELEMETRY, NUM_TIMERS,
    NUM_VIRTUAL_CHANNELS,
};
use crate::switch::{SwitchPosition, SwitchType};
use crate::telemetry::TelemetryConfig;

/// Stick axes in acquisition order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StickAxis {
    X1,
    Y1,
    Z1,
    X2,
    Y2,
    Z2,
    X3,
    Y3,
    X4,
    Y4,
}

impl StickAxis {
    /// Index into the acquisition array
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Trimmable primary axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrimAxis {
    X1,
    Y1,
    X2,
    Y2,
}

impl TrimAxis {
    /// All trim axes in storage order
    pub const ALL: [TrimAxis; 4] = [TrimAxis::X1, TrimAxis::Y1, TrimAxis::X2, TrimAxis::Y2];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stick axis this trim belongs to
    pub const fn stick(self) -> StickAxis {
        match self {
            TrimAxis::X1 => StickAxis::X1,
            TrimAxis::Y1 => StickAxis::Y1,
            TrimAxis::X2 => StickAxis::X2,
            TrimAxis::Y2 => StickAxis::Y2,
        }
    }

    /// Trim axis for a stick axis, if that axis is trimmable
    pub const fn from_stick(axis: StickAxis) -> Option<TrimAxis> {
        match axis {
            StickAxis::X1 => Some(TrimAxis::X1),
            StickAxis::Y1 => Some(TrimAxis::Y1),
            StickAxis::X2 => Some(TrimAxis::X2),
            StickAxis::Y2 => Some(TrimAxis::Y2),
            _ => None,
        }
    }
}

/// Flight-control role derived from a raw stick axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Rudder,
    Throttle,
    Aileron,
    Elevator,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Rudder, Role::Throttle, Role::Aileron, Role::Elevator];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Address of a signal in the source table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceId {
    #[default]
    None,
    /// Role value after dual rate / throttle curve
    Role(Role),
    Stick(StickAxis),
    Knob(u8),
    /// Constant +100 %
    Max,
    FunctionGenerator(u8),
    /// Effective trim of an axis
    Trim(TrimAxis),
    PhysicalSwitch(u8),
    LogicalSwitch(u8),
    Channel(u8),
    Virtual(u8),
    Counter(u8),
    Timer(u8),
    Telemetry(u8),
}

impl SourceId {
    /// Returns true if the index carried by the id is within capacity.
    pub fn is_in_range(&self) -> bool {
        let (index, cap) = match *self {
            SourceId::Knob(i) => (i, NUM_KNOBS),
            SourceId::FunctionGenerator(i) => (i, NUM_FUNCGEN),
            SourceId::PhysicalSwitch(i) => (i, NUM_PHYSICAL_SWITCHES),
            SourceId::LogicalSwitch(i) => (i, NUM_LOGICAL_SWITCHES),
            SourceId::Channel(i) => (i, NUM_RC_CHANNELS),
            SourceId::Virtual(i) => (i, NUM_VIRTUAL_CHANNELS),
            SourceId::Counter(i) => (i, NUM_COUNTERS),
            SourceId::Timer(i) => (i, NUM_TIMERS),
            SourceId::Telemetry(i) => (i, NUM_TELEMETRY),
            _ => return true,
        };
        (index as usize) < cap
    }

    /// Returns true for sources a mixer slot may write.
    pub fn is_mixer_output(&self) -> bool {
        matches!(self, SourceId::Channel(_) | SourceId::Virtual(_))
    }

    /// Returns true for sources supplied by collaborators rather than the
    /// engine.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            SourceId::Stick(_)
                | SourceId::Knob(_)
                | SourceId::PhysicalSwitch(_)
                | SourceId::Telemetry(_)
        )
    }

    /// Returns true for sources on the mixer percentage scale.
    ///
    /// Counters, timers and telemetry carry their own units.
    pub fn is_mix_scale(&self) -> bool {
        !matches!(
            self,
            SourceId::Counter(_) | SourceId::Timer(_) | SourceId::Telemetry(_) | SourceId::None
        )
    }
}

/// Current value of every addressable signal
#[derive(Debug, Clone)]
pub struct SourceTable {
    sticks: [i16; crate::limits::NUM_STICK_AXES],
    knobs: [i16; NUM_KNOBS],
    roles: [i16; 4],
    funcgens: [i16; NUM_FUNCGEN],
    trims: [i16; 4],
    switch_positions: [SwitchPosition; NUM_PHYSICAL_SWITCHES],
    switch_types: [SwitchType; NUM_PHYSICAL_SWITCHES],
    logical: [bool; NUM_LOGICAL_SWITCHES],
    channels: [i16; NUM_RC_CHANNELS],
    virtuals: [i16; NUM_VIRTUAL_CHANNELS],
    counters: [i16; NUM_COUNTERS],
    timers: [i32; NUM_TIMERS],
    telemetry: [Option<i32>; NUM_TELEMETRY],
    active_flight_mode: u8,
}

impl Default for SourceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceTable {
    /// Creates a table with every value at zero and no telemetry.
    pub fn new() -> Self {
        Self {
            sticks: [0; crate::limits::NUM_STICK_AXES],
            knobs: [0; NUM_KNOBS],
            roles: [0; 4],
            funcgens: [0; NUM_FUNCGEN],
            trims: [0; 4],
            switch_positions: [SwitchPosition::Up; NUM_PHYSICAL_SWITCHES],
            switch_types: [SwitchType::default(); NUM_PHYSICAL_SWITCHES],
            logical: [false; NUM_LOGICAL_SWITCHES],
            channels: [0; NUM_RC_CHANNELS],
            virtuals: [0; NUM_VIRTUAL_CHANNELS],
            counters: [0; NUM_COUNTERS],
            timers: [0; NUM_TIMERS],
            telemetry: [None; NUM_TELEMETRY],
            active_flight_mode: 0,
        }
    }

    /// Loads the collaborator-supplied inputs for this tick.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Normalized sticks, knobs, switch positions and raw telemetry
    /// * `switch_types` - Hardware type of each physical switch
    /// * `telemetry` - Scaling of each telemetry slot (missing slots are unscaled)
    pub fn apply_inputs(
        &mut self,
        inputs: &RawInputs,
        switch_types: &[SwitchType],
        telemetry: &[TelemetryConfig],
    ) {
        for (dst, src) in self.sticks.iter_mut().zip(inputs.sticks.iter()) {
            *dst = saturate(*src as i32);
        }
        for (dst, src) in self.knobs.iter_mut().zip(inputs.knobs.iter()) {
            *dst = saturate(*src as i32);
        }
        self.switch_positions = inputs.switches;
        for (i, ty) in self.switch_types.iter_mut().enumerate() {
            *ty = switch_types.get(i).copied().unwrap_or_default();
        }
        for (i, slot) in self.telemetry.iter_mut().enumerate() {
            let raw = inputs.telemetry[i];
            *slot = if raw == TELEMETRY_NO_DATA {
                None
            } else {
                let scaling = telemetry.get(i).copied().unwrap_or_default();
                Some(scaling.scale(raw))
            };
        }
    }

    /// Raw value of a source in its own units
    ///
    /// # Returns
    ///
    /// `None` for [`SourceId::None`], out-of-range indices and telemetry
    /// without data.
    pub fn value(&self, id: SourceId) -> Option<i32> {
        let v = match id {
            SourceId::None => return None,
            SourceId::Role(role) => self.roles[role.index()] as i32,
            SourceId::Stick(axis) => self.sticks[axis.index()] as i32,
            SourceId::Knob(i) => *self.knobs.get(i as usize)? as i32,
            SourceId::Max => FULL_SCALE,
            SourceId::FunctionGenerator(i) => *self.funcgens.get(i as usize)? as i32,
            SourceId::Trim(axis) => self.trims[axis.index()] as i32,
            SourceId::PhysicalSwitch(i) => self.physical_switch_value(i as usize)?,
            SourceId::LogicalSwitch(i) => {
                if *self.logical.get(i as usize)? {
                    FULL_SCALE
                } else {
                    -FULL_SCALE
                }
            }
            SourceId::Channel(i) => *self.channels.get(i as usize)? as i32,
            SourceId::Virtual(i) => *self.virtuals.get(i as usize)? as i32,
            SourceId::Counter(i) => *self.counters.get(i as usize)? as i32,
            SourceId::Timer(i) => *self.timers.get(i as usize)?,
            SourceId::Telemetry(i) => (*self.telemetry.get(i as usize)?)?,
        };
        Some(v)
    }

    /// Value of a source as a mixer input, saturated to full scale
    ///
    /// Timers are read in whole seconds. Missing sources read as 0.
    pub fn mix_value(&self, id: SourceId) -> i16 {
        match id {
            SourceId::Timer(_) => self.value(id).map(|ms| saturate(ms / 1000)).unwrap_or(0),
            _ => self.value(id).map(saturate).unwrap_or(0),
        }
    }

    fn physical_switch_value(&self, index: usize) -> Option<i32> {
        let position = *self.switch_positions.get(index)?;
        let value = match (self.switch_types[index], position) {
            (SwitchType::Absent, _) => 0,
            (_, SwitchPosition::Down) => FULL_SCALE,
            (SwitchType::TwoPosition, _) => -FULL_SCALE,
            (SwitchType::ThreePosition, SwitchPosition::Up) => -FULL_SCALE,
            (SwitchType::ThreePosition, SwitchPosition::Mid) => 0,
        };
        Some(value)
    }

    /// Current position of a physical switch
    pub fn switch_position(&self, index: usize) -> Option<SwitchPosition> {
        self.switch_positions.get(index).copied()
    }

    /// Current state of a logical switch
    pub fn logical_state(&self, index: usize) -> Option<bool> {
        self.logical.get(index).copied()
    }

    /// All logical switch states
    pub fn logical_states(&self) -> &[bool; NUM_LOGICAL_SWITCHES] {
        &self.logical
    }

    /// Index of the active flight mode
    pub fn active_flight_mode(&self) -> usize {
        self.active_flight_mode as usize
    }

    /// Mixer accumulators of the RC channels (before finalizing)
    pub fn channels(&self) -> &[i16; NUM_RC_CHANNELS] {
        &self.channels
    }

    /// Current counter values
    pub fn counters(&self) -> &[i16; NUM_COUNTERS] {
        &self.counters
    }

    /// Current timer values in milliseconds
    pub fn timers(&self) -> &[i32; NUM_TIMERS] {
        &self.timers
    }

    pub(crate) fn set_role(&mut self, role: Role, value: i16) {
        self.roles[role.index()] = value;
    }

    pub(crate) fn set_funcgen(&mut self, index: usize, value: i16) {
        if let Some(slot) = self.funcgens.get_mut(index) {
            *slot = value;
        }
    }

    pub(crate) fn set_trim(&mut self, axis: TrimAxis, value: i16) {
        self.trims[axis.index()] = value;
    }

    pub(crate) fn set_logical(&mut self, index: usize, state: bool) {
        if let Some(slot) = self.logical.get_mut(index) {
            *slot = state;
        }
    }

    pub(crate) fn set_counter(&mut self, index: usize, value: i16) {
        if let Some(slot) = self.counters.get_mut(index) {
            *slot = value;
        }
    }

    pub(crate) fn set_timer(&mut self, index: usize, value: i32) {
        if let Some(slot) = self.timers.get_mut(index) {
            *slot = value;
        }
    }

    pub(crate) fn set_active_flight_mode(&mut self, index: usize) {
        if index < NUM_FLIGHT_MODES {
            self.active_flight_mode = index as u8;
        }
    }

    /// Writes a mixer output. Ignored for anything but channels and virtuals.
    pub(crate) fn set_mix_output(&mut self, id: SourceId, value: i16) {
        let slot = match id {
            SourceId::Channel(i) => self.channels.get_mut(i as usize),
            SourceId::Virtual(i) => self.virtuals.get_mut(i as usize),
            _ => None,
        };
        if let Some(slot) = slot {
            *slot = value;
        }
    }

    /// Zeroes channel and virtual accumulators before the mixer pass.
    pub(crate) fn clear_mix_outputs(&mut self) {
        self.channels = [0; NUM_RC_CHANNELS];
        self.virtuals = [0; NUM_VIRTUAL_CHANNELS];
    }

    /// Clears every logical switch result (reinitialize).
    pub(crate) fn clear_logical(&mut self) {
        self.logical = [false; NUM_LOGICAL_SWITCHES];
    }
}
