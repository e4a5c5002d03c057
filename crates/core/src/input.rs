//! Raw inputs supplied by the acquisition collaborators
//!
//! Everything here is already normalized: sticks and knobs to ±500, switches
//! to a mechanical position, telemetry to its raw integer reading.

use serde::{Deserialize, Serialize};

use crate::limits::{NUM_KNOBS, NUM_PHYSICAL_SWITCHES, NUM_STICK_AXES, NUM_TELEMETRY};
use crate::switch::SwitchPosition;

/// Raw telemetry value meaning "no reading available"
pub const TELEMETRY_NO_DATA: i16 = 0x7FFF;

/// One tick's worth of collaborator-owned signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInputs {
    /// Stick axes in [`StickAxis`](crate::source::StickAxis) order
    pub sticks: [i16; NUM_STICK_AXES],
    pub knobs: [i16; NUM_KNOBS],
    pub switches: [SwitchPosition; NUM_PHYSICAL_SWITCHES],
    /// Raw telemetry, [`TELEMETRY_NO_DATA`] when absent
    pub telemetry: [i16; NUM_TELEMETRY],
}

impl Default for RawInputs {
    fn default() -> Self {
        Self {
            sticks: [0; NUM_STICK_AXES],
            knobs: [0; NUM_KNOBS],
            switches: [SwitchPosition::Up; NUM_PHYSICAL_SWITCHES],
            telemetry: [TELEMETRY_NO_DATA; NUM_TELEMETRY],
        }
    }
}

impl RawInputs {
    /// Sets a stick axis value.
    pub fn with_stick(mut self, axis: crate::source::StickAxis, value: i16) -> Self {
        self.sticks[axis.index()] = value;
        self
    }

    /// Sets a physical switch position. Out-of-range indices are ignored.
    pub fn with_switch(mut self, index: usize, position: SwitchPosition) -> Self {
        if let Some(slot) = self.switches.get_mut(index) {
            *slot = position;
        }
        self
    }
}
