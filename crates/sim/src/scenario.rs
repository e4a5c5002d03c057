//! Scripted input scenarios
//!
//! A scenario is a list of time-stamped changes. Each change takes effect on
//! the first tick at or after its timestamp and persists until changed
//! again.
//!
//! ```json
//! { "events": [
//!     { "at_ms": 0,   "kind": "stick",  "axis": "Y1", "value": -500 },
//!     { "at_ms": 500, "kind": "switch", "index": 0, "position": "Down" },
//!     { "at_ms": 900, "kind": "reinitialize" }
//! ] }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use txmix_core::limits::{FULL_SCALE, NUM_KNOBS, NUM_PHYSICAL_SWITCHES, NUM_TELEMETRY};
use txmix_core::source::{StickAxis, TrimAxis};
use txmix_core::switch::SwitchPosition;

use crate::error::SimError;

/// One scripted change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputChange {
    Stick { axis: StickAxis, value: i16 },
    Knob { index: usize, value: i16 },
    Switch { index: usize, position: SwitchPosition },
    Telemetry { index: usize, value: i16 },
    /// Marks a telemetry slot as having no data
    ClearTelemetry { index: usize },
    /// Trim button press of `steps` on `axis`
    Trim { axis: TrimAxis, steps: i16 },
    Reinitialize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioEvent {
    pub at_ms: u32,
    #[serde(flatten)]
    pub change: InputChange,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub events: Vec<ScenarioEvent>,
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self, SimError> {
        let scenario: Scenario = serde_json::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Appends an event, keeping the list usable by [`Scenario::validate`].
    pub fn push(&mut self, at_ms: u32, change: InputChange) -> &mut Self {
        self.events.push(ScenarioEvent { at_ms, change });
        self
    }

    /// Checks that events are in time order and indices are in range.
    pub fn validate(&self) -> Result<(), SimError> {
        let mut last = 0;
        for (i, event) in self.events.iter().enumerate() {
            if event.at_ms < last {
                return Err(SimError::Scenario(format!(
                    "event {i} at {} ms is earlier than the previous event",
                    event.at_ms
                )));
            }
            last = event.at_ms;

            let (index, cap, what) = match event.change {
                InputChange::Knob { index, .. } => (index, NUM_KNOBS, "knob"),
                InputChange::Switch { index, .. } => (index, NUM_PHYSICAL_SWITCHES, "switch"),
                InputChange::Telemetry { index, .. } | InputChange::ClearTelemetry { index } => {
                    (index, NUM_TELEMETRY, "telemetry")
                }
                _ => continue,
            };
            if index >= cap {
                return Err(SimError::Scenario(format!(
                    "event {i}: {what} index {index} out of range"
                )));
            }
        }
        Ok(())
    }

    /// Time of the last event
    pub fn end_ms(&self) -> u32 {
        self.events.last().map(|e| e.at_ms).unwrap_or(0)
    }
}

/// Clamps a scripted analog value to the normalized input range.
pub(crate) fn clamp_analog(value: i16) -> i16 {
    value.clamp(-FULL_SCALE as i16, FULL_SCALE as i16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_events() {
        let scenario = Scenario::from_json(
            r#"{ "events": [
                { "at_ms": 0, "kind": "stick", "axis": "Y1", "value": -500 },
                { "at_ms": 40, "kind": "switch", "index": 2, "position": "Mid" },
                { "at_ms": 40, "kind": "clear_telemetry", "index": 1 },
                { "at_ms": 60, "kind": "reinitialize" }
            ] }"#,
        )
        .unwrap();
        assert_eq!(scenario.events.len(), 4);
        assert_eq!(
            scenario.events[1].change,
            InputChange::Switch {
                index: 2,
                position: SwitchPosition::Mid
            }
        );
        assert_eq!(scenario.end_ms(), 60);
    }

    #[test]
    fn test_rejects_out_of_order_events() {
        let mut scenario = Scenario::default();
        scenario
            .push(100, InputChange::Reinitialize)
            .push(50, InputChange::Reinitialize);
        assert!(matches!(scenario.validate(), Err(SimError::Scenario(_))));
    }

    #[test]
    fn test_rejects_bad_index() {
        let mut scenario = Scenario::default();
        scenario.push(
            0,
            InputChange::Switch {
                index: 8,
                position: SwitchPosition::Down,
            },
        );
        assert!(scenario.validate().is_err());
    }
}
