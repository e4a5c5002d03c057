//! Switch references (control switches)
//!
//! A [`SwitchRef`] names a boolean condition that gates a mixer slot, clocks a
//! counter, selects a flight mode, and so on. It can point at:
//! - A physical switch in a given position (or not in it)
//! - A logical switch result, optionally inverted
//! - A flight mode being active, optionally inverted
//!
//! [`SwitchRef::None`] means "always on" when used as a gate and "never
//! fires" when used as an optional trigger (clock, clear, reset, run).

use serde::{Deserialize, Serialize};

use crate::limits::{NUM_FLIGHT_MODES, NUM_LOGICAL_SWITCHES, NUM_PHYSICAL_SWITCHES};
use crate::source::SourceTable;

/// Mechanical position of a physical switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SwitchPosition {
    /// Upper position (away from the pilot)
    #[default]
    Up,
    /// Middle position (3-position switches only)
    Mid,
    /// Lower position
    Down,
}

/// Hardware type of a physical switch slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SwitchType {
    /// Not fitted
    Absent,
    /// Two-position toggle
    TwoPosition,
    /// Three-position toggle
    #[default]
    ThreePosition,
}

/// Position condition tested on a physical switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchCondition {
    Up,
    Mid,
    Down,
    NotUp,
    NotMid,
    NotDown,
}

impl SwitchCondition {
    /// Returns true if `position` satisfies this condition.
    pub fn matches(self, position: SwitchPosition) -> bool {
        match self {
            SwitchCondition::Up => position == SwitchPosition::Up,
            SwitchCondition::Mid => position == SwitchPosition::Mid,
            SwitchCondition::Down => position == SwitchPosition::Down,
            SwitchCondition::NotUp => position != SwitchPosition::Up,
            SwitchCondition::NotMid => position != SwitchPosition::Mid,
            SwitchCondition::NotDown => position != SwitchPosition::Down,
        }
    }
}

/// Reference to a boolean control condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SwitchRef {
    /// No switch assigned
    #[default]
    None,
    /// Physical switch `index` tested against `condition`
    Physical { index: u8, condition: SwitchCondition },
    /// Result of logical switch `index`
    Logical { index: u8, invert: bool },
    /// Flight mode `index` being the active mode
    FlightMode { index: u8, invert: bool },
}

impl SwitchRef {
    /// Evaluates the reference as a condition: an unassigned switch is always on.
    ///
    /// Use for gates and logical operands (mixer switch, AND/OR/XOR, latch).
    /// Out-of-range indices evaluate to false.
    pub fn is_active(&self, sources: &SourceTable) -> bool {
        match self {
            SwitchRef::None => true,
            _ => self.is_triggered(sources),
        }
    }

    /// Evaluates the reference as an optional trigger: an unassigned switch
    /// never fires.
    ///
    /// Use for clocks, clears, resets and overrides that may be left unset.
    pub fn is_triggered(&self, sources: &SourceTable) -> bool {
        match *self {
            SwitchRef::None => false,
            SwitchRef::Physical { index, condition } => sources
                .switch_position(index as usize)
                .map(|pos| condition.matches(pos))
                .unwrap_or(false),
            SwitchRef::Logical { index, invert } => sources
                .logical_state(index as usize)
                .map(|state| state != invert)
                .unwrap_or(false),
            SwitchRef::FlightMode { index, invert } => {
                if index as usize >= NUM_FLIGHT_MODES {
                    return false;
                }
                (sources.active_flight_mode() == index as usize) != invert
            }
        }
    }

    /// Returns true if every index in the reference is within capacity.
    pub fn is_in_range(&self) -> bool {
        match *self {
            SwitchRef::None => true,
            SwitchRef::Physical { index, .. } => (index as usize) < NUM_PHYSICAL_SWITCHES,
            SwitchRef::Logical { index, .. } => (index as usize) < NUM_LOGICAL_SWITCHES,
            SwitchRef::FlightMode { index, .. } => (index as usize) < NUM_FLIGHT_MODES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawInputs;

    fn table_with_switch(index: usize, position: SwitchPosition) -> SourceTable {
        let mut inputs = RawInputs::default();
        inputs.switches[index] = position;
        let mut table = SourceTable::new();
        table.apply_inputs(&inputs, &[SwitchType::ThreePosition; NUM_PHYSICAL_SWITCHES], &[]);
        table
    }

    #[test]
    fn test_condition_matches() {
        assert!(SwitchCondition::Mid.matches(SwitchPosition::Mid));
        assert!(!SwitchCondition::Mid.matches(SwitchPosition::Up));
        assert!(SwitchCondition::NotDown.matches(SwitchPosition::Up));
        assert!(!SwitchCondition::NotDown.matches(SwitchPosition::Down));
    }

    #[test]
    fn test_none_gate_vs_trigger() {
        let table = SourceTable::new();
        assert!(SwitchRef::None.is_active(&table));
        assert!(!SwitchRef::None.is_triggered(&table));
    }

    #[test]
    fn test_physical_reference() {
        let table = table_with_switch(2, SwitchPosition::Down);
        let down = SwitchRef::Physical {
            index: 2,
            condition: SwitchCondition::Down,
        };
        let up = SwitchRef::Physical {
            index: 2,
            condition: SwitchCondition::Up,
        };
        assert!(down.is_active(&table));
        assert!(!up.is_active(&table));
    }

    #[test]
    fn test_logical_reference_with_invert() {
        let mut table = SourceTable::new();
        table.set_logical(3, true);
        let direct = SwitchRef::Logical {
            index: 3,
            invert: false,
        };
        let inverted = SwitchRef::Logical {
            index: 3,
            invert: true,
        };
        assert!(direct.is_active(&table));
        assert!(!inverted.is_active(&table));
    }

    #[test]
    fn test_flight_mode_reference() {
        let mut table = SourceTable::new();
        table.set_active_flight_mode(2);
        let fm2 = SwitchRef::FlightMode {
            index: 2,
            invert: false,
        };
        let not_fm0 = SwitchRef::FlightMode {
            index: 0,
            invert: true,
        };
        assert!(fm2.is_active(&table));
        assert!(not_fm0.is_active(&table));
    }

    #[test]
    fn test_out_of_range_is_false() {
        let table = SourceTable::new();
        let bad = SwitchRef::Logical {
            index: 99,
            invert: true,
        };
        assert!(!bad.is_active(&table));
        assert!(!bad.is_in_range());

        let bad_fm = SwitchRef::FlightMode {
            index: 7,
            invert: true,
        };
        assert!(!bad_fm.is_active(&table));
    }
}
