//! Logical switches
//!
//! A logical switch is a computed boolean. Its configuration is a tagged
//! [`LogicalFunction`] carrying exactly the operands that function needs,
//! plus an activation delay and a minimum active duration.
//!
//! # Evaluation
//!
//! Switches are evaluated once per pass in ascending index order and each
//! result is written to the source table immediately, so switch `n` sees the
//! current result of every switch below `n` and the previous result of every
//! switch at or above it.
//!
//! # Operand units
//!
//! Compare thresholds are percentages for mixer-scale sources, raw counts for
//! counters, whole seconds for timers and telemetry units for telemetry.
//! Durations (delay, duration, pulse timing) are tenths of a second.

mod eval;

pub use eval::{reinitialize_logical_switches, update_logical_switches, LogicalSwitchRuntime};

use serde::{Deserialize, Serialize};

use crate::edge::ClockEdge;
use crate::source::SourceId;
use crate::switch::SwitchRef;

/// Relational operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Greater,
    Less,
    Equal,
    GreaterOrEqual,
    LessOrEqual,
}

impl CompareOp {
    pub fn apply(self, a: i32, b: i32) -> bool {
        match self {
            CompareOp::Greater => a > b,
            CompareOp::Less => a < b,
            CompareOp::Equal => a == b,
            CompareOp::GreaterOrEqual => a >= b,
            CompareOp::LessOrEqual => a <= b,
        }
    }
}

/// Direction of change detected by a delta switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeltaDirection {
    Positive,
    Negative,
    #[default]
    Both,
}

/// Boolean combination of two switch references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombineOp {
    And,
    Or,
    Xor,
}

impl CombineOp {
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            CombineOp::And => a && b,
            CombineOp::Or => a || b,
            CombineOp::Xor => a != b,
        }
    }
}

/// Function of a logical switch with its operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogicalFunction {
    /// Always false
    #[default]
    None,
    /// `a op x`, or `|a| op x` when `magnitude` is set
    Compare {
        op: CompareOp,
        magnitude: bool,
        source: SourceId,
        threshold: i16,
    },
    /// `|Δa| > x` since the last reference value
    Delta {
        source: SourceId,
        threshold: i16,
        direction: DeltaDirection,
    },
    /// `a op b` on two sources
    SourceCompare {
        op: CompareOp,
        a: SourceId,
        b: SourceId,
    },
    Combine {
        op: CombineOp,
        a: SwitchRef,
        b: SwitchRef,
    },
    /// Set while `set` alone is active, cleared while `reset` alone is active
    Latch { set: SwitchRef, reset: SwitchRef },
    /// Flips on each qualifying clock edge, forced false while `clear` is active
    Toggle {
        clock: SwitchRef,
        edge: ClockEdge,
        clear: SwitchRef,
    },
    /// True for `width` out of every `period`, starting after `delay`
    Pulse { width: u16, period: u16, delay: u16 },
}

impl LogicalFunction {
    /// Returns true if the activation delay applies to this function.
    pub fn uses_delay(&self) -> bool {
        !matches!(
            self,
            LogicalFunction::None
                | LogicalFunction::Pulse { .. }
                | LogicalFunction::Toggle { .. }
                | LogicalFunction::Delta { .. }
        )
    }

    /// Returns true if the minimum duration applies to this function.
    pub fn uses_duration(&self) -> bool {
        !matches!(
            self,
            LogicalFunction::None
                | LogicalFunction::Pulse { .. }
                | LogicalFunction::Latch { .. }
                | LogicalFunction::Toggle { .. }
        )
    }

    /// Returns true if every source and switch operand is within capacity.
    pub fn is_in_range(&self) -> bool {
        match self {
            LogicalFunction::None | LogicalFunction::Pulse { .. } => true,
            LogicalFunction::Compare { source, .. } | LogicalFunction::Delta { source, .. } => {
                source.is_in_range()
            }
            LogicalFunction::SourceCompare { a, b, .. } => a.is_in_range() && b.is_in_range(),
            LogicalFunction::Combine { a, b, .. } => a.is_in_range() && b.is_in_range(),
            LogicalFunction::Latch { set, reset } => set.is_in_range() && reset.is_in_range(),
            LogicalFunction::Toggle { clock, clear, .. } => {
                clock.is_in_range() && clear.is_in_range()
            }
        }
    }
}

/// Logical switch configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogicalSwitch {
    pub function: LogicalFunction,
    /// Activation delay (tenths of a second)
    pub delay: u16,
    /// Minimum active duration (tenths of a second)
    pub duration: u16,
}
