//! Capacities, scale and timing constants shared by every evaluator
//!
//! # Scale
//!
//! All signal values live on a single fixed-point convention: `±FULL_SCALE`
//! (±500) corresponds to ±100 %. A configured percentage `p` therefore maps to
//! `p * PERCENT_SCALE` internally.
//!
//! # Timing
//!
//! The control loop runs every [`LOOP_TIME_MS`]. Durations stored in the model
//! are tenths of a second and are converted with [`DURATION_UNIT_MS`].

/// Internal value of +100 %
pub const FULL_SCALE: i32 = 500;

/// Internal units per configured percent
pub const PERCENT_SCALE: i32 = 5;

/// Fixed control loop period (milliseconds)
pub const LOOP_TIME_MS: u32 = 20;

/// Milliseconds per configured duration unit (tenths of a second)
pub const DURATION_UNIT_MS: u32 = 100;

/// Number of mixer slots
pub const NUM_MIX_SLOTS: usize = 40;

/// Number of logical switches
pub const NUM_LOGICAL_SWITCHES: usize = 20;

/// Number of counters
pub const NUM_COUNTERS: usize = 5;

/// Number of timers
pub const NUM_TIMERS: usize = 3;

/// Number of function generators
pub const NUM_FUNCGEN: usize = 5;

/// Number of flight modes
pub const NUM_FLIGHT_MODES: usize = 5;

/// Number of RC output channels
pub const NUM_RC_CHANNELS: usize = 20;

/// Number of virtual (intermediate) channels
pub const NUM_VIRTUAL_CHANNELS: usize = 5;

/// Number of stick axes supplied by input acquisition
pub const NUM_STICK_AXES: usize = 10;

/// Number of knobs supplied by input acquisition
pub const NUM_KNOBS: usize = 2;

/// Number of physical switches
pub const NUM_PHYSICAL_SWITCHES: usize = 8;

/// Number of telemetry slots
pub const NUM_TELEMETRY: usize = 6;

/// Number of custom curves
pub const NUM_CUSTOM_CURVES: usize = 10;

/// Minimum number of points in a curve
pub const MIN_CURVE_POINTS: usize = 2;

/// Default number of points in a freshly reset curve
pub const DEFAULT_CURVE_POINTS: usize = 5;

/// Maximum number of points in a curve
pub const MAX_CURVE_POINTS: usize = 10;

/// Trim range in steps (one step is 1 %)
pub const TRIM_MAX_STEPS: i16 = 20;

/// Largest accepted counter modulus
pub const MAX_COUNTER_MODULUS: i16 = 10_000;

/// Converts a configured percentage into internal units.
#[inline]
pub const fn percent(p: i32) -> i32 {
    p * PERCENT_SCALE
}

/// Converts a configured duration (tenths of a second) into milliseconds.
#[inline]
pub const fn duration_ms(tenths: u16) -> u32 {
    tenths as u32 * DURATION_UNIT_MS
}

/// Saturates a value to the internal full-scale range.
#[inline]
pub fn saturate(value: i32) -> i16 {
    value.clamp(-FULL_SCALE, FULL_SCALE) as i16
}
