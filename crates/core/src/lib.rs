//! txmix_core - Pure no_std mixer and control logic for RC transmitters
//!
//! This crate contains the configuration types, evaluators and shaping
//! arithmetic of the transmitter logic. Everything here is deterministic
//! integer math that can be tested on host without feature flags.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies, no allocation
//! - **Infallible ticks**: Evaluators never fail; configuration errors are
//!   reported by [`model::Model::validate`] and editing operations
//!
//! # Modules
//!
//! - [`limits`]: Capacities, scale and timing constants
//! - [`shaping`]: Expo, differential, weight/offset, interpolation, slew
//! - [`source`]: Source ids and the per-tick source table
//! - [`switch`]: Switch references
//! - [`input`]: Raw inputs supplied by acquisition collaborators
//! - [`roles`]: Stick modes, dual rates and throttle curve
//! - [`curve`]: Custom curves
//! - [`funcgen`]: Function generators
//! - [`counter`], [`timer`]: Counters and timers
//! - [`logical`]: Logical switches
//! - [`flight_mode`]: Flight modes and trims
//! - [`mixer`]: Mixer slots, pipeline and reorder helpers
//! - [`channel`]: Channel output finalizer and failsafe
//! - [`templates`]: Four-slot mixer templates and channel orders
//! - [`model`]: Model container and sanity check
//! - [`traits`]: Time source abstraction

#![no_std]

pub mod channel;
pub mod counter;
pub mod curve;
pub mod edge;
pub mod flight_mode;
pub mod funcgen;
pub mod input;
pub mod limits;
pub mod logical;
pub mod mixer;
pub mod model;
pub mod roles;
pub mod shaping;
pub mod source;
pub mod switch;
pub mod telemetry;
pub mod templates;
pub mod timer;
pub mod traits;
