#![cfg_attr(not(test), no_std)]

//! txmix - Mixer and control-logic engine for RC transmitters
//!
//! This crate runs the per-tick evaluation pass over a model built from
//! [`txmix_core`] configuration types: inputs and roles, function
//! generators, counters and timers, logical switches, flight modes and
//! trims, the mixer and finally the channel outputs.
//!
//! Acquisition, radio output, storage and UI are collaborators. They
//! supply [`txmix_core::input::RawInputs`] each tick and read the
//! published outputs back from the [`Engine`].

pub mod logging;

pub mod engine;

pub use engine::Engine;
pub use txmix_core as logic;
