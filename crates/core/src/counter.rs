//! Counters
//!
//! Edge-triggered up/down counters with modulus wraparound. Counters are
//! evaluated before the logical switches, so a clock or clear reference to a
//! logical switch observes the previous tick's result.

use serde::{Deserialize, Serialize};

use crate::edge::{ClockEdge, EdgeDetector};
use crate::limits::MAX_COUNTER_MODULUS;
use crate::source::SourceTable;
use crate::switch::SwitchRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CountDirection {
    #[default]
    Up,
    Down,
}

/// Counter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub clock: SwitchRef,
    pub edge: ClockEdge,
    /// Zeroes the count and blocks clocking while active
    pub clear: SwitchRef,
    /// Count wraps within 0..modulus (1..=10000)
    pub modulus: i16,
    pub direction: CountDirection,
    pub persistent: bool,
    /// Mirror of the count for the storage collaborator
    pub persisted_value: i16,
}

impl Default for Counter {
    fn default() -> Self {
        Self {
            clock: SwitchRef::None,
            edge: ClockEdge::Rising,
            clear: SwitchRef::None,
            modulus: 1000,
            direction: CountDirection::Up,
            persistent: false,
            persisted_value: 0,
        }
    }
}

impl Counter {
    /// Returns true if the modulus is within 1..=10000.
    pub fn is_valid(&self) -> bool {
        (1..=MAX_COUNTER_MODULUS).contains(&self.modulus)
    }
}

/// Runtime state of one counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterRuntime {
    pub count: i16,
    clock: EdgeDetector,
}

impl CounterRuntime {
    /// Resets the count (restoring the persisted value if enabled) and
    /// primes the clock with its current level.
    pub fn reinitialize(&mut self, config: &Counter, sources: &SourceTable) {
        self.count = if config.persistent {
            config.persisted_value
        } else {
            0
        };
        if config.is_valid() {
            self.count = self.count.clamp(0, config.modulus - 1);
        }
        self.clock.prime(config.clock.is_triggered(sources));
    }

    /// Advances the counter by one tick.
    pub fn update(&mut self, config: &Counter, sources: &SourceTable) {
        if !config.is_valid() {
            return;
        }

        let level = config.clock.is_triggered(sources);
        if self.clock.sample(level, config.edge) {
            match config.direction {
                CountDirection::Up => self.count = self.count.saturating_add(1),
                CountDirection::Down => self.count = self.count.saturating_sub(1),
            }
        }

        if self.count >= config.modulus {
            self.count = 0;
        }
        if self.count < 0 {
            self.count = config.modulus - 1;
        }

        if config.clear.is_triggered(sources) {
            self.count = 0;
        }
    }
}

/// Reinitializes every counter and publishes the restored counts.
pub fn reinitialize_counters(
    configs: &[Counter],
    runtimes: &mut [CounterRuntime],
    sources: &mut SourceTable,
) {
    for (index, (config, runtime)) in configs.iter().zip(runtimes.iter_mut()).enumerate() {
        runtime.reinitialize(config, sources);
        sources.set_counter(index, runtime.count);
    }
}

/// Runs every counter, publishes the counts and refreshes the persist mirror.
pub fn update_counters(
    configs: &mut [Counter],
    runtimes: &mut [CounterRuntime],
    sources: &mut SourceTable,
) {
    for (index, (config, runtime)) in configs.iter_mut().zip(runtimes.iter_mut()).enumerate() {
        runtime.update(config, sources);
        sources.set_counter(index, runtime.count);
        config.persisted_value = if config.persistent { runtime.count } else { 0 };
    }
}
