//! Timers
//!
//! Each timer accumulates elapsed time while its run switch is active and
//! pauses otherwise. A timer with `initial_minutes > 0` counts down and
//! reports the remaining time, which goes negative after expiry.

use serde::{Deserialize, Serialize};

use crate::source::SourceTable;
use crate::switch::SwitchRef;

/// Timer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Timer {
    /// Runs while active. None never runs.
    pub run: SwitchRef,
    pub reset: SwitchRef,
    /// Count-down start value, 0 for a count-up timer
    pub initial_minutes: u16,
    pub persistent: bool,
    /// Mirror of the elapsed time (ms) for the storage collaborator
    pub persisted_value: u32,
}

impl Timer {
    /// Count-down length in milliseconds (0 for count-up)
    pub fn initial_ms(&self) -> u32 {
        self.initial_minutes as u32 * 60_000
    }

    pub fn counts_down(&self) -> bool {
        self.initial_minutes > 0
    }

    /// Reported value for a given elapsed time
    pub fn value(&self, elapsed_ms: u32) -> i32 {
        if self.counts_down() {
            (self.initial_ms() as i64 - elapsed_ms as i64).clamp(i32::MIN as i64, i32::MAX as i64)
                as i32
        } else {
            elapsed_ms.min(i32::MAX as u32) as i32
        }
    }
}

/// Runtime state of one timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerRuntime {
    pub elapsed_ms: u32,
    last_elapsed_ms: u32,
    last_paused_ms: u32,
    running: bool,
    expired_latched: bool,
    /// Set for the one tick on which a count-down timer passes zero
    pub expired: bool,
}

impl TimerRuntime {
    /// Resets the timer at `now_ms`, restoring the persisted value if
    /// enabled.
    pub fn reinitialize(&mut self, config: &Timer, now_ms: u32) {
        let start = if config.persistent {
            config.persisted_value
        } else {
            0
        };
        *self = Self {
            elapsed_ms: start,
            last_elapsed_ms: start,
            last_paused_ms: now_ms,
            expired_latched: config.counts_down() && start > config.initial_ms(),
            ..Self::default()
        };
    }

    fn reset(&mut self, now_ms: u32) {
        self.elapsed_ms = 0;
        self.last_elapsed_ms = 0;
        self.last_paused_ms = now_ms;
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advances the timer to `now_ms`.
    pub fn update(&mut self, config: &Timer, now_ms: u32, sources: &SourceTable) {
        if config.run.is_triggered(sources) {
            self.elapsed_ms = self
                .last_elapsed_ms
                .saturating_add(now_ms.wrapping_sub(self.last_paused_ms));
            self.running = true;
        } else {
            self.last_elapsed_ms = self.elapsed_ms;
            self.last_paused_ms = now_ms;
            self.running = false;
        }

        if config.reset.is_triggered(sources) {
            self.reset(now_ms);
        }

        self.expired = false;
        if config.counts_down() {
            if self.elapsed_ms > config.initial_ms() {
                if !self.expired_latched {
                    self.expired = true;
                    self.expired_latched = true;
                }
            } else {
                self.expired_latched = false;
            }
        }
    }
}

/// Reinitializes every timer at `now_ms` and publishes the restored values.
pub fn reinitialize_timers(
    configs: &[Timer],
    runtimes: &mut [TimerRuntime],
    now_ms: u32,
    sources: &mut SourceTable,
) {
    for (index, (config, runtime)) in configs.iter().zip(runtimes.iter_mut()).enumerate() {
        runtime.reinitialize(config, now_ms);
        sources.set_timer(index, config.value(runtime.elapsed_ms));
    }
}

/// Runs every timer, publishes the values and refreshes the persist mirror.
pub fn update_timers(
    configs: &mut [Timer],
    runtimes: &mut [TimerRuntime],
    now_ms: u32,
    sources: &mut SourceTable,
) {
    for (index, (config, runtime)) in configs.iter_mut().zip(runtimes.iter_mut()).enumerate() {
        runtime.update(config, now_ms, sources);
        sources.set_timer(index, config.value(runtime.elapsed_ms));
        config.persisted_value = if config.persistent {
            runtime.elapsed_ms
        } else {
            0
        };
    }
}
