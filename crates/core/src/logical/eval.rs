use super::{DeltaDirection, LogicalFunction, LogicalSwitch};
use crate::edge::EdgeDetector;
use crate::limits::{duration_ms, PERCENT_SCALE};
use crate::source::{SourceId, SourceTable};

/// Runtime state of one logical switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogicalSwitchRuntime {
    /// Raw condition of the previous tick
    raw_prev: bool,
    /// Time the raw condition last became true
    raw_since: u32,
    /// Time the switch last started reporting true (minimum duration)
    active_since: Option<u32>,
    latched: bool,
    toggled: bool,
    clock: EdgeDetector,
    delta_reference: i32,
}

/// Reads a compare operand and scales the threshold into the source's units.
fn compare_operands(sources: &SourceTable, source: SourceId, threshold: i16) -> Option<(i32, i32)> {
    let value = sources.value(source)?;
    let threshold = threshold as i32;
    let scaled = match source {
        SourceId::Counter(_) | SourceId::Telemetry(_) => threshold,
        SourceId::Timer(_) => threshold * 1000,
        _ => threshold * PERCENT_SCALE,
    };
    Some((value, scaled))
}

impl LogicalSwitchRuntime {
    /// Resets all state and primes edge and delta references with the current
    /// source values.
    pub fn reinitialize(&mut self, config: &LogicalSwitch, sources: &SourceTable) {
        *self = Self::default();
        match config.function {
            LogicalFunction::Toggle { clock, .. } => {
                self.clock.prime(clock.is_triggered(sources));
            }
            LogicalFunction::Delta { source, .. } => {
                self.delta_reference = sources.value(source).unwrap_or(0);
            }
            _ => {}
        }
    }

    fn raw_condition(&mut self, config: &LogicalSwitch, now_ms: u32, sources: &SourceTable) -> bool {
        match config.function {
            LogicalFunction::None => false,
            LogicalFunction::Compare {
                op,
                magnitude,
                source,
                threshold,
            } => match compare_operands(sources, source, threshold) {
                Some((value, x)) => {
                    let value = if magnitude { value.saturating_abs() } else { value };
                    op.apply(value, x)
                }
                None => false,
            },
            LogicalFunction::Delta {
                source,
                threshold,
                direction,
            } => {
                let Some((value, x)) = compare_operands(sources, source, threshold) else {
                    return false;
                };
                let difference = value.saturating_sub(self.delta_reference);
                if difference.saturating_abs() <= x {
                    return false;
                }
                let (fired, opposite) = match direction {
                    DeltaDirection::Positive => (difference > x, difference < 0),
                    DeltaDirection::Negative => (difference < -x, difference > 0),
                    DeltaDirection::Both => (true, false),
                };
                if fired || opposite {
                    self.delta_reference = value;
                }
                fired
            }
            LogicalFunction::SourceCompare { op, a, b } => {
                op.apply(sources.mix_value(a) as i32, sources.mix_value(b) as i32)
            }
            LogicalFunction::Combine { op, a, b } => {
                op.apply(a.is_active(sources), b.is_active(sources))
            }
            LogicalFunction::Latch { set, reset } => {
                match (set.is_active(sources), reset.is_active(sources)) {
                    (true, false) => self.latched = true,
                    (false, true) => self.latched = false,
                    _ => {}
                }
                self.latched
            }
            LogicalFunction::Toggle { clock, edge, clear } => {
                if self.clock.sample(clock.is_triggered(sources), edge) {
                    self.toggled = !self.toggled;
                }
                if clear.is_triggered(sources) {
                    self.toggled = false;
                }
                self.toggled
            }
            LogicalFunction::Pulse {
                width,
                period,
                delay,
            } => {
                let period = duration_ms(period) as i64;
                if period == 0 {
                    return false;
                }
                let instance = (now_ms as i64 - duration_ms(delay) as i64).rem_euclid(period);
                instance < duration_ms(width) as i64
            }
        }
    }

    /// Evaluates the switch for this tick.
    ///
    /// # Arguments
    ///
    /// * `config` - Switch configuration
    /// * `now_ms` - Time since reinitialize
    /// * `sources` - Source table as written so far in this pass
    ///
    /// # Returns
    ///
    /// The debounced switch state
    pub fn update(&mut self, config: &LogicalSwitch, now_ms: u32, sources: &SourceTable) -> bool {
        let raw = self.raw_condition(config, now_ms, sources);

        let mut result = raw;
        if config.delay > 0 && config.function.uses_delay() {
            if raw && !self.raw_prev {
                self.raw_since = now_ms;
            }
            result = raw && now_ms.wrapping_sub(self.raw_since) >= duration_ms(config.delay);
        }
        self.raw_prev = raw;

        if config.duration > 0 && config.function.uses_duration() {
            if result && self.active_since.is_none() {
                self.active_since = Some(now_ms);
            }
            if let Some(since) = self.active_since {
                let holding = now_ms.wrapping_sub(since) < duration_ms(config.duration);
                if !result && !holding {
                    self.active_since = None;
                }
                result = result || holding;
            }
        }

        result
    }
}

/// Resets every switch result and runtime record.
pub fn reinitialize_logical_switches(
    configs: &[LogicalSwitch],
    runtimes: &mut [LogicalSwitchRuntime],
    sources: &mut SourceTable,
) {
    sources.clear_logical();
    for (config, runtime) in configs.iter().zip(runtimes.iter_mut()) {
        runtime.reinitialize(config, sources);
    }
}

/// Evaluates every switch in ascending order, publishing each result as it
/// is produced.
pub fn update_logical_switches(
    configs: &[LogicalSwitch],
    runtimes: &mut [LogicalSwitchRuntime],
    now_ms: u32,
    sources: &mut SourceTable,
) {
    for (index, (config, runtime)) in configs.iter().zip(runtimes.iter_mut()).enumerate() {
        let state = runtime.update(config, now_ms, sources);
        sources.set_logical(index, state);
    }
}
