//! Flight modes and trims
//!
//! - Active mode: the first mode (in index order) whose switch is active,
//!   mode 0 when none is
//! - Trim per axis: disabled, one common value, or one value per mode
//! - Mode change: flight-mode trims blend linearly from the value in effect
//!   at the change to the new mode's value over the new mode's transition
//!   time
//!
//! The effective trim of each axis is published as [`SourceId::Trim`] and is
//! what trim-enabled mixer slots add (scaled by their weight).
//!
//! [`SourceId::Trim`]: crate::source::SourceId::Trim

use serde::{Deserialize, Serialize};

use crate::limits::{duration_ms, PERCENT_SCALE, TRIM_MAX_STEPS};
use crate::source::{SourceTable, TrimAxis};
use crate::switch::SwitchRef;

/// Flight mode configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightMode {
    /// Activates the mode. None never matches.
    pub switch: SwitchRef,
    /// Trim blend time on entering this mode (tenths of a second)
    pub transition_time: u8,
    /// Trim steps per axis in [`TrimAxis`] order
    pub trims: [i16; 4],
}

impl Default for FlightMode {
    fn default() -> Self {
        Self {
            switch: SwitchRef::None,
            transition_time: 10,
            trims: [0; 4],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrimState {
    Disabled,
    /// One value shared by all flight modes
    #[default]
    Common,
    /// One value per flight mode
    FlightMode,
}

/// Trim configuration of one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrimConfig {
    pub state: TrimState,
    /// Shared trim steps
    pub common: i16,
}

/// Outcome of a trim adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimAdjustment {
    /// Trim is disabled on this axis
    Disabled,
    /// New value in steps
    Adjusted(i16),
    /// New value in steps, limited by the trim range
    Clamped(i16),
}

/// Returns the index of the mode that should be active.
pub fn resolve_active_mode(modes: &[FlightMode], sources: &SourceTable) -> usize {
    modes
        .iter()
        .position(|mode| mode.switch.is_triggered(sources))
        .unwrap_or(0)
}

/// Changes the trim of `axis` by `steps` in the way its trim state dictates.
///
/// # Arguments
///
/// * `trims` - Per-axis trim configuration
/// * `modes` - Flight modes (per-mode trims live here)
/// * `active` - Index of the active flight mode
/// * `axis` - Axis to adjust
/// * `steps` - Signed step count
pub fn adjust_trim(
    trims: &mut [TrimConfig; 4],
    modes: &mut [FlightMode],
    active: usize,
    axis: TrimAxis,
    steps: i16,
) -> TrimAdjustment {
    let config = &mut trims[axis.index()];
    let target = match config.state {
        TrimState::Disabled => return TrimAdjustment::Disabled,
        TrimState::Common => &mut config.common,
        TrimState::FlightMode => match modes.get_mut(active) {
            Some(mode) => &mut mode.trims[axis.index()],
            None => return TrimAdjustment::Disabled,
        },
    };

    let wanted = target.saturating_add(steps);
    let value = wanted.clamp(-TRIM_MAX_STEPS, TRIM_MAX_STEPS);
    *target = value;
    if value == wanted {
        TrimAdjustment::Adjusted(value)
    } else {
        TrimAdjustment::Clamped(value)
    }
}

/// Flight mode and trim blend state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlightModeRuntime {
    active: usize,
    /// Blended per-mode trim at the last mode change (internal units)
    from: [i32; 4],
    /// Current blended per-mode trim (internal units)
    blended: [i32; 4],
    entered_at_ms: u32,
}

impl FlightModeRuntime {
    pub fn active(&self) -> usize {
        self.active
    }

    /// Snaps to the mode currently selected, with no blend in progress.
    pub fn reinitialize(&mut self, modes: &[FlightMode], now_ms: u32, sources: &mut SourceTable) {
        self.active = resolve_active_mode(modes, sources);
        let target = mode_trims(modes, self.active);
        *self = Self {
            active: self.active,
            from: target,
            blended: target,
            entered_at_ms: now_ms,
        };
        sources.set_active_flight_mode(self.active);
    }

    /// Resolves the active mode, advances the trim blend and publishes the
    /// effective trims.
    ///
    /// # Returns
    ///
    /// `Some(index)` if the active mode changed on this tick
    pub fn update(
        &mut self,
        modes: &[FlightMode],
        trims: &[TrimConfig; 4],
        now_ms: u32,
        sources: &mut SourceTable,
    ) -> Option<usize> {
        let resolved = resolve_active_mode(modes, sources);
        let changed = resolved != self.active;
        if changed {
            self.active = resolved;
            self.from = self.blended;
            self.entered_at_ms = now_ms;
        }
        sources.set_active_flight_mode(self.active);

        let target = mode_trims(modes, self.active);
        let transition = modes
            .get(self.active)
            .map(|mode| duration_ms(mode.transition_time as u16))
            .unwrap_or(0) as i64;
        let elapsed = now_ms.wrapping_sub(self.entered_at_ms) as i64;

        for i in 0..4 {
            self.blended[i] = if elapsed >= transition {
                target[i]
            } else {
                let from = self.from[i] as i64;
                (from + (target[i] as i64 - from) * elapsed / transition) as i32
            };
        }

        for axis in TrimAxis::ALL {
            let config = trims[axis.index()];
            let value = match config.state {
                TrimState::Disabled => 0,
                TrimState::Common => config.common as i32 * PERCENT_SCALE,
                TrimState::FlightMode => self.blended[axis.index()],
            };
            sources.set_trim(axis, value as i16);
        }

        changed.then_some(self.active)
    }
}

fn mode_trims(modes: &[FlightMode], index: usize) -> [i32; 4] {
    let steps = modes.get(index).map(|m| m.trims).unwrap_or([0; 4]);
    steps.map(|s| s.clamp(-TRIM_MAX_STEPS, TRIM_MAX_STEPS) as i32 * PERCENT_SCALE)
}
