//! Input providers for the replay harness
//!
//! An [`InputProvider`] stands in for the acquisition collaborator: each
//! tick it hands the harness the raw inputs plus any between-tick commands
//! (trim presses, reinitialize) that came due.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use txmix_core::input::{RawInputs, TELEMETRY_NO_DATA};
use txmix_core::limits::FULL_SCALE;
use txmix_core::source::TrimAxis;

use crate::error::SimError;
use crate::scenario::{clamp_analog, InputChange, Scenario};

/// Engine command issued between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AdjustTrim { axis: TrimAxis, steps: i16 },
    Reinitialize,
}

/// Everything a provider supplies for one tick
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    pub inputs: RawInputs,
    /// Applied before the tick runs
    pub commands: Vec<Command>,
}

/// Pluggable source of raw inputs.
#[async_trait]
pub trait InputProvider: Send {
    /// Produces the inputs for the tick at `t_ms`.
    async fn poll(&mut self, t_ms: u32) -> Result<InputFrame, SimError>;
}

/// Seeded noise added to every stick axis.
#[derive(Debug, Clone)]
pub struct NoiseConfig {
    /// Peak noise in internal units
    pub stick_amplitude: i16,
    /// RNG seed for deterministic mode. None = random.
    pub seed: Option<u64>,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            stick_amplitude: 5,
            seed: None,
        }
    }
}

/// Provider replaying a [`Scenario`].
pub struct ScriptedInputs {
    scenario: Scenario,
    cursor: usize,
    current: RawInputs,
    noise: Option<(i16, StdRng)>,
}

impl ScriptedInputs {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            cursor: 0,
            current: RawInputs::default(),
            noise: None,
        }
    }

    /// Adds stick noise on top of the scripted values.
    pub fn with_noise(mut self, config: NoiseConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.noise = Some((config.stick_amplitude.saturating_abs(), rng));
        self
    }

    fn apply(&mut self, change: InputChange, commands: &mut Vec<Command>) {
        let inputs = &mut self.current;
        match change {
            InputChange::Stick { axis, value } => inputs.sticks[axis.index()] = clamp_analog(value),
            InputChange::Knob { index, value } => inputs.knobs[index] = clamp_analog(value),
            InputChange::Switch { index, position } => inputs.switches[index] = position,
            InputChange::Telemetry { index, value } => inputs.telemetry[index] = value,
            InputChange::ClearTelemetry { index } => inputs.telemetry[index] = TELEMETRY_NO_DATA,
            InputChange::Trim { axis, steps } => {
                commands.push(Command::AdjustTrim { axis, steps });
            }
            InputChange::Reinitialize => commands.push(Command::Reinitialize),
        }
    }
}

#[async_trait]
impl InputProvider for ScriptedInputs {
    async fn poll(&mut self, t_ms: u32) -> Result<InputFrame, SimError> {
        let mut commands = Vec::new();
        while let Some(event) = self.scenario.events.get(self.cursor).copied() {
            if event.at_ms > t_ms {
                break;
            }
            self.apply(event.change, &mut commands);
            self.cursor += 1;
        }

        let mut inputs = self.current;
        if let Some((amplitude, rng)) = self.noise.as_mut() {
            if *amplitude > 0 {
                for stick in inputs.sticks.iter_mut() {
                    let noisy = *stick as i32 + rng.gen_range(-*amplitude..=*amplitude) as i32;
                    *stick = noisy.clamp(-FULL_SCALE, FULL_SCALE) as i16;
                }
            }
        }
        Ok(InputFrame { inputs, commands })
    }
}
