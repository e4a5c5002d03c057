//! Replay harness
//!
//! Drives an [`Engine`] from an [`InputProvider`] on the 20 ms loop period
//! and records one [`Frame`] per tick. Engine time always advances by
//! exactly one loop period per tick, so a replay is deterministic in both
//! time modes; real-time mode only paces the loop against the wall clock.

use serde::{Deserialize, Serialize};
use tokio::time::{self, Duration, Interval, MissedTickBehavior};
use txmix::Engine;
use txmix_core::limits::LOOP_TIME_MS;
use txmix_core::traits::{MockTime, TimeSource};

use crate::error::SimError;
use crate::inputs::{Command, InputProvider};
use crate::model_file::ModelFile;

/// Time synchronization mode for a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeMode {
    /// Ticks run back to back, as fast as possible.
    #[default]
    Lockstep,
    /// Ticks are paced by a tokio interval at the loop period.
    Realtime,
}

#[derive(Debug, Clone)]
pub struct ReplayConfig {
    pub time_mode: TimeMode,
    /// Ticks run while engine time is below this value.
    pub duration_ms: u32,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            time_mode: TimeMode::Lockstep,
            duration_ms: 10_000,
        }
    }
}

/// Published engine state after one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub t_ms: u32,
    pub channels: Vec<i16>,
    pub logical: Vec<bool>,
    pub active_mode: usize,
}

impl Frame {
    fn capture(t_ms: u32, engine: &Engine) -> Self {
        Self {
            t_ms,
            channels: engine.channel_outputs().to_vec(),
            logical: engine.logical_switches().to_vec(),
            active_mode: engine.active_flight_mode(),
        }
    }
}

pub struct ReplayHarness<P: InputProvider> {
    engine: Engine,
    provider: P,
    config: ReplayConfig,
    time: MockTime,
    interval: Option<Interval>,
}

impl<P: InputProvider> ReplayHarness<P> {
    /// Builds a harness around a freshly loaded engine.
    ///
    /// Fails if the model does not pass the sanity check.
    pub fn new(file: ModelFile, provider: P, config: ReplayConfig) -> Result<Self, SimError> {
        let mut engine = Engine::new(file.system);
        engine.load_model(file.model)?;
        Ok(Self {
            engine,
            provider,
            config,
            time: MockTime::new(),
            interval: None,
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Engine time of the next tick
    pub fn now_ms(&self) -> u32 {
        self.time.now_ms()
    }

    pub fn is_finished(&self) -> bool {
        self.time.now_ms() >= self.config.duration_ms
    }

    async fn pace(&mut self) {
        if self.config.time_mode != TimeMode::Realtime {
            return;
        }
        let interval = self.interval.get_or_insert_with(|| {
            let mut interval = time::interval(Duration::from_millis(LOOP_TIME_MS as u64));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        interval.tick().await;
    }

    /// Runs one tick and advances engine time by one loop period.
    pub async fn step(&mut self) -> Result<Frame, SimError> {
        self.pace().await;

        let t_ms = self.time.now_ms();
        let frame = self.provider.poll(t_ms).await?;
        for command in frame.commands {
            match command {
                Command::AdjustTrim { axis, steps } => {
                    self.engine.adjust_trim(axis, steps);
                }
                Command::Reinitialize => self.engine.reinitialize(),
            }
        }

        self.engine.tick_with(&self.time, &frame.inputs);
        self.time.advance(LOOP_TIME_MS);
        Ok(Frame::capture(t_ms, &self.engine))
    }

    /// Runs until the configured duration, handing each frame to `sink`.
    ///
    /// # Returns
    ///
    /// The number of ticks run
    pub async fn run_with<F>(&mut self, mut sink: F) -> Result<usize, SimError>
    where
        F: FnMut(&Frame) -> Result<(), SimError>,
    {
        let mut ticks = 0;
        while !self.is_finished() {
            let frame = self.step().await?;
            sink(&frame)?;
            ticks += 1;
        }
        Ok(ticks)
    }

    /// Runs until the configured duration and collects every frame.
    pub async fn run(&mut self) -> Result<Vec<Frame>, SimError> {
        let mut frames = Vec::new();
        self.run_with(|frame| {
            frames.push(frame.clone());
            Ok(())
        })
        .await?;
        Ok(frames)
    }
}
