//! Evaluation engine
//!
//! The [`Engine`] owns the system config, the model, the source table and
//! every runtime record, and runs one evaluation pass per control-loop tick.
//!
//! # Tick order
//!
//! 1. Raw inputs into the source table, then the derived role sources
//! 2. Function generators
//! 3. Counters and timers (they see the previous tick's logical switches)
//! 4. Logical switches, ascending, each seeing the ones before it
//! 5. Flight mode and trims
//! 6. Mixer slots, ascending
//! 7. Channel finalize
//! 8. Persist mirror (counter and timer mirrors are refreshed by their
//!    stage-3 update)
//!
//! # Reinitialize
//!
//! [`Engine::reinitialize`] only raises a flag. The next tick restarts the
//! time origin and resets each evaluator at its own stage, so every reset
//! sees the sources already written earlier in that same pass.

mod editing;

use core::array;

use txmix_core::channel::{finalize_channels, FailsafeOutput};
use txmix_core::counter::{reinitialize_counters, update_counters, CounterRuntime};
use txmix_core::flight_mode::FlightModeRuntime;
use txmix_core::funcgen::{
    reinitialize_function_generators, update_function_generators, FunctionGeneratorRuntime,
};
use txmix_core::input::RawInputs;
use txmix_core::limits::{
    NUM_COUNTERS, NUM_FUNCGEN, NUM_LOGICAL_SWITCHES, NUM_MIX_SLOTS, NUM_RC_CHANNELS, NUM_TIMERS,
};
use txmix_core::logical::{
    reinitialize_logical_switches, update_logical_switches, LogicalSwitchRuntime,
};
use txmix_core::mixer::{reinitialize_mixer, run_mixer, MixContext, MixerSlotRuntime};
use txmix_core::model::{Model, ModelError, SystemConfig};
use txmix_core::source::{SourceId, SourceTable};
use txmix_core::timer::{reinitialize_timers, update_timers, TimerRuntime};
use txmix_core::traits::TimeSource;

use crate::{log_info, log_warn};

/// Transmitter logic engine
pub struct Engine {
    system: SystemConfig,
    model: Model,
    sources: SourceTable,
    function_generators: [FunctionGeneratorRuntime; NUM_FUNCGEN],
    counters: [CounterRuntime; NUM_COUNTERS],
    timers: [TimerRuntime; NUM_TIMERS],
    logical_switches: [LogicalSwitchRuntime; NUM_LOGICAL_SWITCHES],
    flight_mode: FlightModeRuntime,
    mixer: [MixerSlotRuntime; NUM_MIX_SLOTS],
    outputs: [i16; NUM_RC_CHANNELS],
    reinitialize_pending: bool,
    /// Absolute time at which the last reinitialize took effect
    origin_ms: u32,
}

impl Engine {
    /// Creates an engine running the factory-reset model.
    ///
    /// The first tick reinitializes.
    pub fn new(system: SystemConfig) -> Self {
        let model = Model::new(&system);
        log_info!("engine created");
        Self {
            system,
            model,
            sources: SourceTable::new(),
            function_generators: array::from_fn(FunctionGeneratorRuntime::new),
            counters: [CounterRuntime::default(); NUM_COUNTERS],
            timers: [TimerRuntime::default(); NUM_TIMERS],
            logical_switches: [LogicalSwitchRuntime::default(); NUM_LOGICAL_SWITCHES],
            flight_mode: FlightModeRuntime::default(),
            mixer: [MixerSlotRuntime::default(); NUM_MIX_SLOTS],
            outputs: [0; NUM_RC_CHANNELS],
            reinitialize_pending: true,
            origin_ms: 0,
        }
    }

    /// Replaces the model and schedules a reinitialize.
    ///
    /// Short lists are padded with defaults before the sanity check.
    ///
    /// # Returns
    ///
    /// The sanity-check error, in which case the factory-reset model is
    /// loaded instead.
    pub fn load_model(&mut self, mut model: Model) -> Result<(), ModelError> {
        model.fill_to_capacity();
        let result = model.validate();
        match result {
            Ok(()) => {
                log_info!("model loaded, {} mixer slots used", model.used_mix_slots());
                self.model = model;
            }
            Err(_) => {
                log_warn!("model failed sanity check, loading defaults");
                self.model = Model::new(&self.system);
            }
        }
        self.reinitialize();
        result
    }

    /// Requests a reinitialize at the start of the next tick.
    pub fn reinitialize(&mut self) {
        self.reinitialize_pending = true;
    }

    pub fn system(&self) -> &SystemConfig {
        &self.system
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Runs one evaluation pass at absolute time `now_ms`.
    pub fn tick(&mut self, now_ms: u32, inputs: &RawInputs) {
        let reinit = core::mem::take(&mut self.reinitialize_pending);
        if reinit {
            self.origin_ms = now_ms;
            log_info!("reinitialize at {} ms", now_ms);
        }
        let t = now_ms.wrapping_sub(self.origin_ms);

        let model = &mut self.model;
        let sources = &mut self.sources;

        sources.apply_inputs(inputs, &self.system.switch_types, &model.telemetry);
        model.roles.update(sources);

        if reinit {
            reinitialize_function_generators(&mut self.function_generators);
        }
        update_function_generators(
            &model.function_generators,
            &mut self.function_generators,
            t,
            sources,
        );

        if reinit {
            reinitialize_counters(&model.counters, &mut self.counters, sources);
            reinitialize_timers(&model.timers, &mut self.timers, t, sources);
        } else {
            update_counters(&mut model.counters, &mut self.counters, sources);
            update_timers(&mut model.timers, &mut self.timers, t, sources);
        }

        if reinit {
            reinitialize_logical_switches(
                &model.logical_switches,
                &mut self.logical_switches,
                sources,
            );
        }
        update_logical_switches(&model.logical_switches, &mut self.logical_switches, t, sources);

        if reinit {
            self.flight_mode.reinitialize(&model.flight_modes, t, sources);
        }
        if let Some(mode) = self
            .flight_mode
            .update(&model.flight_modes, &model.trims, t, sources)
        {
            log_info!("flight mode {} active", mode);
        }

        if reinit {
            reinitialize_mixer(&mut self.mixer);
        }
        let ctx = MixContext {
            curves: &model.curves,
            roles: &model.roles.sources,
            now_ms: t,
            reinitialize: reinit,
        };
        run_mixer(&model.mixer, &mut self.mixer, &ctx, sources);

        finalize_channels(&model.channels, &model.curves, sources, &mut self.outputs);
    }

    /// Runs one evaluation pass at the time reported by `time`.
    pub fn tick_with<T: TimeSource>(&mut self, time: &T, inputs: &RawInputs) {
        self.tick(time.now_ms(), inputs);
    }

    /// Finalized channel values of the last tick
    pub fn channel_outputs(&self) -> &[i16; NUM_RC_CHANNELS] {
        &self.outputs
    }

    /// Logical switch states of the last tick
    pub fn logical_switches(&self) -> &[bool; NUM_LOGICAL_SWITCHES] {
        self.sources.logical_states()
    }

    pub fn counter_values(&self) -> &[i16; NUM_COUNTERS] {
        self.sources.counters()
    }

    /// Timer values in milliseconds (remaining for count-down timers)
    pub fn timer_values(&self) -> &[i32; NUM_TIMERS] {
        self.sources.timers()
    }

    /// Returns true on the tick a count-down timer passed zero.
    pub fn timer_expired(&self, index: usize) -> bool {
        self.timers.get(index).is_some_and(|t| t.expired)
    }

    pub fn active_flight_mode(&self) -> usize {
        self.sources.active_flight_mode()
    }

    /// Raw value of any source as of the last tick
    pub fn source_value(&self, id: SourceId) -> Option<i32> {
        self.sources.value(id)
    }

    /// What the receiver should emit per channel on link loss
    pub fn failsafe_outputs(&self) -> [FailsafeOutput; NUM_RC_CHANNELS] {
        array::from_fn(|i| match self.model.channels.get(i) {
            Some(channel) => channel.failsafe_output(self.outputs[i]),
            None => FailsafeOutput::Hold(self.outputs[i]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txmix_core::logical::{CompareOp, LogicalFunction};
    use txmix_core::mixer::MixerSlot;
    use txmix_core::source::{Role, StickAxis};
    use txmix_core::switch::SwitchRef;

    fn engine_with(model: Model) -> Engine {
        let mut engine = Engine::new(SystemConfig::default());
        engine.load_model(model).unwrap();
        engine
    }

    #[test]
    fn test_outputs_zero_before_first_tick() {
        let engine = Engine::new(SystemConfig::default());
        assert!(engine.channel_outputs().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_simple_slot_reaches_channel() {
        let mut model = Model::default();
        model.mixer[0] =
            MixerSlot::simple(SourceId::Channel(0), SourceId::Role(Role::Aileron), 100);
        let mut engine = engine_with(model);

        let inputs = RawInputs::default().with_stick(StickAxis::X2, 250);
        engine.tick(0, &inputs);
        assert_eq!(engine.channel_outputs()[0], 250);
    }

    #[test]
    fn test_invalid_model_falls_back_to_defaults() {
        let mut model = Model::default();
        model.counters[0].modulus = 0;
        model.mixer[0] = MixerSlot::simple(SourceId::Channel(0), SourceId::Max, 100);

        let mut engine = Engine::new(SystemConfig::default());
        assert_eq!(
            engine.load_model(model),
            Err(ModelError::InvalidModulus { index: 0 })
        );
        assert_eq!(engine.model().used_mix_slots(), 0);
        assert_eq!(engine.model().counters[0].modulus, 1000);
    }

    #[test]
    fn test_time_is_measured_from_reinitialize() {
        let mut model = Model::default();
        model.timers[0].run = SwitchRef::Logical {
            index: 0,
            invert: true,
        };
        let mut engine = engine_with(model);

        engine.tick(50_000, &RawInputs::default());
        assert_eq!(engine.timer_values()[0], 0);
        engine.tick(51_000, &RawInputs::default());
        assert_eq!(engine.timer_values()[0], 1000);

        engine.reinitialize();
        engine.tick(60_000, &RawInputs::default());
        assert_eq!(engine.timer_values()[0], 0);
    }

    #[test]
    fn test_logical_chain_sees_earlier_switch_same_tick() {
        let mut model = Model::default();
        model.logical_switches[0].function = LogicalFunction::Compare {
            op: CompareOp::Greater,
            magnitude: false,
            source: SourceId::Stick(StickAxis::Y1),
            threshold: 50,
        };
        model.logical_switches[1].function = LogicalFunction::Compare {
            op: CompareOp::Greater,
            magnitude: false,
            source: SourceId::LogicalSwitch(0),
            threshold: 0,
        };
        let mut engine = engine_with(model);
        engine.tick(0, &RawInputs::default().with_stick(StickAxis::Y1, 400));
        assert!(engine.logical_switches()[0]);
        assert!(engine.logical_switches()[1]);
    }

    #[test]
    fn test_tick_with_time_source() {
        use txmix_core::traits::MockTime;

        let mut model = Model::default();
        model.mixer[0] = MixerSlot::simple(SourceId::Channel(3), SourceId::Max, 50);
        let mut engine = engine_with(model);
        let time = MockTime::with_initial(1234);
        engine.tick_with(&time, &RawInputs::default());
        assert_eq!(engine.channel_outputs()[3], 250);
        assert_eq!(engine.source_value(SourceId::Channel(3)), Some(250));
    }

    #[test]
    fn test_failsafe_outputs_follow_channels() {
        use txmix_core::channel::Failsafe;

        let mut model = Model::default();
        model.mixer[0] = MixerSlot::simple(SourceId::Channel(1), SourceId::Max, 20);
        model.channels[2].failsafe = Failsafe::NoPulse;
        let mut engine = engine_with(model);
        engine.tick(0, &RawInputs::default());

        let failsafe = engine.failsafe_outputs();
        assert_eq!(failsafe[1], FailsafeOutput::Hold(100));
        assert_eq!(failsafe[2], FailsafeOutput::NoPulse);
    }
}
