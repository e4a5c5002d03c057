//! Model and system configuration
//!
//! A [`Model`] holds every per-model configuration list. Lists are
//! `heapless::Vec`s filled to their capacity; [`Model::fill_to_capacity`]
//! pads lists loaded from a shorter description with factory defaults.
//!
//! [`SystemConfig`] holds the transmitter-wide settings shared by all models.

mod error;
mod validate;

pub use error::{Entity, ModelError};

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::channel::ChannelConfig;
use crate::counter::Counter;
use crate::curve::CustomCurve;
use crate::flight_mode::{FlightMode, TrimConfig};
use crate::funcgen::FunctionGenerator;
use crate::limits::{
    NUM_COUNTERS, NUM_CUSTOM_CURVES, NUM_FLIGHT_MODES, NUM_FUNCGEN, NUM_LOGICAL_SWITCHES,
    NUM_MIX_SLOTS, NUM_PHYSICAL_SWITCHES, NUM_RC_CHANNELS, NUM_TELEMETRY, NUM_TIMERS,
};
use crate::logical::LogicalSwitch;
use crate::mixer::MixerSlot;
use crate::roles::{RoleConfig, RoleSources, StickMode};
use crate::switch::SwitchType;
use crate::telemetry::TelemetryConfig;
use crate::templates::ChannelOrder;
use crate::timer::Timer;

/// Airframe kind, used by templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModelType {
    #[default]
    Airplane,
    Multicopter,
    Other,
}

/// Transmitter-wide configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub switch_types: [SwitchType; NUM_PHYSICAL_SWITCHES],
    /// Stick mode new models start with
    pub stick_mode: StickMode,
    /// Channel order used by templates
    pub channel_order: ChannelOrder,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            switch_types: [SwitchType::ThreePosition; NUM_PHYSICAL_SWITCHES],
            stick_mode: StickMode::default(),
            channel_order: ChannelOrder::default(),
        }
    }
}

/// Per-model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Model {
    pub model_type: ModelType,
    pub roles: RoleConfig,
    pub mixer: Vec<MixerSlot, NUM_MIX_SLOTS>,
    pub curves: Vec<CustomCurve, NUM_CUSTOM_CURVES>,
    pub logical_switches: Vec<LogicalSwitch, NUM_LOGICAL_SWITCHES>,
    pub counters: Vec<Counter, NUM_COUNTERS>,
    pub timers: Vec<Timer, NUM_TIMERS>,
    pub function_generators: Vec<FunctionGenerator, NUM_FUNCGEN>,
    pub flight_modes: Vec<FlightMode, NUM_FLIGHT_MODES>,
    pub trims: [TrimConfig; 4],
    pub channels: Vec<ChannelConfig, NUM_RC_CHANNELS>,
    pub telemetry: [TelemetryConfig; NUM_TELEMETRY],
}

impl Default for Model {
    fn default() -> Self {
        let mut model = Self {
            model_type: ModelType::default(),
            roles: RoleConfig::default(),
            mixer: Vec::new(),
            curves: Vec::new(),
            logical_switches: Vec::new(),
            counters: Vec::new(),
            timers: Vec::new(),
            function_generators: Vec::new(),
            flight_modes: Vec::new(),
            trims: [TrimConfig::default(); 4],
            channels: Vec::new(),
            telemetry: [TelemetryConfig::default(); NUM_TELEMETRY],
        };
        model.fill_to_capacity();
        model
    }
}

fn fill<T: Clone + Default, const N: usize>(list: &mut Vec<T, N>) {
    // cannot fail: the target length is the capacity
    let _ = list.resize_default(N);
}

impl Model {
    /// Factory-reset model using the system's default stick mode
    pub fn new(system: &SystemConfig) -> Self {
        let mut model = Self::default();
        model.roles.sources = RoleSources::from_stick_mode(system.stick_mode);
        model
    }

    /// Pads every list with default entries up to its capacity.
    pub fn fill_to_capacity(&mut self) {
        fill(&mut self.mixer);
        fill(&mut self.curves);
        fill(&mut self.logical_switches);
        fill(&mut self.counters);
        fill(&mut self.timers);
        fill(&mut self.function_generators);
        fill(&mut self.flight_modes);
        fill(&mut self.channels);
    }

    /// Number of mixer slots with an output
    pub fn used_mix_slots(&self) -> usize {
        self.mixer
            .iter()
            .filter(|slot| slot.output != crate::source::SourceId::None)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::{MixCurve, MixOperation};
    use crate::source::{SourceId, StickAxis};
    use crate::switch::SwitchRef;

    #[test]
    fn test_default_lists_are_full() {
        let model = Model::default();
        assert_eq!(model.mixer.len(), NUM_MIX_SLOTS);
        assert_eq!(model.curves.len(), NUM_CUSTOM_CURVES);
        assert_eq!(model.logical_switches.len(), NUM_LOGICAL_SWITCHES);
        assert_eq!(model.counters.len(), NUM_COUNTERS);
        assert_eq!(model.timers.len(), NUM_TIMERS);
        assert_eq!(model.function_generators.len(), NUM_FUNCGEN);
        assert_eq!(model.flight_modes.len(), NUM_FLIGHT_MODES);
        assert_eq!(model.channels.len(), NUM_RC_CHANNELS);
        assert_eq!(model.used_mix_slots(), 0);
    }

    #[test]
    fn test_default_mixer_slot() {
        let slot = Model::default().mixer[0];
        assert_eq!(slot.output, SourceId::None);
        assert_eq!(slot.operation, MixOperation::Add);
        assert_eq!(slot.switch, SwitchRef::None);
        assert_eq!(slot.weight, 100);
        assert_eq!(slot.curve, MixCurve::Differential(0));
        assert!(slot.trim_enabled);
        assert_eq!(slot.flight_modes.bits(), 0xFF);
    }

    #[test]
    fn test_new_uses_stick_mode() {
        let system = SystemConfig {
            stick_mode: StickMode::Aert,
            ..Default::default()
        };
        let model = Model::new(&system);
        assert_eq!(model.roles.sources.ail, StickAxis::X1);
        assert_eq!(model.roles.sources.thr, StickAxis::Y2);
    }

    #[test]
    fn test_fill_to_capacity_pads_short_lists() {
        let mut model = Model::default();
        model.counters.truncate(2);
        model.counters[0].modulus = 7;
        model.fill_to_capacity();
        assert_eq!(model.counters.len(), NUM_COUNTERS);
        assert_eq!(model.counters[0].modulus, 7);
        assert_eq!(model.counters[4].modulus, 1000);
    }

    #[test]
    fn test_json_round_trip_with_missing_fields() {
        let json = r#"{"model_type":"Multicopter"}"#;
        let model: Model = serde_json::from_str(json).unwrap();
        assert_eq!(model.model_type, ModelType::Multicopter);
        assert_eq!(model.mixer.len(), NUM_MIX_SLOTS);

        let text = serde_json::to_string(&model).unwrap();
        let back: Model = serde_json::from_str(&text).unwrap();
        assert_eq!(back, model);
    }
}
