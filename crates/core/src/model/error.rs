//! Configuration errors

use core::fmt;

/// Kind of configuration entity an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    MixerSlot,
    LogicalSwitch,
    Counter,
    Timer,
    FunctionGenerator,
    FlightMode,
    CustomCurve,
    ThrottleCurve,
    DualRate,
    Channel,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::MixerSlot => "mixer slot",
            Entity::LogicalSwitch => "logical switch",
            Entity::Counter => "counter",
            Entity::Timer => "timer",
            Entity::FunctionGenerator => "function generator",
            Entity::FlightMode => "flight mode",
            Entity::CustomCurve => "custom curve",
            Entity::ThrottleCurve => "throttle curve",
            Entity::DualRate => "dual rate",
            Entity::Channel => "channel",
        };
        f.write_str(name)
    }
}

/// Model configuration error
///
/// Reported by the model-load sanity check and by configuration-time
/// editing operations. Never raised during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelError {
    /// Index passed to an editing operation is beyond the list
    IndexOutOfRange { entity: Entity, index: usize },
    /// Mixer output is not a channel or virtual channel
    InvalidOutput { index: usize },
    /// Source operand beyond its capacity
    SourceOutOfRange { entity: Entity, index: usize },
    /// Switch reference beyond its capacity
    SwitchOutOfRange { entity: Entity, index: usize },
    /// Custom curve index beyond the curve count
    CurveOutOfRange { entity: Entity, index: usize },
    /// Curve point count outside 2..=10 or x not ascending
    InvalidCurve { entity: Entity, index: usize },
    /// Flight-mode mask uses bits beyond the configured modes
    InvalidFlightModeMask { index: usize },
    /// Counter modulus outside 1..=10000
    InvalidModulus { index: usize },
    /// Function generator with a zero period
    ZeroPeriod { index: usize },
    /// Channel endpoints out of order or out of range
    InvalidEndpoints { index: usize },
    /// Template slots do not fit in the free mixer slots
    TemplateDoesNotFit,
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::IndexOutOfRange { entity, index } => {
                write!(f, "{} index {} out of range", entity, index)
            }
            ModelError::InvalidOutput { index } => {
                write!(f, "mixer slot {} output is not a channel", index)
            }
            ModelError::SourceOutOfRange { entity, index } => {
                write!(f, "{} {} references a source out of range", entity, index)
            }
            ModelError::SwitchOutOfRange { entity, index } => {
                write!(f, "{} {} references a switch out of range", entity, index)
            }
            ModelError::CurveOutOfRange { entity, index } => {
                write!(f, "{} {} references a curve out of range", entity, index)
            }
            ModelError::InvalidCurve { entity, index } => {
                write!(f, "{} {} has invalid points", entity, index)
            }
            ModelError::InvalidFlightModeMask { index } => {
                write!(f, "mixer slot {} has an invalid flight mode mask", index)
            }
            ModelError::InvalidModulus { index } => {
                write!(f, "counter {} modulus out of range", index)
            }
            ModelError::ZeroPeriod { index } => {
                write!(f, "function generator {} has a zero period", index)
            }
            ModelError::InvalidEndpoints { index } => {
                write!(f, "channel {} endpoints invalid", index)
            }
            ModelError::TemplateDoesNotFit => f.write_str("template does not fit in mixer slots"),
        }
    }
}
