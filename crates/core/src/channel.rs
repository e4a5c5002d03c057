//! Channel output finalizer
//!
//! Turns each channel's mixer accumulator into the value handed to the
//! servo and radio collaborators:
//!
//! 1. Optional custom curve
//! 2. Subtrim
//! 3. Reverse
//! 4. Endpoint clamp (independent left and right)
//! 5. Override while the override switch is active
//!
//! Failsafe is only reported here; acting on it belongs to the receiver.

use serde::{Deserialize, Serialize};

use crate::curve::CustomCurve;
use crate::limits::{percent, FULL_SCALE, NUM_RC_CHANNELS};
use crate::source::SourceTable;
use crate::switch::SwitchRef;

/// Legacy storage code of [`Failsafe::Hold`]
pub const FAILSAFE_CODE_HOLD: i8 = -102;
/// Legacy storage code of [`Failsafe::NoPulse`]
pub const FAILSAFE_CODE_NO_PULSE: i8 = -101;

/// Receiver behavior on link loss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Failsafe {
    /// Keep the last received value
    #[default]
    Hold,
    /// Stop emitting pulses on the channel
    NoPulse,
    /// Move to a fixed value (percent)
    Value(i8),
}

impl From<Failsafe> for i8 {
    fn from(failsafe: Failsafe) -> i8 {
        match failsafe {
            Failsafe::Hold => FAILSAFE_CODE_HOLD,
            Failsafe::NoPulse => FAILSAFE_CODE_NO_PULSE,
            Failsafe::Value(p) => p,
        }
    }
}

impl TryFrom<i8> for Failsafe {
    type Error = &'static str;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            FAILSAFE_CODE_HOLD => Ok(Failsafe::Hold),
            FAILSAFE_CODE_NO_PULSE => Ok(Failsafe::NoPulse),
            -100..=100 => Ok(Failsafe::Value(code)),
            _ => Err("failsafe code out of range"),
        }
    }
}

/// Output of a channel on link loss, as seen by the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailsafeOutput {
    /// Last known good value
    Hold(i16),
    NoPulse,
    Value(i16),
}

/// Per-channel output configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub reverse: bool,
    /// Subtrim in percent
    pub subtrim: i8,
    pub override_switch: SwitchRef,
    /// Forced value in percent while the override switch is active
    pub override_value: i8,
    pub failsafe: Failsafe,
    /// Lower travel limit in percent (-100..=0)
    pub endpoint_left: i8,
    /// Upper travel limit in percent (0..=100)
    pub endpoint_right: i8,
    /// Custom curve index applied before subtrim
    pub curve: Option<u8>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            reverse: false,
            subtrim: 0,
            override_switch: SwitchRef::None,
            override_value: -100,
            failsafe: Failsafe::Hold,
            endpoint_left: -100,
            endpoint_right: 100,
            curve: None,
        }
    }
}

impl ChannelConfig {
    /// Returns true if `-100 <= left <= 0 <= right <= 100`.
    pub fn endpoints_valid(&self) -> bool {
        (-100..=0).contains(&self.endpoint_left) && (0..=100).contains(&self.endpoint_right)
    }

    /// Finalizes one channel value.
    pub fn finalize(&self, accumulator: i16, curves: &[CustomCurve], sources: &SourceTable) -> i16 {
        let mut value = accumulator;
        if let Some(curve) = self.curve.and_then(|i| curves.get(i as usize)) {
            value = curve.evaluate(value);
        }

        let mut value = value as i32 + percent(self.subtrim as i32);
        if self.reverse {
            value = -value;
        }

        let left = percent(self.endpoint_left as i32).max(-FULL_SCALE);
        let right = percent(self.endpoint_right as i32).min(FULL_SCALE);
        value = if left <= right {
            value.clamp(left, right)
        } else {
            value.clamp(-FULL_SCALE, FULL_SCALE)
        };

        if self.override_switch.is_triggered(sources) {
            value = percent(self.override_value as i32).clamp(-FULL_SCALE, FULL_SCALE);
        }
        value as i16
    }

    /// What the receiver should emit on link loss, given the last value.
    pub fn failsafe_output(&self, last: i16) -> FailsafeOutput {
        match self.failsafe {
            Failsafe::Hold => FailsafeOutput::Hold(last),
            Failsafe::NoPulse => FailsafeOutput::NoPulse,
            Failsafe::Value(p) => {
                FailsafeOutput::Value(percent(p as i32).clamp(-FULL_SCALE, FULL_SCALE) as i16)
            }
        }
    }
}

/// Finalizes every channel from the mixer accumulators.
pub fn finalize_channels(
    configs: &[ChannelConfig],
    curves: &[CustomCurve],
    sources: &SourceTable,
    outputs: &mut [i16; NUM_RC_CHANNELS],
) {
    for (i, out) in outputs.iter_mut().enumerate() {
        let accumulator = sources.channels()[i];
        *out = match configs.get(i) {
            Some(config) => config.finalize(accumulator, curves, sources),
            None => accumulator,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawInputs;
    use crate::switch::{SwitchCondition, SwitchPosition};

    fn table() -> SourceTable {
        SourceTable::new()
    }

    #[test]
    fn test_default_passes_through() {
        let config = ChannelConfig::default();
        assert_eq!(config.finalize(-321, &[], &table()), -321);
    }

    #[test]
    fn test_subtrim_then_reverse() {
        let config = ChannelConfig {
            subtrim: 10,
            reverse: true,
            ..Default::default()
        };
        assert_eq!(config.finalize(100, &[], &table()), -150);
    }

    #[test]
    fn test_endpoints_clamp_independently() {
        let config = ChannelConfig {
            endpoint_left: -50,
            endpoint_right: 80,
            ..Default::default()
        };
        assert_eq!(config.finalize(-500, &[], &table()), -250);
        assert_eq!(config.finalize(500, &[], &table()), 400);
        assert_eq!(config.finalize(100, &[], &table()), 100);
    }

    #[test]
    fn test_override_wins() {
        let config = ChannelConfig {
            override_switch: SwitchRef::Physical {
                index: 2,
                condition: SwitchCondition::Down,
            },
            override_value: -30,
            endpoint_left: -10,
            ..Default::default()
        };
        let inputs = RawInputs::default().with_switch(2, SwitchPosition::Down);
        let mut sources = SourceTable::new();
        sources.apply_inputs(&inputs, &[], &[]);
        assert_eq!(config.finalize(400, &[], &sources), -150);
        assert_eq!(config.finalize(-400, &[], &table()), -50);
    }

    #[test]
    fn test_channel_curve_before_subtrim() {
        let mut curve = CustomCurve::default();
        curve.y[..5].copy_from_slice(&[0, 0, 0, 0, 0]);
        let config = ChannelConfig {
            curve: Some(0),
            subtrim: 4,
            ..Default::default()
        };
        assert_eq!(config.finalize(300, &[curve], &table()), 20);
    }

    #[test]
    fn test_failsafe_codes() {
        assert_eq!(i8::from(Failsafe::Hold), -102);
        assert_eq!(i8::from(Failsafe::NoPulse), -101);
        assert_eq!(Failsafe::try_from(-101), Ok(Failsafe::NoPulse));
        assert_eq!(Failsafe::try_from(55), Ok(Failsafe::Value(55)));
        assert!(Failsafe::try_from(-120).is_err());
    }

    #[test]
    fn test_failsafe_output() {
        let mut config = ChannelConfig::default();
        assert_eq!(config.failsafe_output(123), FailsafeOutput::Hold(123));
        config.failsafe = Failsafe::Value(-20);
        assert_eq!(config.failsafe_output(123), FailsafeOutput::Value(-100));
        config.failsafe = Failsafe::NoPulse;
        assert_eq!(config.failsafe_output(123), FailsafeOutput::NoPulse);
    }

    #[test]
    fn test_endpoint_validity() {
        assert!(ChannelConfig::default().endpoints_valid());
        let bad = ChannelConfig {
            endpoint_left: 10,
            ..Default::default()
        };
        assert!(!bad.endpoints_valid());
    }
}
