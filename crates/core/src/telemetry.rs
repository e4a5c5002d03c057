//! Telemetry scaling
//!
//! A telemetry source reads `raw * multiplier / 100 + offset`.

use serde::{Deserialize, Serialize};

/// Linear scaling applied to a raw telemetry reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Percent multiplier
    pub multiplier: i16,
    pub offset: i16,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            multiplier: 100,
            offset: 0,
        }
    }
}

impl TelemetryConfig {
    /// Scales a raw reading into telemetry units.
    pub fn scale(&self, raw: i16) -> i32 {
        raw as i32 * self.multiplier as i32 / 100 + self.offset as i32
    }
}
