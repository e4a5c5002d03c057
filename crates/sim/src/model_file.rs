//! JSON model files
//!
//! A model file bundles the transmitter-wide [`SystemConfig`] with one
//! [`Model`]. Missing fields take their factory defaults, so a file only
//! needs to spell out what differs from a fresh model.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use txmix_core::model::{Model, SystemConfig};

use crate::error::SimError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelFile {
    pub system: SystemConfig,
    pub model: Model,
}

impl ModelFile {
    /// Parses a model file, padding short lists to capacity.
    pub fn from_json(text: &str) -> Result<Self, SimError> {
        let mut file: ModelFile = serde_json::from_str(text)?;
        file.model.fill_to_capacity();
        Ok(file)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
