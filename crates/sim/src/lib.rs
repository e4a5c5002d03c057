//! txmix_sim - Host replay harness for the txmix engine
//!
//! Loads models from JSON, replays scripted input scenarios through the
//! engine and records the published outputs tick by tick.

pub mod error;
pub mod inputs;
pub mod model_file;
pub mod replay;
pub mod scenario;

pub use error::SimError;
pub use inputs::{Command, InputFrame, InputProvider, NoiseConfig, ScriptedInputs};
pub use model_file::ModelFile;
pub use replay::{Frame, ReplayConfig, ReplayHarness, TimeMode};
pub use scenario::{InputChange, Scenario, ScenarioEvent};
