use txmix_core::model::ModelError;

/// Errors that can occur while loading or replaying a scenario.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Model rejected: {0}")]
    Model(String),

    #[error("Invalid scenario: {0}")]
    Scenario(String),
}

impl From<ModelError> for SimError {
    fn from(err: ModelError) -> Self {
        SimError::Model(err.to_string())
    }
}
