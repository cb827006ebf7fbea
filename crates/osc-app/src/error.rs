//! Error types for the osc-app service layer.

use std::path::PathBuf;

/// Application error type wrapping model errors, file I/O and parse
/// failures behind one interface for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for osc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<osc_model::ModelError> for AppError {
    fn from(err: osc_model::ModelError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
