//! Error types for model construction and evaluation.

use osc_core::CoreError;
use thiserror::Error;

/// Errors raised while building or evaluating an oscillator model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid parameter {what}: {reason}")]
    InvalidParameter {
        what: &'static str,
        reason: &'static str,
    },

    #[error("Degenerate solution: {what}")]
    Degenerate { what: &'static str },

    #[error("Initial conditions not reproduced: {what} (expected {expected}, got {actual})")]
    InitialConditionMismatch {
        what: &'static str,
        expected: f64,
        actual: f64,
    },

    #[error("Trajectory has no samples")]
    EmptyTrajectory,

    #[error("Numeric error: {0}")]
    Core(#[from] CoreError),
}

pub type ModelResult<T> = Result<T, ModelError>;
