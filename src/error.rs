//! Error types for the simulation core.
//!
//! Only construction and configuration can fail. Running the simulation
//! never returns an error: pool exhaustion is reported through `Option`
//! returns and degenerate geometry is skipped in place.

use thiserror::Error;

/// Errors raised when building bodies or loading tuning.
#[derive(Debug, Error)]
pub enum SimError {
    /// A body was constructed with a value outside its valid range
    #[error("invalid body: {field} = {value}")]
    InvalidBody {
        /// Name of the offending field
        field: &'static str,
        /// Rejected value
        value: f32,
    },

    /// Tuning failed validation
    #[error("invalid tuning: {field}: {reason}")]
    InvalidTuning {
        /// Dotted path of the offending field
        field: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Tuning JSON could not be parsed
    #[error("failed to parse tuning: {0}")]
    TuningParse(#[from] serde_json::Error),

    /// Tuning file could not be read
    #[error("failed to read tuning: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub(crate) fn tuning(field: impl Into<String>, reason: &'static str) -> Self {
        SimError::InvalidTuning {
            field: field.into(),
            reason,
        }
    }
}
