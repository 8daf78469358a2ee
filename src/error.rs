//! Error types for the floating canvas.
//!
//! None of these ever reach the user: a failed load falls back to grid
//! placement and a failed save is logged while in-memory state carries on.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::storage::StorageError;

/// Stable machine-readable code for an error, for host-side logging.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to serialize positions: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to parse JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}

impl ErrorCode for CanvasError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(_) => "E_STORAGE",
            Self::Serialize(_) => "E_SERIALIZE",
            Self::Parse(_) => "E_PARSE",
            Self::Config(_) => "E_CONFIG",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a number: {value:?}")]
    InvalidNumber { var: String, value: String },
    #[error("zoom range is empty: min {min} > max {max}")]
    ZoomRange { min: f64, max: f64 },
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("positions storage key must not be empty")]
    EmptyKey,
}
