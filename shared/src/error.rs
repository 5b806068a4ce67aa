//! Error types for the weather alerting core

use thiserror::Error;

use crate::models::ThresholdKind;

/// Key-value persistence errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Threshold store errors
#[derive(Error, Debug)]
pub enum ThresholdError {
    #[error("Invalid {kind} threshold {value}: must be a finite number between {min} and {max}")]
    InvalidThreshold {
        kind: ThresholdKind,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Failed to persist threshold: {0}")]
    Storage(#[from] StoreError),
}

impl ThresholdError {
    pub(crate) fn invalid(kind: ThresholdKind, value: f64) -> Self {
        let (min, max) = kind.domain();
        ThresholdError::InvalidThreshold { kind, value, min, max }
    }
}
