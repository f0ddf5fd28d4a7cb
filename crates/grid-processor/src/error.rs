//! Error types for dataset processing.

use met_common::VizError;
use thiserror::Error;

/// Errors that can occur while downsampling, generating or exporting data.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// Downsampling factor must be at least 1.
    #[error("invalid downsampling factor: {0}")]
    InvalidFactor(usize),

    /// The factor leaves no complete block along an axis.
    #[error("factor {factor} leaves no complete block in a {rows}x{cols} grid")]
    TooCoarse {
        factor: usize,
        rows: usize,
        cols: usize,
    },

    /// Generator settings are unusable.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The processed dataset failed validation.
    #[error(transparent)]
    Dataset(#[from] VizError),

    /// Storage/IO error.
    #[error("storage error: {0}")]
    StorageError(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ProcessError {
    /// Create a ConfigError.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<std::io::Error> for ProcessError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for ProcessError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for processing operations.
pub type ProcessResult<T> = std::result::Result<T, ProcessError>;
