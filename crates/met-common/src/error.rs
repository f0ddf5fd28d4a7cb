//! Error types for the met-viz crates.

use thiserror::Error;

use crate::variable::{Source, Variable};

/// Result type alias using VizError.
pub type VizResult<T> = Result<T, VizError>;

/// Primary error type for dataset loading, selection and derived views.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VizError {
    // === Load-time errors (fatal) ===
    #[error("Dataset validation failed: {0}")]
    DatasetValidation(String),

    #[error("Failed to load data: {0}")]
    Load(String),

    #[error("Failed to decompress payload: {0}")]
    Decompress(String),

    #[error("Invalid boundary geometry: {0}")]
    Boundary(String),

    // === Lookup errors (recovered locally) ===
    #[error("No {kind} grid for {variable} on day {day}")]
    MissingGrid {
        kind: Source,
        variable: Variable,
        day: usize,
    },

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Unknown data type: {0}")]
    UnknownDataType(String),

    // === Selection errors ===
    #[error("Day {day} is outside the dataset (0..{days})")]
    DayOutOfRange { day: usize, days: usize },

    #[error("Grid index ({row}, {col}) is outside the {rows}x{cols} grid")]
    PointOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Dataset is not loaded")]
    NotLoaded,

    // === Infrastructure errors ===
    #[error("JSON error: {0}")]
    Json(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl VizError {
    /// Shorthand for a dataset validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::DatasetValidation(msg.into())
    }

    /// Whether this error should block rendering for the whole session.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            VizError::DatasetValidation(_)
                | VizError::Load(_)
                | VizError::Decompress(_)
                | VizError::Json(_)
                | VizError::Io(_)
        )
    }
}

impl From<std::io::Error> for VizError {
    fn from(err: std::io::Error) -> Self {
        VizError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VizError {
    fn from(err: serde_json::Error) -> Self {
        VizError::Json(err.to_string())
    }
}
