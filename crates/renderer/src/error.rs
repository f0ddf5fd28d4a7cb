//! Error types for rendering.

use projection::ProjectionError;
use thiserror::Error;

/// Result type alias for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cannot allocate a {width}x{height} pixmap")]
    PixmapAllocation { width: u32, height: u32 },

    #[error("Invalid color ramp: {0}")]
    InvalidRamp(String),

    #[error("Axis length mismatch: grid is {rows}x{cols}, axes are {lat_len} lat by {lon_len} lon")]
    AxisMismatch {
        rows: usize,
        cols: usize,
        lat_len: usize,
        lon_len: usize,
    },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}
