//! Errors surfaced by a viewer session.

use met_common::VizError;
use projection::ProjectionError;
use renderer::RenderError;
use thiserror::Error;

pub type ViewerResult<T> = Result<T, ViewerError>;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error(transparent)]
    Viz(#[from] VizError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Session has been torn down")]
    TornDown,

    #[error("Load was superseded by a newer request")]
    StaleLoad,
}

impl ViewerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
