//! Raster surface dimensions and plot-area padding.

use met_common::GeoBounds;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors building a viewport.
#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    #[error("viewport {width}x{height} leaves no plot area after padding")]
    EmptyPlotArea { width: u32, height: u32 },

    #[error("geographic extent has zero or negative width")]
    DegenerateBounds,
}

/// Space reserved around the plot area (axes, labels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Pixel size of the raster surface plus its padding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub padding: Padding,
}

impl Viewport {
    pub fn new(width: u32, height: u32, padding: Padding) -> Result<Self, ProjectionError> {
        let viewport = Self {
            width,
            height,
            padding,
        };
        if viewport.plot_width() <= 0.0 || viewport.plot_height() <= 0.0 {
            return Err(ProjectionError::EmptyPlotArea { width, height });
        }
        Ok(viewport)
    }

    /// Size a viewport of the given width so the plot area keeps the
    /// lat/lon aspect ratio of `bounds`.
    pub fn fit_to_bounds(
        width: u32,
        padding: Padding,
        bounds: &GeoBounds,
    ) -> Result<Self, ProjectionError> {
        let aspect = bounds
            .aspect_ratio()
            .ok_or(ProjectionError::DegenerateBounds)?;
        let plot_width = width as f64 - padding.horizontal();
        if plot_width <= 0.0 {
            return Err(ProjectionError::EmptyPlotArea { width, height: 0 });
        }
        let height = (plot_width * aspect + padding.vertical()).round().max(1.0) as u32;
        Self::new(width, height, padding)
    }

    /// Width of the plot area inside the padding.
    pub fn plot_width(&self) -> f64 {
        self.width as f64 - self.padding.horizontal()
    }

    /// Height of the plot area inside the padding.
    pub fn plot_height(&self) -> f64 {
        self.height as f64 - self.padding.vertical()
    }

    /// Whether a pixel lies inside the plot area (edges included).
    pub fn in_plot_area(&self, x: f64, y: f64) -> bool {
        x >= self.padding.left
            && x <= self.padding.left + self.plot_width()
            && y >= self.padding.top
            && y <= self.padding.top + self.plot_height()
    }
}
