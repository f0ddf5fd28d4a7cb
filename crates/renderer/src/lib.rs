//! Raster rendering for gridded station data.
//!
//! - [`colormap`]: per-variable ramps and the diverging difference scale
//! - [`grid`]: cell fill, boundary outline and axes onto a tiny-skia pixmap
//! - [`legend`]: tick values, labels and the legend bar
//! - [`png`]: PNG encoding of finished frames

pub mod colormap;
pub mod error;
pub mod grid;
pub mod legend;
pub mod png;

pub use colormap::{color_for, Color, ColorRamp, ColorScale, ColorStop, MISSING_COLOR};
pub use error::{RenderError, RenderResult};
pub use grid::{GridLayer, GridRenderer, RenderOptions, RenderStats, RenderedFrame};
pub use legend::{format_value, legend_ticks, Legend, LegendTick};
