//! Legend content and the gradient bar raster.

use met_common::{DataType, ValueRange, Variable};
use serde::Serialize;
use tiny_skia::{Paint, Pixmap, Rect, Transform};

use crate::colormap::{Color, ColorScale};
use crate::error::{RenderError, RenderResult};

/// Default number of labelled ticks.
pub const DEFAULT_TICKS: usize = 5;

/// Number of gradient samples exported with a legend.
const GRADIENT_SAMPLES: usize = 32;

/// `count` evenly spaced values from `range.min` to `range.max` inclusive.
pub fn legend_ticks(range: &ValueRange, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![range.min],
        _ => (0..count)
            .map(|i| range.lerp(i as f64 / (count - 1) as f64))
            .collect(),
    }
}

/// Display text for a value: whole numbers for geopotential heights, one
/// decimal otherwise, `N/A` when missing.
pub fn format_value(value: Option<f64>, variable: Variable) -> String {
    match value {
        Some(v) if v.is_finite() => {
            if variable.is_geopotential() {
                // Halves round away from zero.
                format!("{}", v.round() as i64)
            } else {
                let rounded = (v * 10.0).round() / 10.0;
                // Avoid printing "-0.0".
                let rounded = if rounded == 0.0 { 0.0 } else { rounded };
                format!("{:.1}", rounded)
            }
        }
        _ => "N/A".to_string(),
    }
}

/// A labelled tick on the legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendTick {
    pub value: f64,
    pub label: String,
    /// Fraction along the bar, 0 at `range.min`.
    pub offset: f64,
}

/// One colour sample along the legend bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientSample {
    pub offset: f64,
    pub value: f64,
    pub color: Color,
}

/// Everything needed to draw the legend for the current selection.
#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub title: String,
    pub variable: Variable,
    pub data_type: DataType,
    pub range: ValueRange,
    pub ticks: Vec<LegendTick>,
    pub gradient: Vec<GradientSample>,
    #[serde(skip)]
    scale: ColorScale,
}

impl Legend {
    pub fn new(variable: Variable, data_type: DataType, range: ValueRange, tick_count: usize) -> Self {
        let scale = ColorScale::new(variable, data_type, &range);
        let info = variable.info();
        let title = match data_type {
            DataType::Difference => format!("{} difference, obs - forecast ({})", info.name, info.unit),
            _ => format!("{} ({})", info.name, info.unit),
        };

        let ticks = legend_ticks(&range, tick_count)
            .into_iter()
            .map(|value| LegendTick {
                value,
                label: format_value(Some(value), variable),
                offset: range.normalize(value),
            })
            .collect();

        let gradient = (0..GRADIENT_SAMPLES)
            .map(|i| {
                let offset = i as f64 / (GRADIENT_SAMPLES - 1) as f64;
                let value = range.lerp(offset);
                GradientSample {
                    offset,
                    value,
                    color: scale.color(Some(value)),
                }
            })
            .collect();

        Self {
            title,
            variable,
            data_type,
            range,
            ticks,
            gradient,
            scale,
        }
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    /// Horizontal gradient bar. The top `height - 6` rows hold the colours,
    /// one column per pixel; tick marks hang below at each tick offset.
    pub fn render_bar(&self, width: u32, height: u32) -> RenderResult<Pixmap> {
        const TICK_LEN: u32 = 6;
        if width < 2 || height <= TICK_LEN {
            return Err(RenderError::PixmapAllocation { width, height });
        }
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation { width, height })?;
        let bar_height = (height - TICK_LEN) as f32;

        let mut paint = Paint::default();
        paint.anti_alias = false;
        for x in 0..width {
            let t = x as f64 / (width - 1) as f64;
            let c = self.scale.color(Some(self.range.lerp(t)));
            paint.set_color_rgba8(c.r, c.g, c.b, c.a);
            if let Some(rect) = Rect::from_xywh(x as f32, 0.0, 1.0, bar_height) {
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            }
        }

        paint.set_color_rgba8(0, 0, 0, 255);
        for tick in &self.ticks {
            let x = (tick.offset * (width - 1) as f64).round() as f32;
            if let Some(rect) = Rect::from_xywh(x.min((width - 1) as f32), bar_height, 1.0, TICK_LEN as f32) {
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            }
        }
        Ok(pixmap)
    }
}
