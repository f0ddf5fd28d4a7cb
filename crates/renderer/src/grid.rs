//! Grid cell raster with boundary outline and optional axes.
//!
//! Each interior cell `(i, j)` of an `M x N` grid is painted as the
//! axis-aligned rectangle spanned by the projected corners
//! `(lat[i], lon[j])` and `(lat[i + 1], lon[j + 1])`, filled with the colour
//! of `grid[i][j]`. Missing cells are left unpainted. Fills are not
//! anti-aliased so that adjacent cells tile without seams and identical
//! inputs always produce identical pixels.

use met_common::{Boundary, GeoBounds, Grid};
use projection::{forward, Viewport};
use serde::{Deserialize, Serialize};
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::colormap::{Color, ColorScale};
use crate::error::{RenderError, RenderResult};

/// Number of tick marks drawn along each axis.
const AXIS_TICKS: usize = 5;
const AXIS_TICK_LEN: f32 = 4.0;

/// Drawing options independent of the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// `None` leaves the surface transparent.
    pub background: Option<Color>,
    pub boundary_color: Color,
    pub boundary_width: f32,
    pub draw_axes: bool,
    pub axis_color: Color,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            background: Some(Color::rgb(255, 255, 255)),
            boundary_color: Color::rgb(32, 32, 32),
            boundary_width: 1.0,
            draw_axes: false,
            axis_color: Color::rgb(96, 96, 96),
        }
    }
}

/// A grid together with its coordinate axes and colour scale.
#[derive(Debug, Clone, Copy)]
pub struct GridLayer<'a> {
    pub grid: &'a Grid,
    pub lat: &'a [f64],
    pub lon: &'a [f64],
    pub scale: &'a ColorScale,
}

impl<'a> GridLayer<'a> {
    pub fn new(grid: &'a Grid, lat: &'a [f64], lon: &'a [f64], scale: &'a ColorScale) -> Self {
        Self {
            grid,
            lat,
            lon,
            scale,
        }
    }

    fn check_axes(&self) -> RenderResult<()> {
        if self.grid.rows() != self.lat.len() || self.grid.cols() != self.lon.len() {
            return Err(RenderError::AxisMismatch {
                rows: self.grid.rows(),
                cols: self.grid.cols(),
                lat_len: self.lat.len(),
                lon_len: self.lon.len(),
            });
        }
        Ok(())
    }
}

/// What a render pass actually drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    pub painted_cells: usize,
    pub skipped_cells: usize,
    pub boundary_rings: usize,
}

/// Output of [`GridRenderer::render`].
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub pixmap: Pixmap,
    pub stats: RenderStats,
}

/// Paints frames for a fixed geographic extent and viewport.
#[derive(Debug, Clone)]
pub struct GridRenderer {
    bounds: GeoBounds,
    viewport: Viewport,
    options: RenderOptions,
}

impl GridRenderer {
    pub fn new(bounds: GeoBounds, viewport: Viewport, options: RenderOptions) -> Self {
        Self {
            bounds,
            viewport,
            options,
        }
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Draw one frame.
    ///
    /// Without a layer the frame is left blank (background only): the
    /// selected grid is unavailable and nothing meaningful can be drawn over
    /// it. A missing boundary just means a grid-only frame.
    pub fn render(
        &self,
        layer: Option<&GridLayer<'_>>,
        boundary: Option<&Boundary>,
    ) -> RenderResult<RenderedFrame> {
        let mut pixmap = self.blank_pixmap()?;
        let mut stats = RenderStats::default();

        let Some(layer) = layer else {
            tracing::debug!("No grid for this frame, leaving it blank");
            return Ok(RenderedFrame { pixmap, stats });
        };
        layer.check_axes()?;

        self.paint_cells(&mut pixmap, layer, &mut stats);
        if let Some(boundary) = boundary {
            stats.boundary_rings = self.stroke_boundary(&mut pixmap, boundary);
        }
        if self.options.draw_axes {
            self.draw_axes(&mut pixmap);
        }

        tracing::debug!(
            painted = stats.painted_cells,
            skipped = stats.skipped_cells,
            rings = stats.boundary_rings,
            "Rendered grid frame"
        );
        Ok(RenderedFrame { pixmap, stats })
    }

    fn blank_pixmap(&self) -> RenderResult<Pixmap> {
        let (width, height) = (self.viewport.width, self.viewport.height);
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation { width, height })?;
        match self.options.background {
            Some(c) => pixmap.fill(tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)),
            None => pixmap.fill(tiny_skia::Color::TRANSPARENT),
        }
        Ok(pixmap)
    }

    fn project(&self, lat: f64, lon: f64) -> (f32, f32) {
        let (x, y) = forward(lat, lon, &self.bounds, &self.viewport);
        (x as f32, y as f32)
    }

    fn paint_cells(&self, pixmap: &mut Pixmap, layer: &GridLayer<'_>, stats: &mut RenderStats) {
        let mut paint = Paint::default();
        paint.anti_alias = false;

        let rows = layer.grid.rows().saturating_sub(1);
        let cols = layer.grid.cols().saturating_sub(1);
        for i in 0..rows {
            for j in 0..cols {
                let Some(value) = layer.grid.get(i, j) else {
                    stats.skipped_cells += 1;
                    continue;
                };
                let (x0, y0) = self.project(layer.lat[i], layer.lon[j]);
                let (x1, y1) = self.project(layer.lat[i + 1], layer.lon[j + 1]);
                // Corners may be in either order depending on axis direction.
                let Some(rect) =
                    Rect::from_ltrb(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
                else {
                    stats.skipped_cells += 1;
                    continue;
                };

                let c = layer.scale.color(Some(value));
                paint.set_color_rgba8(c.r, c.g, c.b, c.a);
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
                stats.painted_cells += 1;
            }
        }
    }

    fn stroke_boundary(&self, pixmap: &mut Pixmap, boundary: &Boundary) -> usize {
        let c = self.options.boundary_color;
        let mut paint = Paint::default();
        paint.set_color_rgba8(c.r, c.g, c.b, c.a);
        paint.anti_alias = true;

        let mut stroke = Stroke::default();
        stroke.width = self.options.boundary_width;
        stroke.line_cap = LineCap::Round;
        stroke.line_join = LineJoin::Round;

        let mut drawn = 0;
        for ring in boundary.rings() {
            let mut points = ring.iter().map(|[lon, lat]| self.project(*lat, *lon));
            let Some((x, y)) = points.next() else {
                continue;
            };
            let mut pb = PathBuilder::new();
            pb.move_to(x, y);
            for (x, y) in points {
                pb.line_to(x, y);
            }
            pb.close();

            if let Some(path) = pb.finish() {
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
                drawn += 1;
            }
        }
        drawn
    }

    /// Frame around the plot area with evenly spaced ticks on the left and
    /// bottom edges.
    fn draw_axes(&self, pixmap: &mut Pixmap) {
        let c = self.options.axis_color;
        let mut paint = Paint::default();
        paint.set_color_rgba8(c.r, c.g, c.b, c.a);
        paint.anti_alias = true;

        let mut stroke = Stroke::default();
        stroke.width = 1.0;

        let pad = self.viewport.padding;
        let left = pad.left as f32;
        let top = pad.top as f32;
        let right = left + self.viewport.plot_width() as f32;
        let bottom = top + self.viewport.plot_height() as f32;

        let mut pb = PathBuilder::new();
        if let Some(frame) = Rect::from_ltrb(left, top, right, bottom) {
            pb.push_rect(frame);
        }
        for k in 0..AXIS_TICKS {
            let t = k as f32 / (AXIS_TICKS - 1) as f32;
            let x = left + (right - left) * t;
            let y = top + (bottom - top) * t;
            pb.move_to(x, bottom);
            pb.line_to(x, bottom + AXIS_TICK_LEN);
            pb.move_to(left - AXIS_TICK_LEN, y);
            pb.line_to(left, y);
        }
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }
}
