//! Viewer configuration: defaults, YAML file, environment.
//!
//! Later layers override earlier ones. The binary applies its command-line
//! flags last.

use std::path::Path;

use projection::Padding;
use renderer::{Color, RenderOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ViewerError, ViewerResult};

pub const ENV_DATA: &str = "METVIZ_DATA";
pub const ENV_BOUNDARY: &str = "METVIZ_BOUNDARY";
pub const ENV_CANVAS_WIDTH: &str = "METVIZ_CANVAS_WIDTH";
pub const ENV_DRAW_AXES: &str = "METVIZ_DRAW_AXES";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Dataset path or http(s) URL; `.gz` payloads are detected by magic.
    pub data_source: String,
    /// Boundary GeoJSON path or URL.
    pub boundary_source: Option<String>,
    /// Canvas width in pixels; height follows the data's aspect ratio.
    pub canvas_width: u32,
    pub padding: Padding,
    /// `#RRGGBB[AA]`; unset means transparent.
    pub background: Option<String>,
    pub draw_axes: bool,
    pub legend_width: u32,
    pub legend_height: u32,
    pub legend_ticks: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_source: "data/meteorological_data.json.gz".to_string(),
            boundary_source: None,
            canvas_width: 800,
            padding: Padding::new(20.0, 20.0, 40.0, 50.0),
            background: None,
            draw_axes: true,
            legend_width: 300,
            legend_height: 24,
            legend_ticks: renderer::legend::DEFAULT_TICKS,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl ViewerConfig {
    /// Defaults overridden by a YAML file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> ViewerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ViewerError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ViewerResult<Self> {
        serde_yaml::from_str(content).map_err(|e| ViewerError::config(format!("bad YAML: {}", e)))
    }

    /// Defaults overridden by `METVIZ_*` variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from `METVIZ_*` variables; unparseable values are ignored.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(data) = get(ENV_DATA) {
            self.data_source = data;
        }
        if let Some(boundary) = get(ENV_BOUNDARY) {
            self.boundary_source = (!boundary.is_empty()).then_some(boundary);
        }
        if let Some(width) = get(ENV_CANVAS_WIDTH).and_then(|v| v.parse().ok()) {
            self.canvas_width = width;
        }
        if let Some(axes) = get(ENV_DRAW_AXES).as_deref().and_then(parse_bool) {
            self.draw_axes = axes;
        }
        debug!(config = ?self, "Applied environment overrides");
    }

    pub fn validate(&self) -> ViewerResult<()> {
        if self.data_source.trim().is_empty() {
            return Err(ViewerError::config("data_source is empty"));
        }
        if self.canvas_width == 0 {
            return Err(ViewerError::config("canvas_width must be positive"));
        }
        let p = &self.padding;
        if [p.top, p.right, p.bottom, p.left].iter().any(|v| *v < 0.0 || !v.is_finite()) {
            return Err(ViewerError::config("padding must be finite and non-negative"));
        }
        if p.horizontal() >= self.canvas_width as f64 {
            return Err(ViewerError::config(format!(
                "padding {} consumes the whole {}px canvas",
                p.horizontal(),
                self.canvas_width
            )));
        }
        if self.legend_width < 2 || self.legend_height < 8 {
            return Err(ViewerError::config("legend must be at least 2x8 pixels"));
        }
        self.background_color()?;
        Ok(())
    }

    pub fn background_color(&self) -> ViewerResult<Option<Color>> {
        match &self.background {
            None => Ok(None),
            Some(hex) => Color::from_hex(hex)
                .map(Some)
                .ok_or_else(|| ViewerError::config(format!("invalid background colour '{}'", hex))),
        }
    }

    pub fn render_options(&self) -> ViewerResult<RenderOptions> {
        Ok(RenderOptions {
            background: self.background_color()?,
            draw_axes: self.draw_axes,
            ..RenderOptions::default()
        })
    }
}
