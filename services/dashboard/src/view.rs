//! One-shot `render` and `inspect` commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use met_common::{DataType, Variable};
use tracing::info;
use viewer::{ControlEvent, Session};

pub enum Target {
    Pixel { x: f64, y: f64 },
    Cell { row: usize, col: usize },
}

pub fn render(
    session: &mut Session,
    data_type: DataType,
    variable: Variable,
    day: usize,
    out: &Path,
    legend: Option<&Path>,
) -> Result<()> {
    session.apply(ControlEvent::SetVariable(variable))?;
    session.apply(ControlEvent::SetDay(day))?;
    let frame = session.apply(ControlEvent::SetDataType(data_type))?;

    let png = frame.encode_png()?;
    fs::write(out, &png).with_context(|| format!("Failed to write {}", out.display()))?;
    info!(
        path = %out.display(),
        selection = %frame.selection,
        cells = frame.painted_cells(),
        bytes = png.len(),
        "Frame written"
    );

    if let Some(path) = legend {
        write_legend(session, path)?;
    }
    Ok(())
}

pub fn write_legend(session: &Session, path: &Path) -> Result<()> {
    let legend = session
        .legend()
        .context("No value range for the current selection, legend not drawn")?;
    let config = session.config();
    let bar = legend.render_bar(config.legend_width, config.legend_height)?;
    let png = renderer::png::encode_pixmap(&bar)?;
    fs::write(path, &png).with_context(|| format!("Failed to write {}", path.display()))?;

    let labels: Vec<&str> = legend.ticks.iter().map(|t| t.label.as_str()).collect();
    info!(path = %path.display(), title = %legend.title, ?labels, "Legend written");
    Ok(())
}

pub fn inspect(session: &mut Session, variable: Variable, target: Target) -> Result<()> {
    session.apply(ControlEvent::SetVariable(variable))?;
    let series = match target {
        Target::Pixel { x, y } => session
            .click(x, y)
            .with_context(|| format!("Pixel ({}, {}) is outside the plot area", x, y))?,
        Target::Cell { row, col } => session
            .store()
            .time_series_at(row, col)
            .with_context(|| format!("No grid cell at row {}, col {}", row, col))?,
    };
    println!("{}", serde_json::to_string_pretty(&series)?);
    Ok(())
}
