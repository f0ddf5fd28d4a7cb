//! `generate-mock` and `prepare`: offline dataset preparation.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use grid_processor::{
    coarsen_dataset, export_boundary, export_dataset, generate_mock, DownsampleMethod,
    ExportSummary, MockConfig,
};
use tracing::info;
use viewer::{DataLoader, DataSource};

fn log_summary(summary: &ExportSummary) {
    info!(
        json = %summary.json_path.display(),
        gz = %summary.gz_path.display(),
        json_bytes = summary.json_bytes,
        gz_bytes = summary.gz_bytes,
        reduction = %format!("{:.1}%", summary.reduction_percent()),
        "Dataset exported"
    );
}

pub async fn generate(
    out_dir: &Path,
    days: usize,
    resolution: f64,
    seed: u64,
    start: Option<NaiveDate>,
    boundary: Option<&str>,
) -> Result<()> {
    let defaults = MockConfig::default();
    let config = MockConfig {
        days,
        resolution,
        seed,
        start: start.unwrap_or(defaults.start),
        ..defaults
    };

    let boundary = match boundary {
        Some(source) => Some(
            DataLoader::new()
                .load_boundary(&DataSource::parse(source))
                .await
                .with_context(|| format!("Failed to load boundary from {}", source))?,
        ),
        None => None,
    };

    let dataset = generate_mock(&config, boundary.as_ref()).context("Mock generation failed")?;
    let summary = export_dataset(&dataset, out_dir)
        .with_context(|| format!("Failed to export to {}", out_dir.display()))?;
    log_summary(&summary);

    if let Some(boundary) = &boundary {
        let path = export_boundary(boundary, "boundary", out_dir)?;
        info!(path = %path.display(), "Boundary exported");
    }
    Ok(())
}

pub async fn coarsen(input: &str, factor: usize, method: DownsampleMethod, out_dir: &Path) -> Result<()> {
    let dataset = DataLoader::new()
        .load_dataset(&DataSource::parse(input))
        .await
        .with_context(|| format!("Failed to load dataset from {}", input))?;

    let coarse = coarsen_dataset(&dataset, factor, method)
        .with_context(|| format!("Cannot coarsen by a factor of {}", factor))?;
    info!(
        from = %format!("{}x{}", dataset.rows(), dataset.cols()),
        to = %format!("{}x{}", coarse.rows(), coarse.cols()),
        factor,
        ?method,
        "Dataset coarsened"
    );

    let summary = export_dataset(&coarse, out_dir)
        .with_context(|| format!("Failed to export to {}", out_dir.display()))?;
    log_summary(&summary);
    Ok(())
}
