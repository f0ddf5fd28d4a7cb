//! Block downsampling of gridded datasets.
//!
//! A factor `f` groups `f x f` cells into one output cell. Trailing rows and
//! columns that do not fill a whole block are dropped, so an `M x N` grid
//! becomes `(M / f) x (N / f)`. Coordinate axes are averaged over the same
//! blocks so each output cell sits at the centre of its inputs.

use met_common::{Dataset, DatasetMetadata, Grid, SourceGrids, Source};
use serde::{Deserialize, Serialize};

use crate::error::{ProcessError, ProcessResult};

/// How the cells of one block are reduced.
///
/// Missing cells never contribute; an all-missing block stays missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DownsampleMethod {
    /// Average of the valid cells
    #[default]
    Mean,
    /// Maximum of the valid cells, keeps peaks such as gusts
    Max,
    /// Top-left cell of the block
    Nearest,
}

impl std::str::FromStr for DownsampleMethod {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "max" => Ok(Self::Max),
            "nearest" => Ok(Self::Nearest),
            other => Err(ProcessError::config(format!(
                "unknown downsample method '{}' (expected mean, max or nearest)",
                other
            ))),
        }
    }
}

fn reduce_block<I>(values: I, method: DownsampleMethod) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut iter = values.into_iter();
    match method {
        DownsampleMethod::Nearest => iter.next().flatten(),
        DownsampleMethod::Mean => {
            let (sum, count) = iter
                .flatten()
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
            (count > 0).then(|| sum / count as f64)
        }
        DownsampleMethod::Max => iter.flatten().reduce(f64::max),
    }
}

/// Average consecutive blocks of `factor` coordinates, dropping the tail.
pub fn coarsen_axis(coords: &[f64], factor: usize) -> Vec<f64> {
    if factor == 0 {
        return Vec::new();
    }
    coords
        .chunks_exact(factor)
        .map(|block| block.iter().sum::<f64>() / factor as f64)
        .collect()
}

/// Downsample one grid. Callers check the factor first.
pub fn coarsen_grid(grid: &Grid, factor: usize, method: DownsampleMethod) -> Grid {
    let rows = grid.rows() / factor.max(1);
    let cols = grid.cols() / factor.max(1);
    let mut out = Grid::empty(rows, cols);

    for out_row in 0..rows {
        for out_col in 0..cols {
            let block = (0..factor).flat_map(|di| {
                (0..factor).map(move |dj| (out_row * factor + di, out_col * factor + dj))
            });
            let value = reduce_block(block.map(|(r, c)| grid.get(r, c)), method);
            out.set(out_row, out_col, value);
        }
    }
    out
}

fn check_factor(factor: usize, rows: usize, cols: usize) -> ProcessResult<()> {
    if factor == 0 {
        return Err(ProcessError::InvalidFactor(factor));
    }
    if rows / factor == 0 || cols / factor == 0 {
        return Err(ProcessError::TooCoarse { factor, rows, cols });
    }
    Ok(())
}

fn coarsen_source(
    dataset: &Dataset,
    source: Source,
    factor: usize,
    method: DownsampleMethod,
) -> SourceGrids {
    let grids = dataset.source(source);
    let mut out = SourceGrids::new();
    for variable in grids.variables() {
        let days = grids
            .days(variable)
            .unwrap_or_default()
            .iter()
            .map(|day| day.as_ref().map(|g| coarsen_grid(g, factor, method)))
            .collect();
        out.insert(variable, days);
    }
    out
}

/// Downsample every grid of both sources and the coordinate axes.
pub fn coarsen_dataset(
    dataset: &Dataset,
    factor: usize,
    method: DownsampleMethod,
) -> ProcessResult<Dataset> {
    check_factor(factor, dataset.rows(), dataset.cols())?;
    if factor == 1 {
        return Ok(dataset.clone());
    }

    let meta = dataset.metadata();
    let metadata = DatasetMetadata {
        lat: coarsen_axis(&meta.lat, factor),
        lon: coarsen_axis(&meta.lon, factor),
        times: meta.times.clone(),
        bounds: meta.bounds.clone(),
    };
    let obs = coarsen_source(dataset, Source::Obs, factor, method);
    let forecast = coarsen_source(dataset, Source::Forecast, factor, method);

    tracing::info!(
        factor,
        from_rows = dataset.rows(),
        from_cols = dataset.cols(),
        to_rows = metadata.lat.len(),
        to_cols = metadata.lon.len(),
        "Coarsened dataset"
    );
    Ok(Dataset::new(metadata, obs, forecast)?)
}
