//! Builders for small synthetic datasets.

use chrono::NaiveDate;
use met_common::time::consecutive_days;
use met_common::{Dataset, DatasetMetadata, Grid, SourceGrids, Variable};

/// Evenly spaced axis of `n` values.
pub fn axis(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Grid where `grid[row][col] = base + row * 10 + col`, easy to check by eye.
pub fn indexed_grid(rows: usize, cols: usize, base: f64) -> Grid {
    let data: Vec<f64> = (0..rows)
        .flat_map(|r| (0..cols).map(move |c| base + (r * 10 + c) as f64))
        .collect();
    Grid::from_f64(rows, cols, &data).expect("indexed grid")
}

/// Grid filled with one value.
pub fn constant_grid(rows: usize, cols: usize, value: f64) -> Grid {
    Grid::from_f64(rows, cols, &vec![value; rows * cols]).expect("constant grid")
}

/// First day of every generated dataset.
pub fn start_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date")
}

/// Step-by-step construction of a [`Dataset`] for tests.
///
/// ```ignore
/// let dataset = DatasetBuilder::new(3, 4, 2)
///     .constant(Variable::Tmax, 30.0, 28.0)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    lat: Vec<f64>,
    lon: Vec<f64>,
    days: usize,
    obs: SourceGrids,
    forecast: SourceGrids,
}

impl DatasetBuilder {
    /// Australia-like axes: lat from -40 in 5° steps, lon from 115 in 5° steps.
    pub fn new(rows: usize, cols: usize, days: usize) -> Self {
        Self {
            lat: axis(-40.0, 5.0, rows),
            lon: axis(115.0, 5.0, cols),
            days,
            obs: SourceGrids::new(),
            forecast: SourceGrids::new(),
        }
    }

    pub fn with_axes(mut self, lat: Vec<f64>, lon: Vec<f64>) -> Self {
        self.lat = lat;
        self.lon = lon;
        self
    }

    pub fn rows(&self) -> usize {
        self.lat.len()
    }

    pub fn cols(&self) -> usize {
        self.lon.len()
    }

    /// Explicit per-day grids for both sources.
    pub fn variable(
        mut self,
        variable: Variable,
        obs: Vec<Option<Grid>>,
        forecast: Vec<Option<Grid>>,
    ) -> Self {
        self.obs.insert(variable, obs);
        self.forecast.insert(variable, forecast);
        self
    }

    /// Same constant grid every day.
    pub fn constant(self, variable: Variable, obs: f64, forecast: f64) -> Self {
        let (rows, cols, days) = (self.rows(), self.cols(), self.days);
        self.variable(
            variable,
            vec![Some(constant_grid(rows, cols, obs)); days],
            vec![Some(constant_grid(rows, cols, forecast)); days],
        )
    }

    /// Indexed grids shifted by the day number; forecast is `obs - 1`.
    pub fn indexed(self, variable: Variable, base: f64) -> Self {
        let (rows, cols, days) = (self.rows(), self.cols(), self.days);
        let obs = (0..days)
            .map(|d| Some(indexed_grid(rows, cols, base + d as f64)))
            .collect();
        let forecast = (0..days)
            .map(|d| Some(indexed_grid(rows, cols, base + d as f64 - 1.0)))
            .collect();
        self.variable(variable, obs, forecast)
    }

    pub fn metadata(&self) -> DatasetMetadata {
        DatasetMetadata::new(
            self.lat.clone(),
            self.lon.clone(),
            consecutive_days(start_day(), self.days),
        )
    }

    /// Build, panicking on an invalid combination.
    pub fn build(self) -> Dataset {
        let metadata = self.metadata();
        Dataset::new(metadata, self.obs, self.forecast).expect("valid test dataset")
    }
}
