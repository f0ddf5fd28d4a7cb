//! Configuration for synthetic dataset generation.

use chrono::NaiveDate;
use met_common::Variable;
use serde::{Deserialize, Serialize};

use crate::error::{ProcessError, ProcessResult};

/// Settings for [`crate::mock::generate_mock`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// Southern edge, degrees north.
    pub lat_min: f64,
    /// Northern edge (exclusive).
    pub lat_max: f64,
    /// Western edge, degrees east.
    pub lon_min: f64,
    /// Eastern edge (exclusive).
    pub lon_max: f64,

    /// Grid spacing in degrees. 0.09 is roughly 10 km.
    pub resolution: f64,

    /// Date of the first day.
    pub start: NaiveDate,

    /// Number of consecutive days.
    pub days: usize,

    /// Seed for the noise generator; equal seeds give equal datasets.
    pub seed: u64,

    /// Noise standard deviation as a fraction of each variable's span.
    pub noise_fraction: f64,

    /// Gaussian smoothing radius in grid cells.
    pub smoothing_sigma: f64,

    /// Forecast error standard deviation as a fraction of the span.
    pub forecast_error_fraction: f64,

    /// Variables to generate.
    pub variables: Vec<Variable>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            lat_min: -44.0,
            lat_max: -10.0,
            lon_min: 113.0,
            lon_max: 154.0,
            resolution: 0.36,
            start: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default(),
            days: 7,
            seed: 42,
            // 2.5 °C on the 30 °C tmax span
            noise_fraction: 2.5 / 30.0,
            smoothing_sigma: 3.0,
            forecast_error_fraction: 0.05,
            variables: Variable::ALL.to_vec(),
        }
    }
}

impl MockConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> ProcessResult<()> {
        if !(self.lat_max > self.lat_min) || !(self.lon_max > self.lon_min) {
            return Err(ProcessError::config("extent must have max > min on both axes"));
        }
        if !(self.resolution > 0.0) || !self.resolution.is_finite() {
            return Err(ProcessError::config("resolution must be a positive number"));
        }
        if self.axis_len(self.lat_min, self.lat_max) < 2 || self.axis_len(self.lon_min, self.lon_max) < 2 {
            return Err(ProcessError::config(
                "resolution too coarse, need at least 2 points per axis",
            ));
        }
        if self.days == 0 {
            return Err(ProcessError::config("days must be at least 1"));
        }
        if self.variables.is_empty() {
            return Err(ProcessError::config("no variables selected"));
        }
        if self.noise_fraction < 0.0 || self.forecast_error_fraction < 0.0 || self.smoothing_sigma < 0.0 {
            return Err(ProcessError::config("noise and smoothing settings must be non-negative"));
        }
        Ok(())
    }

    fn axis_len(&self, min: f64, max: f64) -> usize {
        ((max - min) / self.resolution).ceil() as usize
    }

    /// Half-open `[min, max)` axis stepped by the resolution.
    pub fn axis(&self, min: f64, max: f64) -> Vec<f64> {
        (0..self.axis_len(min, max))
            .map(|i| min + i as f64 * self.resolution)
            .filter(|v| *v < max)
            .collect()
    }

    pub fn latitudes(&self) -> Vec<f64> {
        self.axis(self.lat_min, self.lat_max)
    }

    pub fn longitudes(&self) -> Vec<f64> {
        self.axis(self.lon_min, self.lon_max)
    }
}
