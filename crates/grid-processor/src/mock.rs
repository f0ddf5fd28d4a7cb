//! Deterministic synthetic obs/forecast datasets.
//!
//! Every variable gets a south-to-north gradient inside its static bounds,
//! Gaussian noise, separable Gaussian smoothing and clipping to the bounds.
//! The forecast is the observation plus an independently smoothed error
//! field. Cells outside an optional boundary are masked in both sources.

use met_common::time::consecutive_days;
use met_common::{Boundary, Dataset, DatasetMetadata, Grid, SourceGrids, Variable};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::config::MockConfig;
use crate::error::{ProcessError, ProcessResult};
use crate::mask::{apply_mask, land_mask};

/// Mirror an out-of-range index back into `0..len` (`d c b a | a b c d`).
fn reflect(index: isize, len: usize) -> usize {
    let len = len as isize;
    let period = 2 * len;
    let mut i = index.rem_euclid(period);
    if i >= len {
        i = period - 1 - i;
    }
    i as usize
}

fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (4.0 * sigma + 0.5) as usize;
    let weights: Vec<f64> = (-(radius as isize)..=radius as isize)
        .map(|k| (-(k * k) as f64 / (2.0 * sigma * sigma)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// Separable Gaussian blur of a dense row-major field, reflecting at edges.
pub fn gaussian_smooth(field: &[f64], rows: usize, cols: usize, sigma: f64) -> Vec<f64> {
    if sigma <= 0.0 || rows == 0 || cols == 0 {
        return field.to_vec();
    }
    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;

    let mut horizontal = vec![0.0; field.len()];
    for r in 0..rows {
        for c in 0..cols {
            horizontal[r * cols + c] = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * field[r * cols + reflect(c as isize + k as isize - radius, cols)])
                .sum();
        }
    }

    let mut out = vec![0.0; field.len()];
    for r in 0..rows {
        for c in 0..cols {
            out[r * cols + c] = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * horizontal[reflect(r as isize + k as isize - radius, rows) * cols + c])
                .sum();
        }
    }
    out
}

fn field_seed(base: u64, variable: Variable, day: usize, stream: u64) -> u64 {
    base ^ ((variable.index() as u64) << 40) ^ ((day as u64) << 8) ^ stream
}

/// `len` seeded samples from N(0, sigma).
fn noise_field(seed: u64, len: usize, sigma: f64) -> ProcessResult<Vec<f64>> {
    let normal = Normal::new(0.0, sigma)
        .map_err(|e| ProcessError::config(format!("noise sigma {}: {}", sigma, e)))?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..len).map(|_| normal.sample(&mut rng)).collect())
}

/// Generate one obs grid and its forecast for a variable and day.
fn generate_pair(
    config: &MockConfig,
    variable: Variable,
    day: usize,
    lat: &[f64],
    lon_len: usize,
) -> ProcessResult<(Vec<f64>, Vec<f64>)> {
    let rows = lat.len();
    let cols = lon_len;
    let bounds = variable.default_bounds();
    let span = bounds.max - bounds.min;

    // 1/6 to 2/3 of the span from south to north, drifting slowly by day.
    let drift = 0.05 * span * (day as f64 * 0.9).sin();
    let mut base = Vec::with_capacity(rows * cols);
    for &la in lat {
        let t = (la - config.lat_min) / (config.lat_max - config.lat_min);
        let value = bounds.min + span * (1.0 / 6.0 + t / 2.0) + drift;
        base.extend(std::iter::repeat(value).take(cols));
    }

    let noise = noise_field(
        field_seed(config.seed, variable, day, 1),
        rows * cols,
        span * config.noise_fraction,
    )?;
    let raw: Vec<f64> = base.iter().zip(&noise).map(|(b, n)| b + n).collect();
    let obs: Vec<f64> = gaussian_smooth(&raw, rows, cols, config.smoothing_sigma)
        .into_iter()
        .map(|v| v.clamp(bounds.min, bounds.max))
        .collect();

    let error = noise_field(
        field_seed(config.seed, variable, day, 2),
        rows * cols,
        span * config.forecast_error_fraction,
    )?;
    let error = gaussian_smooth(&error, rows, cols, config.smoothing_sigma);
    let forecast = obs
        .iter()
        .zip(&error)
        .map(|(o, e)| (o + e).clamp(bounds.min, bounds.max))
        .collect();

    Ok((obs, forecast))
}

/// Build a full dataset from the configuration.
pub fn generate_mock(config: &MockConfig, boundary: Option<&Boundary>) -> ProcessResult<Dataset> {
    config.validate()?;

    let lat = config.latitudes();
    let lon = config.longitudes();
    let (rows, cols) = (lat.len(), lon.len());
    let mask = boundary.map(|b| land_mask(&lat, &lon, b));

    tracing::info!(
        rows,
        cols,
        days = config.days,
        variables = config.variables.len(),
        seed = config.seed,
        masked = mask.is_some(),
        "Generating mock dataset"
    );

    let mut obs = SourceGrids::new();
    let mut forecast = SourceGrids::new();
    for &variable in &config.variables {
        let mut obs_days = Vec::with_capacity(config.days);
        let mut fc_days = Vec::with_capacity(config.days);
        for day in 0..config.days {
            let (o, f) = generate_pair(config, variable, day, &lat, cols)?;
            let mut o = Grid::from_f64(rows, cols, &o)?;
            let mut f = Grid::from_f64(rows, cols, &f)?;
            if let Some(mask) = &mask {
                apply_mask(&mut o, mask);
                apply_mask(&mut f, mask);
            }
            obs_days.push(Some(o));
            fc_days.push(Some(f));
        }
        tracing::debug!(variable = %variable, "Generated variable");
        obs.insert(variable, obs_days);
        forecast.insert(variable, fc_days);
    }

    let metadata = DatasetMetadata::new(lat, lon, consecutive_days(config.start, config.days));
    Ok(Dataset::new(metadata, obs, forecast)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect() {
        assert_eq!(reflect(-1, 4), 0);
        assert_eq!(reflect(-2, 4), 1);
        assert_eq!(reflect(4, 4), 3);
        assert_eq!(reflect(5, 4), 2);
        assert_eq!(reflect(2, 4), 2);
    }

    #[test]
    fn test_kernel_normalised() {
        let k = gaussian_kernel(3.0);
        assert_eq!(k.len(), 2 * 12 + 1);
        assert!((k.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_smoothing_preserves_constant_field() {
        let field = vec![7.0; 6 * 5];
        let out = gaussian_smooth(&field, 6, 5, 2.0);
        assert!(out.iter().all(|v| (v - 7.0).abs() < 1e-9));
    }

    #[test]
    fn test_noise_field_moments() {
        let samples = noise_field(7, 20_000, 2.0).unwrap();
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 0.1, "mean {}", mean);
        assert!((var - 4.0).abs() < 0.2, "variance {}", var);
        assert_eq!(noise_field(7, 100, 2.0).unwrap(), samples[..100].to_vec());
    }

    #[test]
    fn test_noise_field_rejects_bad_sigma() {
        assert!(noise_field(7, 10, f64::NAN).is_err());
    }
}
