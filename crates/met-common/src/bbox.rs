//! Geographic extent of a lat/lon grid.

use serde::{Deserialize, Serialize};

/// Min/max extent of a grid in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Min/max reduction over each coordinate axis.
    ///
    /// Returns `None` if either axis is empty or contains no finite value.
    pub fn from_coords(lats: &[f64], lons: &[f64]) -> Option<Self> {
        let (min_lat, max_lat) = min_max(lats)?;
        let (min_lon, max_lon) = min_max(lons)?;
        Some(Self::new(min_lat, max_lat, min_lon, max_lon))
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Height-over-width ratio, `None` for a degenerate extent.
    pub fn aspect_ratio(&self) -> Option<f64> {
        let w = self.width();
        if w > 0.0 && self.height() >= 0.0 {
            Some(self.height() / w)
        } else {
            None
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
