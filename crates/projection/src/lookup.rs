//! Nearest-index lookup and pointer hit-testing.

use met_common::GeoBounds;
use serde::{Deserialize, Serialize};

use crate::equirectangular::inverse;
use crate::viewport::Viewport;

/// Index of the coordinate closest to `target`.
///
/// Linear scan minimising absolute distance; ties resolve to the lowest
/// index. Returns `None` for an empty slice.
pub fn nearest_index(coords: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &c) in coords.iter().enumerate() {
        let dist = (c - target).abs();
        match best {
            Some((_, d)) if dist >= d => {}
            _ => best = Some((i, dist)),
        }
    }
    best.map(|(i, _)| i)
}

/// Min/max reduction over both coordinate axes.
pub fn bounds(lats: &[f64], lons: &[f64]) -> Option<GeoBounds> {
    GeoBounds::from_coords(lats, lons)
}

/// A pointer click resolved to a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridHit {
    /// Latitude under the pointer
    pub lat: f64,
    /// Longitude under the pointer
    pub lon: f64,
    /// Nearest row in the latitude axis
    pub row: usize,
    /// Nearest column in the longitude axis
    pub col: usize,
}

/// Convert a click at pixel `(x, y)` into the nearest grid indices.
///
/// Clicks in the padding outside the plot area return `None`.
pub fn hit_test(x: f64, y: f64, lats: &[f64], lons: &[f64], viewport: &Viewport) -> Option<GridHit> {
    if !viewport.in_plot_area(x, y) {
        return None;
    }
    let geo = bounds(lats, lons)?;
    let (lat, lon) = inverse(x, y, &geo, viewport);
    Some(GridHit {
        lat,
        lon,
        row: nearest_index(lats, lat)?,
        col: nearest_index(lons, lon)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equirectangular::forward;
    use crate::viewport::Padding;

    #[test]
    fn test_nearest_index_basic() {
        assert_eq!(nearest_index(&[0.0, 10.0, 20.0, 30.0], 17.0), Some(2));
    }

    #[test]
    fn test_nearest_index_tie_prefers_lowest() {
        assert_eq!(nearest_index(&[0.0, 10.0, 20.0], 5.0), Some(0));
        assert_eq!(nearest_index(&[30.0, 20.0, 10.0], 15.0), Some(1));
    }

    #[test]
    fn test_nearest_index_outside_range_and_empty() {
        assert_eq!(nearest_index(&[0.0, 10.0], -100.0), Some(0));
        assert_eq!(nearest_index(&[0.0, 10.0], 100.0), Some(1));
        assert_eq!(nearest_index(&[], 1.0), None);
    }

    #[test]
    fn test_hit_test_finds_projected_cell() {
        let lats = [-10.0, -20.0, -30.0, -40.0];
        let lons = [115.0, 125.0, 135.0, 145.0, 155.0];
        let vp = Viewport::new(400, 300, Padding::uniform(10.0)).unwrap();
        let geo = bounds(&lats, &lons).unwrap();

        let (x, y) = forward(lats[2], lons[3], &geo, &vp);
        let hit = hit_test(x + 0.4, y - 0.4, &lats, &lons, &vp).unwrap();
        assert_eq!((hit.row, hit.col), (2, 3));
        assert!((hit.lon - 145.0).abs() < 0.5);
    }

    #[test]
    fn test_hit_test_in_padding() {
        let vp = Viewport::new(400, 300, Padding::uniform(10.0)).unwrap();
        assert!(hit_test(2.0, 150.0, &[0.0, 1.0], &[0.0, 1.0], &vp).is_none());
    }
}
