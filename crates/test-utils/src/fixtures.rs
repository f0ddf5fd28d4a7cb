//! Canonical datasets and boundaries shared across test suites.
//!
//! [`tiny_dataset`] is a 3x3 grid over 3 days with two variables:
//!
//! - `tmax`: cell `(1, 1)` holds obs `[10, null, 12]` and forecast
//!   `[8, 9, null]`; every other cell is obs `20 + day`, forecast `19 + day`.
//! - `geopotential_500`: constant obs 5500 / forecast 5490, with the
//!   forecast grid of day 2 absent.

use met_common::{Boundary, Dataset, Grid, Variable};
use serde_json::json;

use crate::generators::{constant_grid, DatasetBuilder};

/// Row/column of the cell with the interesting time series.
pub const PROBE_CELL: (usize, usize) = (1, 1);

pub const TINY_LAT: [f64; 3] = [-30.0, -20.0, -10.0];
pub const TINY_LON: [f64; 3] = [120.0, 130.0, 140.0];

fn tmax_day(default: f64, probe: Option<f64>) -> Grid {
    let mut grid = constant_grid(3, 3, default);
    grid.set(PROBE_CELL.0, PROBE_CELL.1, probe);
    grid
}

/// Builder pre-loaded with the tiny dataset.
pub fn tiny_builder() -> DatasetBuilder {
    let obs_probe = [Some(10.0), None, Some(12.0)];
    let fc_probe = [Some(8.0), Some(9.0), None];

    let tmax_obs = (0..3).map(|d| Some(tmax_day(20.0 + d as f64, obs_probe[d]))).collect();
    let tmax_fc = (0..3).map(|d| Some(tmax_day(19.0 + d as f64, fc_probe[d]))).collect();

    let z_obs = vec![Some(constant_grid(3, 3, 5500.0)); 3];
    let z_fc = vec![
        Some(constant_grid(3, 3, 5490.0)),
        Some(constant_grid(3, 3, 5490.0)),
        None,
    ];

    DatasetBuilder::new(3, 3, 3)
        .with_axes(TINY_LAT.to_vec(), TINY_LON.to_vec())
        .variable(Variable::Tmax, tmax_obs, tmax_fc)
        .variable(Variable::Geopotential500, z_obs, z_fc)
}

pub fn tiny_dataset() -> Dataset {
    tiny_builder().build()
}

/// The tiny dataset in its JSON wire form.
pub fn tiny_dataset_json() -> String {
    serde_json::to_string(&tiny_dataset().to_raw()).expect("serialize tiny dataset")
}

/// Square ring around the centre of the tiny dataset.
pub fn square_boundary() -> Boundary {
    Boundary::from_ring(vec![
        [125.0, -25.0],
        [135.0, -25.0],
        [135.0, -15.0],
        [125.0, -15.0],
        [125.0, -25.0],
    ])
}

/// A `Feature` whose `Polygon` coordinates are a bare ring, as some
/// extraction tools write them.
pub fn bare_ring_boundary_json() -> String {
    json!({
        "type": "Feature",
        "properties": { "name": "Test" },
        "geometry": {
            "type": "Polygon",
            "coordinates": [
                [125.0, -25.0], [135.0, -25.0], [135.0, -15.0], [125.0, -15.0], [125.0, -25.0]
            ]
        }
    })
    .to_string()
}

/// `MultiPolygon` with a hole in the first polygon.
pub fn multipolygon_boundary_json() -> String {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [
                        [[118.0, -32.0], [142.0, -32.0], [142.0, -8.0], [118.0, -8.0], [118.0, -32.0]],
                        [[128.0, -22.0], [132.0, -22.0], [132.0, -18.0], [128.0, -18.0], [128.0, -22.0]]
                    ],
                    [
                        [[144.0, -40.0], [148.0, -40.0], [148.0, -38.0], [144.0, -38.0], [144.0, -40.0]]
                    ]
                ]
            }
        }]
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use met_common::Source;

    #[test]
    fn test_tiny_dataset_shape() {
        let dataset = tiny_dataset();
        assert_eq!((dataset.rows(), dataset.cols(), dataset.days()), (3, 3, 3));
        assert!(dataset.grid(Source::Forecast, Variable::Geopotential500, 2).is_err());
        assert_eq!(
            dataset.source(Source::Obs).value(Variable::Tmax, 1, 1, 1),
            None
        );
    }

    #[test]
    fn test_boundary_fixtures_parse() {
        assert_eq!(Boundary::from_geojson_str(&bare_ring_boundary_json()).unwrap(), square_boundary());
        let multi = Boundary::from_geojson_str(&multipolygon_boundary_json()).unwrap();
        assert_eq!(multi.rings().count(), 3);
    }
}
