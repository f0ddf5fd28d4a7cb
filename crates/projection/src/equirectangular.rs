//! Equirectangular (plate carrée) mapping onto a padded raster.
//!
//! Longitude maps left to right and latitude bottom to top. Raster `y`
//! grows downward, so the latitude axis is inverted.

use met_common::GeoBounds;

use crate::viewport::Viewport;

/// Project `(lat, lon)` to pixel `(x, y)`.
pub fn forward(lat: f64, lon: f64, bounds: &GeoBounds, viewport: &Viewport) -> (f64, f64) {
    let tx = normalize(lon, bounds.min_lon, bounds.max_lon);
    let ty = normalize(lat, bounds.min_lat, bounds.max_lat);
    let x = viewport.padding.left + tx * viewport.plot_width();
    let y = viewport.padding.top + (1.0 - ty) * viewport.plot_height();
    (x, y)
}

/// Exact algebraic inverse of [`forward`]: pixel `(x, y)` to `(lat, lon)`.
pub fn inverse(x: f64, y: f64, bounds: &GeoBounds, viewport: &Viewport) -> (f64, f64) {
    let tx = (x - viewport.padding.left) / viewport.plot_width();
    let ty = 1.0 - (y - viewport.padding.top) / viewport.plot_height();
    let lon = bounds.min_lon + tx * bounds.width();
    let lat = bounds.min_lat + ty * bounds.height();
    (lat, lon)
}

/// Position of `value` in `[lo, hi]` as a fraction. A zero-width axis maps
/// everything to its centre.
fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    let span = hi - lo;
    if span == 0.0 {
        0.5
    } else {
        (value - lo) / span
    }
}

/// A projection bound to one geographic extent and one viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equirectangular {
    pub bounds: GeoBounds,
    pub viewport: Viewport,
}

impl Equirectangular {
    pub fn new(bounds: GeoBounds, viewport: Viewport) -> Self {
        Self { bounds, viewport }
    }

    pub fn geo_to_pixel(&self, lat: f64, lon: f64) -> (f64, f64) {
        forward(lat, lon, &self.bounds, &self.viewport)
    }

    pub fn pixel_to_geo(&self, x: f64, y: f64) -> (f64, f64) {
        inverse(x, y, &self.bounds, &self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Padding;
    use test_utils::assert_coords_approx_eq;

    fn setup() -> (GeoBounds, Viewport) {
        let bounds = GeoBounds::new(-44.0, -10.0, 113.0, 154.0);
        let viewport = Viewport::new(800, 600, Padding::new(20.0, 30.0, 40.0, 50.0)).unwrap();
        (bounds, viewport)
    }

    #[test]
    fn test_corners_map_to_plot_edges() {
        let (bounds, vp) = setup();

        // north-west corner is top-left of the plot area
        let (x, y) = forward(-10.0, 113.0, &bounds, &vp);
        assert_coords_approx_eq!((x, y), (50.0, 20.0), 1e-9);

        // south-east corner is bottom-right
        let (x, y) = forward(-44.0, 154.0, &bounds, &vp);
        assert_coords_approx_eq!((x, y), (770.0, 560.0), 1e-9);
    }

    #[test]
    fn test_latitude_axis_inverted() {
        let (bounds, vp) = setup();
        let (_, y_north) = forward(-12.0, 130.0, &bounds, &vp);
        let (_, y_south) = forward(-40.0, 130.0, &bounds, &vp);
        assert!(y_north < y_south);
    }

    #[test]
    fn test_roundtrip_grid() {
        let (bounds, vp) = setup();
        let proj = Equirectangular::new(bounds, vp);

        for i in 1..20 {
            for j in 1..20 {
                let lat = -44.0 + 34.0 * i as f64 / 20.0;
                let lon = 113.0 + 41.0 * j as f64 / 20.0;
                let (x, y) = proj.geo_to_pixel(lat, lon);
                let (lat2, lon2) = proj.pixel_to_geo(x, y);
                assert_coords_approx_eq!((lat2, lon2), (lat, lon), 1e-6);
                let (x2, y2) = proj.geo_to_pixel(lat2, lon2);
                assert_coords_approx_eq!((x2, y2), (x, y), 1e-6);
            }
        }
    }

    #[test]
    fn test_degenerate_axis_maps_to_centre() {
        let bounds = GeoBounds::new(-20.0, -20.0, 110.0, 150.0);
        let vp = Viewport::new(100, 100, Padding::default()).unwrap();
        let (_, y) = forward(-20.0, 130.0, &bounds, &vp);
        assert_eq!(y, 50.0);
    }
}
