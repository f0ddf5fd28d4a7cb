//! Tests for the grid cell renderer.

use met_common::{Boundary, DataType, GeoBounds, Grid, ValueRange, Variable};
use projection::{Padding, Viewport};
use renderer::{ColorScale, GridLayer, GridRenderer, RenderOptions};

// ============================================================================
// Helper functions
// ============================================================================

fn axes() -> (Vec<f64>, Vec<f64>) {
    let lat: Vec<f64> = (0..5).map(|i| -40.0 + i as f64 * 5.0).collect();
    let lon: Vec<f64> = (0..6).map(|j| 115.0 + j as f64 * 6.0).collect();
    (lat, lon)
}

fn renderer_for(lat: &[f64], lon: &[f64], options: RenderOptions) -> GridRenderer {
    let bounds = GeoBounds::from_coords(lat, lon).expect("bounds");
    let viewport = Viewport::new(200, 160, Padding::uniform(10.0)).expect("viewport");
    GridRenderer::new(bounds, viewport, options)
}

fn temperature_grid(rows: usize, cols: usize) -> Grid {
    let data: Vec<f64> = (0..rows * cols).map(|k| 15.0 + k as f64).collect();
    Grid::from_f64(rows, cols, &data).expect("grid")
}

fn tmax_scale() -> ColorScale {
    ColorScale::new(Variable::Tmax, DataType::Obs, &ValueRange::new(15.0, 45.0))
}

fn square_boundary() -> Boundary {
    Boundary::from_ring(vec![
        [120.0, -35.0],
        [140.0, -35.0],
        [140.0, -25.0],
        [120.0, -25.0],
        [120.0, -35.0],
    ])
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_identical_inputs_give_identical_pixels() {
    let (lat, lon) = axes();
    let grid = temperature_grid(lat.len(), lon.len());
    let scale = tmax_scale();
    let layer = GridLayer::new(&grid, &lat, &lon, &scale);
    let boundary = square_boundary();
    let options = RenderOptions {
        draw_axes: true,
        ..RenderOptions::default()
    };
    let renderer = renderer_for(&lat, &lon, options);

    let a = renderer.render(Some(&layer), Some(&boundary)).expect("first render");
    let b = renderer.render(Some(&layer), Some(&boundary)).expect("second render");
    assert_eq!(a.pixmap.data(), b.pixmap.data());
    assert_eq!(a.stats, b.stats);
}

// ============================================================================
// Missing data
// ============================================================================

#[test]
fn test_null_cells_are_skipped() {
    let (lat, lon) = axes();
    let mut grid = temperature_grid(lat.len(), lon.len());
    grid.set(0, 0, None);
    grid.set(2, 3, None);
    // Last row/column are never painted, nulls there do not count.
    grid.set(4, 5, None);

    let scale = tmax_scale();
    let layer = GridLayer::new(&grid, &lat, &lon, &scale);
    let frame = renderer_for(&lat, &lon, RenderOptions::default())
        .render(Some(&layer), None)
        .expect("render");

    assert_eq!(frame.stats.painted_cells, 4 * 5 - 2);
    assert_eq!(frame.stats.skipped_cells, 2);
}

#[test]
fn test_all_null_grid_renders_background_only() {
    let (lat, lon) = axes();
    let grid = Grid::empty(lat.len(), lon.len());
    let scale = tmax_scale();
    let layer = GridLayer::new(&grid, &lat, &lon, &scale);
    let frame = renderer_for(&lat, &lon, RenderOptions::default())
        .render(Some(&layer), None)
        .expect("render");

    assert_eq!(frame.stats.painted_cells, 0);
    assert!(frame
        .pixmap
        .pixels()
        .iter()
        .all(|p| (p.red(), p.green(), p.blue()) == (255, 255, 255)));
}

#[test]
fn test_missing_layer_is_blank_frame() {
    let (lat, lon) = axes();
    let renderer = renderer_for(&lat, &lon, RenderOptions::default());
    let boundary = square_boundary();
    let frame = renderer.render(None, Some(&boundary)).expect("render");
    assert_eq!(frame.stats.painted_cells, 0);
    assert_eq!(frame.stats.boundary_rings, 0);
}

// ============================================================================
// Boundary
// ============================================================================

#[test]
fn test_missing_boundary_renders_grid_only() {
    let (lat, lon) = axes();
    let grid = temperature_grid(lat.len(), lon.len());
    let scale = tmax_scale();
    let layer = GridLayer::new(&grid, &lat, &lon, &scale);
    let renderer = renderer_for(&lat, &lon, RenderOptions::default());

    let without = renderer.render(Some(&layer), None).expect("render");
    let with = renderer
        .render(Some(&layer), Some(&square_boundary()))
        .expect("render");

    assert_eq!(without.stats.boundary_rings, 0);
    assert_eq!(with.stats.boundary_rings, 1);
    assert_ne!(without.pixmap.data(), with.pixmap.data());
}

#[test]
fn test_holes_and_multipolygons_are_stroked() {
    let json = r#"{
        "type": "MultiPolygon",
        "coordinates": [
            [
                [[116, -39], [140, -39], [140, -22], [116, -22], [116, -39]],
                [[120, -35], [130, -35], [130, -30], [120, -30], [120, -35]]
            ],
            [
                [[141, -38], [144, -38], [144, -36], [141, -36], [141, -38]]
            ]
        ]
    }"#;
    let boundary = Boundary::from_geojson_str(json).expect("boundary");
    let (lat, lon) = axes();
    let grid = temperature_grid(lat.len(), lon.len());
    let scale = tmax_scale();
    let layer = GridLayer::new(&grid, &lat, &lon, &scale);

    let frame = renderer_for(&lat, &lon, RenderOptions::default())
        .render(Some(&layer), Some(&boundary))
        .expect("render");
    assert_eq!(frame.stats.boundary_rings, 3);
}

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_cell_colour_lands_inside_its_rectangle() {
    let lat = vec![0.0, 10.0];
    let lon = vec![0.0, 10.0];
    let grid = Grid::from_f64(2, 2, &[45.0, 15.0, 15.0, 15.0]).expect("grid");
    let scale = tmax_scale();
    let layer = GridLayer::new(&grid, &lat, &lon, &scale);
    let frame = renderer_for(&lat, &lon, RenderOptions::default())
        .render(Some(&layer), None)
        .expect("render");

    let expected = scale.color(Some(45.0));
    let centre = frame.pixmap.pixel(100, 80).expect("pixel");
    assert_eq!(
        (centre.red(), centre.green(), centre.blue()),
        (expected.r, expected.g, expected.b)
    );
    // Padding stays background.
    let corner = frame.pixmap.pixel(2, 2).expect("pixel");
    assert_eq!((corner.red(), corner.green(), corner.blue()), (255, 255, 255));
}

#[test]
fn test_descending_latitude_axis() {
    let lat = vec![10.0, 5.0, 0.0];
    let lon = vec![0.0, 5.0, 10.0];
    let grid = temperature_grid(3, 3);
    let scale = tmax_scale();
    let layer = GridLayer::new(&grid, &lat, &lon, &scale);
    let frame = renderer_for(&lat, &lon, RenderOptions::default())
        .render(Some(&layer), None)
        .expect("render");
    assert_eq!(frame.stats.painted_cells, 4);
}
