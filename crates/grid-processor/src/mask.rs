//! Land masking against a boundary outline.

use met_common::{Boundary, Grid};

/// `true` for every `(row, col)` whose centre lies inside the boundary,
/// row-major.
pub fn land_mask(lat: &[f64], lon: &[f64], boundary: &Boundary) -> Vec<bool> {
    lat.iter()
        .flat_map(|&la| lon.iter().map(move |&lo| boundary.contains(lo, la)))
        .collect()
}

/// Blank out the cells outside the mask. Returns how many were cleared.
pub fn apply_mask(grid: &mut Grid, mask: &[bool]) -> usize {
    let cols = grid.cols();
    let mut cleared = 0;
    for (k, inside) in mask.iter().enumerate().take(grid.rows() * cols) {
        let (row, col) = (k / cols, k % cols);
        if !inside && grid.get(row, col).is_some() {
            grid.set(row, col, None);
            cleared += 1;
        }
    }
    cleared
}
