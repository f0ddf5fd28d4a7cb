//! Two-dimensional grids with explicit missing cells.

use serde::{Deserialize, Serialize};

use crate::error::{VizError, VizResult};

/// A row-major `rows x cols` grid of optional samples.
///
/// Row `i` corresponds to `lat[i]` and column `j` to `lon[j]`. Missing or
/// masked cells are `None`; non-finite inputs are normalised to `None` on
/// construction so no numeric placeholder ever reaches a consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Option<f64>>>", into = "Vec<Vec<Option<f64>>>")]
pub struct Grid {
    rows: usize,
    cols: usize,
    values: Vec<Option<f64>>,
}

impl Grid {
    /// Create a grid from row-major values.
    pub fn new(rows: usize, cols: usize, values: Vec<Option<f64>>) -> VizResult<Self> {
        if values.len() != rows * cols {
            return Err(VizError::validation(format!(
                "grid has {} values, expected {}x{}",
                values.len(),
                rows,
                cols
            )));
        }
        Ok(Self {
            rows,
            cols,
            values: values.into_iter().map(sanitize).collect(),
        })
    }

    /// Create a grid from nested rows; every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<Option<f64>>>) -> VizResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(VizError::validation(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n_cols
                )));
            }
            values.extend(row.into_iter().map(sanitize));
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            values,
        })
    }

    /// Create a grid from plain floats, treating NaN as missing.
    pub fn from_f64(rows: usize, cols: usize, data: &[f64]) -> VizResult<Self> {
        Self::new(rows, cols, data.iter().copied().map(Some).collect())
    }

    /// A grid where every cell is missing.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![None; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Value at `(row, col)`; `None` if masked or out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.values[row * self.cols + col]
    }

    /// Store a value at `(row, col)`; NaN is stored as missing. Writes
    /// outside the grid are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: Option<f64>) {
        if row < self.rows && col < self.cols {
            self.values[row * self.cols + col] = value.and_then(|v| sanitize(Some(v)));
        }
    }

    /// One row as a slice.
    pub fn row(&self, row: usize) -> Option<&[Option<f64>]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.values[start..start + self.cols])
    }

    /// Elementwise `self - other`; a cell is missing if either operand is.
    ///
    /// Returns `None` when the grids have different dimensions.
    pub fn difference(&self, other: &Grid) -> Option<Grid> {
        if self.dims() != other.dims() {
            return None;
        }
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => sanitize(Some(a - b)),
                _ => None,
            })
            .collect();
        Some(Grid {
            rows: self.rows,
            cols: self.cols,
            values,
        })
    }

    /// Actual min/max over the present cells.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.values.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
    }

    /// Number of present (non-missing) cells.
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Nested row representation, as used on the wire.
    pub fn to_rows(&self) -> Vec<Vec<Option<f64>>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.values.chunks(self.cols).map(<[_]>::to_vec).collect()
    }
}

fn sanitize(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl TryFrom<Vec<Vec<Option<f64>>>> for Grid {
    type Error = VizError;

    fn try_from(rows: Vec<Vec<Option<f64>>>) -> Result<Self, Self::Error> {
        Grid::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<Option<f64>>> {
    fn from(grid: Grid) -> Self {
        grid.to_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: Vec<Vec<Option<f64>>>) -> Grid {
        Grid::from_rows(rows).unwrap()
    }

    #[test]
    fn test_difference_propagates_missing() {
        let obs = grid(vec![vec![Some(30.0), None], vec![Some(28.0), Some(26.0)]]);
        let forecast = grid(vec![vec![Some(29.0), Some(20.0)], vec![None, Some(25.0)]]);

        let diff = obs.difference(&forecast).unwrap();
        assert_eq!(
            diff.to_rows(),
            vec![vec![Some(1.0), None], vec![None, Some(1.0)]]
        );
    }

    #[test]
    fn test_difference_is_idempotent() {
        let obs = grid(vec![vec![Some(1.5), Some(2.5)]]);
        let forecast = grid(vec![vec![Some(0.5), None]]);
        assert_eq!(obs.difference(&forecast), obs.difference(&forecast));
    }

    #[test]
    fn test_difference_dimension_mismatch() {
        let a = Grid::empty(2, 2);
        let b = Grid::empty(2, 3);
        assert!(a.difference(&b).is_none());
    }

    #[test]
    fn test_nan_becomes_missing() {
        let g = Grid::from_f64(1, 3, &[1.0, f64::NAN, f64::INFINITY]).unwrap();
        assert_eq!(g.get(0, 0), Some(1.0));
        assert_eq!(g.get(0, 1), None);
        assert_eq!(g.get(0, 2), None);
        assert_eq!(g.valid_count(), 1);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Grid::from_rows(vec![vec![Some(1.0)], vec![Some(1.0), Some(2.0)]]).unwrap_err();
        assert!(matches!(err, VizError::DatasetValidation(_)));
    }

    #[test]
    fn test_min_max_skips_missing() {
        let g = grid(vec![vec![None, Some(-2.0)], vec![Some(8.0), None]]);
        assert_eq!(g.min_max(), Some((-2.0, 8.0)));
        assert_eq!(Grid::empty(2, 2).min_max(), None);
    }

    #[test]
    fn test_out_of_range_get() {
        let g = grid(vec![vec![Some(1.0)]]);
        assert_eq!(g.get(1, 0), None);
        assert_eq!(g.get(0, 1), None);
    }

    #[test]
    fn test_out_of_range_set_is_ignored() {
        let mut grid = Grid::empty(2, 3);
        grid.set(2, 0, Some(1.0));
        grid.set(0, 3, Some(1.0));
        assert!(grid.values().iter().all(Option::is_none));

        grid.set(1, 2, Some(4.0));
        grid.set(0, 0, Some(f64::NAN));
        assert_eq!(grid.get(1, 2), Some(4.0));
        assert_eq!(grid.get(0, 0), None);
    }

    #[test]
    fn test_serde_nested_rows() {
        let g: Grid = serde_json::from_str("[[1.0,null],[3.0,4.0]]").unwrap();
        assert_eq!(g.dims(), (2, 2));
        assert_eq!(g.get(0, 1), None);
        assert_eq!(serde_json::to_string(&g).unwrap(), "[[1.0,null],[3.0,4.0]]");
    }
}
