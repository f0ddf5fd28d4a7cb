//! The user's current choice of data type, variable, day and point.

use met_common::{DataType, Variable};
use projection::GridHit;
use serde::{Deserialize, Serialize};

/// A clicked location snapped to the nearest grid cell.
///
/// `lat`/`lon` are where the pointer landed; `row`/`col` index the nearest
/// coordinate on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectedPoint {
    pub lat: f64,
    pub lon: f64,
    pub row: usize,
    pub col: usize,
}

impl From<GridHit> for SelectedPoint {
    fn from(hit: GridHit) -> Self {
        Self {
            lat: hit.lat,
            lon: hit.lon,
            row: hit.row,
            col: hit.col,
        }
    }
}

/// Created with defaults at startup (obs, first variable, day 0, no point)
/// and only changed through the store's mutators.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub data_type: DataType,
    pub variable: Variable,
    pub day: usize,
    pub point: Option<SelectedPoint>,
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} day {}", self.data_type, self.variable, self.day)?;
        if let Some(p) = &self.point {
            write!(f, " at ({}, {})", p.row, p.col)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selection() {
        let selection = Selection::default();
        assert_eq!(selection.data_type, DataType::Obs);
        assert_eq!(selection.variable, Variable::ALL[0]);
        assert_eq!(selection.day, 0);
        assert!(selection.point.is_none());
    }
}
