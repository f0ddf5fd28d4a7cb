//! Common types shared by every crate of the met-viz workspace.
//!
//! The dataset model is a set of daily lat/lon grids for two parallel
//! sources (observed and forecast) over a fixed list of variables.

pub mod bbox;
pub mod boundary;
pub mod dataset;
pub mod error;
pub mod grid;
pub mod range;
pub mod time;
pub mod variable;

pub use bbox::GeoBounds;
pub use boundary::{Boundary, Polygon, Ring};
pub use dataset::{Dataset, DatasetMetadata, SourceGrids};
pub use error::{VizError, VizResult};
pub use grid::Grid;
pub use range::ValueRange;
pub use variable::{DataType, Source, Variable, VariableBounds, VariableInfo};
