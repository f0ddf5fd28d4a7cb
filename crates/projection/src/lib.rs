//! Coordinate transformations between geographic and raster space.
//!
//! Only the equirectangular mapping is implemented: latitude and longitude
//! are treated as linearly proportional to pixel position.

pub mod equirectangular;
pub mod lookup;
pub mod viewport;

pub use equirectangular::{forward, inverse, Equirectangular};
pub use lookup::{bounds, hit_test, nearest_index, GridHit};
pub use viewport::{Padding, ProjectionError, Viewport};
