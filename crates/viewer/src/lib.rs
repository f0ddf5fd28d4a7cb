//! Interactive state for the observed-vs-forecast grid viewer.
//!
//! A [`Session`] owns a [`SelectionStore`], loads the dataset and boundary
//! through a [`DataLoader`], and turns [`ControlEvent`]s and canvas clicks
//! into rendered [`Frame`]s and [`TimeSeries`].

pub mod config;
pub mod error;
pub mod loader;
pub mod selection;
pub mod series;
pub mod session;
pub mod store;

pub use config::ViewerConfig;
pub use error::{ViewerError, ViewerResult};
pub use loader::{is_gzip, maybe_gunzip, DataLoader, DataSource};
pub use selection::{SelectedPoint, Selection};
pub use series::TimeSeries;
pub use session::{ControlEvent, Frame, LoadOutcome, LoadToken, Session};
pub use store::{LoadState, SelectionStore};
