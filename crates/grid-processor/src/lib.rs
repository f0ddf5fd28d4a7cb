//! Offline data preparation for the viewer.
//!
//! - [`downsample`]: block-average coarsening of whole datasets
//! - [`mock`]: seeded synthetic obs/forecast generation
//! - [`mask`]: land masking against a boundary
//! - [`export`]: compact JSON + gzip output in the wire format the viewer loads
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::{coarsen_dataset, export_dataset, generate_mock, DownsampleMethod, MockConfig};
//!
//! let dataset = generate_mock(&MockConfig::default(), Some(&boundary))?;
//! let small = coarsen_dataset(&dataset, 4, DownsampleMethod::Mean)?;
//! export_dataset(&small, Path::new("public/data"))?;
//! ```

pub mod config;
pub mod downsample;
pub mod error;
pub mod export;
pub mod mask;
pub mod mock;

pub use config::MockConfig;
pub use downsample::{coarsen_axis, coarsen_dataset, coarsen_grid, DownsampleMethod};
pub use error::{ProcessError, ProcessResult};
pub use export::{dataset_to_json, export_boundary, export_dataset, gzip, ExportSummary};
pub use mask::{apply_mask, land_mask};
pub use mock::{gaussian_smooth, generate_mock};
