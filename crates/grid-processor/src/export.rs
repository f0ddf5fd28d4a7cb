//! Writing datasets and boundaries in the dashboard wire format.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use met_common::{Boundary, Dataset};
use serde::Serialize;
use serde_json::json;

use crate::error::ProcessResult;

/// File name of the uncompressed dataset.
pub const DATASET_JSON: &str = "meteorological_data.json";
/// File name of the gzip-compressed dataset.
pub const DATASET_GZ: &str = "meteorological_data.json.gz";
/// File name of the boundary feature.
pub const BOUNDARY_JSON: &str = "boundary.json";

/// Paths and sizes of an export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub json_path: PathBuf,
    pub gz_path: PathBuf,
    pub json_bytes: usize,
    pub gz_bytes: usize,
}

impl ExportSummary {
    /// Percentage saved by compression.
    pub fn reduction_percent(&self) -> f64 {
        if self.json_bytes == 0 {
            return 0.0;
        }
        (1.0 - self.gz_bytes as f64 / self.json_bytes as f64) * 100.0
    }
}

/// Compact JSON encoding of the dataset.
pub fn dataset_to_json(dataset: &Dataset) -> ProcessResult<Vec<u8>> {
    Ok(serde_json::to_vec(&dataset.to_raw())?)
}

/// gzip at maximum compression.
pub fn gzip(bytes: &[u8]) -> ProcessResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 4), Compression::best());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Write both the plain and the gzip dataset files into `out_dir`.
pub fn export_dataset(dataset: &Dataset, out_dir: &Path) -> ProcessResult<ExportSummary> {
    fs::create_dir_all(out_dir)?;

    let json = dataset_to_json(dataset)?;
    let gz = gzip(&json)?;

    let json_path = out_dir.join(DATASET_JSON);
    let gz_path = out_dir.join(DATASET_GZ);
    fs::write(&json_path, &json)?;
    fs::write(&gz_path, &gz)?;

    let summary = ExportSummary {
        json_path,
        gz_path,
        json_bytes: json.len(),
        gz_bytes: gz.len(),
    };
    tracing::info!(
        json_bytes = summary.json_bytes,
        gz_bytes = summary.gz_bytes,
        reduction = format!("{:.1}%", summary.reduction_percent()),
        path = %summary.gz_path.display(),
        "Exported dataset"
    );
    Ok(summary)
}

/// Write the boundary as a GeoJSON `Feature`.
pub fn export_boundary(boundary: &Boundary, name: &str, out_dir: &Path) -> ProcessResult<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let feature = json!({
        "type": "Feature",
        "properties": { "name": name },
        "geometry": boundary.to_geojson(),
    });
    let path = out_dir.join(BOUNDARY_JSON);
    fs::write(&path, serde_json::to_vec_pretty(&feature)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_gzip_roundtrip() {
        let data = b"{\"metadata\":{}}".repeat(50);
        let gz = gzip(&data).unwrap();
        assert_eq!(&gz[..2], &[0x1f, 0x8b]);

        let mut out = Vec::new();
        GzDecoder::new(&gz[..]).read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
    }
}
