//! Fetching, decompressing and validating the dataset and boundary.

use std::fmt;
use std::io::Read;
use std::path::PathBuf;

use flate2::read::GzDecoder;
use met_common::{Boundary, Dataset, VizError, VizResult};
use tracing::{debug, info, instrument};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Where a payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` strings are URLs; anything else is a path.
    pub fn parse(source: &str) -> Self {
        let lower = source.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(source.to_string())
        } else {
            Self::Path(PathBuf::from(source))
        }
    }
}

impl From<&str> for DataSource {
    fn from(source: &str) -> Self {
        Self::parse(source)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Url(u) => f.write_str(u),
        }
    }
}

pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Inflate gzip payloads; anything else is returned unchanged.
pub fn maybe_gunzip(bytes: Vec<u8>) -> VizResult<Vec<u8>> {
    if !is_gzip(&bytes) {
        return Ok(bytes);
    }
    let mut out = Vec::with_capacity(bytes.len() * 4);
    GzDecoder::new(bytes.as_slice())
        .read_to_end(&mut out)
        .map_err(|e| VizError::Decompress(e.to_string()))?;
    Ok(out)
}

/// Async fetcher for datasets and boundaries.
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    client: reqwest::Client,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Raw bytes from a file or URL, not yet decompressed.
    #[instrument(skip(self, source), fields(source = %source))]
    pub async fn fetch_bytes(&self, source: &DataSource) -> VizResult<Vec<u8>> {
        let bytes = match source {
            DataSource::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| VizError::Load(format!("{}: {}", path.display(), e)))?,
            DataSource::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| VizError::Load(format!("{}: {}", url, e)))?;
                response
                    .bytes()
                    .await
                    .map_err(|e| VizError::Load(format!("{}: {}", url, e)))?
                    .to_vec()
            }
        };
        debug!(bytes = bytes.len(), gzip = is_gzip(&bytes), "Fetched payload");
        Ok(bytes)
    }

    /// Fetch, inflate and validate a dataset.
    #[instrument(skip(self, source), fields(source = %source))]
    pub async fn load_dataset(&self, source: &DataSource) -> VizResult<Dataset> {
        let bytes = maybe_gunzip(self.fetch_bytes(source).await?)?;
        let dataset = Dataset::from_json_slice(&bytes)?;
        info!(
            rows = dataset.rows(),
            cols = dataset.cols(),
            days = dataset.days(),
            variables = dataset.variables().count(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Fetch and parse a boundary GeoJSON document.
    #[instrument(skip(self, source), fields(source = %source))]
    pub async fn load_boundary(&self, source: &DataSource) -> VizResult<Boundary> {
        let bytes = maybe_gunzip(self.fetch_bytes(source).await?)?;
        let text = String::from_utf8(bytes).map_err(|e| VizError::Boundary(e.to_string()))?;
        let boundary = Boundary::from_geojson_str(&text)?;
        debug!(rings = boundary.rings().count(), "Boundary loaded");
        Ok(boundary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parsing() {
        assert_eq!(
            DataSource::parse("https://host/data.json.gz"),
            DataSource::Url("https://host/data.json.gz".into())
        );
        assert_eq!(
            DataSource::parse("data/meteorological_data.json"),
            DataSource::Path(PathBuf::from("data/meteorological_data.json"))
        );
    }

    #[test]
    fn test_plain_bytes_pass_through() {
        let bytes = b"{\"a\":1}".to_vec();
        assert_eq!(maybe_gunzip(bytes.clone()).unwrap(), bytes);
    }

    #[test]
    fn test_corrupt_gzip_is_decompress_error() {
        let bytes = vec![0x1f, 0x8b, 0x08, 0x00, 0xde, 0xad];
        assert!(matches!(maybe_gunzip(bytes), Err(VizError::Decompress(_))));
    }

    #[test]
    fn test_missing_path_is_load_error() {
        let source = DataSource::parse("/nonexistent/meteorological_data.json.gz");
        let result = tokio_test::block_on(DataLoader::new().fetch_bytes(&source));
        assert!(matches!(result, Err(VizError::Load(_))));
    }
}
