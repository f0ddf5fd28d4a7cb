//! Loading datasets and boundaries from local files.

use met_common::VizError;
use test_utils::fixtures::{bare_ring_boundary_json, multipolygon_boundary_json, square_boundary, tiny_dataset, tiny_dataset_json};
use test_utils::paths::{temp_dir, write_file, write_gzip_file};
use viewer::{DataLoader, DataSource};

#[tokio::test]
async fn test_load_plain_json() {
    let dir = temp_dir();
    let path = write_file(&dir, "data.json", tiny_dataset_json().as_bytes());

    let dataset = DataLoader::new()
        .load_dataset(&DataSource::Path(path))
        .await
        .expect("load");
    assert_eq!((dataset.rows(), dataset.cols(), dataset.days()), (3, 3, 3));
    assert_eq!(dataset.metadata().lat, tiny_dataset().metadata().lat);
}

#[tokio::test]
async fn test_load_gzip_by_magic_not_extension() {
    let dir = temp_dir();
    // No .gz suffix: detection goes by the payload's leading bytes.
    let path = write_gzip_file(&dir, "data.bin", tiny_dataset_json().as_bytes());

    let dataset = DataLoader::new()
        .load_dataset(&DataSource::parse(path.to_str().unwrap()))
        .await
        .expect("load");
    assert_eq!(dataset.days(), 3);
}

#[tokio::test]
async fn test_missing_file_is_load_error() {
    let dir = temp_dir();
    let source = DataSource::Path(dir.path().join("nope.json.gz"));
    let err = DataLoader::new().load_dataset(&source).await.unwrap_err();
    assert!(matches!(err, VizError::Load(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let dir = temp_dir();
    let path = write_file(&dir, "data.json", br#"{"metadata": {"lat": [1.0]"#);
    let result = DataLoader::new().load_dataset(&DataSource::Path(path)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_corrupt_gzip_is_decompress_error() {
    let dir = temp_dir();
    let path = write_file(&dir, "data.json.gz", &[0x1f, 0x8b, 0x08, 0x00, 0xde, 0xad]);
    let err = DataLoader::new()
        .load_dataset(&DataSource::Path(path))
        .await
        .unwrap_err();
    assert!(matches!(err, VizError::Decompress(_)));
}

#[tokio::test]
async fn test_boundary_shapes() {
    let dir = temp_dir();
    let loader = DataLoader::new();

    let bare = write_file(&dir, "bare.geojson", bare_ring_boundary_json().as_bytes());
    let boundary = loader.load_boundary(&DataSource::Path(bare)).await.expect("bare ring");
    assert_eq!(boundary, square_boundary());

    let multi = write_gzip_file(&dir, "multi.geojson.gz", multipolygon_boundary_json().as_bytes());
    let boundary = loader.load_boundary(&DataSource::Path(multi)).await.expect("multipolygon");
    assert_eq!(boundary.rings().count(), 3);
}

#[tokio::test]
async fn test_invalid_boundary_is_boundary_error() {
    let dir = temp_dir();
    let path = write_file(&dir, "bad.geojson", br#"{"type": "Point", "coordinates": [1, 2]}"#);
    let err = DataLoader::new()
        .load_boundary(&DataSource::Path(path))
        .await
        .unwrap_err();
    assert!(matches!(err, VizError::Boundary(_)));
}
