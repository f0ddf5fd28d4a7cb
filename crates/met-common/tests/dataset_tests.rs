//! Tests for dataset parsing and structural validation.

use met_common::{Dataset, DataType, Source, Variable, VariableBounds, VizError};
use serde_json::json;

fn valid_doc() -> serde_json::Value {
    json!({
        "metadata": {
            "lat": [-10.0, -20.0],
            "lon": [120.0, 130.0, 140.0],
            "times": ["2024-01-15", "2024-01-16"],
            "variables": {
                "tmax": {"name": "Maximum Temperature", "unit": "°C", "min": 10, "max": 50}
            }
        },
        "obs": {
            "tmax": [
                [[30.0, null, 31.0], [28.0, 26.0, null]],
                [[29.0, 30.0, 31.0], [27.0, 25.0, 24.0]]
            ]
        },
        "forecast": {
            "tmax": [
                [[29.0, 20.0, 30.0], [null, 25.0, 22.0]],
                null
            ]
        }
    })
}

fn parse(doc: &serde_json::Value) -> Result<Dataset, VizError> {
    Dataset::from_json_slice(doc.to_string().as_bytes())
}

fn assert_validation_error(doc: &serde_json::Value, needle: &str) {
    match parse(doc) {
        Err(VizError::DatasetValidation(msg)) => {
            assert!(msg.contains(needle), "message '{}' should mention '{}'", msg, needle)
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_parse_valid_dataset() {
    let dataset = parse(&valid_doc()).unwrap();
    assert_eq!(dataset.rows(), 2);
    assert_eq!(dataset.cols(), 3);
    assert_eq!(dataset.days(), 2);
    assert!(dataset.has_variable(Variable::Tmax));
    assert!(!dataset.has_variable(Variable::Rh));
    assert_eq!(
        dataset.metadata().bounds_for(Variable::Tmax),
        VariableBounds::new(10.0, 50.0)
    );
    // falls back to the static table
    assert_eq!(
        dataset.metadata().bounds_for(Variable::Rh),
        VariableBounds::new(20.0, 90.0)
    );
}

#[test]
fn test_absent_day_is_missing_grid() {
    let dataset = parse(&valid_doc()).unwrap();
    assert!(dataset.grid(Source::Obs, Variable::Tmax, 1).is_ok());
    let err = dataset.grid(Source::Forecast, Variable::Tmax, 1).unwrap_err();
    assert!(matches!(
        err,
        VizError::MissingGrid {
            kind: Source::Forecast,
            variable: Variable::Tmax,
            day: 1
        }
    ));
    assert!(!err.is_fatal());
    assert_eq!(DataType::Forecast.source(), Some(Source::Forecast));
}

#[test]
fn test_wrong_grid_shape_rejected() {
    let mut doc = valid_doc();
    doc["obs"]["tmax"][0] = json!([[1.0, 2.0], [3.0, 4.0]]);
    assert_validation_error(&doc, "expected 2x3");
}

#[test]
fn test_ragged_grid_rejected() {
    let mut doc = valid_doc();
    doc["obs"]["tmax"][1] = json!([[1.0, 2.0, 3.0], [3.0, 4.0]]);
    assert_validation_error(&doc, "obs tmax day 1");
}

#[test]
fn test_mismatched_variable_sets_rejected() {
    let mut doc = valid_doc();
    doc["obs"]["rh"] = json!([null, null]);
    assert_validation_error(&doc, "variable sets differ");
}

#[test]
fn test_wrong_day_count_rejected() {
    let mut doc = valid_doc();
    doc["forecast"]["tmax"] = json!([null]);
    assert_validation_error(&doc, "has 1 days, expected 2");
}

#[test]
fn test_unknown_variable_rejected() {
    let mut doc = valid_doc();
    doc["obs"]["snow"] = json!([null, null]);
    doc["forecast"]["snow"] = json!([null, null]);
    assert_validation_error(&doc, "unknown variable 'snow'");
}

#[test]
fn test_non_monotonic_axis_rejected() {
    let mut doc = valid_doc();
    doc["metadata"]["lon"] = json!([120.0, 140.0, 130.0]);
    assert_validation_error(&doc, "lon axis is not strictly monotonic");
}

#[test]
fn test_bad_date_rejected() {
    let mut doc = valid_doc();
    doc["metadata"]["times"] = json!(["2024-01-15", "tomorrow"]);
    assert_validation_error(&doc, "invalid date");
}

#[test]
fn test_inverted_bounds_rejected() {
    let mut doc = valid_doc();
    doc["metadata"]["variables"]["tmax"]["min"] = json!(60);
    assert_validation_error(&doc, "min < max");
}

#[test]
fn test_malformed_json_is_fatal() {
    let err = Dataset::from_json_slice(b"{\"metadata\": ").unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn test_raw_roundtrip_preserves_dataset() {
    let dataset = parse(&valid_doc()).unwrap();
    let text = serde_json::to_vec(&dataset.to_raw()).unwrap();
    let again = Dataset::from_json_slice(&text).unwrap();
    assert_eq!(again, dataset);
}
