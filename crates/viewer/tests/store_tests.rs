//! Selection store behaviour against the tiny fixture dataset.

use met_common::{DataType, ValueRange, Variable, VizError};
use test_utils::fixtures::{square_boundary, tiny_dataset, PROBE_CELL};
use test_utils::generators::DatasetBuilder;
use viewer::{LoadState, SelectedPoint, SelectionStore};

fn probe_point() -> SelectedPoint {
    SelectedPoint {
        lat: -20.0,
        lon: 130.0,
        row: PROBE_CELL.0,
        col: PROBE_CELL.1,
    }
}

fn ready_store() -> SelectionStore {
    SelectionStore::with_dataset(tiny_dataset())
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_new_store_is_loading() {
    let store = SelectionStore::new();
    assert_eq!(store.load_state(), &LoadState::Loading);
    assert!(store.current_grid().is_none());
    assert!(store.current_range().is_none());
    assert!(store.time_series().is_none());
}

#[test]
fn test_failed_load_drops_dataset() {
    let mut store = ready_store();
    store.set_failed("bad gzip");
    assert_eq!(store.load_state(), &LoadState::Failed("bad gzip".into()));
    assert!(store.dataset().is_none());
    assert!(store.current_grid().is_none());
}

#[test]
fn test_set_dataset_keeps_fitting_selection() {
    let mut store = ready_store();
    store.set_day(2).unwrap();
    store.select_point(probe_point()).unwrap();

    // Smaller dataset without tmax: variable falls back, day and point reset.
    let smaller = DatasetBuilder::new(1, 1, 1)
        .constant(Variable::Rh, 50.0, 45.0)
        .build();
    store.set_dataset(smaller);
    let selection = store.selection();
    assert_eq!(selection.variable, Variable::Rh);
    assert_eq!(selection.day, 0);
    assert!(selection.point.is_none());
}

#[test]
fn test_boundary_is_optional() {
    let mut store = ready_store();
    assert!(store.boundary().is_none());
    store.set_boundary(Some(square_boundary()));
    assert_eq!(store.boundary(), Some(&square_boundary()));
    store.set_boundary(None);
    assert!(store.boundary().is_none());
}

// ============================================================================
// Mutators
// ============================================================================

#[test]
fn test_rejected_mutators_leave_selection_unchanged() {
    let mut store = ready_store();
    store.set_day(1).unwrap();
    let before = *store.selection();

    assert!(matches!(
        store.set_day(3),
        Err(VizError::DayOutOfRange { day: 3, days: 3 })
    ));
    assert!(matches!(
        store.set_variable(Variable::Precip),
        Err(VizError::UnknownVariable(_))
    ));
    let far = SelectedPoint {
        row: 5,
        ..probe_point()
    };
    assert!(matches!(
        store.select_point(far),
        Err(VizError::PointOutOfRange { row: 5, .. })
    ));

    assert_eq!(*store.selection(), before);
}

#[test]
fn test_each_mutator_changes_one_field() {
    let mut store = ready_store();
    let start = *store.selection();

    store.set_data_type(DataType::Forecast).unwrap();
    assert_eq!(store.selection().data_type, DataType::Forecast);
    assert_eq!(store.selection().variable, start.variable);
    assert_eq!(store.selection().day, start.day);

    store.set_variable(Variable::Geopotential500).unwrap();
    assert_eq!(store.selection().variable, Variable::Geopotential500);
    assert_eq!(store.selection().data_type, DataType::Forecast);

    store.select_point(probe_point()).unwrap();
    assert_eq!(store.selection().point, Some(probe_point()));
    store.clear_point();
    assert!(store.selection().point.is_none());
    assert_eq!(store.selection().variable, Variable::Geopotential500);
}

#[test]
fn test_mutators_accept_anything_before_load() {
    let mut store = SelectionStore::new();
    store.set_day(40).unwrap();
    store.set_variable(Variable::Precip).unwrap();
    assert_eq!(store.selection().day, 40);
}

// ============================================================================
// Derived views
// ============================================================================

#[test]
fn test_difference_grid_and_range() {
    let mut store = ready_store();
    store.set_data_type(DataType::Difference).unwrap();

    let grid = store.current_grid().expect("difference grid");
    assert_eq!(grid.get(PROBE_CELL.0, PROBE_CELL.1), Some(2.0));
    assert_eq!(grid.get(0, 0), Some(1.0));

    // min 1, max 2 padded by 10% of the span then rounded outward
    assert_eq!(store.current_range(), Some(ValueRange::new(0.0, 3.0)));
}

#[test]
fn test_difference_with_missing_probe() {
    let mut store = ready_store();
    store.set_data_type(DataType::Difference).unwrap();
    store.set_day(1).unwrap();

    let grid = store.current_grid().expect("difference grid");
    assert_eq!(grid.get(PROBE_CELL.0, PROBE_CELL.1), None);
    assert_eq!(store.current_range(), Some(ValueRange::new(1.0, 1.0)));
}

#[test]
fn test_missing_daily_grid_yields_none() {
    let mut store = ready_store();
    store.set_variable(Variable::Geopotential500).unwrap();
    store.set_day(2).unwrap();

    store.set_data_type(DataType::Forecast).unwrap();
    assert!(matches!(
        store.try_current_grid(),
        Err(VizError::MissingGrid { day: 2, .. })
    ));
    assert!(store.current_grid().is_none());

    store.set_data_type(DataType::Difference).unwrap();
    assert!(store.current_grid().is_none());
    assert!(store.current_range().is_none());

    // Observed grid for the same day is present.
    store.set_data_type(DataType::Obs).unwrap();
    assert_eq!(store.current_grid().unwrap().get(0, 0), Some(5500.0));
}

#[test]
fn test_static_range_for_stored_sources() {
    let dataset = tiny_dataset();
    let expected: ValueRange = dataset.metadata().bounds_for(Variable::Tmax).into();
    let mut store = SelectionStore::with_dataset(dataset);

    assert_eq!(store.current_range(), Some(expected));
    store.set_day(2).unwrap();
    store.set_data_type(DataType::Forecast).unwrap();
    assert_eq!(store.current_range(), Some(expected));
}

#[test]
fn test_time_series_at_probe() {
    let mut store = ready_store();
    assert!(store.time_series().is_none());
    store.select_point(probe_point()).unwrap();

    let series = store.time_series().expect("series");
    assert_eq!(series.len(), 3);
    assert_eq!(series.obs, vec![Some(10.0), None, Some(12.0)]);
    assert_eq!(series.forecast, vec![Some(8.0), Some(9.0), None]);
    assert_eq!(series.difference, vec![Some(2.0), None, None]);
}

#[test]
fn test_time_series_with_absent_day() {
    let mut store = ready_store();
    store.set_variable(Variable::Geopotential500).unwrap();
    let series = store.time_series_at(0, 2).expect("series");
    assert_eq!(series.forecast, vec![Some(5490.0), Some(5490.0), None]);
    assert_eq!(series.difference, vec![Some(10.0), Some(10.0), None]);
    assert!(store.time_series_at(3, 0).is_none());
}

#[test]
fn test_derived_views_are_stable() {
    let mut store = ready_store();
    store.set_data_type(DataType::Difference).unwrap();
    store.select_point(probe_point()).unwrap();

    assert_eq!(store.current_grid(), store.current_grid());
    assert_eq!(store.current_range(), store.current_range());
    assert_eq!(store.time_series(), store.time_series());

    // Re-applying the same value is a no-op.
    let before = *store.selection();
    store.set_data_type(DataType::Difference).unwrap();
    store.select_point(probe_point()).unwrap();
    assert_eq!(*store.selection(), before);
}
