//! Owned session state plus the views derived from it.
//!
//! The store holds the loaded dataset, the optional boundary and the current
//! [`Selection`]. Derived values (current grid, value range, time series)
//! are recomputed on every call; they depend only on the stored inputs, so
//! repeated calls give identical results.

use std::borrow::Cow;
use std::sync::Arc;

use met_common::{
    Boundary, DataType, Dataset, Grid, Source, ValueRange, Variable, VizError, VizResult,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::selection::{SelectedPoint, Selection};
use crate::series::TimeSeries;

/// Whether the dataset has arrived yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct SelectionStore {
    selection: Selection,
    dataset: Option<Arc<Dataset>>,
    boundary: Option<Arc<Boundary>>,
    state: LoadState,
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStore {
    pub fn new() -> Self {
        Self {
            selection: Selection::default(),
            dataset: None,
            boundary: None,
            state: LoadState::Loading,
        }
    }

    /// Store that is already `Ready`.
    pub fn with_dataset(dataset: Dataset) -> Self {
        let mut store = Self::new();
        store.set_dataset(dataset);
        store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_deref()
    }

    pub fn boundary(&self) -> Option<&Boundary> {
        self.boundary.as_deref()
    }

    // ---------------------------------------------------------------------
    // Load lifecycle
    // ---------------------------------------------------------------------

    /// Install a dataset and mark the store ready.
    ///
    /// The current selection is kept where it still fits; a variable the
    /// dataset lacks falls back to its first variable, and a day or point
    /// outside the new dimensions is reset.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        if !dataset.has_variable(self.selection.variable) {
            if let Some(first) = dataset.variables().next() {
                debug!(from = %self.selection.variable, to = %first, "Selected variable not in dataset");
                self.selection.variable = first;
            }
        }
        if self.selection.day >= dataset.days() {
            self.selection.day = 0;
        }
        if let Some(p) = self.selection.point {
            if p.row >= dataset.rows() || p.col >= dataset.cols() {
                self.selection.point = None;
            }
        }
        self.dataset = Some(Arc::new(dataset));
        self.state = LoadState::Ready;
    }

    pub fn set_boundary(&mut self, boundary: Option<Boundary>) {
        self.boundary = boundary.map(Arc::new);
    }

    /// Record a fatal load error. Any previous dataset is dropped.
    pub fn set_failed(&mut self, message: impl Into<String>) {
        self.dataset = None;
        self.state = LoadState::Failed(message.into());
    }

    // ---------------------------------------------------------------------
    // Mutators: each changes one field, or nothing on rejection
    // ---------------------------------------------------------------------

    pub fn set_data_type(&mut self, data_type: DataType) -> VizResult<()> {
        self.selection.data_type = data_type;
        Ok(())
    }

    pub fn set_variable(&mut self, variable: Variable) -> VizResult<()> {
        if let Some(ds) = &self.dataset {
            if !ds.has_variable(variable) {
                return Err(VizError::UnknownVariable(variable.key().to_string()));
            }
        }
        self.selection.variable = variable;
        Ok(())
    }

    pub fn set_day(&mut self, day: usize) -> VizResult<()> {
        if let Some(ds) = &self.dataset {
            if day >= ds.days() {
                return Err(VizError::DayOutOfRange {
                    day,
                    days: ds.days(),
                });
            }
        }
        self.selection.day = day;
        Ok(())
    }

    pub fn select_point(&mut self, point: SelectedPoint) -> VizResult<()> {
        if let Some(ds) = &self.dataset {
            if point.row >= ds.rows() || point.col >= ds.cols() {
                return Err(VizError::PointOutOfRange {
                    row: point.row,
                    col: point.col,
                    rows: ds.rows(),
                    cols: ds.cols(),
                });
            }
        }
        self.selection.point = Some(point);
        Ok(())
    }

    pub fn clear_point(&mut self) {
        self.selection.point = None;
    }

    // ---------------------------------------------------------------------
    // Derived views
    // ---------------------------------------------------------------------

    /// The grid for the current selection, reporting why it is unavailable.
    ///
    /// Obs and forecast are borrowed from the dataset; the difference is
    /// computed fresh on each call.
    pub fn try_current_grid(&self) -> VizResult<Cow<'_, Grid>> {
        let ds = self.dataset.as_deref().ok_or(VizError::NotLoaded)?;
        let Selection {
            data_type,
            variable,
            day,
            ..
        } = self.selection;

        match data_type.source() {
            Some(source) => ds.grid(source, variable, day).map(Cow::Borrowed),
            None => {
                let obs = ds.grid(Source::Obs, variable, day)?;
                let forecast = ds.grid(Source::Forecast, variable, day)?;
                obs.difference(forecast).map(Cow::Owned).ok_or_else(|| {
                    VizError::validation(format!(
                        "obs and forecast grids for {} day {} differ in shape",
                        variable, day
                    ))
                })
            }
        }
    }

    /// The grid for the current selection, or `None` when it is absent.
    pub fn current_grid(&self) -> Option<Cow<'_, Grid>> {
        match self.try_current_grid() {
            Ok(grid) => Some(grid),
            Err(VizError::NotLoaded) => None,
            Err(e) => {
                debug!(error = %e, selection = %self.selection, "Current grid unavailable");
                None
            }
        }
    }

    /// Display range for the current selection.
    ///
    /// Obs and forecast use the variable's static bounds. The difference
    /// uses the padded min/max of the current difference grid, and is `None`
    /// when that grid is absent or has no valid cell.
    pub fn current_range(&self) -> Option<ValueRange> {
        let ds = self.dataset.as_deref()?;
        match self.selection.data_type {
            DataType::Obs | DataType::Forecast => {
                Some(ds.metadata().bounds_for(self.selection.variable).into())
            }
            DataType::Difference => {
                let grid = self.current_grid()?;
                let (min, max) = grid.min_max()?;
                Some(ValueRange::padded(min, max))
            }
        }
    }

    /// Series at an explicit cell for the selected variable.
    pub fn time_series_at(&self, row: usize, col: usize) -> Option<TimeSeries> {
        let ds = self.dataset.as_deref()?;
        match TimeSeries::extract(ds, self.selection.variable, row, col) {
            Ok(series) => Some(series),
            Err(e) => {
                warn!(error = %e, "Time series unavailable");
                None
            }
        }
    }

    /// Series at the selected point, if any.
    pub fn time_series(&self) -> Option<TimeSeries> {
        let point = self.selection.point?;
        self.time_series_at(point.row, point.col)
    }
}
