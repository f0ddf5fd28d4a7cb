//! Per-cell time series across all days.

use chrono::NaiveDate;
use met_common::{Dataset, Source, Variable, VizError, VizResult};
use serde::Serialize;

/// Values at one grid cell for every day of the dataset.
///
/// All four vectors have length T. Missing values stay in place as `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub variable: Variable,
    pub row: usize,
    pub col: usize,
    pub days: Vec<NaiveDate>,
    pub obs: Vec<Option<f64>>,
    pub forecast: Vec<Option<f64>>,
    /// `obs - forecast`, `None` unless both are present
    pub difference: Vec<Option<f64>>,
}

impl TimeSeries {
    /// Extract the series at `(row, col)`. An absent daily grid contributes
    /// `None` for that day.
    pub fn extract(dataset: &Dataset, variable: Variable, row: usize, col: usize) -> VizResult<Self> {
        if row >= dataset.rows() || col >= dataset.cols() {
            return Err(VizError::PointOutOfRange {
                row,
                col,
                rows: dataset.rows(),
                cols: dataset.cols(),
            });
        }
        if !dataset.has_variable(variable) {
            return Err(VizError::UnknownVariable(variable.key().to_string()));
        }

        let days = dataset.metadata().times.clone();
        let sample = |source: Source| -> Vec<Option<f64>> {
            (0..days.len())
                .map(|day| dataset.source(source).value(variable, day, row, col))
                .collect()
        };
        let obs = sample(Source::Obs);
        let forecast = sample(Source::Forecast);
        let difference = obs
            .iter()
            .zip(&forecast)
            .map(|(o, f)| Some((*o)? - (*f)?))
            .collect();

        Ok(Self {
            variable,
            row,
            col,
            days,
            obs,
            forecast,
            difference,
        })
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
