//! The in-memory dataset: coordinates, dates and daily grids per source.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::bbox::GeoBounds;
use crate::error::{VizError, VizResult};
use crate::grid::Grid;
use crate::time::{format_day, parse_day};
use crate::variable::{Source, Variable, VariableBounds};

/// Coordinate axes, time axis and per-variable display bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetMetadata {
    /// Latitude of each grid row (length M)
    pub lat: Vec<f64>,
    /// Longitude of each grid column (length N)
    pub lon: Vec<f64>,
    /// Calendar day of each time step (length T)
    pub times: Vec<NaiveDate>,
    /// Static bounds overriding the built-in defaults
    pub bounds: BTreeMap<Variable, VariableBounds>,
}

impl DatasetMetadata {
    pub fn new(lat: Vec<f64>, lon: Vec<f64>, times: Vec<NaiveDate>) -> Self {
        Self {
            lat,
            lon,
            times,
            bounds: BTreeMap::new(),
        }
    }

    /// Static bounds for a variable, falling back to the built-in table.
    pub fn bounds_for(&self, variable: Variable) -> VariableBounds {
        self.bounds
            .get(&variable)
            .copied()
            .unwrap_or_else(|| variable.default_bounds())
    }

    pub fn geo_bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_coords(&self.lat, &self.lon)
    }
}

/// Daily grids of one source, keyed by variable. A `None` day is a grid
/// that is absent from an otherwise valid dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceGrids {
    grids: BTreeMap<Variable, Vec<Option<Grid>>>,
}

impl SourceGrids {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variable: Variable, days: Vec<Option<Grid>>) {
        self.grids.insert(variable, days);
    }

    pub fn get(&self, variable: Variable, day: usize) -> Option<&Grid> {
        self.grids.get(&variable)?.get(day)?.as_ref()
    }

    /// Scalar at one cell, `None` if the grid or the cell is missing.
    pub fn value(&self, variable: Variable, day: usize, row: usize, col: usize) -> Option<f64> {
        self.get(variable, day)?.get(row, col)
    }

    pub fn days(&self, variable: Variable) -> Option<&[Option<Grid>]> {
        self.grids.get(&variable).map(Vec::as_slice)
    }

    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.grids.keys().copied()
    }
}

/// A validated dataset. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    metadata: DatasetMetadata,
    obs: SourceGrids,
    forecast: SourceGrids,
}

impl Dataset {
    /// Build a dataset, checking every structural invariant.
    pub fn new(metadata: DatasetMetadata, obs: SourceGrids, forecast: SourceGrids) -> VizResult<Self> {
        validate(&metadata, &obs, &forecast)?;
        Ok(Self {
            metadata,
            obs,
            forecast,
        })
    }

    /// Parse and validate the JSON wire format.
    pub fn from_json_slice(bytes: &[u8]) -> VizResult<Self> {
        let raw: RawDataset = serde_json::from_slice(bytes)
            .map_err(|e| VizError::validation(format!("malformed dataset JSON: {}", e)))?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawDataset) -> VizResult<Self> {
        let RawDataset {
            metadata,
            obs,
            forecast,
        } = raw;

        let times = metadata
            .times
            .iter()
            .map(|t| parse_day(t))
            .collect::<VizResult<Vec<_>>>()?;

        let mut bounds = BTreeMap::new();
        for (key, meta) in metadata.variables {
            let variable = parse_variable_key(&key)?;
            bounds.insert(variable, VariableBounds::new(meta.min, meta.max));
        }

        let meta = DatasetMetadata {
            lat: metadata.lat,
            lon: metadata.lon,
            times,
            bounds,
        };
        let obs = convert_source(Source::Obs, obs)?;
        let forecast = convert_source(Source::Forecast, forecast)?;
        Self::new(meta, obs, forecast)
    }

    /// Wire representation, the inverse of [`Dataset::from_raw`].
    pub fn to_raw(&self) -> RawDataset {
        let variables = self
            .variables()
            .map(|v| {
                let info = v.info();
                let bounds = self.metadata.bounds_for(v);
                (
                    v.key().to_string(),
                    RawVariableMeta {
                        name: Some(info.name.to_string()),
                        unit: Some(info.unit.to_string()),
                        min: bounds.min,
                        max: bounds.max,
                    },
                )
            })
            .collect();

        RawDataset {
            metadata: RawMetadata {
                lat: self.metadata.lat.clone(),
                lon: self.metadata.lon.clone(),
                times: self.metadata.times.iter().copied().map(format_day).collect(),
                variables,
            },
            obs: source_to_raw(&self.obs),
            forecast: source_to_raw(&self.forecast),
        }
    }

    pub fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    pub fn source(&self, source: Source) -> &SourceGrids {
        match source {
            Source::Obs => &self.obs,
            Source::Forecast => &self.forecast,
        }
    }

    /// One stored grid, or `MissingGrid` if it is absent.
    pub fn grid(&self, source: Source, variable: Variable, day: usize) -> VizResult<&Grid> {
        self.source(source)
            .get(variable, day)
            .ok_or(VizError::MissingGrid {
                kind: source,
                variable,
                day,
            })
    }

    /// Variables present in both sources.
    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.obs.variables()
    }

    pub fn has_variable(&self, variable: Variable) -> bool {
        self.obs.days(variable).is_some()
    }

    /// Number of grid rows (M).
    pub fn rows(&self) -> usize {
        self.metadata.lat.len()
    }

    /// Number of grid columns (N).
    pub fn cols(&self) -> usize {
        self.metadata.lon.len()
    }

    /// Number of time steps (T).
    pub fn days(&self) -> usize {
        self.metadata.times.len()
    }

    pub fn geo_bounds(&self) -> GeoBounds {
        // lat/lon are validated non-empty and finite
        self.metadata
            .geo_bounds()
            .unwrap_or(GeoBounds::new(0.0, 0.0, 0.0, 0.0))
    }
}

fn parse_variable_key(key: &str) -> VizResult<Variable> {
    key.parse::<Variable>()
        .map_err(|_| VizError::validation(format!("unknown variable '{}'", key)))
}

fn convert_source(source: Source, raw: RawSource) -> VizResult<SourceGrids> {
    let mut grids = SourceGrids::new();
    for (key, days) in raw {
        let variable = parse_variable_key(&key)?;
        let days = days
            .into_iter()
            .enumerate()
            .map(|(day, rows)| {
                rows.map(Grid::from_rows)
                    .transpose()
                    .map_err(|e| VizError::validation(format!("{} {} day {}: {}", source, key, day, e)))
            })
            .collect::<VizResult<Vec<_>>>()?;
        grids.insert(variable, days);
    }
    Ok(grids)
}

fn source_to_raw(grids: &SourceGrids) -> RawSource {
    grids
        .grids
        .iter()
        .map(|(v, days)| {
            (
                v.key().to_string(),
                days.iter().map(|g| g.as_ref().map(Grid::to_rows)).collect(),
            )
        })
        .collect()
}

fn check_axis(name: &str, coords: &[f64]) -> VizResult<()> {
    if coords.is_empty() {
        return Err(VizError::validation(format!("{} axis is empty", name)));
    }
    if let Some(bad) = coords.iter().find(|c| !c.is_finite()) {
        return Err(VizError::validation(format!("{} axis contains {}", name, bad)));
    }
    let increasing = coords.windows(2).all(|w| w[1] > w[0]);
    let decreasing = coords.windows(2).all(|w| w[1] < w[0]);
    if !(increasing || decreasing) {
        return Err(VizError::validation(format!(
            "{} axis is not strictly monotonic",
            name
        )));
    }
    Ok(())
}

fn validate(meta: &DatasetMetadata, obs: &SourceGrids, forecast: &SourceGrids) -> VizResult<()> {
    check_axis("lat", &meta.lat)?;
    check_axis("lon", &meta.lon)?;
    if meta.times.is_empty() {
        return Err(VizError::validation("time axis is empty"));
    }

    for (variable, bounds) in &meta.bounds {
        if !(bounds.min < bounds.max) {
            return Err(VizError::validation(format!(
                "bounds for {} must satisfy min < max (got {}..{})",
                variable, bounds.min, bounds.max
            )));
        }
    }

    let obs_vars: Vec<Variable> = obs.variables().collect();
    let forecast_vars: Vec<Variable> = forecast.variables().collect();
    if obs_vars != forecast_vars {
        return Err(VizError::validation(format!(
            "obs and forecast variable sets differ: {:?} vs {:?}",
            obs_vars, forecast_vars
        )));
    }

    let expected = (meta.lat.len(), meta.lon.len());
    for (source, grids) in [(Source::Obs, obs), (Source::Forecast, forecast)] {
        for (variable, days) in &grids.grids {
            if days.len() != meta.times.len() {
                return Err(VizError::validation(format!(
                    "{} {} has {} days, expected {}",
                    source,
                    variable,
                    days.len(),
                    meta.times.len()
                )));
            }
            for (day, grid) in days.iter().enumerate() {
                if let Some(grid) = grid {
                    if grid.dims() != expected {
                        return Err(VizError::validation(format!(
                            "{} {} day {} is {}x{}, expected {}x{}",
                            source,
                            variable,
                            day,
                            grid.rows(),
                            grid.cols(),
                            expected.0,
                            expected.1
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}

// === Wire format ===

/// Per-source payload: variable key -> `[T]` of optional `[M][N]` grids.
pub type RawSource = BTreeMap<String, Vec<Option<Vec<Vec<Option<f64>>>>>>;

/// The JSON document as delivered by the data pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDataset {
    pub metadata: RawMetadata,
    pub obs: RawSource,
    pub forecast: RawSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMetadata {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub times: Vec<String>,
    #[serde(default)]
    pub variables: BTreeMap<String, RawVariableMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVariableMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub min: f64,
    pub max: f64,
}
