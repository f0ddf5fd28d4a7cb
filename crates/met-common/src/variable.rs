//! Variables, data sources and their static configuration.
//!
//! The variable set is closed: every name that reaches the crate boundary is
//! parsed into [`Variable`] and unknown names are rejected up front.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VizError;

/// One of the physical quantities present in the dataset.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Variable {
    #[default]
    #[serde(rename = "tmax")]
    Tmax,
    #[serde(rename = "tmin")]
    Tmin,
    #[serde(rename = "precip")]
    Precip,
    #[serde(rename = "rh")]
    Rh,
    #[serde(rename = "wind_avg")]
    WindAvg,
    #[serde(rename = "wind_gust")]
    WindGust,
    #[serde(rename = "pressure_sfc")]
    PressureSfc,
    #[serde(rename = "geopotential_850")]
    Geopotential850,
    #[serde(rename = "geopotential_700")]
    Geopotential700,
    #[serde(rename = "geopotential_500")]
    Geopotential500,
    #[serde(rename = "geopotential_250")]
    Geopotential250,
}

/// Static description of a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableInfo {
    /// Wire name, e.g. `"tmax"`
    pub key: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// Display unit
    pub unit: &'static str,
    /// Default display bounds for observed/forecast values
    pub bounds: VariableBounds,
    /// Whether values are shown as whole numbers
    pub integer_display: bool,
}

/// Static min/max used to scale observed and forecast grids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableBounds {
    pub min: f64,
    pub max: f64,
}

impl VariableBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

const fn info(
    key: &'static str,
    name: &'static str,
    unit: &'static str,
    min: f64,
    max: f64,
    integer_display: bool,
) -> VariableInfo {
    VariableInfo {
        key,
        name,
        unit,
        bounds: VariableBounds::new(min, max),
        integer_display,
    }
}

const VARIABLE_TABLE: [VariableInfo; 11] = [
    info("tmax", "Maximum Temperature", "°C", 15.0, 45.0, false),
    info("tmin", "Minimum Temperature", "°C", 5.0, 30.0, false),
    info("precip", "Precipitation", "mm", 0.0, 50.0, false),
    info("rh", "Relative Humidity", "%", 20.0, 90.0, false),
    info("wind_avg", "Average Wind Speed", "m/s", 0.5, 12.0, false),
    info("wind_gust", "Wind Gust", "m/s", 1.0, 25.0, false),
    info("pressure_sfc", "Surface Pressure", "hPa", 1000.0, 1025.0, false),
    info("geopotential_850", "Geopotential 850hPa", "m", 1400.0, 1600.0, true),
    info("geopotential_700", "Geopotential 700hPa", "m", 2900.0, 3100.0, true),
    info("geopotential_500", "Geopotential 500hPa", "m", 5400.0, 5700.0, true),
    info("geopotential_250", "Geopotential 250hPa", "m", 10300.0, 10700.0, true),
];

impl Variable {
    /// All variables in display order.
    pub const ALL: [Variable; 11] = [
        Variable::Tmax,
        Variable::Tmin,
        Variable::Precip,
        Variable::Rh,
        Variable::WindAvg,
        Variable::WindGust,
        Variable::PressureSfc,
        Variable::Geopotential850,
        Variable::Geopotential700,
        Variable::Geopotential500,
        Variable::Geopotential250,
    ];

    /// Position of this variable in [`Variable::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn info(self) -> &'static VariableInfo {
        &VARIABLE_TABLE[self.index()]
    }

    pub fn key(self) -> &'static str {
        self.info().key
    }

    pub fn default_bounds(self) -> VariableBounds {
        self.info().bounds
    }

    /// Geopotential heights are displayed as whole metres.
    pub fn is_geopotential(self) -> bool {
        self.info().integer_display
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Variable {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variable::ALL
            .iter()
            .copied()
            .find(|v| v.key() == s)
            .ok_or_else(|| VizError::UnknownVariable(s.to_string()))
    }
}

/// One of the two stored data sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Obs,
    Forecast,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Obs => f.write_str("obs"),
            Source::Forecast => f.write_str("forecast"),
        }
    }
}

/// Which grid the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    Obs,
    Forecast,
    /// `obs - forecast`, derived on access
    Difference,
}

impl DataType {
    pub const ALL: [DataType; 3] = [DataType::Obs, DataType::Forecast, DataType::Difference];

    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Obs => "obs",
            DataType::Forecast => "forecast",
            DataType::Difference => "difference",
        }
    }

    /// The stored source for this data type, `None` for the derived difference.
    pub fn source(self) -> Option<Source> {
        match self {
            DataType::Obs => Some(Source::Obs),
            DataType::Forecast => Some(Source::Forecast),
            DataType::Difference => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "obs" | "observed" => Ok(DataType::Obs),
            "forecast" | "fc" => Ok(DataType::Forecast),
            "difference" | "diff" => Ok(DataType::Difference),
            _ => Err(VizError::UnknownDataType(s.to_string())),
        }
    }
}
