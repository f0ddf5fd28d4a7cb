//! Per-variable colour ramps and the dynamic diverging scale.
//!
//! Each variable owns a hand-tuned ramp of 8 colours over 8 non-uniform
//! breakpoints. The derived difference layer uses one shared blue-white-red
//! ramp whose domain is rebuilt from the current data range so that zero
//! always lands on the neutral midpoint. Interpolation between stops is done
//! in Oklab to avoid banding.

use met_common::{DataType, ValueRange, Variable};
use palette::{IntoColor, Mix, Oklab, Srgb};
use serde::{Deserialize, Serialize};

use crate::RenderError;

/// RGBA colour, 8 bits per channel, not premultiplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    fn to_oklab(self) -> Oklab {
        Srgb::new(self.r, self.g, self.b)
            .into_format::<f32>()
            .into_color()
    }

    fn from_oklab(lab: Oklab, alpha: u8) -> Self {
        let rgb: Srgb<f32> = lab.into_color();
        let rgb: Srgb<u8> = rgb.into_format();
        Self::new(rgb.red, rgb.green, rgb.blue, alpha)
    }
}

/// Colour returned for missing or NaN values.
pub const MISSING_COLOR: Color = Color::rgb(0xcc, 0xcc, 0xcc);

/// One `(value, colour)` breakpoint of a ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub value: f64,
    pub color: Color,
}

/// Piecewise ramp over strictly ascending breakpoints.
#[derive(Debug, Clone)]
pub struct ColorRamp {
    stops: Vec<ColorStop>,
    lab: Vec<Oklab>,
}

impl ColorRamp {
    pub fn new(stops: Vec<ColorStop>) -> Result<Self, RenderError> {
        if stops.len() < 2 {
            return Err(RenderError::InvalidRamp(
                "a ramp needs at least 2 color stops".to_string(),
            ));
        }
        if let Some(w) = stops.windows(2).find(|w| !(w[1].value > w[0].value)) {
            return Err(RenderError::InvalidRamp(format!(
                "breakpoints must ascend strictly ({} then {})",
                w[0].value, w[1].value
            )));
        }
        let lab = stops.iter().map(|s| s.color.to_oklab()).collect();
        Ok(Self { stops, lab })
    }

    /// Build from parallel breakpoint and colour lists.
    pub fn from_parts(values: &[f64], colors: &[Color]) -> Result<Self, RenderError> {
        if values.len() != colors.len() {
            return Err(RenderError::InvalidRamp(format!(
                "{} breakpoints for {} colors",
                values.len(),
                colors.len()
            )));
        }
        Self::new(
            values
                .iter()
                .zip(colors)
                .map(|(&value, &color)| ColorStop { value, color })
                .collect(),
        )
    }

    fn with_lab(mut self) -> Self {
        self.lab = self.stops.iter().map(|s| s.color.to_oklab()).collect();
        self
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// `(first breakpoint, last breakpoint)`
    pub fn domain(&self) -> (f64, f64) {
        (self.stops[0].value, self.stops[self.stops.len() - 1].value)
    }

    /// Colour at `value`, clamped to the end colours outside the domain.
    /// NaN gives [`MISSING_COLOR`].
    pub fn sample(&self, value: f64) -> Color {
        if value.is_nan() {
            return MISSING_COLOR;
        }
        let first = &self.stops[0];
        let last = &self.stops[self.stops.len() - 1];
        if value <= first.value {
            return first.color;
        }
        if value >= last.value {
            return last.color;
        }

        let hi = self
            .stops
            .iter()
            .position(|s| value <= s.value)
            .unwrap_or(self.stops.len() - 1);
        let lo = hi - 1;
        let (low, high) = (&self.stops[lo], &self.stops[hi]);
        let t = (value - low.value) / (high.value - low.value);
        if t <= 0.0 {
            return low.color;
        }
        if t >= 1.0 {
            return high.color;
        }
        let mixed = self.lab[lo].mix(self.lab[hi], t as f32);
        Color::from_oklab(mixed, 255)
    }
}

struct RampDef {
    breakpoints: [f64; 8],
    colors: [&'static str; 8],
}

const VIRIDIS: [&str; 8] = [
    "#440154", "#46327e", "#365c8d", "#277f8e", "#1fa187", "#4ac16d", "#a0da39", "#fde725",
];

// Breakpoints are denser around the values forecasters care about most.
const RAMPS: [RampDef; 11] = [
    // tmax: tight spacing through the 32-41 °C heatwave band
    RampDef {
        breakpoints: [15.0, 22.0, 28.0, 32.0, 35.0, 38.0, 41.0, 45.0],
        colors: [
            "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c", "#800026",
        ],
    },
    // tmin
    RampDef {
        breakpoints: [5.0, 10.0, 14.0, 18.0, 21.0, 24.0, 27.0, 30.0],
        colors: [
            "#313695", "#4575b4", "#74add1", "#abd9e9", "#fee090", "#fdae61", "#f46d43", "#a50026",
        ],
    },
    // precip: light falls resolved finely
    RampDef {
        breakpoints: [0.0, 1.0, 2.5, 5.0, 10.0, 20.0, 35.0, 50.0],
        colors: [
            "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#084594",
        ],
    },
    // rh
    RampDef {
        breakpoints: [20.0, 35.0, 45.0, 55.0, 62.0, 70.0, 80.0, 90.0],
        colors: [
            "#8c510a", "#bf812d", "#dfc27d", "#f6e8c3", "#c7eae5", "#80cdc1", "#35978f", "#01665e",
        ],
    },
    // wind_avg
    RampDef {
        breakpoints: [0.5, 2.0, 3.5, 5.0, 6.5, 8.0, 10.0, 12.0],
        colors: [
            "#f7fcf5", "#e5f5e0", "#c7e9c0", "#a1d99b", "#74c476", "#41ab5d", "#238b45", "#005a32",
        ],
    },
    // wind_gust: damaging gusts above 15 m/s
    RampDef {
        breakpoints: [1.0, 5.0, 9.0, 12.0, 15.0, 18.0, 21.0, 25.0],
        colors: [
            "#fcfbfd", "#efedf5", "#dadaeb", "#bcbddc", "#9e9ac8", "#807dba", "#6a51a3", "#4a1486",
        ],
    },
    // pressure_sfc: centred on the 1012-1014 hPa mean
    RampDef {
        breakpoints: [1000.0, 1005.0, 1009.0, 1012.0, 1014.0, 1017.0, 1021.0, 1025.0],
        colors: [
            "#5e4fa2", "#3288bd", "#66c2a5", "#abdda4", "#e6f598", "#fee08b", "#fdae61", "#d53e4f",
        ],
    },
    // geopotential_850
    RampDef {
        breakpoints: [1400.0, 1440.0, 1480.0, 1510.0, 1530.0, 1550.0, 1575.0, 1600.0],
        colors: VIRIDIS,
    },
    // geopotential_700
    RampDef {
        breakpoints: [2900.0, 2950.0, 2990.0, 3020.0, 3040.0, 3060.0, 3080.0, 3100.0],
        colors: VIRIDIS,
    },
    // geopotential_500: ridge heights around 5580-5670 m
    RampDef {
        breakpoints: [5400.0, 5480.0, 5540.0, 5580.0, 5610.0, 5640.0, 5670.0, 5700.0],
        colors: [
            "#0d0887", "#5302a3", "#8b0aa5", "#b83289", "#db5c68", "#f48849", "#febd2a", "#f0f921",
        ],
    },
    // geopotential_250
    RampDef {
        breakpoints: [10300.0, 10400.0, 10480.0, 10540.0, 10590.0, 10630.0, 10670.0, 10700.0],
        colors: [
            "#000004", "#320a5e", "#781c6d", "#bc3754", "#ed6925", "#fbb61a", "#f1ed6f", "#fcffa4",
        ],
    },
];

/// Blue-white-red ramp for signed differences.
pub const DIVERGING_COLORS: [&str; 9] = [
    "#2166ac", "#4393c3", "#92c5de", "#d1e5f0", "#f7f7f7", "#fddbc7", "#f4a582", "#d6604d",
    "#b2182b",
];

fn parse_palette(hex: &[&str]) -> Vec<Color> {
    // The tables above are constant and well-formed.
    hex.iter()
        .map(|h| Color::from_hex(h).unwrap_or(MISSING_COLOR))
        .collect()
}

/// Fixed ramp for a variable's observed/forecast values.
pub fn variable_ramp(variable: Variable) -> ColorRamp {
    let def = &RAMPS[variable.index()];
    let colors = parse_palette(&def.colors);
    let stops = def
        .breakpoints
        .iter()
        .zip(colors)
        .map(|(&value, color)| ColorStop { value, color })
        .collect();
    ColorRamp { lab: Vec::new(), stops }.with_lab()
}

/// Symmetric breakpoints for the diverging ramp.
///
/// With `abs_max = max(|min|, |max|)` the 9 breakpoints split
/// `[-abs_max, +abs_max]` into 8 equal steps, so zero is always the centre
/// stop. An all-zero or non-finite range falls back to `abs_max = 1`.
pub fn diverging_breakpoints(range: &ValueRange) -> [f64; 9] {
    let abs_max = range.abs_max();
    let abs_max = if abs_max.is_finite() && abs_max > 0.0 {
        abs_max
    } else {
        1.0
    };
    let step = 2.0 * abs_max / 8.0;
    let mut breakpoints = [0.0; 9];
    for (i, bp) in breakpoints.iter_mut().enumerate() {
        *bp = -abs_max + step * i as f64;
    }
    breakpoints
}

/// Diverging ramp fitted to the current difference range.
pub fn diverging_ramp(range: &ValueRange) -> ColorRamp {
    let colors = parse_palette(&DIVERGING_COLORS);
    let stops = diverging_breakpoints(range)
        .iter()
        .zip(colors)
        .map(|(&value, color)| ColorStop { value, color })
        .collect();
    ColorRamp { lab: Vec::new(), stops }.with_lab()
}

/// A ramp resolved for one `(variable, data type, range)` selection.
#[derive(Debug, Clone)]
pub struct ColorScale {
    ramp: ColorRamp,
    data_type: DataType,
}

impl ColorScale {
    pub fn new(variable: Variable, data_type: DataType, range: &ValueRange) -> Self {
        let ramp = match data_type {
            DataType::Difference => diverging_ramp(range),
            DataType::Obs | DataType::Forecast => variable_ramp(variable),
        };
        Self { ramp, data_type }
    }

    pub fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Colour for a cell value; missing and NaN map to [`MISSING_COLOR`].
    pub fn color(&self, value: Option<f64>) -> Color {
        match value {
            Some(v) => self.ramp.sample(v),
            None => MISSING_COLOR,
        }
    }
}

/// One-shot colour lookup.
pub fn color_for(
    value: Option<f64>,
    variable: Variable,
    data_type: DataType,
    range: &ValueRange,
) -> Color {
    ColorScale::new(variable, data_type, range).color(value)
}
