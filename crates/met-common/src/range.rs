//! Value ranges used for colour scaling and legends.

use serde::{Deserialize, Serialize};

use crate::variable::VariableBounds;

/// Fraction of the data span added on each side of a dynamic range.
pub const DYNAMIC_RANGE_PADDING: f64 = 0.1;

/// Inclusive `[min, max]` display range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range derived from actual data: pad by 10% of the span on each side,
    /// then round outward (floor the min, ceil the max).
    pub fn padded(actual_min: f64, actual_max: f64) -> Self {
        let pad = (actual_max - actual_min) * DYNAMIC_RANGE_PADDING;
        Self {
            min: (actual_min - pad).floor(),
            max: (actual_max + pad).ceil(),
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Largest absolute endpoint, the half-width of a symmetric domain.
    pub fn abs_max(&self) -> f64 {
        self.min.abs().max(self.max.abs())
    }

    /// Position of `value` within the range as a fraction, clamped to `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        if span.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    /// Value at fraction `t` of the range.
    pub fn lerp(&self, t: f64) -> f64 {
        self.min + self.span() * t
    }
}

impl From<VariableBounds> for ValueRange {
    fn from(bounds: VariableBounds) -> Self {
        Self::new(bounds.min, bounds.max)
    }
}
