// Per-cell statistic result: a finite value or an explicit "unavailable".

use std::fmt;

use serde::{Serialize, Serializer};

/// One statistic. Anything that is not a finite float is `Unavailable`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stat {
    Value(f64),
    Unavailable,
}

impl Stat {
    /// Wrap a raw result, downgrading NaN and infinities.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Self::Value(value)
        } else {
            Self::Unavailable
        }
    }

    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or(Self::Unavailable, Self::from_f64)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Round to `decimals` places; unavailable stays unavailable.
    pub fn rounded(self, decimals: u32) -> Self {
        match self {
            Self::Value(v) => Self::from_f64(round_to(v, decimals)),
            Self::Unavailable => Self::Unavailable,
        }
    }
}

impl From<f64> for Stat {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Unavailable => f.write_str("n/a"),
        }
    }
}

impl Serialize for Stat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::Unavailable => serializer.serialize_none(),
        }
    }
}

/// Half-away-from-zero rounding to a fixed number of decimals.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        // Too large to scale; already beyond the requested precision.
        return value;
    }
    let rounded = scaled.round() / factor;
    // Normalise -0.0 so serialised output never shows "-0.0".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
