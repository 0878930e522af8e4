//! Common value types for the scan

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// A (BDT, Xbb) threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutPoint {
    /// Threshold on the BDT score
    pub bdt_cut: f64,
    /// Threshold on the Xbb discriminant
    pub xbb_cut: f64,
}

impl CutPoint {
    /// Create a new cut point
    pub fn new(bdt_cut: f64, xbb_cut: f64) -> Self {
        Self { bdt_cut, xbb_cut }
    }
}

/// Closed interval `[min, max]` applied to one cut axis.
///
/// An open end is infinite in memory and absent when serialized. A missing
/// or `null` bound reads back as infinite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutBounds {
    /// Inclusive lower bound
    #[serde(
        default = "neg_infinity",
        skip_serializing_if = "is_neg_infinity",
        deserialize_with = "lower_bound"
    )]
    pub min: f64,
    /// Inclusive upper bound
    #[serde(
        default = "pos_infinity",
        skip_serializing_if = "is_pos_infinity",
        deserialize_with = "upper_bound"
    )]
    pub max: f64,
}

fn neg_infinity() -> f64 {
    f64::NEG_INFINITY
}

fn pos_infinity() -> f64 {
    f64::INFINITY
}

fn is_neg_infinity(v: &f64) -> bool {
    *v == f64::NEG_INFINITY
}

fn is_pos_infinity(v: &f64) -> bool {
    *v == f64::INFINITY
}

fn lower_bound<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NEG_INFINITY))
}

fn upper_bound<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::INFINITY))
}

impl CutBounds {
    /// Create bounds, rejecting NaN and inverted intervals.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if min.is_nan() || max.is_nan() {
            return Err(Error::Validation(format!("bounds must not be NaN: [{min}, {max}]")));
        }
        if min > max {
            return Err(Error::Validation(format!("inverted bounds: min={min} > max={max}")));
        }
        Ok(Self { min, max })
    }

    /// Bounds that accept every finite value.
    pub fn unbounded() -> Self {
        Self { min: f64::NEG_INFINITY, max: f64::INFINITY }
    }

    /// `value >= min && value <= max`
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}
