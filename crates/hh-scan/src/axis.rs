use hh_core::{CutBounds, Error, Result};

use crate::records::FomRecords;

/// Strictly increasing sequence of distinct cut values inside closed bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct CutAxis {
    values: Vec<f64>,
    bounds: CutBounds,
}

impl CutAxis {
    /// Unique, ascending values of `observed` with `bounds.contains(v)`.
    /// NaN cuts are dropped. The result may be empty.
    pub fn from_observed(observed: &[f64], bounds: CutBounds) -> Self {
        let mut values: Vec<f64> =
            observed.iter().copied().filter(|v| !v.is_nan() && bounds.contains(*v)).collect();
        values.sort_by(f64::total_cmp);
        // `==` rather than bit equality so that -0.0 and 0.0 collapse
        values.dedup_by(|a, b| a == b);
        Self { values, bounds }
    }

    /// Re-apply a (possibly narrower) bounds filter.
    pub fn restrict(&self, bounds: CutBounds) -> Self {
        Self::from_observed(&self.values, bounds)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn bounds(&self) -> CutBounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<f64> {
        self.values.get(idx).copied()
    }
}

/// The BDT and Xbb axes of one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanAxes {
    pub bdt: CutAxis,
    pub xbb: CutAxis,
}

impl ScanAxes {
    /// Derive both axes from the observed cuts, failing when bounds exclude
    /// every value on either axis.
    pub fn build(records: &FomRecords, bdt: CutBounds, xbb: CutBounds) -> Result<Self> {
        let bdt_axis = CutAxis::from_observed(&records.bdt_cuts, bdt);
        if bdt_axis.is_empty() {
            return Err(Error::EmptyAxis { axis: "bdt", min: bdt.min, max: bdt.max });
        }
        let xbb_axis = CutAxis::from_observed(&records.xbb_cuts, xbb);
        if xbb_axis.is_empty() {
            return Err(Error::EmptyAxis { axis: "xbb", min: xbb.min, max: xbb.max });
        }
        tracing::debug!(n_bdt = bdt_axis.len(), n_xbb = xbb_axis.len(), "built cut axes");
        Ok(Self { bdt: bdt_axis, xbb: xbb_axis })
    }

    pub fn n_cells(&self) -> usize {
        self.bdt.len() * self.xbb.len()
    }
}
