use hh_core::{CutPoint, Error, Result};

use crate::grid::ScanGrids;

/// The minimum valid FoM and every cell attaining it.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub fom_min: f64,
    /// Tied cells as `(i_bdt, i_xbb)`, BDT-major.
    pub cells: Vec<(usize, usize)>,
    /// Cut values of `cells`, same order.
    pub points: Vec<CutPoint>,
}

impl Selection {
    /// Distinct BDT cuts among the tied points, ascending.
    pub fn bdt_cuts(&self) -> Vec<f64> {
        distinct_sorted(self.points.iter().map(|p| p.bdt_cut))
    }

    /// Distinct Xbb cuts among the tied points, ascending.
    pub fn xbb_cuts(&self) -> Vec<f64> {
        distinct_sorted(self.points.iter().map(|p| p.xbb_cut))
    }

    pub fn is_unique(&self) -> bool {
        self.points.len() == 1
    }
}

fn distinct_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.collect();
    v.sort_by(f64::total_cmp);
    v.dedup_by(|a, b| a == b);
    v
}

/// Find the global minimum over filled FoM cells, reporting all ties.
///
/// NaN cells never win. An all-empty grid is [`Error::NoQualifyingPoint`].
pub fn select_optimum(grids: &ScanGrids) -> Result<Selection> {
    let fom_min = grids
        .fom
        .iter_valid()
        .map(|(_, _, v)| v)
        .filter(|v| !v.is_nan())
        .min_by(f64::total_cmp)
        .ok_or(Error::NoQualifyingPoint)?;

    let mut cells = Vec::new();
    let mut points = Vec::new();
    for (i, j, v) in grids.fom.iter_valid() {
        if v == fom_min {
            let cut = grids.cut_at(i, j).ok_or_else(|| {
                Error::Computation(format!("grid cell ({i}, {j}) outside the cut axes"))
            })?;
            cells.push((i, j));
            points.push(cut);
        }
    }

    let selection = Selection { fom_min, cells, points };
    if !selection.is_unique() {
        tracing::warn!(
            n_tied = selection.cells.len(),
            fom_min,
            "several working points share the minimum FoM"
        );
    }
    Ok(selection)
}
