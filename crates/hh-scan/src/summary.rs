use hh_core::CutBounds;
use serde::Serialize;

use crate::grid::ScanGrids;
use crate::select::Selection;

/// Selection outcome of one category, ready for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    pub category: String,
    pub bdt_bounds: CutBounds,
    pub xbb_bounds: CutBounds,
    pub n_bdt: usize,
    pub n_xbb: usize,
    pub n_valid_cells: usize,
    pub fom_min: f64,
    pub bdt_cuts: Vec<f64>,
    pub xbb_cuts: Vec<f64>,
    pub points: Vec<SelectedPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectedPoint {
    pub bdt_cut: f64,
    pub xbb_cut: f64,
    pub fom: f64,
    pub signal: Option<f64>,
    pub background: Option<f64>,
    pub background_unc: Option<f64>,
    pub sideband_events: Option<f64>,
}

impl ScanSummary {
    pub fn new(category: &str, grids: &ScanGrids, selection: &Selection) -> Self {
        let points = selection
            .cells
            .iter()
            .zip(&selection.points)
            .map(|(&(i, j), p)| SelectedPoint {
                bdt_cut: p.bdt_cut,
                xbb_cut: p.xbb_cut,
                fom: selection.fom_min,
                signal: grids.signal.get(i, j),
                background: grids.background.get(i, j),
                background_unc: grids.background_unc.get(i, j),
                sideband_events: grids.sideband_events.get(i, j),
            })
            .collect();
        Self {
            category: category.to_string(),
            bdt_bounds: grids.axes.bdt.bounds(),
            xbb_bounds: grids.axes.xbb.bounds(),
            n_bdt: grids.axes.bdt.len(),
            n_xbb: grids.axes.xbb.len(),
            n_valid_cells: grids.fom.n_valid(),
            fom_min: selection.fom_min,
            bdt_cuts: selection.bdt_cuts(),
            xbb_cuts: selection.xbb_cuts(),
            points,
        }
    }

    /// Plain-text console report.
    pub fn report(&self) -> String {
        let join = |v: &[f64]| v.iter().map(|x| format!("{x}")).collect::<Vec<_>>().join(", ");
        let mut out = String::new();
        out.push_str(&format!("Category: {}\n", self.category));
        out.push_str(&format!("Minimum FoM: {:.4}\n", self.fom_min));
        out.push_str(&format!("BDT cut: {}\n", join(&self.bdt_cuts)));
        out.push_str(&format!("Xbb cut: {}\n", join(&self.xbb_cuts)));
        if self.points.len() > 1 {
            out.push_str(&format!("Tied working points: {}\n", self.points.len()));
            for p in &self.points {
                out.push_str(&format!("  BDT {} / Xbb {}\n", p.bdt_cut, p.xbb_cut));
            }
        }
        out
    }
}
