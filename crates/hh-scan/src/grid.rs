use std::collections::HashMap;

use hh_core::{CutPoint, Error, Result};
use serde::{Deserialize, Serialize};

use crate::axis::ScanAxes;
use crate::records::{FomRecords, Quantity, ValidityThresholds};

/// Dense 2D grid indexed by (BDT position, Xbb position).
///
/// Cells that received no valid record hold `None`, so a genuine zero is
/// never confused with "no data".
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2D {
    n_bdt: usize,
    n_xbb: usize,
    cells: Vec<Option<f64>>,
}

impl Grid2D {
    pub fn new(n_bdt: usize, n_xbb: usize) -> Self {
        Self { n_bdt, n_xbb, cells: vec![None; n_bdt * n_xbb] }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_bdt, self.n_xbb)
    }

    #[inline]
    fn offset(&self, i_bdt: usize, i_xbb: usize) -> usize {
        assert!(i_bdt < self.n_bdt && i_xbb < self.n_xbb, "grid index out of range");
        i_bdt * self.n_xbb + i_xbb
    }

    pub fn get(&self, i_bdt: usize, i_xbb: usize) -> Option<f64> {
        self.cells[self.offset(i_bdt, i_xbb)]
    }

    pub fn set(&mut self, i_bdt: usize, i_xbb: usize, value: f64) {
        let k = self.offset(i_bdt, i_xbb);
        self.cells[k] = Some(value);
    }

    /// `(i_bdt, i_xbb, value)` for every filled cell, BDT-major.
    pub fn iter_valid(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let n_xbb = self.n_xbb;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(k, c)| c.map(|v| (k / n_xbb, k % n_xbb, v)))
    }

    pub fn n_valid(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Row-major nested copy: `rows[i_bdt][i_xbb]`.
    pub fn to_rows(&self) -> Vec<Vec<Option<f64>>> {
        if self.n_xbb == 0 {
            return vec![Vec::new(); self.n_bdt];
        }
        self.cells.chunks(self.n_xbb).map(|r| r.to_vec()).collect()
    }
}

/// One grid per [`Quantity`] over a shared pair of axes.
#[derive(Debug, Clone)]
pub struct ScanGrids {
    pub axes: ScanAxes,
    pub fom: Grid2D,
    pub signal: Grid2D,
    pub background: Grid2D,
    pub background_unc: Grid2D,
    pub sideband_events: Grid2D,
}

impl ScanGrids {
    pub fn quantity(&self, q: Quantity) -> &Grid2D {
        match q {
            Quantity::Fom => &self.fom,
            Quantity::Signal => &self.signal,
            Quantity::Background => &self.background,
            Quantity::BackgroundUnc => &self.background_unc,
            Quantity::SidebandEvents => &self.sideband_events,
        }
    }

    pub fn cut_at(&self, i_bdt: usize, i_xbb: usize) -> Option<CutPoint> {
        Some(CutPoint::new(self.axes.bdt.get(i_bdt)?, self.axes.xbb.get(i_xbb)?))
    }
}

/// Exact map key; `0.0` and `-0.0` share a key since they compare equal.
fn cut_key(v: f64) -> u64 {
    if v == 0.0 { 0 } else { v.to_bits() }
}

/// What to do with a grid cell whose cut pair has no record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRecordPolicy {
    /// Abort with [`Error::MissingRecord`].
    #[default]
    Fail,
    /// Leave the cell empty.
    Empty,
}

/// Aggregation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateOptions {
    pub thresholds: ValidityThresholds,
    pub missing: MissingRecordPolicy,
}

/// Fill the per-quantity grids for every (BDT, Xbb) pair of `axes`.
///
/// Pairs are matched to records by exact equality. When several records share
/// a pair the first one wins. Records failing the thresholds leave their cell
/// empty; pairs with no record follow [`AggregateOptions::missing`].
pub fn aggregate(
    records: &FomRecords,
    axes: ScanAxes,
    options: &AggregateOptions,
) -> Result<ScanGrids> {
    records.validate()?;

    let mut index: HashMap<(u64, u64), usize> = HashMap::with_capacity(records.len());
    for (i, (&b, &x)) in records.bdt_cuts.iter().zip(&records.xbb_cuts).enumerate() {
        index.entry((cut_key(b), cut_key(x))).or_insert(i);
    }

    let (n_bdt, n_xbb) = (axes.bdt.len(), axes.xbb.len());
    let mut fom = Grid2D::new(n_bdt, n_xbb);
    let mut signal = Grid2D::new(n_bdt, n_xbb);
    let mut background = Grid2D::new(n_bdt, n_xbb);
    let mut background_unc = Grid2D::new(n_bdt, n_xbb);
    let mut sideband_events = Grid2D::new(n_bdt, n_xbb);
    let mut n_missing = 0usize;

    for (j, &xbb_cut) in axes.xbb.values().iter().enumerate() {
        for (i, &bdt_cut) in axes.bdt.values().iter().enumerate() {
            let Some(&idx) = index.get(&(cut_key(bdt_cut), cut_key(xbb_cut))) else {
                match options.missing {
                    MissingRecordPolicy::Fail => {
                        return Err(Error::MissingRecord { bdt_cut, xbb_cut });
                    }
                    MissingRecordPolicy::Empty => {
                        n_missing += 1;
                        continue;
                    }
                }
            };

            let rec = records.record(idx);
            if !options.thresholds.passes(&rec) {
                tracing::trace!(bdt_cut, xbb_cut, "cell fails statistics requirements");
                continue;
            }
            fom.set(i, j, rec.fom);
            signal.set(i, j, rec.signal);
            background.set(i, j, rec.background);
            background_unc.set(i, j, rec.background_unc);
            sideband_events.set(i, j, rec.sideband_events);
        }
    }

    if n_missing > 0 {
        tracing::warn!(n_missing, "cut pairs without a record left empty");
    }
    tracing::info!(cells = axes.n_cells(), valid = fom.n_valid(), "aggregated FoM grid");

    Ok(ScanGrids { axes, fom, signal, background, background_unc, sideband_events })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use hh_core::CutBounds;

    use super::*;

    fn scenario() -> FomRecords {
        FomRecords::new(
            vec![1.5, 0.9, 2.0, 3.0],
            vec![1.0, 1.0, 1.0, 1.0],
            vec![5.0, 5.0, 5.0, 5.0],
            vec![1.0, 1.0, 1.0, 1.0],
            vec![20.0, 20.0, 20.0, 20.0],
            vec![0.7, 0.7, 0.8, 0.8],
            vec![0.70, 0.75, 0.70, 0.75],
        )
        .unwrap()
    }

    fn build_with(records: &FomRecords, options: &AggregateOptions) -> Result<ScanGrids> {
        let axes = ScanAxes::build(records, CutBounds::unbounded(), CutBounds::unbounded())?;
        aggregate(records, axes, options)
    }

    fn build(records: &FomRecords) -> Result<ScanGrids> {
        build_with(records, &AggregateOptions::default())
    }

    #[test]
    fn cells_match_records() {
        let records = scenario();
        let grids = build(&records).unwrap();
        assert_eq!(grids.fom.shape(), (2, 2));
        for (i, j, v) in grids.fom.iter_valid() {
            let cut = grids.cut_at(i, j).unwrap();
            let idx = (0..records.len())
                .find(|&k| records.bdt_cuts[k] == cut.bdt_cut && records.xbb_cuts[k] == cut.xbb_cut)
                .unwrap();
            assert_relative_eq!(v, records.fom[idx]);
        }
        assert_eq!(grids.fom.get(0, 1), Some(0.9));
        assert_eq!(grids.background.get(1, 0), Some(5.0));
    }

    #[test]
    fn failing_record_leaves_cell_empty() {
        let mut records = scenario();
        records.background[1] = 1.0;
        let grids = build(&records).unwrap();
        assert_eq!(grids.fom.get(0, 1), None);
        assert_eq!(grids.signal.get(0, 1), None);
        assert_eq!(grids.fom.n_valid(), 3);
    }

    #[test]
    fn zero_fom_is_kept_distinct_from_empty() {
        let mut records = scenario();
        records.fom[0] = 0.0;
        records.sideband_events[3] = 3.0;
        let grids = build(&records).unwrap();
        assert_eq!(grids.fom.get(0, 0), Some(0.0));
        assert_eq!(grids.fom.get(1, 1), None);
    }

    #[test]
    fn missing_pair_fails_fast() {
        let mut records = scenario();
        records.fom.pop();
        records.signal.pop();
        records.background.pop();
        records.background_unc.pop();
        records.sideband_events.pop();
        records.bdt_cuts.pop();
        records.xbb_cuts.pop();
        let err = build(&records).unwrap_err();
        match err {
            Error::MissingRecord { bdt_cut, xbb_cut } => {
                assert_eq!(bdt_cut, 0.8);
                assert_eq!(xbb_cut, 0.75);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_pair_left_empty_on_request() {
        let mut records = scenario();
        records.fom.truncate(3);
        records.signal.truncate(3);
        records.background.truncate(3);
        records.background_unc.truncate(3);
        records.sideband_events.truncate(3);
        records.bdt_cuts.truncate(3);
        records.xbb_cuts.truncate(3);
        let options =
            AggregateOptions { missing: MissingRecordPolicy::Empty, ..Default::default() };
        let grids = build_with(&records, &options).unwrap();
        assert_eq!(grids.fom.get(1, 1), None);
        assert_eq!(grids.fom.n_valid(), 3);
    }

    #[test]
    fn first_duplicate_wins() {
        let mut records = scenario();
        records.fom.push(0.1);
        records.signal.push(1.0);
        records.background.push(5.0);
        records.background_unc.push(1.0);
        records.sideband_events.push(20.0);
        records.bdt_cuts.push(0.7);
        records.xbb_cuts.push(0.70);
        let grids = build(&records).unwrap();
        assert_eq!(grids.fom.get(0, 0), Some(1.5));
    }

    #[test]
    fn rows_layout() {
        let grids = build(&scenario()).unwrap();
        let rows = grids.fom.to_rows();
        assert_eq!(rows, vec![vec![Some(1.5), Some(0.9)], vec![Some(2.0), Some(3.0)]]);
    }
}
