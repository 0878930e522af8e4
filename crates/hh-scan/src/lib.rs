//! # hh-scan
//!
//! Figure-of-merit scan over (BDT, Xbb) working points.
//!
//! The pipeline is linear: [`npz::load_fom_arrays`] reads the flat record
//! arrays, [`axis::ScanAxes::build`] derives the bounded cut axes,
//! [`grid::aggregate`] fills one grid per [`Quantity`] from records that pass
//! [`ValidityThresholds`], and [`select::select_optimum`] finds every cut pair
//! attaining the minimum FoM.

#![warn(clippy::all)]

/// Plot-friendly heatmap artifacts.
pub mod artifact;
/// Bounded, sorted cut axes.
pub mod axis;
/// Grid cells and record aggregation.
pub mod grid;
/// `.npz` archive I/O.
pub mod npz;
/// Flat record arrays and the statistics filter.
pub mod records;
/// Global-minimum working-point selection.
pub mod select;
/// JSON selection summary.
pub mod summary;

pub use artifact::HeatmapArtifact;
pub use axis::{CutAxis, ScanAxes};
pub use grid::{AggregateOptions, Grid2D, MissingRecordPolicy, ScanGrids, aggregate};
pub use npz::{fom_arrays_path, load_fom_arrays, write_fom_arrays};
pub use records::{FomRecords, Quantity, Record, ValidityThresholds};
pub use select::{Selection, select_optimum};
pub use summary::ScanSummary;
