//! Error types for the working-point scan

use thiserror::Error;

/// Scan error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Array archive could not be parsed or lacks a named array
    #[error("npz error: {0}")]
    Npz(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Bounds filtering removed every cut value on an axis
    #[error("no {axis} cut values inside [{min}, {max}]")]
    EmptyAxis {
        /// Axis name (`bdt` or `xbb`)
        axis: &'static str,
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// No record carries the requested cut pair
    #[error("no record for bdt_cut={bdt_cut}, xbb_cut={xbb_cut}")]
    MissingRecord {
        /// BDT cut of the grid cell
        bdt_cut: f64,
        /// Xbb cut of the grid cell
        xbb_cut: f64,
    },

    /// Every grid cell failed the statistics requirements
    #[error("no qualifying operating point: every cut pair fails the statistics requirements")]
    NoQualifyingPoint,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
