//! # hh-core
//!
//! Shared error type and small value types for the HH4b working-point scan.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{CutBounds, CutPoint};

/// Tool version string, shared by every crate in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
