#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// raster filtering module.
pub mod filter;

/// raster comparison metrics module.
pub mod metrics;

/// module containing parallization utilities.
pub mod parallel;
