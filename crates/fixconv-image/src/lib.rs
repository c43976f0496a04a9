#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// integer sample types and their accumulators.
pub mod dtype;

/// Error types for the raster module.
pub mod error;

/// per-pixel raster operations.
pub mod ops;

/// multi-band raster representation.
pub mod raster;

pub use crate::dtype::RasterDtype;
pub use crate::error::RasterError;
pub use crate::raster::{Raster, RasterSize};
