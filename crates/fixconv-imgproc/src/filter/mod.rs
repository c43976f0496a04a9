//! Filter operations
//!
//! This module provides fixed-point integer convolution of rasters.

/// Dense 2D convolution
mod convolution;
pub use convolution::*;

mod error;
pub use error::ConvolutionError;

/// Integer kernel matrix
mod kernel;
pub use kernel::KernelMatrix;

/// Filter kernels
pub mod kernels;

/// Filter operations
mod ops;
pub use ops::*;

/// Post-summation scaling and saturation
mod quantize;
pub use quantize::{FixedPointScale, Quantizer};

/// Separable filter operations
mod separable_filter;
pub use separable_filter::*;
