use fixconv_image::RasterError;

use crate::parallel::ParallelError;

/// An error type for the convolution operations.
///
/// Every variant describes a violated precondition detected before any
/// destination sample is written.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConvolutionError {
    /// Error when the source and destination rasters are not matched.
    #[error("Source size {0}x{1} does not match destination size {2}x{3}")]
    SizeMismatch(usize, usize, usize, usize),

    /// Error when the source and destination band counts differ.
    #[error("Source has {0} bands but destination has {1}")]
    BandMismatch(usize, usize),

    /// Error when a separable kernel is not a row vector.
    #[error("Kernel of size {0}x{1} is not a row vector (height 1, width > 1)")]
    KernelNotRowVector(usize, usize),

    /// Error when a kernel has an unusable size.
    #[error("Invalid kernel size {0}x{1}")]
    InvalidKernelSize(usize, usize),

    /// Error when the right shift does not fit the accumulator.
    #[error("Right shift of {0} bits is out of range for a {1}-bit accumulator")]
    ShiftOutOfRange(u32, u32),

    /// Error when the offset does not fit the accumulator.
    #[error("Offset {0} does not fit the accumulator")]
    OffsetOutOfRange(i64),

    /// Error when a kernel can drive the accumulated sum out of the accumulator range.
    #[error("Kernel with absolute coefficient sum {0} can overflow a {1}-bit accumulator")]
    AccumulatorOverflow(i64, u32),

    /// Error when a kernel size cannot be normalized by a right shift.
    #[error("Kernel size {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// Error when no sobel kernel exists for the requested size.
    #[error("Invalid kernel size {0} for sobel kernel, expected 3 or 5")]
    InvalidSobelSize(usize),

    /// Error raised by the raster container.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// Error raised while scheduling rows.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
