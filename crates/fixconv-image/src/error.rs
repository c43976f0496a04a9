/// An error type for the raster module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RasterError {
    /// Error when the data length does not match the raster layout.
    #[error("Data length ({0}) does not match the raster size ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when the row stride is shorter than a raster line.
    #[error("Row stride ({0}) must be at least the raster width ({1})")]
    InvalidRowStride(usize, usize),

    /// Error when a raster is created without bands.
    #[error("Raster must have at least one band")]
    ZeroBands,

    /// Error when a pixel coordinate is outside the raster.
    #[error("Pixel ({0}, {1}) in band {2} is out of bounds")]
    PixelOutOfBounds(usize, usize, usize),

    /// Error when the band index is out of bounds.
    #[error("Band index ({0}) is out of bounds ({1})")]
    BandIndexOutOfBounds(usize, usize),

    /// Error when two rasters do not have the same width and height.
    #[error("Invalid raster size. Got: {0}x{1}, expected: {2}x{3}")]
    InvalidRasterSize(usize, usize, usize, usize),

    /// Error when two rasters do not have the same number of bands.
    #[error("Band count mismatch. Got: {0}, expected: {1}")]
    BandCountMismatch(usize, usize),

    /// Error when a bit shift is not smaller than the sample width.
    #[error("Shift of {0} bits is out of range for {1}-bit samples")]
    InvalidShift(u32, u32),

    /// Error when a value range has its bounds inverted.
    #[error("Invalid value range: min is greater than max")]
    InvalidValueRange,
}
