use fixconv_image::{Raster, RasterDtype};

use super::{convolve_separable, kernels, ConvolutionError, FixedPointScale};

fn exact_log2(size: usize) -> Result<u32, ConvolutionError> {
    if !size.is_power_of_two() {
        return Err(ConvolutionError::NotPowerOfTwo(size));
    }
    Ok(size.trailing_zeros())
}

/// Blur a raster using a box blur filter
///
/// The kernel sides must be powers of two so the average is an exact right
/// shift. The horizontal sums are saturated to the range of `T` before the
/// vertical pass, so narrow sample types need values well below their
/// maximum.
///
/// # Arguments
///
/// * `src` - The source raster.
/// * `dst` - The destination raster, same shape as `src`.
/// * `kernel_size` - The size of the kernel (kernel_x, kernel_y).
pub fn box_blur<T: RasterDtype>(
    src: &Raster<T>,
    dst: &mut Raster<T>,
    kernel_size: (usize, usize),
) -> Result<(), ConvolutionError> {
    let rshift = exact_log2(kernel_size.0)? + exact_log2(kernel_size.1)?;
    let kernel_x = kernels::box_kernel_1d(kernel_size.0)?;
    let kernel_y = kernels::box_kernel_1d(kernel_size.1)?;
    convolve_separable(src, dst, &kernel_x, &kernel_y, FixedPointScale::new(rshift, 0))
}

/// Blur a raster using a binomial filter, the integer counterpart of a gaussian blur
///
/// The horizontal sums are saturated to the range of `T` before the vertical
/// pass, so narrow sample types need values well below their maximum: a `u8`
/// sample of 200 under `[1, 2, 1]` already clips at 255.
///
/// # Arguments
///
/// * `src` - The source raster.
/// * `dst` - The destination raster, same shape as `src`.
/// * `kernel_size` - The size of the kernel (kernel_x, kernel_y).
pub fn binomial_blur<T: RasterDtype>(
    src: &Raster<T>,
    dst: &mut Raster<T>,
    kernel_size: (usize, usize),
) -> Result<(), ConvolutionError> {
    let kernel_x = kernels::binomial_kernel_1d(kernel_size.0)?;
    let kernel_y = kernels::binomial_kernel_1d(kernel_size.1)?;
    let rshift = (kernel_size.0 - 1 + kernel_size.1 - 1) as u32;
    convolve_separable(src, dst, &kernel_x, &kernel_y, FixedPointScale::new(rshift, 0))
}

/// Compute the horizontal sobel derivative
///
/// Negative responses saturate at zero for unsigned sample types; use a
/// signed `T` to keep them.
///
/// # Arguments
///
/// * `src` - The source raster.
/// * `dst` - The destination raster, same shape as `src`.
/// * `kernel_size` - The size of the kernel, 3 or 5.
pub fn sobel_x<T: RasterDtype>(
    src: &Raster<T>,
    dst: &mut Raster<T>,
    kernel_size: usize,
) -> Result<(), ConvolutionError> {
    let (derivative, smoothing) = kernels::sobel_kernel_1d(kernel_size)?;
    convolve_separable(src, dst, &derivative, &smoothing, FixedPointScale::default())
}

/// Compute the vertical sobel derivative
///
/// # Arguments
///
/// * `src` - The source raster.
/// * `dst` - The destination raster, same shape as `src`.
/// * `kernel_size` - The size of the kernel, 3 or 5.
pub fn sobel_y<T: RasterDtype>(
    src: &Raster<T>,
    dst: &mut Raster<T>,
    kernel_size: usize,
) -> Result<(), ConvolutionError> {
    let (derivative, smoothing) = kernels::sobel_kernel_1d(kernel_size)?;
    convolve_separable(src, dst, &smoothing, &derivative, FixedPointScale::default())
}
