use fixconv_image::{Raster, RasterDtype};

use super::convolution::{check_accumulator, check_matched};
use super::{convolve_with_strategy, ConvolutionError, FixedPointScale, KernelMatrix, Quantizer};
use crate::parallel::ExecutionStrategy;

/// Apply a separable filter to a raster.
///
/// Uses `ExecutionStrategy::Auto` (parallel rows for bands of at least 100K
/// pixels, serial otherwise). For explicit control, use
/// [`convolve_separable_with_strategy`].
///
/// # Arguments
///
/// * `src` - The source raster.
/// * `dst` - The destination raster, same width, height and bands as `src`.
/// * `xkernel` - The horizontal kernel, a row vector.
/// * `ykernel` - The vertical kernel, also given as a row vector.
/// * `scale` - The shift and offset applied on the vertical pass.
pub fn convolve_separable<T: RasterDtype>(
    src: &Raster<T>,
    dst: &mut Raster<T>,
    xkernel: &KernelMatrix,
    ykernel: &KernelMatrix,
    scale: FixedPointScale,
) -> Result<(), ConvolutionError> {
    convolve_separable_with_strategy(src, dst, xkernel, ykernel, scale, ExecutionStrategy::Auto)
}

/// Apply a separable filter to a raster with execution strategy control.
///
/// The raster is first convolved with `xkernel` into an intermediate raster
/// of the same sample type without scaling, then the intermediate is
/// convolved with `ykernel` turned into a column, applying `scale`.
///
/// The result equals [`super::convolve`] with
/// `KernelMatrix::outer(xkernel, ykernel)` as long as the horizontal sums fit
/// the range of `T`. The intermediate is saturated to that range, so the two
/// diverge once it overflows. Whether the 2D kernel factors into the two
/// vectors is up to the caller.
///
/// # Errors
///
/// Returns an error before writing anything if either kernel is not a row
/// vector (height 1, width > 1), if `src` and `dst` are not matched, if the
/// scale does not fit the accumulator, if either kernel can overflow the
/// accumulator, or if the strategy is invalid.
pub fn convolve_separable_with_strategy<T: RasterDtype>(
    src: &Raster<T>,
    dst: &mut Raster<T>,
    xkernel: &KernelMatrix,
    ykernel: &KernelMatrix,
    scale: FixedPointScale,
    strategy: ExecutionStrategy,
) -> Result<(), ConvolutionError> {
    for kernel in [xkernel, ykernel] {
        if !kernel.is_row_vector() {
            return Err(ConvolutionError::KernelNotRowVector(
                kernel.width(),
                kernel.height(),
            ));
        }
    }
    check_matched(src, dst)?;
    Quantizer::<T>::new(scale)?;
    check_accumulator::<T>(xkernel)?;
    check_accumulator::<T>(ykernel)?;
    strategy.validate()?;

    let column = ykernel.transpose()?;
    let mut temp = Raster::<T>::like(src);

    log::trace!(
        "convolve_separable: intermediate {}x{}x{}, x taps {}, y taps {}",
        temp.width(),
        temp.height(),
        temp.bands(),
        xkernel.width(),
        column.height(),
    );

    convolve_with_strategy(src, &mut temp, xkernel, FixedPointScale::default(), strategy)?;
    convolve_with_strategy(&temp, dst, &column, scale, strategy)
}
