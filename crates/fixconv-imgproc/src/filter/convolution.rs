use fixconv_image::{Raster, RasterDtype};
use num_traits::{Bounded, ToPrimitive, Zero};

use super::{ConvolutionError, FixedPointScale, KernelMatrix, Quantizer};
use crate::parallel::{par_iter_lines, ExecutionStrategy};

/// Tap offsets of a kernel relative to the output pixel.
///
/// Columns cover `left..right` and rows `up..down`. For even sizes the
/// kernel sits one tap toward the positive side: a width of 4 covers
/// offsets `-1..3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KernelTaps {
    left: isize,
    right: isize,
    up: isize,
    down: isize,
}

impl KernelTaps {
    fn new(kernel: &KernelMatrix) -> Self {
        let right = (kernel.width() >> 1) as isize + 1;
        let down = (kernel.height() >> 1) as isize + 1;
        Self {
            left: right - kernel.width() as isize,
            right,
            up: down - kernel.height() as isize,
            down,
        }
    }
}

pub(crate) fn check_matched<T>(src: &Raster<T>, dst: &Raster<T>) -> Result<(), ConvolutionError> {
    if !src.is_matched(dst) {
        return Err(ConvolutionError::SizeMismatch(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    if src.bands() != dst.bands() {
        return Err(ConvolutionError::BandMismatch(src.bands(), dst.bands()));
    }

    Ok(())
}

/// Reject kernels whose worst-case sum over samples of `T` does not fit `T::Acc`.
///
/// The bound is `kernel.abs_sum() * max(|T::MIN|, |T::MAX|) <= Acc::MAX`; once
/// it holds neither a product nor a partial sum in the hot loop can overflow.
pub(crate) fn check_accumulator<T: RasterDtype>(
    kernel: &KernelMatrix,
) -> Result<(), ConvolutionError> {
    let abs_sum = kernel.abs_sum();
    let magnitude = |v: T::Acc| v.to_i128().map_or(u128::MAX, i128::unsigned_abs);
    let sample_max = magnitude(T::MIN_ACC).max(magnitude(T::MAX_ACC));
    let acc_max = magnitude(<T::Acc as Bounded>::max_value());

    match (abs_sum as u128).checked_mul(sample_max) {
        Some(bound) if bound <= acc_max => Ok(()),
        _ => Err(ConvolutionError::AccumulatorOverflow(abs_sum, T::ACC_BITS)),
    }
}

// Convolve one output line; taps falling outside the raster are skipped.
fn convolve_line<T: RasterDtype>(
    src: &Raster<T>,
    band: usize,
    kernel: &KernelMatrix,
    taps: KernelTaps,
    quantizer: &Quantizer<T>,
    y: usize,
    dst_line: &mut [T],
) {
    let width = src.width() as isize;
    let height = src.height() as isize;
    let y = y as isize;

    let j_start = taps.up.max(-y);
    let j_end = taps.down.min(height - y);

    for (x, out) in dst_line.iter_mut().enumerate() {
        let x = x as isize;
        let i_start = taps.left.max(-x);
        let i_end = taps.right.min(width - x);

        let k_cols = (i_start - taps.left) as usize..(i_end - taps.left) as usize;
        let s_cols = (x + i_start) as usize..(x + i_end) as usize;

        let mut sum = T::Acc::zero();
        for j in j_start..j_end {
            let krow = &kernel.row((j - taps.up) as usize)[k_cols.clone()];
            let srow = &src.line((y + j) as usize, band)[s_cols.clone()];
            sum = krow
                .iter()
                .zip(srow)
                .fold(sum, |acc, (&k, &s)| acc + <T::Acc as From<i32>>::from(k) * s.to_acc());
        }

        *out = quantizer.quantize(sum);
    }
}

/// Convolve a raster with an integer kernel using fixed-point scaling.
///
/// Uses `ExecutionStrategy::Auto` (parallel rows for bands of at least 100K
/// pixels, serial otherwise). For explicit control, use
/// [`convolve_with_strategy`].
///
/// # Arguments
///
/// * `src` - The source raster.
/// * `dst` - The destination raster, same width, height and bands as `src`.
/// * `kernel` - The integer kernel.
/// * `scale` - The shift and offset applied to every accumulated sum.
///
/// # Examples
///
/// ```
/// use fixconv_image::Raster;
/// use fixconv_imgproc::filter::{convolve, FixedPointScale, KernelMatrix};
///
/// let src = Raster::<u8>::new([3, 1].into(), 1, vec![10, 20, 30]).unwrap();
/// let mut dst = Raster::<u8>::like(&src);
/// let kernel = KernelMatrix::from_row(&[1, 2, 1]).unwrap();
///
/// convolve(&src, &mut dst, &kernel, FixedPointScale::new(2, 0)).unwrap();
/// assert_eq!(dst.as_slice(), &[10, 20, 20]);
/// ```
pub fn convolve<T: RasterDtype>(
    src: &Raster<T>,
    dst: &mut Raster<T>,
    kernel: &KernelMatrix,
    scale: FixedPointScale,
) -> Result<(), ConvolutionError> {
    convolve_with_strategy(src, dst, kernel, scale, ExecutionStrategy::Auto)
}

/// Convolve a raster with an integer kernel with execution strategy control.
///
/// For every band, row and column the kernel coefficients are multiplied with
/// the source samples under them and summed in `T::Acc`. Taps that fall
/// outside the raster are skipped without renormalization, so pixels near the
/// borders of an averaging kernel come out attenuated. The sum is then shifted
/// right by `scale.rshift` (arithmetically), offset by `scale.offset` and
/// saturated to the range of `T`.
///
/// Bands are processed one after the other; rows of a band are distributed
/// according to `strategy`.
///
/// # Errors
///
/// Returns an error before writing anything if `src` and `dst` differ in
/// size or band count, if the scale does not fit the accumulator, if the
/// kernel coefficients are large enough to overflow the accumulator for some
/// samples of `T`, or if the strategy is invalid.
pub fn convolve_with_strategy<T: RasterDtype>(
    src: &Raster<T>,
    dst: &mut Raster<T>,
    kernel: &KernelMatrix,
    scale: FixedPointScale,
    strategy: ExecutionStrategy,
) -> Result<(), ConvolutionError> {
    check_matched(src, dst)?;
    let quantizer = Quantizer::<T>::new(scale)?;
    check_accumulator::<T>(kernel)?;
    strategy.validate()?;

    let taps = KernelTaps::new(kernel);

    log::debug!(
        "convolve: {}x{}x{} raster, {}x{} kernel, rshift={} offset={}, {:?}",
        src.width(),
        src.height(),
        src.bands(),
        kernel.width(),
        kernel.height(),
        scale.rshift,
        scale.offset,
        strategy,
    );

    let (row_stride, width) = (dst.row_stride(), dst.width());
    for band in 0..src.bands() {
        par_iter_lines(dst.band_mut(band), row_stride, width, strategy, |y, dst_line| {
            convolve_line(src, band, kernel, taps, &quantizer, y, dst_line)
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixconv_image::RasterSize;

    #[test]
    fn test_kernel_taps() -> Result<(), ConvolutionError> {
        let taps = KernelTaps::new(&KernelMatrix::zeros(3, 3)?);
        assert_eq!((taps.left, taps.right, taps.up, taps.down), (-1, 2, -1, 2));

        let taps = KernelTaps::new(&KernelMatrix::zeros(4, 1)?);
        assert_eq!((taps.left, taps.right, taps.up, taps.down), (-1, 3, 0, 1));

        let taps = KernelTaps::new(&KernelMatrix::zeros(2, 5)?);
        assert_eq!((taps.left, taps.right, taps.up, taps.down), (0, 2, -2, 3));
        Ok(())
    }

    #[test]
    fn test_convolve_box_3x3() -> Result<(), ConvolutionError> {
        let size = RasterSize {
            width: 5,
            height: 5,
        };

        #[rustfmt::skip]
        let src = Raster::<u8>::new(
            size,
            1,
            vec![
                0, 0, 0, 0, 0,
                0, 1, 1, 1, 0,
                0, 1, 9, 1, 0,
                0, 1, 1, 1, 0,
                0, 0, 0, 0, 0,
            ],
        )?;

        let mut dst = Raster::<u8>::from_size_val(size, 1, 0)?;
        let kernel = KernelMatrix::new(3, 3, vec![1; 9])?;
        convolve(&src, &mut dst, &kernel, FixedPointScale::default())?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                1, 2, 3, 2, 1,
                2, 12, 14, 12, 2,
                3, 14, 17, 14, 3,
                2, 12, 14, 12, 2,
                1, 2, 3, 2, 1,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_convolve_skips_outside_taps() -> Result<(), ConvolutionError> {
        let src = Raster::<u8>::from_size_val([3, 3].into(), 1, 8)?;
        let mut dst = Raster::<u8>::like(&src);
        let kernel = KernelMatrix::new(3, 3, vec![1; 9])?;
        convolve(&src, &mut dst, &kernel, FixedPointScale::new(3, 0))?;

        // 4, 6 and 9 taps contribute at corners, edges and the center
        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                4, 6, 4,
                6, 9, 6,
                4, 6, 4,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_convolve_even_kernel_bias() -> Result<(), ConvolutionError> {
        let src = Raster::<u8>::new([5, 1].into(), 1, vec![0, 0, 1, 0, 0])?;
        let mut dst = Raster::<u8>::like(&src);

        // offsets -1, 0, +1, +2 with weights 1, 2, 3, 4
        let kernel = KernelMatrix::from_row(&[1, 2, 3, 4])?;
        convolve(&src, &mut dst, &kernel, FixedPointScale::default())?;

        assert_eq!(dst.as_slice(), &[4, 3, 2, 1, 0]);
        Ok(())
    }

    #[test]
    fn test_convolve_multiband_padded() -> Result<(), ConvolutionError> {
        #[rustfmt::skip]
        let src = Raster::<i16>::with_row_stride(
            [3, 2].into(),
            2,
            4,
            vec![
                1, 2, 3, 100,
                4, 5, 6, 100,
                -1, -2, -3, 100,
                -4, -5, -6, 100,
            ],
        )?;
        let mut dst = Raster::<i16>::from_size_val([3, 2].into(), 2, 0)?;
        let kernel = KernelMatrix::from_column(&[1, 1])?;
        convolve(&src, &mut dst, &kernel, FixedPointScale::default())?;

        // a height of 2 covers the current row and the one below it
        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                5, 7, 9,
                4, 5, 6,
                -5, -7, -9,
                -4, -5, -6,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_convolve_preconditions() -> Result<(), ConvolutionError> {
        let src = Raster::<u8>::from_size_val([4, 4].into(), 1, 1)?;
        let kernel = KernelMatrix::new(1, 1, vec![1])?;

        let mut dst = Raster::<u8>::from_size_val([4, 3].into(), 1, 7)?;
        assert_eq!(
            convolve(&src, &mut dst, &kernel, FixedPointScale::default()),
            Err(ConvolutionError::SizeMismatch(4, 4, 4, 3))
        );
        assert!(dst.as_slice().iter().all(|&v| v == 7));

        let mut dst = Raster::<u8>::from_size_val([4, 4].into(), 2, 7)?;
        assert_eq!(
            convolve(&src, &mut dst, &kernel, FixedPointScale::default()),
            Err(ConvolutionError::BandMismatch(1, 2))
        );

        let mut dst = Raster::<u8>::from_size_val([4, 4].into(), 1, 7)?;
        assert_eq!(
            convolve(&src, &mut dst, &kernel, FixedPointScale::new(40, 0)),
            Err(ConvolutionError::ShiftOutOfRange(40, 32))
        );
        assert_eq!(
            convolve_with_strategy(
                &src,
                &mut dst,
                &kernel,
                FixedPointScale::default(),
                ExecutionStrategy::Fixed(0)
            ),
            Err(ConvolutionError::Parallel(
                crate::parallel::ParallelError::InvalidThreadCount(0)
            ))
        );
        assert!(dst.as_slice().iter().all(|&v| v == 7));
        Ok(())
    }

    #[test]
    fn test_convolve_rejects_accumulator_overflow() -> Result<(), ConvolutionError> {
        let src = Raster::<u16>::new([1, 1].into(), 1, vec![u16::MAX])?;
        let mut dst = Raster::<u16>::from_size_val([1, 1].into(), 1, 7)?;

        let kernel = KernelMatrix::new(1, 1, vec![40_000])?;
        assert_eq!(
            convolve(&src, &mut dst, &kernel, FixedPointScale::new(16, 0)),
            Err(ConvolutionError::AccumulatorOverflow(40_000, 32))
        );
        assert_eq!(dst.as_slice(), &[7]);

        // the bound counts magnitudes, so mixed signs do not cancel
        let kernel = KernelMatrix::from_row(&[20_000, -20_000])?;
        assert_eq!(
            convolve(&src, &mut dst, &kernel, FixedPointScale::default()),
            Err(ConvolutionError::AccumulatorOverflow(40_000, 32))
        );
        assert_eq!(dst.as_slice(), &[7]);
        Ok(())
    }

    #[test]
    fn test_convolve_accumulator_bound_is_tight() -> Result<(), ConvolutionError> {
        let src = Raster::<u16>::new([1, 1].into(), 1, vec![u16::MAX])?;
        let mut dst = Raster::<u16>::like(&src);

        // 32767 * 65535 still fits i32, 32768 * 65535 does not
        let kernel = KernelMatrix::new(1, 1, vec![32_767])?;
        convolve(&src, &mut dst, &kernel, FixedPointScale::new(16, 0))?;
        assert_eq!(dst.as_slice(), &[32_766]);

        let kernel = KernelMatrix::new(1, 1, vec![32_768])?;
        assert_eq!(
            convolve(&src, &mut dst, &kernel, FixedPointScale::new(16, 0)),
            Err(ConvolutionError::AccumulatorOverflow(32_768, 32))
        );

        // wide accumulators take full-range coefficients
        let src = Raster::<u64>::new([1, 1].into(), 1, vec![u64::MAX])?;
        let mut dst = Raster::<u64>::like(&src);
        let kernel = KernelMatrix::new(1, 1, vec![i32::MAX])?;
        convolve(&src, &mut dst, &kernel, FixedPointScale::default())?;
        assert_eq!(dst.as_slice(), &[u64::MAX]);
        Ok(())
    }

    #[test]
    fn test_convolve_empty_raster() -> Result<(), ConvolutionError> {
        let src = Raster::<u8>::new([0, 3].into(), 1, vec![])?;
        let mut dst = Raster::<u8>::like(&src);
        let kernel = KernelMatrix::new(3, 3, vec![1; 9])?;
        convolve(&src, &mut dst, &kernel, FixedPointScale::default())?;
        assert!(dst.as_slice().is_empty());
        Ok(())
    }
}
