use num_traits::{NumCast, PrimInt};
use rayon::prelude::*;

use crate::{Raster, RasterError};

// Apply `f` to the visible samples of every line, each line on one worker.
fn for_each_line_mut<T, F>(raster: &mut Raster<T>, f: F)
where
    T: Send,
    F: Fn(&mut [T]) + Send + Sync,
{
    let width = raster.width();
    let row_stride = raster.row_stride();
    if row_stride == 0 {
        return;
    }
    raster
        .as_slice_mut()
        .par_chunks_exact_mut(row_stride)
        .for_each(|line| f(&mut line[..width]));
}

/// Shift every sample of the raster left by `bits`, in place.
///
/// Bits shifted past the sample width are discarded.
///
/// # Arguments
///
/// * `raster` - The raster to modify.
/// * `bits` - The number of bits to shift, smaller than the sample width.
///
/// # Errors
///
/// If `bits` is not smaller than the sample width, an error is returned.
///
/// Example:
///
/// ```
/// use fixconv_image::{Raster, ops::lshift_pixels};
///
/// let mut raster = Raster::<u8>::new([3, 1].into(), 1, vec![1, 3, 0x81]).unwrap();
/// lshift_pixels(&mut raster, 1).unwrap();
/// assert_eq!(raster.as_slice(), &[2, 6, 0x02]);
/// ```
pub fn lshift_pixels<T>(raster: &mut Raster<T>, bits: u32) -> Result<(), RasterError>
where
    T: PrimInt + Send,
{
    let sample_bits = T::zero().count_zeros();
    if bits >= sample_bits {
        return Err(RasterError::InvalidShift(bits, sample_bits));
    }

    for_each_line_mut(raster, |line| {
        line.iter_mut().for_each(|v| *v = *v << bits as usize);
    });

    Ok(())
}

/// Reverse the byte order of every sample of the raster, in place.
///
/// Single byte samples are left unchanged.
pub fn reverse_endian<T>(raster: &mut Raster<T>)
where
    T: PrimInt + Send,
{
    if std::mem::size_of::<T>() == 1 {
        return;
    }

    for_each_line_mut(raster, |line| {
        line.iter_mut().for_each(|v| *v = v.swap_bytes());
    });
}

/// Clamp every sample of the raster into `[min, max]`, in place.
///
/// # Errors
///
/// If `min` is greater than `max`, an error is returned.
pub fn trim<T>(raster: &mut Raster<T>, min: T, max: T) -> Result<(), RasterError>
where
    T: PrimInt + Send + Sync,
{
    if min > max {
        return Err(RasterError::InvalidValueRange);
    }

    for_each_line_mut(raster, |line| {
        line.iter_mut().for_each(|v| *v = (*v).clamp(min, max));
    });

    Ok(())
}

/// Linearly remap the sample range `[0, T::MAX]` onto `[min, max]`, in place.
///
/// The mapping is `v * (max - min) / T::MAX + min`, computed in `f64` and
/// truncated toward zero back to the sample type.
///
/// # Errors
///
/// If `min` is greater than `max`, an error is returned.
pub fn condense<T>(raster: &mut Raster<T>, min: T, max: T) -> Result<(), RasterError>
where
    T: PrimInt + Send + Sync,
{
    if min > max {
        return Err(RasterError::InvalidValueRange);
    }

    let to_f64 = |v: T| v.to_f64().unwrap_or(0.0);
    let (lo, hi, top) = (to_f64(min), to_f64(max), to_f64(T::max_value()));
    let span = hi - lo;

    for_each_line_mut(raster, |line| {
        line.iter_mut().for_each(|v| {
            let mapped = (to_f64(*v) * span / top + lo).trunc().clamp(lo, hi);
            // 64-bit bounds are not exact in f64
            *v = <T as NumCast>::from(mapped).unwrap_or(if mapped >= hi { max } else { min });
        });
    });

    Ok(())
}

/// Copy one band of `src` into `dst` with its top-left corner at `(xoff, yoff)`.
///
/// The copied region is clipped to the bounds of `dst`.
///
/// # Arguments
///
/// * `src` - The source raster.
/// * `dst` - The destination raster.
/// * `xoff` - The column of `dst` receiving the first column of `src`.
/// * `yoff` - The row of `dst` receiving the first row of `src`.
/// * `band` - The band to copy, present in both rasters.
pub fn copy_region<T>(
    src: &Raster<T>,
    dst: &mut Raster<T>,
    xoff: usize,
    yoff: usize,
    band: usize,
) -> Result<(), RasterError>
where
    T: Copy + Send + Sync,
{
    if band >= src.bands() {
        return Err(RasterError::BandIndexOutOfBounds(band, src.bands()));
    }
    if band >= dst.bands() {
        return Err(RasterError::BandIndexOutOfBounds(band, dst.bands()));
    }

    let rows = src.height().min(dst.height().saturating_sub(yoff));
    let cols = src.width().min(dst.width().saturating_sub(xoff));
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    let row_stride = dst.row_stride();
    dst.band_mut(band)
        .par_chunks_exact_mut(row_stride)
        .skip(yoff)
        .take(rows)
        .enumerate()
        .for_each(|(y, dst_line)| {
            dst_line[xoff..xoff + cols].copy_from_slice(&src.line(y, band)[..cols]);
        });

    Ok(())
}
