use fixconv_image::{Raster, RasterDtype, RasterError};
use num_traits::{Signed, ToPrimitive, Zero};

/// Sample-wise difference between two rasters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterDiff {
    /// Sum of absolute differences (Manhattan norm).
    pub l1: f64,
    /// Number of samples that differ (zero norm).
    pub l0: usize,
    /// Number of compared samples over all bands.
    pub samples: usize,
}

impl RasterDiff {
    /// Mean absolute difference per sample.
    pub fn l1_per_sample(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        self.l1 / self.samples as f64
    }

    /// Fraction of samples that differ.
    pub fn l0_per_sample(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        self.l0 as f64 / self.samples as f64
    }

    /// Whether the two rasters are identical.
    pub fn is_exact(&self) -> bool {
        self.l0 == 0
    }
}

/// Compare two rasters sample by sample.
///
/// Differences are taken in the accumulator type of `T`, so they never wrap.
///
/// # Arguments
///
/// * `raster1` - The first raster.
/// * `raster2` - The second raster, same width, height and bands.
///
/// # Returns
///
/// The L1 and L0 norms of the difference.
///
/// # Example
///
/// ```
/// use fixconv_image::Raster;
/// use fixconv_imgproc::metrics::compare;
///
/// let a = Raster::<u8>::new([3, 1].into(), 1, vec![0, 10, 255]).unwrap();
/// let b = Raster::<u8>::new([3, 1].into(), 1, vec![0, 13, 0]).unwrap();
///
/// let diff = compare(&a, &b).unwrap();
/// assert_eq!(diff.l1, 258.0);
/// assert_eq!(diff.l0, 2);
/// ```
pub fn compare<T: RasterDtype>(
    raster1: &Raster<T>,
    raster2: &Raster<T>,
) -> Result<RasterDiff, RasterError> {
    if !raster1.is_matched(raster2) {
        return Err(RasterError::InvalidRasterSize(
            raster2.width(),
            raster2.height(),
            raster1.width(),
            raster1.height(),
        ));
    }

    if raster1.bands() != raster2.bands() {
        return Err(RasterError::BandCountMismatch(
            raster2.bands(),
            raster1.bands(),
        ));
    }

    let mut diff = RasterDiff {
        l1: 0.0,
        l0: 0,
        samples: raster1.num_pixels() * raster1.bands(),
    };

    for band in 0..raster1.bands() {
        for y in 0..raster1.height() {
            let line1 = raster1.line(y, band);
            let line2 = raster2.line(y, band);
            for (&a, &b) in line1.iter().zip(line2) {
                let d = (a.to_acc() - b.to_acc()).abs();
                if !d.is_zero() {
                    diff.l1 += d.to_f64().unwrap_or(f64::MAX);
                    diff.l0 += 1;
                }
            }
        }
    }

    Ok(diff)
}
