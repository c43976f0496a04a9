use fixconv_image::RasterDtype;
use num_traits::{Bounded, NumCast, Saturating};

use super::ConvolutionError;

/// Fixed-point scaling applied once per output sample after summation.
///
/// The accumulated sum is arithmetically shifted right by `rshift` bits and
/// `offset` is added to the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedPointScale {
    /// Arithmetic right shift of the accumulated sum.
    pub rshift: u32,
    /// Bias added after the shift.
    pub offset: i64,
}

impl FixedPointScale {
    /// Create a new scale from a right shift and an offset.
    pub fn new(rshift: u32, offset: i64) -> Self {
        Self { rshift, offset }
    }

    /// Return a copy with the given right shift.
    pub fn with_rshift(mut self, rshift: u32) -> Self {
        self.rshift = rshift;
        self
    }

    /// Return a copy with the given offset.
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Whether the scale leaves sums untouched.
    pub fn is_identity(&self) -> bool {
        self.rshift == 0 && self.offset == 0
    }
}

/// Scales and saturates accumulated sums into a sample type.
///
/// Built once per call, outside the per-sample loop. Scaling is skipped when
/// the scale is the identity and clipping is skipped when the sample range
/// already spans the whole accumulator range.
#[derive(Debug, Clone, Copy)]
pub struct Quantizer<T: RasterDtype> {
    rshift: usize,
    offset: T::Acc,
    min: T::Acc,
    max: T::Acc,
    do_scale: bool,
    do_clip: bool,
}

impl<T: RasterDtype> Quantizer<T> {
    /// Create a quantizer for the sample type `T`.
    ///
    /// # Errors
    ///
    /// If `rshift` is not smaller than the accumulator width or `offset` does
    /// not fit the accumulator, an error is returned.
    pub fn new(scale: FixedPointScale) -> Result<Self, ConvolutionError> {
        if scale.rshift >= T::ACC_BITS {
            return Err(ConvolutionError::ShiftOutOfRange(scale.rshift, T::ACC_BITS));
        }

        let offset = <T::Acc as NumCast>::from(scale.offset)
            .ok_or(ConvolutionError::OffsetOutOfRange(scale.offset))?;

        Ok(Self {
            rshift: scale.rshift as usize,
            offset,
            min: T::MIN_ACC,
            max: T::MAX_ACC,
            do_scale: !scale.is_identity(),
            do_clip: T::MIN_ACC != <T::Acc as Bounded>::min_value()
                || T::MAX_ACC != <T::Acc as Bounded>::max_value(),
        })
    }

    /// Whether the shift and offset are applied.
    pub fn do_scale(&self) -> bool {
        self.do_scale
    }

    /// Whether results are saturated into the sample range.
    pub fn do_clip(&self) -> bool {
        self.do_clip
    }

    /// Scale and saturate an accumulated sum.
    ///
    /// The shift is arithmetic, so negative sums round toward negative
    /// infinity: `-7 >> 1 == -4`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixconv_imgproc::filter::{FixedPointScale, Quantizer};
    ///
    /// let quantizer = Quantizer::<u8>::new(FixedPointScale::default()).unwrap();
    /// assert_eq!(quantizer.quantize(300), 255);
    /// assert_eq!(quantizer.quantize(-5), 0);
    /// ```
    #[inline(always)]
    pub fn quantize(&self, sum: T::Acc) -> T {
        let mut sum = sum;
        if self.do_scale {
            sum = (sum >> self.rshift).saturating_add(self.offset);
        }
        if self.do_clip {
            sum = sum.clamp(self.min, self.max);
        }
        T::from_acc(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_saturates() -> Result<(), ConvolutionError> {
        let quantizer = Quantizer::<u8>::new(FixedPointScale::default())?;
        assert!(!quantizer.do_scale());
        assert!(quantizer.do_clip());
        assert_eq!(quantizer.quantize(300), 255);
        assert_eq!(quantizer.quantize(-1), 0);
        assert_eq!(quantizer.quantize(17), 17);

        let quantizer = Quantizer::<i16>::new(FixedPointScale::default())?;
        assert_eq!(quantizer.quantize(40_000), i16::MAX);
        assert_eq!(quantizer.quantize(-40_000), i16::MIN);
        Ok(())
    }

    #[test]
    fn test_quantize_arithmetic_shift() -> Result<(), ConvolutionError> {
        let quantizer = Quantizer::<i8>::new(FixedPointScale::new(1, 0))?;
        assert!(quantizer.do_scale());
        assert_eq!(quantizer.quantize(-7), -4);
        assert_eq!(quantizer.quantize(7), 3);
        Ok(())
    }

    #[test]
    fn test_quantize_shift_then_offset() -> Result<(), ConvolutionError> {
        let quantizer = Quantizer::<u8>::new(FixedPointScale::new(4, 128))?;
        assert_eq!(quantizer.quantize(-160), 118);
        assert_eq!(quantizer.quantize(0), 128);
        assert_eq!(quantizer.quantize(4000), 255);

        let quantizer = Quantizer::<u8>::new(FixedPointScale::default().with_offset(-10))?;
        assert_eq!(quantizer.quantize(5), 0);
        Ok(())
    }

    #[test]
    fn test_quantize_extreme_offset_clips() -> Result<(), ConvolutionError> {
        let quantizer = Quantizer::<u16>::new(FixedPointScale::new(0, i32::MAX as i64))?;
        assert_eq!(quantizer.quantize(i32::MAX), u16::MAX);
        Ok(())
    }

    #[test]
    fn test_quantizer_invalid_scale() {
        assert!(matches!(
            Quantizer::<u8>::new(FixedPointScale::new(32, 0)),
            Err(ConvolutionError::ShiftOutOfRange(32, 32))
        ));
        assert!(matches!(
            Quantizer::<i16>::new(FixedPointScale::new(0, i64::MAX)),
            Err(ConvolutionError::OffsetOutOfRange(i64::MAX))
        ));
        assert!(Quantizer::<u32>::new(FixedPointScale::new(63, i64::MAX)).is_ok());
    }
}
