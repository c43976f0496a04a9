use num_traits::{PrimInt, Signed};

/// Trait for raster sample types.
///
/// Every sample type carries an accumulator type that is a signed integer
/// strictly wider than the sample itself, so a product of a sample with an
/// `i32` kernel coefficient and the sum of such products can be represented
/// without touching the sample's own range. Types without an implementation
/// (floating point, `u128`, `i128`) cannot be used as raster samples for
/// convolution.
///
/// Send and Sync are required for processing rows in parallel.
pub trait RasterDtype: PrimInt + Default + Send + Sync + std::fmt::Debug + 'static {
    /// The signed accumulator used to sum coefficient and sample products.
    type Acc: PrimInt + Signed + From<i32> + Send + Sync + std::fmt::Debug;

    /// Width of the sample type in bits.
    const BITS: u32;

    /// Width of the accumulator type in bits.
    const ACC_BITS: u32;

    /// Smallest sample value expressed in the accumulator type.
    const MIN_ACC: Self::Acc;

    /// Largest sample value expressed in the accumulator type.
    const MAX_ACC: Self::Acc;

    /// Widen a sample into the accumulator type.
    fn to_acc(self) -> Self::Acc;

    /// Narrow an accumulator value into the sample type.
    ///
    /// This is a plain truncating cast; callers clamp beforehand when the
    /// value may fall outside the sample range.
    fn from_acc(acc: Self::Acc) -> Self;
}

macro_rules! impl_raster_dtype {
    ($($t:ty => $acc:ty),* $(,)?) => {
        $(
            // the accumulator must keep at least one extra bit
            const _: () = assert!(<$t>::BITS < <$acc>::BITS);

            impl RasterDtype for $t {
                type Acc = $acc;

                const BITS: u32 = <$t>::BITS;
                const ACC_BITS: u32 = <$acc>::BITS;
                const MIN_ACC: $acc = <$t>::MIN as $acc;
                const MAX_ACC: $acc = <$t>::MAX as $acc;

                #[inline(always)]
                fn to_acc(self) -> $acc {
                    self as $acc
                }

                #[inline(always)]
                fn from_acc(acc: $acc) -> Self {
                    acc as $t
                }
            }
        )*
    };
}

impl_raster_dtype! {
    u8 => i32,
    i8 => i32,
    u16 => i32,
    i16 => i32,
    u32 => i64,
    i32 => i64,
    u64 => i128,
    i64 => i128,
}
