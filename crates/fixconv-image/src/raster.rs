use crate::error::RasterError;

/// Raster size in pixels
///
/// A struct to represent the size of a raster in pixels.
///
/// # Examples
///
/// ```
/// use fixconv_image::RasterSize;
///
/// let raster_size = RasterSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(raster_size.width, 10);
/// assert_eq!(raster_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RasterSize {
    /// Width of the raster in pixels
    pub width: usize,
    /// Height of the raster in pixels
    pub height: usize,
}

impl std::fmt::Display for RasterSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "RasterSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for RasterSize {
    fn from(size: [usize; 2]) -> Self {
        RasterSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Represents a planar multi-band raster of integer samples.
///
/// Every `(band, row)` pair addresses a line of `width` contiguous samples.
/// Consecutive lines of a band are `row_stride` elements apart, with
/// `row_stride >= width`, and consecutive bands are `row_stride * height`
/// elements apart.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster<T> {
    size: RasterSize,
    bands: usize,
    row_stride: usize,
    data: Vec<T>,
}

impl<T> Raster<T> {
    /// Create a new tightly packed raster from sample data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the raster in pixels.
    /// * `bands` - The number of bands.
    /// * `data` - The samples, band after band, row after row.
    ///
    /// # Errors
    ///
    /// If `bands` is zero or the data length does not match the raster size,
    /// an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixconv_image::{Raster, RasterSize};
    ///
    /// let raster = Raster::<u8>::new(
    ///     RasterSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     3,
    ///     vec![0u8; 10 * 20 * 3],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(raster.width(), 10);
    /// assert_eq!(raster.height(), 20);
    /// assert_eq!(raster.bands(), 3);
    /// ```
    pub fn new(size: RasterSize, bands: usize, data: Vec<T>) -> Result<Self, RasterError> {
        Self::with_row_stride(size, bands, size.width, data)
    }

    /// Create a new raster whose lines are padded to `row_stride` samples.
    ///
    /// # Errors
    ///
    /// If `bands` is zero, `row_stride` is smaller than the width, or the data
    /// length is not `row_stride * height * bands`, an error is returned.
    pub fn with_row_stride(
        size: RasterSize,
        bands: usize,
        row_stride: usize,
        data: Vec<T>,
    ) -> Result<Self, RasterError> {
        if bands == 0 {
            return Err(RasterError::ZeroBands);
        }

        if row_stride < size.width {
            return Err(RasterError::InvalidRowStride(row_stride, size.width));
        }

        let expected = row_stride * size.height * bands;
        if data.len() != expected {
            return Err(RasterError::InvalidDataLength(data.len(), expected));
        }

        Ok(Self {
            size,
            bands,
            row_stride,
            data,
        })
    }

    /// Create a new raster with every sample set to `val`.
    pub fn from_size_val(size: RasterSize, bands: usize, val: T) -> Result<Self, RasterError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height * bands];
        Self::new(size, bands, data)
    }

    /// Create a new raster copying the samples from a slice.
    pub fn from_size_slice(size: RasterSize, bands: usize, data: &[T]) -> Result<Self, RasterError>
    where
        T: Clone,
    {
        Self::new(size, bands, data.to_vec())
    }

    /// Create a default-filled raster with the same width, height and bands as `other`.
    pub fn like<U>(other: &Raster<U>) -> Self
    where
        T: Clone + Default,
    {
        Self {
            size: other.size,
            bands: other.bands,
            row_stride: other.width(),
            data: vec![T::default(); other.width() * other.height() * other.bands],
        }
    }

    /// Get the size of the raster in pixels.
    pub fn size(&self) -> RasterSize {
        self.size
    }

    /// Get the width of the raster in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the raster in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of bands in the raster.
    pub fn bands(&self) -> usize {
        self.bands
    }

    /// Get the number of samples between the starts of two consecutive lines.
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Get the number of samples between the starts of two consecutive bands.
    pub fn band_stride(&self) -> usize {
        self.row_stride * self.size.height
    }

    /// Get the number of pixels of a single band.
    pub fn num_pixels(&self) -> usize {
        self.size.width * self.size.height
    }

    /// Check whether two rasters have the same width and height.
    ///
    /// The number of bands and the row strides may differ.
    pub fn is_matched<U>(&self, other: &Raster<U>) -> bool {
        self.size == other.size
    }

    fn line_start(&self, row: usize, band: usize) -> usize {
        assert!(row < self.size.height, "row index out of bounds");
        assert!(band < self.bands, "band index out of bounds");
        band * self.band_stride() + row * self.row_stride
    }

    /// Get the `width` samples of a line.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `band` is out of bounds.
    pub fn line(&self, row: usize, band: usize) -> &[T] {
        let start = self.line_start(row, band);
        &self.data[start..start + self.size.width]
    }

    /// Get the `width` samples of a line mutably.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `band` is out of bounds.
    pub fn line_mut(&mut self, row: usize, band: usize) -> &mut [T] {
        let start = self.line_start(row, band);
        let width = self.size.width;
        &mut self.data[start..start + width]
    }

    /// Get the samples of a band plane, row padding included.
    ///
    /// # Panics
    ///
    /// Panics if `band` is out of bounds.
    pub fn band(&self, band: usize) -> &[T] {
        assert!(band < self.bands, "band index out of bounds");
        let stride = self.band_stride();
        &self.data[band * stride..(band + 1) * stride]
    }

    /// Get the samples of a band plane mutably, row padding included.
    ///
    /// # Panics
    ///
    /// Panics if `band` is out of bounds.
    pub fn band_mut(&mut self, band: usize) -> &mut [T] {
        assert!(band < self.bands, "band index out of bounds");
        let stride = self.band_stride();
        &mut self.data[band * stride..(band + 1) * stride]
    }

    /// Get a reference to the sample at `(x, y)` in `band`.
    ///
    /// Returns `None` if the coordinate is out of bounds.
    pub fn get(&self, x: usize, y: usize, band: usize) -> Option<&T> {
        if x >= self.size.width || y >= self.size.height || band >= self.bands {
            return None;
        }
        self.data
            .get(band * self.band_stride() + y * self.row_stride + x)
    }

    /// Set the sample at `(x, y)` in `band`.
    ///
    /// # Errors
    ///
    /// If the coordinate is out of bounds, an error is returned.
    pub fn set(&mut self, value: T, x: usize, y: usize, band: usize) -> Result<(), RasterError> {
        if x >= self.size.width || y >= self.size.height || band >= self.bands {
            return Err(RasterError::PixelOutOfBounds(x, y, band));
        }
        let idx = band * self.band_stride() + y * self.row_stride + x;
        self.data[idx] = value;
        Ok(())
    }

    /// Get the backing buffer, row padding included.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the backing buffer mutably, row padding included.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the raster and return the backing buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_size() {
        let size: RasterSize = [4, 3].into();
        assert_eq!(size.width, 4);
        assert_eq!(size.height, 3);
        assert_eq!(size.to_string(), "RasterSize { width: 4, height: 3 }");
    }

    #[test]
    fn test_raster_new() -> Result<(), RasterError> {
        let raster = Raster::<u16>::new([3, 2].into(), 2, (0..12).collect())?;
        assert_eq!(raster.width(), 3);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.bands(), 2);
        assert_eq!(raster.row_stride(), 3);
        assert_eq!(raster.band_stride(), 6);
        assert_eq!(raster.line(1, 0), &[3, 4, 5]);
        assert_eq!(raster.line(0, 1), &[6, 7, 8]);
        assert_eq!(raster.band(1), &[6, 7, 8, 9, 10, 11]);
        Ok(())
    }

    #[test]
    fn test_raster_invalid_layout() {
        let res = Raster::<u8>::new([3, 2].into(), 1, vec![0; 5]);
        assert_eq!(res, Err(RasterError::InvalidDataLength(5, 6)));

        let res = Raster::<u8>::new([3, 2].into(), 0, vec![]);
        assert_eq!(res, Err(RasterError::ZeroBands));

        let res = Raster::<u8>::with_row_stride([3, 2].into(), 1, 2, vec![0; 4]);
        assert_eq!(res, Err(RasterError::InvalidRowStride(2, 3)));
    }

    #[test]
    fn test_raster_row_stride() -> Result<(), RasterError> {
        #[rustfmt::skip]
        let raster = Raster::<i16>::with_row_stride(
            [2, 2].into(),
            1,
            4,
            vec![
                1, 2, -1, -1,
                3, 4, -1, -1,
            ],
        )?;
        assert_eq!(raster.line(0, 0), &[1, 2]);
        assert_eq!(raster.line(1, 0), &[3, 4]);
        assert_eq!(raster.get(1, 1, 0), Some(&4));
        assert_eq!(raster.get(2, 1, 0), None);
        Ok(())
    }

    #[test]
    fn test_raster_get_set() -> Result<(), RasterError> {
        let mut raster = Raster::<u8>::from_size_val([4, 4].into(), 3, 0)?;
        raster.set(42, 1, 2, 2)?;
        assert_eq!(raster.get(1, 2, 2), Some(&42));
        assert_eq!(raster.line(2, 2), &[0, 42, 0, 0]);
        assert_eq!(
            raster.set(1, 4, 0, 0),
            Err(RasterError::PixelOutOfBounds(4, 0, 0))
        );
        assert_eq!(raster.get(0, 0, 3), None);
        Ok(())
    }

    #[test]
    fn test_raster_line_mut() -> Result<(), RasterError> {
        let mut raster = Raster::<u8>::from_size_val([3, 2].into(), 1, 0)?;
        raster.line_mut(1, 0).copy_from_slice(&[7, 8, 9]);
        assert_eq!(raster.as_slice(), &[0, 0, 0, 7, 8, 9]);
        Ok(())
    }

    #[test]
    fn test_raster_matched() -> Result<(), RasterError> {
        let a = Raster::<u8>::from_size_val([4, 3].into(), 1, 0)?;
        let b = Raster::<i32>::from_size_val([4, 3].into(), 3, 0)?;
        let c = Raster::<u8>::from_size_val([3, 4].into(), 1, 0)?;
        assert!(a.is_matched(&b));
        assert!(!a.is_matched(&c));

        let d = Raster::<u16>::like(&b);
        assert_eq!(d.size(), b.size());
        assert_eq!(d.bands(), 3);
        assert!(d.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    #[should_panic]
    fn test_raster_line_out_of_bounds() {
        let raster = Raster::<u8>::from_size_val([2, 2].into(), 1, 0).unwrap();
        let _ = raster.line(2, 0);
    }
}
