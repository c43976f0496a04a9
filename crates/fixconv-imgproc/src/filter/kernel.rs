use fixconv_image::{Raster, RasterSize};

use super::ConvolutionError;

/// A 2D grid of signed integer convolution coefficients.
///
/// The coefficients are stored row-major in a single band `Raster<i32>`.
/// There is no implicit normalization: a kernel meant to average must be
/// paired with a matching right shift or carry normalized coefficients.
#[derive(Clone, Debug, PartialEq)]
pub struct KernelMatrix(Raster<i32>);

impl KernelMatrix {
    /// Create a new kernel from row-major coefficients.
    ///
    /// # Arguments
    ///
    /// * `width` - The number of columns.
    /// * `height` - The number of rows.
    /// * `data` - The coefficients, row after row.
    ///
    /// # Errors
    ///
    /// If a dimension is zero or the data length is not `width * height`,
    /// an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixconv_imgproc::filter::KernelMatrix;
    ///
    /// let kernel = KernelMatrix::new(3, 1, vec![1, 2, 1]).unwrap();
    ///
    /// assert_eq!(kernel.width(), 3);
    /// assert_eq!(kernel.get(1, 0), Some(2));
    /// assert!(kernel.is_row_vector());
    /// ```
    pub fn new(width: usize, height: usize, data: Vec<i32>) -> Result<Self, ConvolutionError> {
        if width == 0 || height == 0 {
            return Err(ConvolutionError::InvalidKernelSize(width, height));
        }
        Ok(Self(Raster::new(RasterSize { width, height }, 1, data)?))
    }

    /// Create a kernel with every coefficient set to zero.
    pub fn zeros(width: usize, height: usize) -> Result<Self, ConvolutionError> {
        Self::new(width, height, vec![0; width * height])
    }

    /// Create a `1 x N` row vector.
    pub fn from_row(coefficients: &[i32]) -> Result<Self, ConvolutionError> {
        Self::new(coefficients.len(), 1, coefficients.to_vec())
    }

    /// Create an `N x 1` column vector.
    pub fn from_column(coefficients: &[i32]) -> Result<Self, ConvolutionError> {
        Self::new(1, coefficients.len(), coefficients.to_vec())
    }

    /// Build the 2D kernel `k[j][i] = ykernel[j] * xkernel[i]` from two row vectors.
    ///
    /// Convolving with the result is what [`super::convolve_separable`]
    /// approximates with two 1D passes.
    ///
    /// # Errors
    ///
    /// If either kernel has more than one row, an error is returned.
    pub fn outer(xkernel: &KernelMatrix, ykernel: &KernelMatrix) -> Result<Self, ConvolutionError> {
        for k in [xkernel, ykernel] {
            if k.height() != 1 {
                return Err(ConvolutionError::KernelNotRowVector(k.width(), k.height()));
            }
        }

        let xs = xkernel.row(0);
        let data = ykernel
            .row(0)
            .iter()
            .flat_map(|&ky| xs.iter().map(move |&kx| ky * kx))
            .collect();

        Self::new(xkernel.width(), ykernel.width(), data)
    }

    /// Get the number of columns.
    pub fn width(&self) -> usize {
        self.0.width()
    }

    /// Get the number of rows.
    pub fn height(&self) -> usize {
        self.0.height()
    }

    /// Get the coefficient at column `x` and row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<i32> {
        self.0.get(x, y, 0).copied()
    }

    /// Set the coefficient at column `x` and row `y`.
    pub fn set(&mut self, value: i32, x: usize, y: usize) -> Result<(), ConvolutionError> {
        Ok(self.0.set(value, x, y, 0)?)
    }

    /// Get the coefficients of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    pub fn row(&self, y: usize) -> &[i32] {
        self.0.line(y, 0)
    }

    /// Get all coefficients, row-major.
    pub fn as_slice(&self) -> &[i32] {
        self.0.as_slice()
    }

    /// Whether this is a 1D kernel usable by the separable path: one row, more than one column.
    pub fn is_row_vector(&self) -> bool {
        self.height() == 1 && self.width() > 1
    }

    /// Return a new kernel with rows and columns swapped.
    ///
    /// A `1 x N` row vector becomes an `N x 1` column vector.
    pub fn transpose(&self) -> Result<Self, ConvolutionError> {
        let (width, height) = (self.width(), self.height());
        let data = (0..width)
            .flat_map(|x| (0..height).map(move |y| (x, y)))
            .map(|(x, y)| self.row(y)[x])
            .collect();

        Self::new(height, width, data)
    }

    /// Sum of all coefficients.
    pub fn sum(&self) -> i64 {
        self.as_slice().iter().map(|&k| k as i64).sum()
    }

    /// Sum of the absolute values of all coefficients.
    ///
    /// Bounds the magnitude of any accumulated sum: no output can exceed
    /// `abs_sum() * max(|sample|)`.
    pub fn abs_sum(&self) -> i64 {
        self.as_slice().iter().map(|&k| (k as i64).abs()).sum()
    }
}
