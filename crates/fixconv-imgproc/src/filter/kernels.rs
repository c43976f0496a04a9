use super::{ConvolutionError, KernelMatrix};

/// Create the identity kernel, a single coefficient of 1.
pub fn identity_kernel() -> Result<KernelMatrix, ConvolutionError> {
    KernelMatrix::new(1, 1, vec![1])
}

/// Create a box kernel row vector.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
///
/// # Returns
///
/// A row vector of ones; normalize with a right shift of `log2(kernel_size)`
/// when the size is a power of two.
pub fn box_kernel_1d(kernel_size: usize) -> Result<KernelMatrix, ConvolutionError> {
    KernelMatrix::new(kernel_size, 1, vec![1; kernel_size])
}

/// Create a 2D box kernel of ones.
pub fn box_kernel_2d(width: usize, height: usize) -> Result<KernelMatrix, ConvolutionError> {
    KernelMatrix::new(width, height, vec![1; width * height])
}

/// Create a binomial kernel row vector.
///
/// The coefficients are row `kernel_size - 1` of Pascal's triangle, an
/// integer approximation of a gaussian whose sum is `2^(kernel_size - 1)`.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel, at most 34.
///
/// # Errors
///
/// If the size is zero or the coefficients overflow `i32`, an error is returned.
pub fn binomial_kernel_1d(kernel_size: usize) -> Result<KernelMatrix, ConvolutionError> {
    if kernel_size == 0 {
        return Err(ConvolutionError::InvalidKernelSize(kernel_size, 1));
    }

    let mut kernel = vec![1i32];
    for _ in 1..kernel_size {
        let mut next = Vec::with_capacity(kernel.len() + 1);
        next.push(1);
        for pair in kernel.windows(2) {
            let k = pair[0]
                .checked_add(pair[1])
                .ok_or(ConvolutionError::InvalidKernelSize(kernel_size, 1))?;
            next.push(k);
        }
        next.push(1);
        kernel = next;
    }

    KernelMatrix::new(kernel_size, 1, kernel)
}

/// Create a sobel kernel pair.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel, 3 or 5.
///
/// # Returns
///
/// The `(derivative, smoothing)` row vectors.
pub fn sobel_kernel_1d(
    kernel_size: usize,
) -> Result<(KernelMatrix, KernelMatrix), ConvolutionError> {
    let (derivative, smoothing) = match kernel_size {
        3 => (&[-1, 0, 1][..], &[1, 2, 1][..]),
        5 => (&[-1, -2, 0, 2, 1][..], &[1, 4, 6, 4, 1][..]),
        _ => return Err(ConvolutionError::InvalidSobelSize(kernel_size)),
    };
    Ok((
        KernelMatrix::from_row(derivative)?,
        KernelMatrix::from_row(smoothing)?,
    ))
}
