use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

/// Controls how the rows of a band are distributed over workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool, one task per row.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small rasters, debugging, or when the overhead of
    /// parallelization outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),

    /// Parallel rows for rasters of at least [`AUTO_PARALLEL_THRESHOLD`] pixels
    /// per band, serial otherwise.
    Auto,
}

/// Number of pixels per band from which [`ExecutionStrategy::Auto`] goes parallel.
pub const AUTO_PARALLEL_THRESHOLD: usize = 100_000;

impl ExecutionStrategy {
    /// Check the strategy parameters before any work is scheduled.
    pub fn validate(&self) -> Result<(), ParallelError> {
        match self {
            ExecutionStrategy::Fixed(0) => Err(ParallelError::InvalidThreadCount(0)),
            _ => Ok(()),
        }
    }

    /// Whether rows of a band with `num_pixels` pixels run on more than one worker.
    pub fn is_parallel(&self, num_pixels: usize) -> bool {
        match self {
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::ParallelRows | ExecutionStrategy::Fixed(_) => true,
            ExecutionStrategy::Auto => num_pixels >= AUTO_PARALLEL_THRESHOLD,
        }
    }
}

/// Apply a function to every line of a band plane.
///
/// The plane is split into lines of `row_stride` samples and `f` receives the
/// row index together with the first `width` samples of that line. Each line
/// is handed to exactly one worker, so `f` can write its line without locking.
///
/// # Arguments
///
/// * `plane` - The band plane, `row_stride * height` samples.
/// * `row_stride` - The distance between two consecutive lines.
/// * `width` - The number of visible samples per line.
/// * `strategy` - The execution strategy.
/// * `f` - The operation to run for each `(row, line)` pair.
pub fn par_iter_lines<T, F>(
    plane: &mut [T],
    row_stride: usize,
    width: usize,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    strategy.validate()?;

    if plane.is_empty() || row_stride == 0 {
        return Ok(());
    }

    let num_pixels = (plane.len() / row_stride) * width;
    let run_parallel = |plane: &mut [T]| {
        plane
            .par_chunks_exact_mut(row_stride)
            .enumerate()
            .for_each(|(y, line)| f(y, &mut line[..width]));
    };

    match strategy {
        ExecutionStrategy::Fixed(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;
            pool.install(|| run_parallel(plane));
        }
        s if s.is_parallel(num_pixels) => run_parallel(plane),
        _ => {
            plane
                .chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(y, line)| f(y, &mut line[..width]));
        }
    }

    Ok(())
}
