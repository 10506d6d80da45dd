use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be positive.
    #[error("row stride must be > 0")]
    InvalidRowStride,

    /// The buffer is not a whole number of rows.
    #[error("buffer of length {0} is not a multiple of the row stride {1}")]
    RaggedRows(usize, usize),
}

/// Controls how the row loops of the raster operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Check the strategy can be executed.
    pub fn validate(&self) -> Result<(), ParallelError> {
        match self {
            ExecutionStrategy::Fixed(0) => Err(ParallelError::InvalidThreadCount(0)),
            _ => Ok(()),
        }
    }
}

/// Apply `op` to every row of `dst` with the given strategy.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `dst` - The flat destination buffer, row-major.
/// * `stride` - Number of elements per row (width * channels).
/// * `op` - Called with the row index and the mutable row slice.
pub fn par_rows_mut<T, F>(
    strategy: ExecutionStrategy,
    dst: &mut [T],
    stride: usize,
    op: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if stride == 0 {
        return Err(ParallelError::InvalidRowStride);
    }
    if dst.len() % stride != 0 {
        return Err(ParallelError::RaggedRows(dst.len(), stride));
    }

    match strategy {
        ExecutionStrategy::Serial => {
            dst.chunks_exact_mut(stride)
                .enumerate()
                .for_each(|(y, row)| op(y, row));
        }
        ExecutionStrategy::ParallelRows => {
            dst.par_chunks_exact_mut(stride)
                .enumerate()
                .for_each(|(y, row)| op(y, row));
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_exact_mut(stride)
                    .enumerate()
                    .for_each(|(y, row)| op(y, row));
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_rows(strategy: ExecutionStrategy) -> Result<Vec<usize>, ParallelError> {
        let mut dst = vec![0usize; 6];
        par_rows_mut(strategy, &mut dst, 2, |y, row| {
            row.iter_mut().enumerate().for_each(|(x, v)| *v = y * 10 + x)
        })?;
        Ok(dst)
    }

    #[test]
    fn test_rows_serial() -> Result<(), ParallelError> {
        assert_eq!(fill_rows(ExecutionStrategy::Serial)?, vec![0, 1, 10, 11, 20, 21]);
        Ok(())
    }

    #[test]
    fn test_rows_parallel() -> Result<(), ParallelError> {
        assert_eq!(fill_rows(ExecutionStrategy::ParallelRows)?, vec![0, 1, 10, 11, 20, 21]);
        Ok(())
    }

    #[test]
    fn test_rows_fixed() -> Result<(), ParallelError> {
        assert_eq!(fill_rows(ExecutionStrategy::Fixed(2))?, vec![0, 1, 10, 11, 20, 21]);
        Ok(())
    }

    #[test]
    fn test_rows_fixed_error() {
        assert_eq!(
            fill_rows(ExecutionStrategy::Fixed(0)),
            Err(ParallelError::InvalidThreadCount(0))
        );
        assert!(ExecutionStrategy::Fixed(0).validate().is_err());
        assert!(ExecutionStrategy::default().validate().is_ok());
    }

    #[test]
    fn test_rows_invalid_stride() {
        let mut dst = vec![0u8; 5];
        let res = par_rows_mut(ExecutionStrategy::Serial, &mut dst, 0, |_, _| {});
        assert_eq!(res, Err(ParallelError::InvalidRowStride));
        let res = par_rows_mut(ExecutionStrategy::Serial, &mut dst, 2, |_, _| {});
        assert_eq!(res, Err(ParallelError::RaggedRows(5, 2)));
    }
}
