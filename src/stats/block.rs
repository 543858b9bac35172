//! Block averaging as a convergence diagnostic.
//!
//! The series is cut into `B` contiguous blocks of `floor(N / B)` samples.
//! Trailing samples beyond `B * floor(N / B)` are dropped rather than folded
//! into an unequal last block, so the grand mean (the mean of block means)
//! can differ from the plain sample mean when `N` is not divisible by `B`.

use super::descriptive;
use crate::error::AnalysisError;
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockAverage {
    pub block_means: Vec<f64>,
    pub block_size: usize,
    pub grand_mean: f64,
    /// Population std of the block means divided by sqrt(B)
    pub standard_error: f64,
    /// Trailing samples excluded from every block
    pub dropped: usize,
}

impl BlockAverage {
    pub fn block_count(&self) -> usize {
        self.block_means.len()
    }

    /// Standard error relative to |grand mean|; infinite when the mean is zero
    pub fn relative_error(&self) -> f64 {
        if self.grand_mean == 0.0 {
            f64::INFINITY
        } else {
            self.standard_error / self.grand_mean.abs()
        }
    }

    pub fn is_converged(&self, threshold: f64) -> bool {
        self.relative_error() <= threshold
    }
}

pub fn block_average(series: &[f64], blocks: usize) -> Result<BlockAverage> {
    if blocks < 2 {
        return Err(AnalysisError::InsufficientData(format!(
            "block averaging needs at least 2 blocks, got {}",
            blocks
        )));
    }
    let block_size = series.len() / blocks;
    if block_size < 1 {
        return Err(AnalysisError::InsufficientData(format!(
            "{} samples cannot fill {} blocks",
            series.len(),
            blocks
        )));
    }

    let used = block_size * blocks;
    let dropped = series.len() - used;
    if dropped > 0 {
        tracing::debug!(
            samples = series.len(),
            blocks = blocks,
            dropped = dropped,
            "Trailing samples dropped from block average"
        );
    }

    let block_means = series[..used]
        .chunks_exact(block_size)
        .map(descriptive::mean)
        .collect::<Result<Vec<f64>>>()?;
    let grand_mean = descriptive::mean(&block_means)?;
    let standard_error = descriptive::std_dev(&block_means, 0)? / (blocks as f64).sqrt();

    Ok(BlockAverage {
        block_means,
        block_size,
        grand_mean,
        standard_error,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_trailing_samples() {
        let data: Vec<f64> = (1..=11).map(|i| i as f64).collect();
        let result = block_average(&data, 5).unwrap();
        assert_eq!(result.block_size, 2);
        assert_eq!(result.dropped, 1);
        assert_eq!(result.block_means, vec![1.5, 3.5, 5.5, 7.5, 9.5]);
        assert_eq!(result.grand_mean, 5.5);
    }

    #[test]
    fn test_rejects_single_block() {
        assert!(matches!(
            block_average(&[1.0, 2.0, 3.0], 1),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_rejects_more_blocks_than_samples() {
        assert!(matches!(
            block_average(&[1.0, 2.0, 3.0], 4),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_relative_error_of_zero_mean() {
        let result = block_average(&[-1.0, 1.0, -1.0, 1.0], 2).unwrap();
        assert_eq!(result.grand_mean, 0.0);
        assert!(result.relative_error().is_infinite());
        assert!(!result.is_converged(0.1));
    }
}
