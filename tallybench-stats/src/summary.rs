//! Summary Statistics
//!
//! Moments come from a single power-sum pass; extremes from one `min_max`
//! pass; percentiles from one sort.

use crate::array::min_max;
use crate::percentiles::{Percentiles, compute_percentiles};
use crate::powers::powers;
use serde::{Deserialize, Serialize};

/// Descriptive statistics of one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub count: usize,
    pub mean: f64,
    /// Unbiased (n-1) variance
    pub variance: f64,
    pub std_dev: f64,
    /// Non-finite when all samples are equal
    pub skewness: f64,
    /// Excess kurtosis; non-finite when all samples are equal
    pub kurtosis: f64,
    /// `+inf` for an empty sample
    pub min: f64,
    /// `-inf` for an empty sample
    pub max: f64,
    pub percentiles: Percentiles,
}

/// Summarize a sample
pub fn compute_summary(samples: &[f64]) -> SampleSummary {
    let p = powers(4, samples);
    let (min, max) = min_max(samples);
    let variance = p.variance_unbiased();

    SampleSummary {
        count: p.count(),
        mean: p.mean(),
        variance,
        std_dev: variance.sqrt(),
        skewness: p.skewness(),
        kurtosis: p.kurtosis(),
        min,
        max,
        percentiles: compute_percentiles(samples),
    }
}

impl SampleSummary {
    /// Coefficient of variation in percent (0 when the mean is 0)
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.std_dev / self.mean) * 100.0
        }
    }

    /// Whether the sample is spread less than `cv_threshold` percent
    pub fn is_stable(&self, cv_threshold: f64) -> bool {
        self.coefficient_of_variation() < cv_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_summary() {
        let summary = compute_summary(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(summary.count, 5);
        assert!((summary.mean - 3.0).abs() < 1e-12);
        assert!((summary.variance - 2.5).abs() < 1e-12);
        assert!(summary.skewness.abs() < 1e-12);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.percentiles.p50, 3.0);
    }

    #[test]
    fn test_constant_sample() {
        let summary = compute_summary(&[100.0; 5]);

        assert_eq!(summary.variance, 0.0);
        assert_eq!(summary.coefficient_of_variation(), 0.0);
        assert!(!summary.skewness.is_finite());
    }

    #[test]
    fn test_empty_samples() {
        let summary = compute_summary(&[]);

        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, 0.0);
        assert_eq!(summary.min, f64::INFINITY);
        assert_eq!(summary.max, f64::NEG_INFINITY);
    }
}
