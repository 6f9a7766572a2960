#![warn(missing_docs)]
//! TallyBench Statistical Engine
//!
//! Numeric building blocks for benchmark analysis and general descriptive
//! statistics:
//! - Array utilities (sort, partial sort, one-pass extremes, buffer construction)
//! - Single-pass power sums yielding mean, variance, skewness and kurtosis
//! - Continuous distributions with a shared CDF inverter (normal distribution)
//! - Ordinary least squares regression
//! - Bootstrap resampling with percentile and BCa intervals
//! - IQR outlier classification and outlier-variance estimation

pub mod array;
mod bootstrap;
mod distribution;
mod normal;
mod outliers;
mod percentiles;
mod powers;
mod regression;
pub mod special;
mod summary;

pub use bootstrap::{
    BootstrapConfig, BootstrapError, BootstrapMethod, BootstrapResult, ConfidenceInterval,
    DEFAULT_SEED, MIN_BOOTSTRAP_SAMPLES, bootstrap, compute_bootstrap,
};
pub use distribution::{ContinuousDistribution, find_root};
pub use normal::NormalDistribution;
pub use outliers::{
    Fences, OutlierAnalysis, OutlierEffect, OutlierVariance, detect_outliers, outlier_variance,
};
pub use percentiles::{Percentiles, compute_percentile, compute_percentiles, percentile_of_sorted};
pub use powers::{PowerAccumulator, PowerSums, powers};
pub use regression::{Regression, RegressionError, ols, ols_pairs};
pub use summary::{SampleSummary, compute_summary};

/// Threshold below which BCa method is used instead of percentile
pub const BCA_THRESHOLD: usize = 100;

/// Default number of bootstrap resamples
pub const DEFAULT_BOOTSTRAP_ITERATIONS: usize = 10_000;

/// Default confidence level (95%)
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(BCA_THRESHOLD, 100);
        assert_eq!(DEFAULT_BOOTSTRAP_ITERATIONS, 10_000);
        assert!((DEFAULT_CONFIDENCE_LEVEL - 0.95).abs() < f64::EPSILON);
    }
}
