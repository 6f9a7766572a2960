//! Analysis - From Raw Runs to Estimates
//!
//! For one [`MeasurementSet`]:
//! - OLS regression of wall-clock time on iteration count separates the
//!   per-iteration cost (slope) from fixed per-run overhead (intercept)
//! - the `(iterations, time)` pairs are bootstrapped to bound slope and R²
//! - per-iteration times are bootstrapped to bound the mean and standard
//!   deviation, classified for outliers, and summarized

use crate::runner::MeasurementSet;
use serde::{Deserialize, Serialize};
use tallybench_stats::{
    BootstrapConfig, BootstrapError, BootstrapResult, MIN_BOOTSTRAP_SAMPLES, OutlierAnalysis,
    OutlierVariance, Regression, RegressionError, SampleSummary, bootstrap, compute_summary,
    detect_outliers, ols_pairs, outlier_variance, powers,
};
use thiserror::Error;

/// Estimates for one benchmark. Times are nanoseconds per iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// Point fit of time against iterations
    pub regression: Regression,
    /// Per-iteration cost with confidence bounds
    pub slope: BootstrapResult,
    /// Goodness of the linear fit with confidence bounds
    pub r_squared: BootstrapResult,
    /// Mean per-iteration time with confidence bounds
    pub mean: BootstrapResult,
    /// Standard deviation of per-iteration time with confidence bounds
    pub std_dev: BootstrapResult,
    /// IQR classification of per-iteration times
    pub outliers: OutlierAnalysis,
    /// How much of the variance the outliers explain
    pub outlier_variance: OutlierVariance,
    /// Descriptive statistics of per-iteration times
    pub summary: SampleSummary,
    /// Number of runs analyzed
    pub samples: usize,
}

/// Why a measurement set could not be analyzed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Too few runs, or all runs used the same iteration count
    #[error(
        "insufficient data: {samples} runs over {distinct} distinct iteration counts \
         (need at least {MIN_BOOTSTRAP_SAMPLES} runs and 2 distinct counts)"
    )]
    InsufficientData {
        /// Runs recorded
        samples: usize,
        /// Distinct iteration counts among them
        distinct: usize,
    },

    /// The point regression could not be fitted
    #[error("regression failed: {0}")]
    Regression(#[from] RegressionError),

    /// Resampling failed
    #[error("bootstrap failed: {0}")]
    Bootstrap(#[from] BootstrapError),
}

fn slope_of(pairs: &[(f64, f64)]) -> f64 {
    ols_pairs(pairs).map_or(f64::NAN, |r| r.slope)
}

fn r_squared_of(pairs: &[(f64, f64)]) -> f64 {
    ols_pairs(pairs).map_or(f64::NAN, |r| r.r_squared)
}

fn mean_of(xs: &[f64]) -> f64 {
    powers(2, xs).mean()
}

fn std_dev_of(xs: &[f64]) -> f64 {
    powers(2, xs).variance_unbiased().sqrt()
}

/// Analyze the runs of one benchmark.
///
/// Fails with [`AnalysisError::InsufficientData`] instead of fitting a
/// regression through fewer than two distinct iteration counts.
pub fn analyze(set: &MeasurementSet, config: &BootstrapConfig) -> Result<Analysis, AnalysisError> {
    let samples = set.len();
    let distinct = set.distinct_iterations();
    if distinct < 2 || samples < MIN_BOOTSTRAP_SAMPLES {
        return Err(AnalysisError::InsufficientData { samples, distinct });
    }

    let pairs = set.pairs();
    let regression = ols_pairs(&pairs)?;
    let slope = bootstrap(&pairs, slope_of, config)?;
    let r_squared = bootstrap(&pairs, r_squared_of, config)?;

    let times = set.per_iteration_times();
    let mean = bootstrap(&times, mean_of, config)?;
    let std_dev = bootstrap(&times, std_dev_of, config)?;

    let outliers = detect_outliers(&times);
    let outlier_variance = outlier_variance(
        mean.point_estimate,
        std_dev.point_estimate,
        samples as f64,
    );

    Ok(Analysis {
        regression,
        slope,
        r_squared,
        mean,
        std_dev,
        outliers,
        outlier_variance,
        summary: compute_summary(&times),
        samples,
    })
}

/// One row of the results table. Column order is fixed; times are seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Qualified benchmark name
    #[serde(rename = "Name")]
    pub name: String,
    /// Mean estimate
    #[serde(rename = "Mean")]
    pub mean: f64,
    /// Lower bound of the mean
    #[serde(rename = "MeanLB")]
    pub mean_lower: f64,
    /// Upper bound of the mean
    #[serde(rename = "MeanUB")]
    pub mean_upper: f64,
    /// Standard deviation estimate
    #[serde(rename = "Stddev")]
    pub std_dev: f64,
    /// Lower bound of the standard deviation
    #[serde(rename = "StddevLB")]
    pub std_dev_lower: f64,
    /// Upper bound of the standard deviation
    #[serde(rename = "StddevUB")]
    pub std_dev_upper: f64,
}

const NANOS_PER_SECOND: f64 = 1e9;

impl ReportRow {
    /// Column headers, in order
    pub const HEADERS: [&'static str; 7] = [
        "Name", "Mean", "MeanLB", "MeanUB", "Stddev", "StddevLB", "StddevUB",
    ];

    /// Build the row for `name` from its analysis
    pub fn new(name: impl Into<String>, analysis: &Analysis) -> Self {
        let s = |ns: f64| ns / NANOS_PER_SECOND;
        let mean = &analysis.mean;
        let std_dev = &analysis.std_dev;
        Self {
            name: name.into(),
            mean: s(mean.point_estimate),
            mean_lower: s(mean.confidence_interval.lower),
            mean_upper: s(mean.confidence_interval.upper),
            std_dev: s(std_dev.point_estimate),
            std_dev_lower: s(std_dev.confidence_interval.lower),
            std_dev_upper: s(std_dev.confidence_interval.upper),
        }
    }
}
