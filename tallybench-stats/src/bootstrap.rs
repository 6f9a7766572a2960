//! Bootstrap Resampling
//!
//! Implements both percentile and BCa (Bias-Corrected and Accelerated) bootstrap
//! methods for computing confidence intervals of an arbitrary statistic.
//!
//! Every resample draws from its own RNG seeded from `(seed, resample index)`,
//! so parallel and serial runs produce identical replicates.

use crate::distribution::ContinuousDistribution;
use crate::normal::NormalDistribution;
use crate::{BCA_THRESHOLD, DEFAULT_BOOTSTRAP_ITERATIONS, DEFAULT_CONFIDENCE_LEVEL};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seed used when the caller does not pick one
pub const DEFAULT_SEED: u64 = 0x7a11_be4c;

/// Bootstrap configuration
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Number of bootstrap resamples
    pub iterations: usize,
    /// Confidence level (default: 0.95 for 95% CI)
    pub confidence_level: f64,
    /// Whether to use parallel computation
    pub parallel: bool,
    /// Force BCa method even for large samples
    pub force_bca: bool,
    /// Base RNG seed
    pub seed: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_BOOTSTRAP_ITERATIONS,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            parallel: true,
            force_bca: false,
            seed: DEFAULT_SEED,
        }
    }
}

/// Which bootstrap method was used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootstrapMethod {
    /// Standard percentile method (for N >= 100)
    Percentile,
    /// BCa method (for small samples or when forced)
    Bca,
}

/// Confidence interval bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    pub level: f64,
}

impl ConfidenceInterval {
    /// Whether `x` lies within the closed interval.
    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }
}

/// Result of bootstrap analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapResult {
    /// Statistic evaluated on the original data
    pub point_estimate: f64,
    /// Confidence interval
    pub confidence_interval: ConfidenceInterval,
    /// Standard deviation of the bootstrap replicates
    pub standard_error: f64,
    /// Which method was used
    pub method: BootstrapMethod,
    /// Warning message if any
    pub warning: Option<String>,
}

/// Errors that can occur during bootstrap
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BootstrapError {
    #[error("Not enough samples: got {got}, need at least {min}")]
    NotEnoughSamples { got: usize, min: usize },

    #[error("Invalid confidence level: {0} (must be between 0 and 1)")]
    InvalidConfidenceLevel(f64),

    #[error("Bootstrap needs at least one resample")]
    NoIterations,

    #[error("Statistic is not finite on the observed data")]
    NonFiniteEstimate,

    #[error("Statistic was not finite on any resample")]
    NoFiniteReplicates,
}

/// Minimum data points for a meaningful resample
pub const MIN_BOOTSTRAP_SAMPLES: usize = 3;

/// Compute a bootstrap confidence interval for `statistic` over `data`.
///
/// Replicates for which the statistic is not finite (for example a
/// regression on a resample with a single distinct predictor) are dropped.
/// BCa is selected automatically for small samples (N < 100).
pub fn bootstrap<T, F>(
    data: &[T],
    statistic: F,
    config: &BootstrapConfig,
) -> Result<BootstrapResult, BootstrapError>
where
    T: Copy + Send + Sync,
    F: Fn(&[T]) -> f64 + Sync,
{
    if data.len() < MIN_BOOTSTRAP_SAMPLES {
        return Err(BootstrapError::NotEnoughSamples {
            got: data.len(),
            min: MIN_BOOTSTRAP_SAMPLES,
        });
    }
    if config.confidence_level <= 0.0 || config.confidence_level >= 1.0 {
        return Err(BootstrapError::InvalidConfidenceLevel(
            config.confidence_level,
        ));
    }
    if config.iterations == 0 {
        return Err(BootstrapError::NoIterations);
    }

    let n = data.len();
    let point_estimate = statistic(data);
    if !point_estimate.is_finite() {
        return Err(BootstrapError::NonFiniteEstimate);
    }

    let mut replicates = if config.parallel {
        generate_replicates_parallel(data, &statistic, config)
    } else {
        generate_replicates_serial(data, &statistic, config)
    };
    replicates.retain(|r| r.is_finite());
    if replicates.is_empty() {
        return Err(BootstrapError::NoFiniteReplicates);
    }
    replicates.sort_unstable_by(f64::total_cmp);

    let (lowest, highest) = (replicates[0], replicates[replicates.len() - 1]);
    if lowest == highest {
        return Ok(BootstrapResult {
            point_estimate,
            confidence_interval: ConfidenceInterval {
                lower: point_estimate,
                upper: point_estimate,
                level: config.confidence_level,
            },
            standard_error: 0.0,
            method: BootstrapMethod::Percentile,
            warning: Some("All resamples produced identical values".to_string()),
        });
    }

    let use_bca = config.force_bca || n < BCA_THRESHOLD;
    let (ci, method) = if use_bca {
        let ci = bca_interval(
            data,
            &statistic,
            point_estimate,
            &replicates,
            config.confidence_level,
        );
        (ci, BootstrapMethod::Bca)
    } else {
        let ci = percentile_interval(&replicates, config.confidence_level);
        (ci, BootstrapMethod::Percentile)
    };

    let replicate_mean = mean(&replicates);
    let se = (replicates
        .iter()
        .map(|x| (x - replicate_mean).powi(2))
        .sum::<f64>()
        / replicates.len() as f64)
        .sqrt();

    let warning = if n < 10 {
        Some("Very small sample size may lead to unreliable estimates".to_string())
    } else {
        None
    };

    Ok(BootstrapResult {
        point_estimate,
        confidence_interval: ConfidenceInterval {
            lower: ci.0,
            upper: ci.1,
            level: config.confidence_level,
        },
        standard_error: se,
        method,
        warning,
    })
}

/// Compute bootstrap confidence interval for the mean
pub fn compute_bootstrap(
    samples: &[f64],
    config: &BootstrapConfig,
) -> Result<BootstrapResult, BootstrapError> {
    bootstrap(samples, mean, config)
}

#[inline]
fn resample_rng(seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(seed ^ (index as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15))
}

fn resample_into<T: Copy>(data: &[T], rng: &mut StdRng, buf: &mut Vec<T>) {
    buf.clear();
    for _ in 0..data.len() {
        buf.push(data[rng.gen_range(0..data.len())]);
    }
}

/// Generate bootstrap replicates using parallel iteration (Rayon)
fn generate_replicates_parallel<T, F>(data: &[T], statistic: &F, config: &BootstrapConfig) -> Vec<f64>
where
    T: Copy + Send + Sync,
    F: Fn(&[T]) -> f64 + Sync,
{
    (0..config.iterations)
        .into_par_iter()
        .map_init(
            || Vec::with_capacity(data.len()),
            |buf, i| {
                let mut rng = resample_rng(config.seed, i);
                resample_into(data, &mut rng, buf);
                statistic(buf.as_slice())
            },
        )
        .collect()
}

/// Generate bootstrap replicates serially
fn generate_replicates_serial<T, F>(data: &[T], statistic: &F, config: &BootstrapConfig) -> Vec<f64>
where
    T: Copy,
    F: Fn(&[T]) -> f64,
{
    let mut buf = Vec::with_capacity(data.len());
    (0..config.iterations)
        .map(|i| {
            let mut rng = resample_rng(config.seed, i);
            resample_into(data, &mut rng, &mut buf);
            statistic(&buf)
        })
        .collect()
}

/// Standard percentile interval over sorted replicates
fn percentile_interval(sorted: &[f64], confidence: f64) -> (f64, f64) {
    let n = sorted.len();
    let alpha = (1.0 - confidence) / 2.0;

    let lower_idx = ((alpha * n as f64).floor() as usize).min(n - 1);
    let upper_idx = (((1.0 - alpha) * n as f64).floor() as usize).min(n - 1);

    (sorted[lower_idx], sorted[upper_idx])
}

/// BCa (Bias-Corrected and Accelerated) interval over sorted replicates
///
/// More accurate for small samples and skewed distributions.
fn bca_interval<T, F>(
    data: &[T],
    statistic: &F,
    theta_hat: f64,
    sorted: &[f64],
    confidence: f64,
) -> (f64, f64)
where
    T: Copy,
    F: Fn(&[T]) -> f64,
{
    let normal = NormalDistribution::standard();
    let b = sorted.len();

    // Bias correction factor (z0)
    let count_below = sorted.partition_point(|&x| x < theta_hat);
    let prop = count_below as f64 / b as f64;
    let z0 = normal.quantile(prop.clamp(0.0001, 0.9999));

    // Acceleration factor (a) via jackknife
    let jackknife = jackknife(data, statistic);
    let jack_mean = mean(&jackknife);
    let numerator: f64 = jackknife.iter().map(|x| (jack_mean - x).powi(3)).sum();
    let denominator: f64 = jackknife.iter().map(|x| (jack_mean - x).powi(2)).sum();

    let a = if denominator.abs() < 1e-10 || !numerator.is_finite() {
        0.0
    } else {
        numerator / (6.0 * denominator.powf(1.5))
    };

    let alpha = (1.0 - confidence) / 2.0;
    let z_alpha = normal.quantile(alpha);
    let z_1_alpha = normal.quantile(1.0 - alpha);

    let alpha1 = normal.cumulative(z0 + (z0 + z_alpha) / (1.0 - a * (z0 + z_alpha)));
    let alpha2 = normal.cumulative(z0 + (z0 + z_1_alpha) / (1.0 - a * (z0 + z_1_alpha)));

    let lower_idx = ((alpha1 * b as f64).floor() as usize).min(b - 1);
    let upper_idx = ((alpha2 * b as f64).floor() as usize).min(b - 1);

    (sorted[lower_idx], sorted[upper_idx])
}

/// Leave-one-out estimates of `statistic`; non-finite values are dropped.
fn jackknife<T, F>(data: &[T], statistic: &F) -> Vec<f64>
where
    T: Copy,
    F: Fn(&[T]) -> f64,
{
    let mut buf = Vec::with_capacity(data.len().saturating_sub(1));
    (0..data.len())
        .filter_map(|skip| {
            buf.clear();
            buf.extend(
                data.iter()
                    .enumerate()
                    .filter(|(j, _)| *j != skip)
                    .map(|(_, &v)| v),
            );
            let v = statistic(&buf);
            v.is_finite().then_some(v)
        })
        .collect()
}

/// Compute mean of samples
fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}
