//! Normal Distribution

use crate::distribution::{ContinuousDistribution, find_root};
use crate::special::erfc;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, SQRT_2};

/// √(2π)
const SQRT_2PI: f64 = 2.506_628_274_631_000_7;

/// Bracket searched when inverting the standard normal CDF.
const QUANTILE_BRACKET: (f64, f64) = (-100.0, 100.0);

/// Gaussian distribution with cached normalization denominators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalDistribution {
    mean: f64,
    std_dev: f64,
    /// √(2π·σ²), denominator of the density
    pdf_denom: f64,
    /// √(2·σ²), scales the erfc argument of the CDF
    cdf_denom: f64,
}

impl NormalDistribution {
    /// N(0, 1).
    pub const fn standard() -> Self {
        Self {
            mean: 0.0,
            std_dev: 1.0,
            pdf_denom: SQRT_2PI,
            cdf_denom: SQRT_2,
        }
    }

    /// Normal distribution with the given mean and variance.
    ///
    /// # Panics
    ///
    /// Panics unless `variance > 0`. Validate upstream.
    pub fn new(mean: f64, variance: f64) -> Self {
        assert!(
            variance > 0.0,
            "NormalDistribution: variance must be positive, got {variance}"
        );
        let std_dev = variance.sqrt();
        Self {
            mean,
            std_dev,
            pdf_denom: (2.0 * PI * variance).sqrt(),
            cdf_denom: (2.0 * variance).sqrt(),
        }
    }

    /// Fit to a sample's mean and population variance, computed in two passes.
    ///
    /// # Panics
    ///
    /// Panics if the sample is empty or has zero variance.
    pub fn from_sample(sample: &[f64]) -> Self {
        assert!(!sample.is_empty(), "NormalDistribution: empty sample");
        let n = sample.len() as f64;
        let mean = sample.iter().sum::<f64>() / n;
        let variance = sample.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        Self::new(mean, variance)
    }
}

impl Default for NormalDistribution {
    fn default() -> Self {
        Self::standard()
    }
}

impl ContinuousDistribution for NormalDistribution {
    fn density(&self, x: f64) -> f64 {
        let z = x - self.mean;
        (-z * z / (2.0 * self.std_dev * self.std_dev)).exp() / self.pdf_denom
    }

    fn cumulative(&self, x: f64) -> f64 {
        erfc(-(x - self.mean) / self.cdf_denom) / 2.0
    }

    fn complement_cumulative(&self, x: f64) -> f64 {
        erfc((x - self.mean) / self.cdf_denom) / 2.0
    }

    fn quantile(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        if p == 0.0 {
            return f64::NEG_INFINITY;
        }
        if p == 1.0 {
            return f64::INFINITY;
        }
        if p == 0.5 {
            return self.mean;
        }

        let standard = Self::standard();
        let (lo, hi) = QUANTILE_BRACKET;
        let z = find_root(&standard, p, 0.0, lo, hi);
        z * self.std_dev + self.mean
    }

    fn mean(&self) -> f64 {
        self.mean
    }

    fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }

    fn std_dev(&self) -> f64 {
        self.std_dev
    }
}
