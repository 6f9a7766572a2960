//! Outlier Detection
//!
//! Classifies samples against IQR fences (1.5×IQR mild, 3×IQR severe) and
//! estimates how much of the observed variance the outliers account for.
//!
//! Outliers are counted but never removed from the regression; only the
//! `cleaned_samples` view excludes them.

use crate::array::sort;
use crate::percentiles::percentile_of_sorted;
use serde::{Deserialize, Serialize};

/// IQR fences used for classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fences {
    pub low_severe: f64,
    pub low_mild: f64,
    pub high_mild: f64,
    pub high_severe: f64,
}

/// Result of outlier classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierAnalysis {
    /// Number of samples classified
    pub samples_seen: usize,
    /// Below Q1 - 3·IQR
    pub low_severe: usize,
    /// Between Q1 - 3·IQR and Q1 - 1.5·IQR
    pub low_mild: usize,
    /// Between Q3 + 1.5·IQR and Q3 + 3·IQR
    pub high_mild: usize,
    /// Above Q3 + 3·IQR
    pub high_severe: usize,
    /// Fences the counts were taken against
    pub fences: Fences,
    /// Samples inside the mild fences, in input order
    pub cleaned_samples: Vec<f64>,
}

impl OutlierAnalysis {
    /// Total outliers of any severity
    pub fn total(&self) -> usize {
        self.low_severe + self.low_mild + self.high_mild + self.high_severe
    }

    /// Percentage of samples that are outliers
    pub fn outlier_percentage(&self) -> f64 {
        if self.samples_seen == 0 {
            return 0.0;
        }
        (self.total() as f64 / self.samples_seen as f64) * 100.0
    }

    /// Check if outlier percentage exceeds threshold (indicates noisy environment)
    pub fn is_noisy(&self, threshold_pct: f64) -> bool {
        self.outlier_percentage() > threshold_pct
    }
}

/// Classify every sample against the IQR fences of the whole set
pub fn detect_outliers(samples: &[f64]) -> OutlierAnalysis {
    let sorted = sort(samples);
    let q1 = percentile_of_sorted(&sorted, 25.0);
    let q3 = percentile_of_sorted(&sorted, 75.0);
    let iqr = q3 - q1;

    let fences = Fences {
        low_severe: q1 - 3.0 * iqr,
        low_mild: q1 - 1.5 * iqr,
        high_mild: q3 + 1.5 * iqr,
        high_severe: q3 + 3.0 * iqr,
    };

    let mut analysis = OutlierAnalysis {
        samples_seen: samples.len(),
        low_severe: 0,
        low_mild: 0,
        high_mild: 0,
        high_severe: 0,
        fences,
        cleaned_samples: Vec::with_capacity(samples.len()),
    };

    for &x in samples {
        if x < fences.low_severe {
            analysis.low_severe += 1;
        } else if x < fences.low_mild {
            analysis.low_mild += 1;
        } else if x > fences.high_severe {
            analysis.high_severe += 1;
        } else if x > fences.high_mild {
            analysis.high_mild += 1;
        } else {
            analysis.cleaned_samples.push(x);
        }
    }

    analysis
}

/// How strongly outliers inflate the variance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutlierEffect {
    /// Less than 1% of the variance
    Unaffected,
    /// 1% to 10%
    Slight,
    /// 10% to 50%
    Moderate,
    /// Above 50%: the measurements are probably unreliable
    Severe,
}

/// Share of the variance explained by outliers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierVariance {
    pub effect: OutlierEffect,
    /// Fraction of the variance in `[0, 1]`
    pub fraction: f64,
}

/// Estimate the fraction of variance caused by outliers.
///
/// Models the samples as `n` draws from a mixture in which some draws suffer
/// extra delay. `mean` and `std_dev` are estimates of the per-sample mean
/// and standard deviation.
pub fn outlier_variance(mean: f64, std_dev: f64, n: f64) -> OutlierVariance {
    let sb2 = std_dev * std_dev;
    if sb2 == 0.0 || n <= 0.0 || !sb2.is_finite() {
        return OutlierVariance {
            effect: OutlierEffect::Unaffected,
            fraction: 0.0,
        };
    }

    let mu_a = mean / n;
    let mu_g_min = mu_a / 2.0;
    let sg = (mu_g_min / 4.0).min(std_dev / n.sqrt());
    let sg2 = sg * sg;

    let var_out = |c: f64| {
        let ac = n - c;
        (ac / n) * (sb2 - ac * sg2)
    };
    let c_max = |x: f64| {
        let k = mu_a - x;
        let ad = n * k * k;
        let k0 = -n * ad;
        let k1 = sb2 - n * sg2 + ad;
        let det = k1 * k1 - 4.0 * sg2 * k0;
        (-2.0 * k0 / (k1 + det.sqrt())).floor()
    };

    let c = c_max(0.0).min(c_max(mu_g_min));
    let fraction = (var_out(1.0).min(var_out(c)) / sb2).clamp(0.0, 1.0);
    let effect = if fraction < 0.01 {
        OutlierEffect::Unaffected
    } else if fraction < 0.1 {
        OutlierEffect::Slight
    } else if fraction < 0.5 {
        OutlierEffect::Moderate
    } else {
        OutlierEffect::Severe
    };

    OutlierVariance { effect, fraction }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_outliers() {
        let result = detect_outliers(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(result.total(), 0);
        assert_eq!(result.cleaned_samples.len(), 5);
    }

    #[test]
    fn test_severity_classes() {
        // Q1 = 10, Q3 = 12, IQR = 2: mild beyond 7/15, severe beyond 4/18
        let mut samples = vec![10.0, 10.0, 11.0, 11.0, 11.0, 12.0, 12.0];
        samples.extend([5.0, 16.0, 100.0, -50.0]);
        let result = detect_outliers(&samples);

        assert!(result.total() >= 2);
        assert!(result.high_severe >= 1);
        assert!(result.low_severe >= 1);
        assert_eq!(result.samples_seen, 11);
        assert_eq!(result.cleaned_samples.len() + result.total(), 11);
    }

    #[test]
    fn test_outlier_percentage() {
        let result = detect_outliers(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]);

        assert_eq!(result.high_severe, 1);
        assert!(result.outlier_percentage() > 15.0 && result.outlier_percentage() < 20.0);
        assert!(result.is_noisy(10.0));
    }

    #[test]
    fn test_empty_samples() {
        let result = detect_outliers(&[]);
        assert_eq!(result.total(), 0);
        assert_eq!(result.outlier_percentage(), 0.0);
    }

    #[test]
    fn test_outlier_variance_zero_spread() {
        let ov = outlier_variance(10.0, 0.0, 50.0);
        assert_eq!(ov.effect, OutlierEffect::Unaffected);
        assert_eq!(ov.fraction, 0.0);
    }

    #[test]
    fn test_outlier_variance_grows_with_spread() {
        let tight = outlier_variance(100.0, 0.1, 100.0);
        let wide = outlier_variance(100.0, 50.0, 100.0);
        assert!(wide.fraction >= tight.fraction);
        assert!((0.0..=1.0).contains(&wide.fraction));
    }
}
