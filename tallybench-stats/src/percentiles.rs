//! Percentile Computation
//!
//! Linear interpolation between nearest ranks. Callers that need several
//! percentiles of the same data sort once and use [`percentile_of_sorted`].

use crate::array::sort;
use serde::{Deserialize, Serialize};

/// Standard percentiles of a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    /// 25th percentile (first quartile)
    pub p25: f64,
    /// 50th percentile (median)
    pub p50: f64,
    /// 75th percentile (third quartile)
    pub p75: f64,
    /// 90th percentile
    pub p90: f64,
    /// 99th percentile
    pub p99: f64,
}

/// Compute a single percentile (0-100) from unsorted samples.
///
/// Returns 0 for an empty slice.
///
/// # Examples
///
/// ```
/// use tallybench_stats::compute_percentile;
///
/// let samples = [5.0, 1.0, 4.0, 2.0, 3.0];
/// assert_eq!(compute_percentile(&samples, 50.0), 3.0);
/// ```
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    percentile_of_sorted(&sort(samples), percentile)
}

/// Percentile (0-100) of already sorted samples.
pub fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (percentile / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
            let lower_idx = rank.floor() as usize;
            let upper_idx = (lower_idx + 1).min(n - 1);
            let fraction = rank - lower_idx as f64;

            sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
        }
    }
}

/// Compute all standard percentiles with a single sort
pub fn compute_percentiles(samples: &[f64]) -> Percentiles {
    let sorted = sort(samples);
    Percentiles {
        p25: percentile_of_sorted(&sorted, 25.0),
        p50: percentile_of_sorted(&sorted, 50.0),
        p75: percentile_of_sorted(&sorted, 75.0),
        p90: percentile_of_sorted(&sorted, 90.0),
        p99: percentile_of_sorted(&sorted, 99.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((compute_percentile(&samples, 50.0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quartiles() {
        let samples: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        assert!((compute_percentile(&samples, 25.0) - 25.75).abs() < 1e-12);
        assert!((compute_percentile(&samples, 75.0) - 75.25).abs() < 1e-12);
    }

    #[test]
    fn test_single_and_empty() {
        assert_eq!(compute_percentile(&[42.0], 99.0), 42.0);
        assert_eq!(compute_percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn test_compute_all_percentiles() {
        let samples: Vec<f64> = (1..=100).rev().map(|x| x as f64).collect();
        let p = compute_percentiles(&samples);

        assert!(p.p25 < p.p50 && p.p50 < p.p75 && p.p75 < p.p90 && p.p90 < p.p99);
        assert!(p.p99 > 98.0 && p.p99 < 100.0);
    }
}
