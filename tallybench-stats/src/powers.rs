//! Power Sums
//!
//! Single-pass moment statistics. One pass over a sample accumulates the
//! simple power sums `S_i = Σ xⁱ` for `i = 0..=k`; mean, variance, skewness
//! and kurtosis are then pure projections of those sums.
//!
//! # Numerical limitations
//!
//! Central moments are recovered from raw power sums with the binomial
//! expansion `E[(x-μ)^j] = Σ C(j,i)·(-μ)^(j-i)·S_i/n`. When the mean is large
//! relative to the spread, the terms of that sum are large and nearly cancel,
//! and the result loses precision (a two-pass algorithm would not). For
//! well-scaled data (|mean|/std_dev below ~1e3) expect relative errors around
//! 1e-9 on the variance; beyond that, errors grow with the square of the ratio.
//! This is the price of never re-scanning the data.

use serde::{Deserialize, Serialize};

/// Immutable power sums of a completed pass over a sample.
///
/// Slot `i` holds `Σ xⁱ`; slot 0 is the sample count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerSums {
    sums: Box<[f64]>,
}

/// Streaming accumulator for [`PowerSums`].
///
/// The running sums are not readable; call [`PowerAccumulator::finish`] to
/// obtain the immutable result.
#[derive(Debug, Clone)]
pub struct PowerAccumulator {
    sums: Vec<f64>,
}

impl PowerAccumulator {
    /// Start accumulating the first `k` powers.
    ///
    /// # Panics
    ///
    /// Panics if `k < 2` ("too few powers").
    pub fn new(k: usize) -> Self {
        assert!(k >= 2, "powers: too few powers (k = {k}, need k >= 2)");
        Self {
            sums: vec![0.0; k + 1],
        }
    }

    /// Fold one observation into the sums.
    #[inline]
    pub fn push(&mut self, x: f64) {
        // x^i built incrementally, no calls to powi
        let mut p = 1.0;
        for slot in self.sums.iter_mut() {
            *slot += p;
            p *= x;
        }
    }

    /// Freeze the accumulated sums.
    pub fn finish(self) -> PowerSums {
        PowerSums {
            sums: self.sums.into_boxed_slice(),
        }
    }
}

impl Extend<f64> for PowerAccumulator {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.push(x);
        }
    }
}

/// Accumulate the first `k` power sums of `sample` in a single pass.
///
/// # Panics
///
/// Panics if `k < 2`.
///
/// # Examples
///
/// ```
/// use tallybench_stats::powers;
///
/// let p = powers(3, &[1.0, 100.0, 101.0, 102.0, 103.0]);
/// assert!((p.skewness() - -1.497681449918257).abs() < 1e-12);
/// ```
pub fn powers(k: usize, sample: &[f64]) -> PowerSums {
    let mut acc = PowerAccumulator::new(k);
    acc.extend(sample.iter().copied());
    acc.finish()
}

impl PowerSums {
    /// Highest power accumulated.
    pub fn order(&self) -> usize {
        self.sums.len() - 1
    }

    /// Number of observations.
    pub fn count(&self) -> usize {
        self.sums[0] as usize
    }

    /// Sum of the observations.
    pub fn sum(&self) -> f64 {
        self.sums[1]
    }

    /// Arithmetic mean, or 0 for an empty sample.
    pub fn mean(&self) -> f64 {
        let n = self.sums[0];
        if n == 0.0 { 0.0 } else { self.sums[1] / n }
    }

    /// The `j`-th central moment `E[(x - mean)^j]`.
    ///
    /// # Panics
    ///
    /// Panics if `j > self.order()`; higher moments were never accumulated.
    pub fn central_moment(&self, j: usize) -> f64 {
        assert!(
            j <= self.order(),
            "central_moment: order {j} exceeds accumulated order {}",
            self.order()
        );
        if j == 0 {
            return 1.0;
        }

        let n = self.sums[0];
        let neg_mean = -self.mean();
        let mut binom = 1.0;
        let mut total = 0.0;
        for i in 0..=j {
            total += binom * neg_mean.powi((j - i) as i32) * self.sums[i];
            // C(j, i+1) = C(j, i) * (j - i) / (i + 1)
            binom = binom * (j - i) as f64 / (i + 1) as f64;
        }
        total / n
    }

    /// Population variance (denominator n).
    pub fn variance(&self) -> f64 {
        self.central_moment(2)
    }

    /// Unbiased variance (denominator n-1), or 0 when n <= 1.
    pub fn variance_unbiased(&self) -> f64 {
        let n = self.sums[0];
        if n > 1.0 {
            self.variance() * n / (n - 1.0)
        } else {
            0.0
        }
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Sample skewness. Non-finite when the variance is zero.
    ///
    /// # Panics
    ///
    /// Panics if fewer than 3 powers were accumulated.
    pub fn skewness(&self) -> f64 {
        self.central_moment(3) * self.variance().powf(-1.5)
    }

    /// Excess kurtosis (0 for a normal distribution). Non-finite when the
    /// variance is zero.
    ///
    /// # Panics
    ///
    /// Panics if fewer than 4 powers were accumulated.
    pub fn kurtosis(&self) -> f64 {
        let v = self.variance();
        self.central_moment(4) / (v * v) - 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_pass_mean(xs: &[f64]) -> f64 {
        xs.iter().sum::<f64>() / xs.len() as f64
    }

    fn two_pass_variance(xs: &[f64]) -> f64 {
        let m = two_pass_mean(xs);
        xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64
    }

    #[test]
    fn test_documented_skewness() {
        let left = powers(3, &[1.0, 100.0, 101.0, 102.0, 103.0]);
        assert!((left.skewness() - -1.497681449918257).abs() < 1e-12);

        let right = powers(3, &[1.0, 2.0, 3.0, 4.0, 100.0]);
        assert!((right.skewness() - 1.4975367033335198).abs() < 1e-12);
    }

    #[test]
    fn test_slot_zero_is_count() {
        let p = powers(2, &[4.0, 5.0, 6.0]);
        assert_eq!(p.count(), 3);
        assert_eq!(p.sum(), 15.0);
        assert_eq!(p.order(), 2);
        assert_eq!(p.central_moment(0), 1.0);
    }

    #[test]
    fn test_empty_mean_is_zero() {
        let p = powers(2, &[]);
        assert_eq!(p.count(), 0);
        assert_eq!(p.mean(), 0.0);
        assert_eq!(p.variance_unbiased(), 0.0);
    }

    #[test]
    fn test_single_value_unbiased_variance() {
        let p = powers(2, &[42.0]);
        assert_eq!(p.variance(), 0.0);
        assert_eq!(p.variance_unbiased(), 0.0);
    }

    #[test]
    fn test_zero_variance_skewness_is_not_finite() {
        let p = powers(4, &[2.0, 2.0, 2.0]);
        assert!(!p.skewness().is_finite());
        assert!(!p.kurtosis().is_finite());
    }

    #[test]
    fn test_kurtosis_uniform_grid() {
        // Discrete uniform on 1..=5: excess kurtosis -1.3
        let p = powers(4, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((p.kurtosis() - -1.3).abs() < 1e-12);
        assert!(p.skewness().abs() < 1e-12);
    }

    #[test]
    fn test_accumulator_matches_batch() {
        let xs = [1.5, -2.0, 3.25, 8.0];
        let mut acc = PowerAccumulator::new(4);
        for &x in &xs {
            acc.push(x);
        }
        assert_eq!(acc.finish(), powers(4, &xs));
    }

    #[test]
    #[should_panic(expected = "too few powers")]
    fn test_too_few_powers() {
        let _ = powers(1, &[1.0]);
    }

    #[test]
    #[should_panic(expected = "exceeds accumulated order")]
    fn test_moment_beyond_order() {
        let _ = powers(2, &[1.0, 2.0]).skewness();
    }

    proptest! {
        #[test]
        fn prop_mean_matches_two_pass(
            xs in prop::collection::vec(-1e3f64..1e3, 1..200),
            k in 2usize..6,
        ) {
            let p = powers(k, &xs);
            let expected = two_pass_mean(&xs);
            prop_assert!((p.mean() - expected).abs() <= 1e-9 * (1.0 + expected.abs()));
        }

        #[test]
        fn prop_variance_matches_two_pass(xs in prop::collection::vec(-1e3f64..1e3, 2..200)) {
            let p = powers(2, &xs);
            let expected = two_pass_variance(&xs);
            prop_assert!((p.variance() - expected).abs() <= 1e-9 * (1.0 + expected));
        }

        #[test]
        fn prop_unbiased_scaling(xs in prop::collection::vec(-1e3f64..1e3, 2..50)) {
            let p = powers(2, &xs);
            let n = xs.len() as f64;
            let expected = p.variance() * n / (n - 1.0);
            prop_assert!((p.variance_unbiased() - expected).abs() <= 1e-12 * (1.0 + expected));
        }
    }
}
