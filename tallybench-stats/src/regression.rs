//! Ordinary Least Squares
//!
//! Fits `y = intercept + slope·x`. For benchmark data `x` is the iteration
//! count and `y` the elapsed cost of the batch: the slope is the marginal
//! cost of one iteration and the intercept the fixed per-call overhead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of a least-squares fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regression {
    /// Marginal change in `y` per unit of `x`
    pub slope: f64,
    /// Value of `y` at `x = 0`
    pub intercept: f64,
    /// Coefficient of determination in `[0, 1]`
    pub r_squared: f64,
}

/// Errors that can occur while fitting
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    #[error("predictor and response lengths differ: {x} vs {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("insufficient data: need at least 2 distinct predictor values, got {distinct}")]
    InsufficientData { distinct: usize },
}

/// Fit `ys` against `xs` by ordinary least squares.
pub fn ols(xs: &[f64], ys: &[f64]) -> Result<Regression, RegressionError> {
    if xs.len() != ys.len() {
        return Err(RegressionError::LengthMismatch {
            x: xs.len(),
            y: ys.len(),
        });
    }

    let distinct = count_distinct(xs);
    if distinct < 2 {
        return Err(RegressionError::InsufficientData { distinct });
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    // A flat response is explained perfectly by any horizontal line
    let r_squared = if syy == 0.0 {
        1.0
    } else {
        (sxy * sxy / (sxx * syy)).clamp(0.0, 1.0)
    };

    Ok(Regression {
        slope,
        intercept,
        r_squared,
    })
}

/// Fit a slice of `(x, y)` pairs.
pub fn ols_pairs(pairs: &[(f64, f64)]) -> Result<Regression, RegressionError> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();
    ols(&xs, &ys)
}

fn count_distinct(xs: &[f64]) -> usize {
    let sorted = crate::array::sort(xs);
    if sorted.is_empty() {
        return 0;
    }
    1 + sorted.windows(2).filter(|w| w[0] != w[1]).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line() {
        let xs: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 12.5 * x + 300.0).collect();
        let fit = ols(&xs, &ys).unwrap();

        assert!((fit.slope - 12.5).abs() < 1e-9);
        assert!((fit.intercept - 300.0).abs() < 1e-7);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pairs() {
        let fit = ols_pairs(&[(1.0, 3.0), (2.0, 5.0), (4.0, 9.0)]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_distinct_x() {
        let err = ols(&[4.0, 4.0, 4.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, RegressionError::InsufficientData { distinct: 1 });

        let err = ols(&[], &[]).unwrap_err();
        assert_eq!(err, RegressionError::InsufficientData { distinct: 0 });
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            ols(&[1.0, 2.0], &[1.0]),
            Err(RegressionError::LengthMismatch { x: 2, y: 1 })
        ));
    }

    #[test]
    fn test_noisy_fit_is_imperfect() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 4.5, 5.5, 8.5, 9.5];
        let fit = ols(&xs, &ys).unwrap();
        assert!(fit.r_squared > 0.9 && fit.r_squared < 1.0);
    }
}
