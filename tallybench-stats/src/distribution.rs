//! Continuous Distributions
//!
//! The capability set shared by every continuous distribution, plus a
//! generic CDF inverter usable by any implementer.

/// A continuous probability distribution.
pub trait ContinuousDistribution {
    /// Probability density at `x`.
    fn density(&self, x: f64) -> f64;

    /// `P(X <= x)`, in `[0, 1]`.
    fn cumulative(&self, x: f64) -> f64;

    /// Inverse of [`cumulative`](Self::cumulative). `NaN` outside `[0, 1]`.
    fn quantile(&self, p: f64) -> f64;

    /// Distribution mean.
    fn mean(&self) -> f64;

    /// Distribution variance, always positive.
    fn variance(&self) -> f64;

    /// Standard deviation.
    fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// `P(X > x)`.
    fn complement_cumulative(&self, x: f64) -> f64 {
        1.0 - self.cumulative(x)
    }
}

/// Convergence threshold on the Newton step.
const ROOT_ACCURACY: f64 = 1e-15;
const ROOT_MAX_ITERATIONS: usize = 150;

/// Find `x` in `[lo, hi]` with `d.cumulative(x) == prob`.
///
/// Newton steps using the density, falling back to bisection of the current
/// bracket whenever a step leaves it or the density vanishes. `guess` seeds
/// the search and must lie inside the bracket.
pub fn find_root<D>(d: &D, prob: f64, guess: f64, lo: f64, hi: f64) -> f64
where
    D: ContinuousDistribution + ?Sized,
{
    let (mut lo, mut hi) = (lo, hi);
    let mut x = guess;
    let mut dx: f64 = 1.0;
    let mut i = 0;

    while dx.abs() > ROOT_ACCURACY && i < ROOT_MAX_ITERATIONS {
        let err = d.cumulative(x) - prob;
        if err < 0.0 {
            lo = x;
        } else {
            hi = x;
        }

        let pdf = d.density(x);
        let newton = if pdf != 0.0 { Some(x - err / pdf) } else { None };
        let next = match newton {
            Some(candidate) if candidate >= lo && candidate <= hi => candidate,
            _ => (lo + hi) / 2.0,
        };

        dx = next - x;
        x = next;
        i += 1;
    }
    x
}
