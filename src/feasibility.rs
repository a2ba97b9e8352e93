//! Feasibility analysis for rejection sampling
//!
//! The truncated normal and truncated exponential samplers draw from an
//! unbounded distribution and discard draws outside `[minimum, maximum]`.
//! Before sampling starts this module computes the probability `p` that one
//! draw lands inside the bounds, and from it a finite number of attempts `N`
//! after which the chance of having missed every time drops below a
//! tolerance:
//!
//! ```text
//! (1 - p)^N <= tolerance   =>   N = ceil(ln(tolerance) / ln(1 - p))
//! ```
//!
//! A configuration whose `p` is effectively zero is infeasible and must be
//! rejected at validation time, so samplers never loop against it.
//!
//! # Normal CDF
//!
//! There is no closed form for the normal CDF. We use the Abramowitz-Stegun
//! 7.1.26 rational approximation of `erfc` (absolute error about 1.5e-7).
//! Masses that sit entirely in one tail are computed as a difference of upper
//! tail probabilities so they keep their relative accuracy.

use crate::config::{DistributionKind, DurationConfig};
use std::f64::consts::SQRT_2;
use std::fmt;

/// Hit probabilities at or below this are treated as zero
pub const HIT_PROBABILITY_FLOOR: f64 = f64::EPSILON;

/// Allowed probability that a normal rejection loop exhausts its budget
pub const NORMAL_FAILURE_TOLERANCE: f64 = 1e-6;

/// Allowed probability that an exponential rejection loop exhausts its budget
pub const EXPONENTIAL_FAILURE_TOLERANCE: f64 = 1e-6;

/// Multiplier applied to a computed budget before handing it to a sampler
pub const RETRY_SAFETY_FACTOR: u64 = 2;

/// Most attempts a sampler makes per draw
///
/// Hit probabilities below roughly 3e-7 would need more than this, and the
/// tails of a 52-bit Box-Muller draw thin out well before the geometric
/// model does. Such samplers report exhaustion after this many attempts
/// instead of spinning for hours.
pub const MAX_SAMPLER_ATTEMPTS: u64 = 100_000_000;

// Abramowitz-Stegun 7.1.26 coefficients
const AS_P: f64 = 0.327_591_1;
const AS_A1: f64 = 0.254_829_592;
const AS_A2: f64 = -0.284_496_736;
const AS_A3: f64 = 1.421_413_741;
const AS_A4: f64 = -1.453_152_027;
const AS_A5: f64 = 1.061_405_429;

/// Complementary error function for `x >= 0`
fn erfc_non_negative(x: f64) -> f64 {
    let t = 1.0 / (1.0 + AS_P * x);
    let poly = t * (AS_A1 + t * (AS_A2 + t * (AS_A3 + t * (AS_A4 + t * AS_A5))));
    poly * (-x * x).exp()
}

/// Error function, Abramowitz-Stegun 7.1.26
pub fn erf(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 - erfc_non_negative(x)
    } else {
        erfc_non_negative(-x) - 1.0
    }
}

/// Standard normal CDF `Phi(z)`
pub fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / SQRT_2))
}

/// Standard normal upper tail `1 - Phi(z)`
pub fn standard_normal_sf(z: f64) -> f64 {
    if z >= 0.0 {
        0.5 * erfc_non_negative(z / SQRT_2)
    } else {
        1.0 - 0.5 * erfc_non_negative(-z / SQRT_2)
    }
}

/// Probability that `Normal(mean, std_dev)` falls in `[minimum, maximum]`
///
/// A standard deviation at or below machine epsilon degenerates to the
/// constant `mean`: the mass is 1 when the mean is in bounds, else 0.
pub fn normal_mass(mean: f64, std_dev: f64, minimum: f64, maximum: f64) -> f64 {
    if std_dev <= f64::EPSILON {
        return if mean >= minimum && mean <= maximum { 1.0 } else { 0.0 };
    }

    let a = (minimum - mean) / std_dev;
    let b = (maximum - mean) / std_dev;

    let mass = if a >= 0.0 {
        // Entirely in the upper tail
        standard_normal_sf(a) - standard_normal_sf(b)
    } else if b <= 0.0 {
        // Entirely in the lower tail, mirrored
        standard_normal_sf(-b) - standard_normal_sf(-a)
    } else {
        1.0 - standard_normal_sf(-a) - standard_normal_sf(b)
    };

    mass.clamp(0.0, 1.0)
}

/// Probability that `Exponential(rate)` falls in `[minimum, maximum]`
pub fn exponential_mass(rate: f64, minimum: f64, maximum: f64) -> f64 {
    let lo = minimum.max(0.0);
    let hi = maximum.max(0.0);
    if hi <= lo {
        return 0.0;
    }
    // e^{-r lo} - e^{-r hi} = e^{-r lo} (1 - e^{-r (hi - lo)})
    let mass = (-rate * lo).exp() * -(-rate * (hi - lo)).exp_m1();
    mass.clamp(0.0, 1.0)
}

/// Finite upper bound on rejection attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RetryBudget {
    attempts: u64,
}

impl RetryBudget {
    /// Budget of exactly `attempts` (at least one)
    pub fn new(attempts: u64) -> Self {
        Self {
            attempts: attempts.max(1),
        }
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Budget scaled by [`RETRY_SAFETY_FACTOR`], capped at [`MAX_SAMPLER_ATTEMPTS`]
    pub fn with_safety_margin(self) -> Self {
        Self::new(
            self.attempts
                .saturating_mul(RETRY_SAFETY_FACTOR)
                .min(MAX_SAMPLER_ATTEMPTS),
        )
    }
}

impl fmt::Display for RetryBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} attempts", self.attempts)
    }
}

/// Attempts needed so that `tolerance` bounds the chance of missing every time
///
/// Returns `None` when `p` is effectively zero (no finite budget exists) and a
/// budget of one when `p` is effectively one.
pub fn retry_budget(hit_probability: f64, tolerance: f64) -> Option<RetryBudget> {
    if !(hit_probability > HIT_PROBABILITY_FLOOR) {
        return None;
    }
    if hit_probability >= 1.0 - HIT_PROBABILITY_FLOOR {
        return Some(RetryBudget::new(1));
    }

    // ln(1 - p) via ln_1p for small p
    let attempts = (tolerance.ln() / (-hit_probability).ln_1p()).ceil();
    // `as` saturates for huge values
    Some(RetryBudget::new(attempts as u64))
}

/// Result of analysing one configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feasibility {
    /// Probability that one unbounded draw lands inside the bounds
    pub hit_probability: f64,
    /// Attempts before giving up, `None` when infeasible
    pub budget: Option<RetryBudget>,
}

impl Feasibility {
    /// Whether rejection sampling can terminate for this configuration
    pub fn is_feasible(&self) -> bool {
        self.budget.is_some()
    }
}

impl fmt::Display for Feasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.budget {
            Some(budget) => write!(f, "hit probability {:.6e}, budget {}", self.hit_probability, budget),
            None => write!(f, "hit probability {:.6e}, infeasible", self.hit_probability),
        }
    }
}

/// Analyse a configuration that uses rejection sampling
///
/// Returns `None` for families that sample directly inside the bounds.
/// Assumes the bounds and parameters have passed the earlier validation
/// stages.
pub fn analyze(config: &DurationConfig) -> Option<Feasibility> {
    let (hit_probability, tolerance) = match config.distribution() {
        DistributionKind::Normal { mean, std_dev } => (
            normal_mass(*mean, *std_dev, config.minimum(), config.maximum()),
            NORMAL_FAILURE_TOLERANCE,
        ),
        DistributionKind::Exponential { .. } => {
            let rate = config.exponential_rate()?;
            (
                exponential_mass(rate, config.minimum(), config.maximum()),
                EXPONENTIAL_FAILURE_TOLERANCE,
            )
        }
        _ => return None,
    };

    Some(Feasibility {
        hit_probability,
        budget: retry_budget(hit_probability, tolerance),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_normal_cdf_known_values() {
        assert!((standard_normal_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!((standard_normal_cdf(1.0) - 0.841_344_746).abs() < 2e-7);
        assert!((standard_normal_cdf(-1.96) - 0.024_997_895).abs() < 2e-7);
        assert!((standard_normal_cdf(3.0) - 0.998_650_102).abs() < 2e-7);
    }

    #[test]
    fn test_sf_complements_cdf() {
        for z in [-3.0, -1.0, -0.25, 0.0, 0.5, 2.0, 4.0] {
            let sum = standard_normal_cdf(z) + standard_normal_sf(z);
            assert!((sum - 1.0).abs() < 1e-12, "z={} sum={}", z, sum);
        }
    }

    #[test]
    fn test_normal_mass_three_sigma() {
        let p = normal_mass(50.0, 40.0 / 6.0, 30.0, 70.0);
        assert!((p - 0.997_300_2).abs() < 1e-6, "p={}", p);
    }

    #[test]
    fn test_normal_mass_far_tail_keeps_precision() {
        // Bounds 8 to 9 sigma above the mean: about 6.2e-16 minus 1.1e-19
        let p = normal_mass(0.0, 1.0, 8.0, 9.0);
        assert!(p > 1e-16 && p < 1e-15, "p={}", p);
        // The mirrored interval has the same mass
        let q = normal_mass(0.0, 1.0, -9.0, -8.0);
        assert!((p - q).abs() < 1e-20);
    }

    #[test]
    fn test_normal_mass_degenerate_std_dev() {
        assert_eq!(normal_mass(5.0, 0.0, 0.0, 10.0), 1.0);
        assert_eq!(normal_mass(15.0, 1e-20, 0.0, 10.0), 0.0);
    }

    #[test]
    fn test_exponential_mass() {
        // P(0 <= X <= ln 2) = 0.5 for rate 1
        let p = exponential_mass(1.0, 0.0, std::f64::consts::LN_2);
        assert!((p - 0.5).abs() < 1e-12);
        // Negative lower bound behaves like zero
        let q = exponential_mass(1.0, -5.0, std::f64::consts::LN_2);
        assert!((p - q).abs() < 1e-12);
        assert_eq!(exponential_mass(1.0, -5.0, -1.0), 0.0);
    }

    #[test]
    fn test_retry_budget_geometric_bound() {
        let budget = retry_budget(0.5, 1e-6).unwrap();
        // 0.5^20 < 1e-6 <= 0.5^19
        assert_eq!(budget.attempts(), 20);
        assert_eq!(budget.with_safety_margin().attempts(), 40);
    }

    #[test]
    fn test_retry_budget_special_cases() {
        assert_eq!(retry_budget(0.0, 1e-6), None);
        assert_eq!(retry_budget(f64::EPSILON / 2.0, 1e-6), None);
        assert_eq!(retry_budget(1.0, 1e-6).unwrap().attempts(), 1);
        assert_eq!(retry_budget(f64::NAN, 1e-6), None);
    }

    #[test]
    fn test_sampler_budget_capped() {
        // Bounds 8 to 9 sigma out: feasible, but the geometric budget is huge
        let p = normal_mass(0.0, 1.0, 8.0, 9.0);
        let budget = retry_budget(p, NORMAL_FAILURE_TOLERANCE).unwrap();
        assert!(budget.attempts() > MAX_SAMPLER_ATTEMPTS);
        assert_eq!(budget.with_safety_margin().attempts(), MAX_SAMPLER_ATTEMPTS);
        assert_eq!(RetryBudget::new(u64::MAX).with_safety_margin().attempts(), MAX_SAMPLER_ATTEMPTS);
    }

    #[test]
    fn test_retry_budget_small_probability() {
        let budget = retry_budget(1e-3, 1e-6).unwrap();
        // ln(1e-6) / ln(0.999) ~= 13808.6
        assert_eq!(budget.attempts(), 13809);
    }

    #[test]
    fn test_analyze_families() {
        let uniform = DurationConfig::uniform(0.0, 1.0);
        assert!(analyze(&uniform).is_none());

        let normal = DurationConfig::normal_fit(30.0, 70.0);
        let feasibility = analyze(&normal).unwrap();
        assert!(feasibility.is_feasible());
        assert!(feasibility.budget.unwrap().attempts() <= 3);

        let far = DurationConfig::normal(0.0, 1.0, 100.0, 1.0);
        assert!(!analyze(&far).unwrap().is_feasible());

        let exp = DurationConfig::exponential(10.0, 20.0, None);
        let feasibility = analyze(&exp).unwrap();
        assert!(feasibility.hit_probability > 0.2 && feasibility.hit_probability < 0.3);
    }
}
