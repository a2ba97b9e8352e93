//! Truncated normal distribution
//!
//! Draws `mean + z * std_dev` with `z` standard normal and rejects candidates
//! outside the interval. The number of attempts is capped by a retry budget
//! computed from the mass of the normal inside the bounds (see
//! [`crate::feasibility`]), so a draw either succeeds or reports
//! [`DurationError::ResamplingExhausted`] instead of looping forever.
//!
//! # Box-Muller
//!
//! Standard normals come in pairs from two uniforms:
//!
//! ```text
//! r = sqrt(-2 ln u1),  theta = 2 pi u2
//! z1 = r cos(theta),   z2 = r sin(theta)
//! ```
//!
//! The second value is kept in a [`BoxMullerCarry`] for the next draw. A
//! caller that owns its carry uses [`NormalSampler::sample_with_carry`] and
//! never touches shared state; the plain [`Sampler::sample`] path keeps one
//! carry per sampler behind a mutex held for the length of a single call.

use super::{family_mismatch, Sampler};
use crate::config::{DistributionKind, DurationConfig};
use crate::error::DurationError;
use crate::feasibility::{self, RetryBudget};
use crate::random::UniformSource;
use crate::Result;
use std::f64::consts::TAU;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Spare standard normal left over from a Box-Muller pair
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxMullerCarry {
    spare: Option<f64>,
}

impl BoxMullerCarry {
    /// Empty carry
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a spare value is waiting
    pub fn is_empty(&self) -> bool {
        self.spare.is_none()
    }

    /// Drop any spare value
    pub fn clear(&mut self) {
        self.spare = None;
    }
}

/// Draw one standard normal variate, using and refilling `carry`
pub fn standard_normal(source: &dyn UniformSource, carry: &mut BoxMullerCarry) -> f64 {
    if let Some(spare) = carry.spare.take() {
        return spare;
    }

    // u1 in (0, 1] keeps ln finite
    let u1 = 1.0 - source.uniform01();
    let u2 = source.uniform01();

    let r = (-2.0 * u1.ln()).sqrt();
    let theta = TAU * u2;

    carry.spare = Some(r * theta.sin());
    r * theta.cos()
}

/// Truncated normal sampler
#[derive(Debug)]
pub struct NormalSampler {
    config: DurationConfig,
    mean: f64,
    std_dev: f64,
    budget: RetryBudget,
    carry: Mutex<BoxMullerCarry>,
}

impl NormalSampler {
    /// Create a truncated normal sampler
    ///
    /// Fails if the configuration is invalid, including when the normal has
    /// negligible mass inside the bounds.
    pub fn new(config: DurationConfig) -> Result<Self> {
        config.validate()?;
        let (mean, std_dev) = match config.distribution() {
            DistributionKind::Normal { mean, std_dev } => (*mean, *std_dev),
            _ => return Err(family_mismatch(&config, "normal")),
        };

        let analysis = feasibility::analyze(&config)
            .ok_or_else(|| family_mismatch(&config, "normal"))?;
        let budget = match analysis.budget {
            Some(budget) => budget.with_safety_margin(),
            None => {
                return Err(DurationError::invalid(
                    &config,
                    format!("normal is infeasible: {}", analysis),
                ))
            }
        };

        debug!(
            config = %config,
            hit_probability = analysis.hit_probability,
            budget = budget.attempts(),
            "built normal sampler"
        );

        Ok(Self {
            config,
            mean,
            std_dev,
            budget,
            carry: Mutex::new(BoxMullerCarry::new()),
        })
    }

    /// Attempts allowed per draw, safety margin included
    pub fn retry_budget(&self) -> RetryBudget {
        self.budget
    }

    /// Draw one value using a caller-owned carry
    ///
    /// Nothing inside the sampler is touched, so concurrent callers each
    /// holding their own carry need no synchronisation.
    pub fn sample_with_carry(
        &self,
        source: &dyn UniformSource,
        carry: &mut BoxMullerCarry,
    ) -> Result<f64> {
        if self.std_dev <= f64::EPSILON {
            // Degenerate: the point mass at the mean
            return if self.config.contains(self.mean) {
                Ok(self.mean)
            } else {
                Err(DurationError::invalid(
                    &self.config,
                    format!("degenerate normal mean {} lies outside the bounds", self.mean),
                ))
            };
        }

        for _ in 0..self.budget.attempts() {
            let z = standard_normal(source, carry);
            let candidate = self.mean + z * self.std_dev;
            if self.config.contains(candidate) {
                return Ok(candidate);
            }
        }

        warn!(
            config = %self.config,
            attempts = self.budget.attempts(),
            "normal retry budget exhausted"
        );
        Err(DurationError::ResamplingExhausted {
            distribution: "normal",
            attempts: self.budget.attempts(),
        })
    }
}

impl Sampler for NormalSampler {
    fn config(&self) -> &DurationConfig {
        &self.config
    }

    fn sample(&self, source: &dyn UniformSource) -> Result<f64> {
        // Held for this call only; a poisoned carry is just a stale spare
        let mut carry = self
            .carry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.sample_with_carry(source, &mut carry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::test_support::{assert_mean_within_ci, draw_in_bounds};
    use crate::random::{SecureUniform, SeededUniform};
    use crate::stats::Moments;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_standard_normal_moments() {
        let source = SecureUniform;
        let mut carry = BoxMullerCarry::new();
        let mut moments = Moments::new();
        for _ in 0..200_000 {
            moments.record(standard_normal(&source, &mut carry));
        }
        assert!(moments.mean().abs() < 0.02, "mean={}", moments.mean());
        assert!((moments.std_dev() - 1.0).abs() < 0.02, "std_dev={}", moments.std_dev());
    }

    #[test]
    fn test_carry_used_on_alternate_calls() {
        let source = SeededUniform::with_seed(1);
        let mut carry = BoxMullerCarry::new();
        assert!(carry.is_empty());
        standard_normal(&source, &mut carry);
        assert!(!carry.is_empty());
        standard_normal(&source, &mut carry);
        assert!(carry.is_empty());
        standard_normal(&source, &mut carry);
        carry.clear();
        assert!(carry.is_empty());
    }

    #[test]
    fn test_normal_fit_mean_and_symmetry() {
        let sampler = NormalSampler::new(DurationConfig::normal_fit(30.0, 70.0)).unwrap();
        let moments = draw_in_bounds(&sampler, &SecureUniform, 1_000_000);
        assert_mean_within_ci(&moments, 50.0);
        assert!(moments.skewness().abs() <= 0.025, "skewness={}", moments.skewness());
    }

    #[test]
    fn test_normal_symmetric_bounds_skewness() {
        let sampler = NormalSampler::new(DurationConfig::normal(0.0, 10.0, 5.0, 4.0)).unwrap();
        let moments = draw_in_bounds(&sampler, &SecureUniform, 100_000);
        assert!(moments.skewness().abs() <= 0.025, "skewness={}", moments.skewness());
    }

    #[test]
    fn test_normal_offset_mean_bounds() {
        // Mean outside the interval but with usable mass inside
        let sampler = NormalSampler::new(DurationConfig::normal(10.0, 20.0, 5.0, 5.0)).unwrap();
        draw_in_bounds(&sampler, &SeededUniform::with_seed(11), 100_000);
        assert!(sampler.retry_budget().attempts() > 2);
    }

    #[test]
    fn test_normal_infeasible_rejected() {
        let err = NormalSampler::new(DurationConfig::normal(0.0, 1.0, 1000.0, 1.0)).unwrap_err();
        assert!(err.is_invalid_config());
    }

    #[test]
    fn test_normal_far_tail_budget_capped() {
        let sampler = NormalSampler::new(DurationConfig::normal(8.0, 9.0, 0.0, 1.0)).unwrap();
        assert_eq!(
            sampler.retry_budget().attempts(),
            feasibility::MAX_SAMPLER_ATTEMPTS
        );
    }

    #[test]
    fn test_normal_degenerate_std_dev() {
        let sampler = NormalSampler::new(DurationConfig::normal(0.0, 10.0, 4.0, 1e-300)).unwrap();
        let source = SeededUniform::with_seed(2);
        for _ in 0..10 {
            assert_eq!(sampler.sample(&source).unwrap(), 4.0);
        }
    }

    #[test]
    fn test_normal_explicit_carry_matches_locked_path() {
        let sampler = NormalSampler::new(DurationConfig::normal_fit(0.0, 1.0)).unwrap();
        let a = SeededUniform::with_seed(99);
        let b = SeededUniform::with_seed(99);
        let mut carry = BoxMullerCarry::new();
        for _ in 0..100 {
            let x = sampler.sample_with_carry(&a, &mut carry).unwrap();
            let y = sampler.sample(&b).unwrap();
            assert_eq!(x, y);
        }
    }

    #[test]
    fn test_normal_shared_across_threads() {
        let sampler = Arc::new(NormalSampler::new(DurationConfig::normal_fit(30.0, 70.0)).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sampler = Arc::clone(&sampler);
                thread::spawn(move || {
                    let source = SecureUniform;
                    for _ in 0..10_000 {
                        let value = sampler.sample(&source).unwrap();
                        assert!((30.0..=70.0).contains(&value));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
