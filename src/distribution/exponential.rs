//! Truncated exponential distribution
//!
//! Draws `-ln(u) / rate` and rejects values outside the interval. Like the
//! normal sampler the loop is capped by a retry budget computed from the
//! in-bounds mass, and a configuration with negligible mass is rejected at
//! validation.

use super::{family_mismatch, Sampler};
use crate::config::DurationConfig;
use crate::error::DurationError;
use crate::feasibility::{self, RetryBudget};
use crate::random::UniformSource;
use crate::Result;
use tracing::{debug, warn};

/// Truncated exponential sampler
#[derive(Debug, Clone)]
pub struct ExponentialSampler {
    config: DurationConfig,
    rate: f64,
    budget: RetryBudget,
}

impl ExponentialSampler {
    /// Create an exponential sampler
    ///
    /// Without an explicit rate the reciprocal of the interval midpoint is
    /// used.
    pub fn new(config: DurationConfig) -> Result<Self> {
        config.validate()?;
        let rate = config
            .exponential_rate()
            .ok_or_else(|| family_mismatch(&config, "exponential"))?;

        let analysis = feasibility::analyze(&config)
            .ok_or_else(|| family_mismatch(&config, "exponential"))?;
        let budget = analysis
            .budget
            .map(RetryBudget::with_safety_margin)
            .ok_or_else(|| {
                DurationError::invalid(&config, format!("exponential is infeasible: {}", analysis))
            })?;

        debug!(
            config = %config,
            rate,
            hit_probability = analysis.hit_probability,
            budget = budget.attempts(),
            "built exponential sampler"
        );

        Ok(Self {
            config,
            rate,
            budget,
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn retry_budget(&self) -> RetryBudget {
        self.budget
    }
}

impl Sampler for ExponentialSampler {
    fn config(&self) -> &DurationConfig {
        &self.config
    }

    fn sample(&self, source: &dyn UniformSource) -> Result<f64> {
        for _ in 0..self.budget.attempts() {
            // u in (0, 1] so ln(u) is finite
            let u = 1.0 - source.uniform01();
            let candidate = -u.ln() / self.rate;
            if self.config.contains(candidate) {
                return Ok(candidate);
            }
        }

        warn!(
            config = %self.config,
            attempts = self.budget.attempts(),
            "exponential retry budget exhausted"
        );
        Err(DurationError::ResamplingExhausted {
            distribution: "exponential",
            attempts: self.budget.attempts(),
        })
    }
}
