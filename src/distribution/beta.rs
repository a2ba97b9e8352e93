//! Beta distribution
//!
//! `X = Ga / (Ga + Gb)` with `Ga ~ Gamma(alpha)` and `Gb ~ Gamma(beta)`,
//! stretched over the interval. The ratio is evaluated from the gamma logs as
//! `1 / (1 + exp(ln Gb - ln Ga))`, which never divides zero by zero even when
//! both variates underflow.

use super::gamma::sample_ln_gamma;
use super::normal::BoxMullerCarry;
use super::{family_mismatch, Sampler};
use crate::config::{DistributionKind, DurationConfig};
use crate::random::UniformSource;
use crate::Result;

/// Beta sampler
#[derive(Debug, Clone)]
pub struct BetaSampler {
    config: DurationConfig,
    alpha: f64,
    beta: f64,
}

impl BetaSampler {
    /// Create a beta sampler; fails if the configuration is invalid
    pub fn new(config: DurationConfig) -> Result<Self> {
        config.validate()?;
        let (alpha, beta) = match config.distribution() {
            DistributionKind::Beta { alpha, beta } => (*alpha, *beta),
            _ => return Err(family_mismatch(&config, "beta")),
        };
        Ok(Self {
            config,
            alpha,
            beta,
        })
    }

    /// Draw the beta fraction in `[0, 1]`
    fn fraction(&self, source: &dyn UniformSource) -> f64 {
        // Box-Muller spare lives for this call only
        let mut carry = BoxMullerCarry::new();
        let ln_a = sample_ln_gamma(self.alpha, source, &mut carry);
        let ln_b = sample_ln_gamma(self.beta, source, &mut carry);

        let diff = ln_b - ln_a;
        if diff.is_nan() {
            // Both logs infinite: only reachable for subnormal shapes, where
            // the mass sits on the endpoints in the ratio alpha : beta
            let p_one = self.alpha / (self.alpha + self.beta);
            return if source.uniform01() < p_one { 1.0 } else { 0.0 };
        }
        1.0 / (1.0 + diff.exp())
    }
}

impl Sampler for BetaSampler {
    fn config(&self) -> &DurationConfig {
        &self.config
    }

    fn sample(&self, source: &dyn UniformSource) -> Result<f64> {
        Ok(self.config.rescale(self.fraction(source)))
    }
}
