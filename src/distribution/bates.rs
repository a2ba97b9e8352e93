//! Bates distribution
//!
//! The mean of N independent uniforms on `[0, 1]`, stretched over the
//! interval. Bell shaped but strictly bounded; N = 1 is exactly uniform and
//! larger N concentrates mass around the midpoint with variance
//! `W^2 / (12 N)`.
//!
//! The mean is accumulated incrementally (`mean += (u - mean) / k`) rather
//! than as a sum, which keeps precision for large N.

use super::{family_mismatch, Sampler};
use crate::config::{DistributionKind, DurationConfig};
use crate::random::UniformSource;
use crate::Result;

/// Bates sampler
#[derive(Debug, Clone)]
pub struct BatesSampler {
    config: DurationConfig,
    samples: u32,
}

impl BatesSampler {
    /// Create a Bates sampler; fails if the configuration is invalid
    pub fn new(config: DurationConfig) -> Result<Self> {
        config.validate()?;
        let samples = match config.distribution() {
            DistributionKind::Bates { samples } => *samples,
            _ => return Err(family_mismatch(&config, "bates")),
        };
        Ok(Self { config, samples })
    }
}

impl Sampler for BatesSampler {
    fn config(&self) -> &DurationConfig {
        &self.config
    }

    fn sample(&self, source: &dyn UniformSource) -> Result<f64> {
        let mut mean = 0.0;
        for k in 1..=self.samples {
            let u = source.uniform01();
            mean += (u - mean) / k as f64;
        }
        Ok(self.config.rescale(mean))
    }
}
