//! Uniform distribution
//!
//! Every value in `[minimum, maximum)` is equally likely. This is the baseline
//! family and the one the Bates (N = 1) and power (power = 0) families reduce
//! to.

use super::{family_mismatch, Sampler};
use crate::config::{DistributionKind, DurationConfig};
use crate::random::UniformSource;
use crate::Result;

/// Uniform sampler
#[derive(Debug, Clone)]
pub struct UniformSampler {
    config: DurationConfig,
}

impl UniformSampler {
    /// Create a uniform sampler; fails if the configuration is invalid
    pub fn new(config: DurationConfig) -> Result<Self> {
        config.validate()?;
        if !matches!(config.distribution(), DistributionKind::Uniform) {
            return Err(family_mismatch(&config, "uniform"));
        }
        Ok(Self { config })
    }
}

impl Sampler for UniformSampler {
    fn config(&self) -> &DurationConfig {
        &self.config
    }

    #[inline]
    fn sample(&self, source: &dyn UniformSource) -> Result<f64> {
        Ok(source.uniform_range(self.config.minimum(), self.config.maximum()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::test_support::{assert_mean_within_ci, draw_in_bounds};
    use crate::random::{SecureUniform, SeededUniform};

    #[test]
    fn test_uniform_bounds_and_mean() {
        let sampler = UniformSampler::new(DurationConfig::uniform(10.0, 20.0)).unwrap();
        let moments = draw_in_bounds(&sampler, &SecureUniform, 200_000);
        assert_mean_within_ci(&moments, 15.0);
    }

    #[test]
    fn test_uniform_bin_frequencies() {
        let sampler = UniformSampler::new(DurationConfig::uniform(10.0, 20.0)).unwrap();
        let source = SecureUniform;
        let draws = 1_000_000;
        let mut bins = vec![0u32; 100];

        for _ in 0..draws {
            let value = sampler.sample(&source).unwrap();
            let bin = (((value - 10.0) / 10.0) * 100.0) as usize;
            bins[bin.min(99)] += 1;
        }

        for (i, count) in bins.iter().enumerate() {
            let frequency = *count as f64 / draws as f64;
            assert!(
                (frequency - 0.01).abs() <= 0.01,
                "bin {} frequency {} too far from 0.01",
                i,
                frequency
            );
        }
    }

    #[test]
    fn test_uniform_seeded_reproducible() {
        let config = DurationConfig::uniform(0.0, 1.0);
        let sampler = UniformSampler::new(config).unwrap();
        let a = SeededUniform::with_seed(12345);
        let b = SeededUniform::with_seed(12345);
        for _ in 0..10 {
            assert_eq!(sampler.sample(&a).unwrap(), sampler.sample(&b).unwrap());
        }
    }

    #[test]
    fn test_uniform_rejects_other_family() {
        let err = UniformSampler::new(DurationConfig::arcsine(0.0, 1.0)).unwrap_err();
        assert!(err.to_string().contains("expected a uniform configuration"));
    }
}
