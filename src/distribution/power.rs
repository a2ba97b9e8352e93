//! Power law distribution
//!
//! Density proportional to `x^power` on the unit interval, sampled by its
//! inverse CDF `u^(1 / (power + 1))`. With `reverse` the fraction is mirrored
//! so mass piles up near `minimum` instead of `maximum`. `power = 0` is the
//! uniform distribution.

use super::{family_mismatch, Sampler};
use crate::config::{DistributionKind, DurationConfig};
use crate::random::UniformSource;
use crate::Result;

#[derive(Debug, Clone)]
pub struct PowerSampler {
    config: DurationConfig,
    exponent: f64,
    reverse: bool,
}

impl PowerSampler {
    pub fn new(config: DurationConfig) -> Result<Self> {
        config.validate()?;
        let (power, reverse) = match config.distribution() {
            DistributionKind::Power { power, reverse } => (*power, *reverse),
            _ => return Err(family_mismatch(&config, "power")),
        };
        Ok(Self {
            config,
            exponent: 1.0 / (power + 1.0),
            reverse,
        })
    }
}

impl Sampler for PowerSampler {
    fn config(&self) -> &DurationConfig {
        &self.config
    }

    fn sample(&self, source: &dyn UniformSource) -> Result<f64> {
        let fraction = source.uniform01().powf(self.exponent);
        let fraction = if self.reverse { 1.0 - fraction } else { fraction };
        Ok(self.config.rescale(fraction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::test_support::{assert_mean_within_ci, draw_in_bounds};
    use crate::random::{SecureUniform, SeededUniform};

    #[test]
    fn test_power_mean() {
        // Mean fraction of density (p + 1) x^p is (p + 1) / (p + 2)
        for power in [0.0, 1.0, 3.0] {
            let sampler = PowerSampler::new(DurationConfig::power(0.0, 10.0, power, false)).unwrap();
            let moments = draw_in_bounds(&sampler, &SecureUniform, 200_000);
            assert_mean_within_ci(&moments, 10.0 * (power + 1.0) / (power + 2.0));
        }
    }

    #[test]
    fn test_power_reverse_mirrors() {
        let forward = PowerSampler::new(DurationConfig::power(0.0, 10.0, 2.0, false)).unwrap();
        let reverse = PowerSampler::new(DurationConfig::power(0.0, 10.0, 2.0, true)).unwrap();
        let a = SeededUniform::with_seed(21);
        let b = SeededUniform::with_seed(21);
        for _ in 0..1000 {
            let x = forward.sample(&a).unwrap();
            let y = reverse.sample(&b).unwrap();
            assert!((x + y - 10.0).abs() < 1e-9, "{} + {} != 10", x, y);
        }
    }

    #[test]
    fn test_power_zero_is_uniform() {
        let sampler = PowerSampler::new(DurationConfig::power(0.0, 1.0, 0.0, false)).unwrap();
        let a = SeededUniform::with_seed(5);
        let b = SeededUniform::with_seed(5);
        for _ in 0..100 {
            assert_eq!(sampler.sample(&a).unwrap(), b.uniform01());
        }
    }

    #[test]
    fn test_power_rejects_negative() {
        assert!(PowerSampler::new(DurationConfig::power(0.0, 1.0, -0.5, false)).is_err());
    }
}
