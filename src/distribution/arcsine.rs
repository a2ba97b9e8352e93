//! Arcsine distribution: `sin^2(pi u / 2)` over the interval
//!
//! U shaped, with density rising toward both endpoints.

use super::{family_mismatch, Sampler};
use crate::config::{DistributionKind, DurationConfig};
use crate::random::UniformSource;
use crate::Result;
use std::f64::consts::FRAC_PI_2;

#[derive(Debug, Clone)]
pub struct ArcsineSampler {
    config: DurationConfig,
}

impl ArcsineSampler {
    pub fn new(config: DurationConfig) -> Result<Self> {
        config.validate()?;
        if !matches!(config.distribution(), DistributionKind::Arcsine) {
            return Err(family_mismatch(&config, "arcsine"));
        }
        Ok(Self { config })
    }
}

impl Sampler for ArcsineSampler {
    fn config(&self) -> &DurationConfig {
        &self.config
    }

    fn sample(&self, source: &dyn UniformSource) -> Result<f64> {
        let s = (FRAC_PI_2 * source.uniform01()).sin();
        Ok(self.config.rescale(s * s))
    }
}
