//! Triangular distribution
//!
//! Density rises linearly from `minimum` to a peak at `mode`, then falls to
//! `maximum`. Sampling inverts the CDF exactly, so there is no rejection and
//! the support matches the interval.
//!
//! With `W = maximum - minimum` and `f = (mode - minimum) / W`:
//!
//! ```text
//! u <  f:  x = minimum + sqrt(u * W * (mode - minimum))
//! u >= f:  x = maximum - sqrt((1 - u) * W * (maximum - mode))
//! ```

use super::{family_mismatch, Sampler};
use crate::config::{DistributionKind, DurationConfig};
use crate::random::UniformSource;
use crate::Result;

/// Triangular sampler
#[derive(Debug, Clone)]
pub struct TriangularSampler {
    config: DurationConfig,
    mode: f64,
    /// Fraction of the interval below the mode
    mode_fraction: f64,
}

impl TriangularSampler {
    /// Create a triangular sampler; fails if the configuration is invalid
    pub fn new(config: DurationConfig) -> Result<Self> {
        config.validate()?;
        let mode = match config.distribution() {
            DistributionKind::Triangular { mode } => *mode,
            _ => return Err(family_mismatch(&config, "triangular")),
        };
        let mode_fraction = (mode - config.minimum()) / config.width();
        Ok(Self {
            config,
            mode,
            mode_fraction,
        })
    }
}

impl Sampler for TriangularSampler {
    fn config(&self) -> &DurationConfig {
        &self.config
    }

    fn sample(&self, source: &dyn UniformSource) -> Result<f64> {
        let min = self.config.minimum();
        let max = self.config.maximum();
        let width = self.config.width();
        let u = source.uniform01();

        let value = if u < self.mode_fraction {
            min + (u * width * (self.mode - min)).sqrt()
        } else {
            max - ((1.0 - u) * width * (max - self.mode)).sqrt()
        };
        // Rounding only
        Ok(value.clamp(min, max))
    }
}
