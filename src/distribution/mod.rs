//! Bounded distribution samplers
//!
//! One sampler per family. Each is bound to a validated [`DurationConfig`] and
//! returns a real value inside `[minimum, maximum]` on every successful call.
//!
//! # Families
//!
//! - **Uniform**: flat density
//! - **Triangular**: exact inverse CDF of the triangle distribution
//! - **Bates**: running mean of N uniforms
//! - **Beta**: ratio of two Marsaglia-Tsang gamma variates
//! - **Power**: inverse CDF of `x^power`, optionally mirrored
//! - **Arcsine**: `sin^2(pi u / 2)`, dense near both ends
//! - **Exponential**: rejection sampling under a retry budget
//! - **Normal**: Box-Muller with rejection under a retry budget
//!
//! # Example
//!
//! ```
//! use durand::config::DurationConfig;
//! use durand::distribution::build_sampler;
//! use durand::random::SecureUniform;
//!
//! let config = DurationConfig::triangular(10.0, 20.0, 12.0);
//! let sampler = build_sampler(&config).unwrap();
//! let value = sampler.sample(&SecureUniform).unwrap();
//! assert!((10.0..=20.0).contains(&value));
//! ```

pub mod arcsine;
pub mod bates;
pub mod beta;
pub mod exponential;
pub mod gamma;
pub mod normal;
pub mod power;
pub mod triangular;
pub mod uniform;

use crate::config::{DistributionKind, DurationConfig};
use crate::error::DurationError;
use crate::random::UniformSource;
use crate::Result;

/// Bounded sampler
///
/// # Thread Safety
///
/// Samplers are `Send + Sync` and take `&self`, so one instance can serve
/// many threads. Apart from the normal sampler's Box-Muller spare, which is
/// locked for the length of one call, no sampler mutates anything between
/// calls.
pub trait Sampler: Send + Sync {
    /// Configuration this sampler was built from
    fn config(&self) -> &DurationConfig;

    /// Draw one value in `[minimum, maximum]`
    ///
    /// Only the rejection samplers (normal, exponential) can fail, with
    /// [`DurationError::ResamplingExhausted`].
    fn sample(&self, source: &dyn UniformSource) -> Result<f64>;
}

/// Build the sampler matching the configuration's family
///
/// Validates the configuration first; an invalid configuration never yields
/// a sampler.
pub fn build_sampler(config: &DurationConfig) -> Result<Box<dyn Sampler>> {
    let config = config.clone();
    let sampler: Box<dyn Sampler> = match config.distribution() {
        DistributionKind::Uniform => Box::new(uniform::UniformSampler::new(config)?),
        DistributionKind::Triangular { .. } => Box::new(triangular::TriangularSampler::new(config)?),
        DistributionKind::Bates { .. } => Box::new(bates::BatesSampler::new(config)?),
        DistributionKind::Normal { .. } => Box::new(normal::NormalSampler::new(config)?),
        DistributionKind::Beta { .. } => Box::new(beta::BetaSampler::new(config)?),
        DistributionKind::Exponential { .. } => {
            Box::new(exponential::ExponentialSampler::new(config)?)
        }
        DistributionKind::Power { .. } => Box::new(power::PowerSampler::new(config)?),
        DistributionKind::Arcsine => Box::new(arcsine::ArcsineSampler::new(config)?),
    };
    Ok(sampler)
}

/// Error for a sampler constructed with another family's configuration
pub(crate) fn family_mismatch(config: &DurationConfig, expected: &str) -> DurationError {
    DurationError::invalid(
        config,
        format!(
            "expected a {} configuration, got {}",
            expected,
            config.distribution().name()
        ),
    )
}
