//! Configuration module
//!
//! Handles the duration configuration, the wait configuration, TOML files and
//! CLI argument parsing.
//!
//! A [`DurationConfig`] is an immutable value: the `with_*` methods consume it
//! and return a new one. Equality and hashing cover every field, so a
//! configuration can key a cache of samplers.

pub mod cli;
pub mod distribution;
pub mod toml;
pub mod validator;

pub use distribution::{DistributionKind, TimeUnit};

use crate::Result;
use distribution::canonical_bits;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// Complete file configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub duration: DurationConfig,
    #[serde(default)]
    pub wait: WaitConfig,
}

/// Bounded random-duration configuration
///
/// `[minimum, maximum]` is a closed interval in `unit`. Every sample drawn
/// from a sampler built on this configuration lies inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationConfig {
    minimum: f64,
    maximum: f64,
    #[serde(default)]
    unit: TimeUnit,
    #[serde(default)]
    distribution: DistributionKind,
}

impl DurationConfig {
    /// Create a configuration from its parts
    pub fn new(minimum: f64, maximum: f64, distribution: DistributionKind) -> Self {
        Self {
            minimum,
            maximum,
            unit: TimeUnit::default(),
            distribution,
        }
    }

    /// Uniform over `[minimum, maximum]`
    pub fn uniform(minimum: f64, maximum: f64) -> Self {
        Self::new(minimum, maximum, DistributionKind::Uniform)
    }

    /// Triangular with peak at `mode`
    pub fn triangular(minimum: f64, maximum: f64, mode: f64) -> Self {
        Self::new(minimum, maximum, DistributionKind::Triangular { mode })
    }

    /// Bates: mean of `samples` uniforms
    pub fn bates(minimum: f64, maximum: f64, samples: u32) -> Self {
        Self::new(minimum, maximum, DistributionKind::Bates { samples })
    }

    /// Truncated normal with explicit `mean` and `std_dev`
    pub fn normal(minimum: f64, maximum: f64, mean: f64, std_dev: f64) -> Self {
        Self::new(minimum, maximum, DistributionKind::Normal { mean, std_dev })
    }

    /// Truncated normal fitted to the interval
    ///
    /// Mean at the midpoint, standard deviation a sixth of the width, so the
    /// bounds sit at +/- 3 sigma.
    pub fn normal_fit(minimum: f64, maximum: f64) -> Self {
        let mean = (minimum + maximum) / 2.0;
        let std_dev = (maximum - minimum) / 6.0;
        Self::normal(minimum, maximum, mean, std_dev)
    }

    /// Beta(alpha, beta) stretched over the interval
    pub fn beta(minimum: f64, maximum: f64, alpha: f64, beta: f64) -> Self {
        Self::new(minimum, maximum, DistributionKind::Beta { alpha, beta })
    }

    /// Truncated exponential; `None` uses the reciprocal of the midpoint
    pub fn exponential(minimum: f64, maximum: f64, rate: Option<f64>) -> Self {
        Self::new(minimum, maximum, DistributionKind::Exponential { rate })
    }

    /// Power law density `x^power`, mirrored when `reverse`
    pub fn power(minimum: f64, maximum: f64, power: f64, reverse: bool) -> Self {
        Self::new(minimum, maximum, DistributionKind::Power { power, reverse })
    }

    /// Arcsine law over the interval
    pub fn arcsine(minimum: f64, maximum: f64) -> Self {
        Self::new(minimum, maximum, DistributionKind::Arcsine)
    }

    /// Same configuration with a different time unit
    pub fn with_unit(mut self, unit: TimeUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Same configuration with different bounds
    pub fn with_bounds(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    /// Same bounds and unit with a different family
    pub fn with_distribution(mut self, distribution: DistributionKind) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn distribution(&self) -> &DistributionKind {
        &self.distribution
    }

    /// Interval width `maximum - minimum`
    pub fn width(&self) -> f64 {
        self.maximum - self.minimum
    }

    /// Rate used by the exponential family
    ///
    /// Explicit rate if configured, else the reciprocal of the interval
    /// midpoint. `None` for other families.
    pub fn exponential_rate(&self) -> Option<f64> {
        match self.distribution {
            DistributionKind::Exponential { rate: Some(rate) } => Some(rate),
            DistributionKind::Exponential { rate: None } => {
                Some(2.0 / (self.minimum + self.maximum))
            }
            _ => None,
        }
    }

    /// Rescale a fraction in `[0, 1]` onto the interval
    ///
    /// The clamp only absorbs floating-point rounding at the endpoints.
    #[inline]
    pub fn rescale(&self, fraction: f64) -> f64 {
        (self.minimum + fraction * self.width()).clamp(self.minimum, self.maximum)
    }

    /// Whether `value` lies inside the closed interval
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.minimum && value <= self.maximum
    }

    /// Convert a sampled value to a `Duration` in this configuration's unit
    pub fn to_duration(&self, value: f64) -> Duration {
        self.unit.to_duration(value)
    }

    /// Check every invariant; see [`validator::validate_config`]
    pub fn validate(&self) -> Result<()> {
        validator::validate_config(self)
    }
}

impl PartialEq for DurationConfig {
    fn eq(&self, other: &Self) -> bool {
        canonical_bits(self.minimum) == canonical_bits(other.minimum)
            && canonical_bits(self.maximum) == canonical_bits(other.maximum)
            && self.unit == other.unit
            && self.distribution == other.distribution
    }
}

impl Eq for DurationConfig {}

impl Hash for DurationConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_bits(self.minimum).hash(state);
        canonical_bits(self.maximum).hash(state);
        self.unit.hash(state);
        self.distribution.hash(state);
    }
}

impl fmt::Display for DurationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in [{}, {}] {}",
            self.distribution,
            self.minimum,
            self.maximum,
            self.unit.suffix()
        )
    }
}

/// Precision wait configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaitConfig {
    /// Tail of the wait spent spinning instead of sleeping (microseconds)
    #[serde(default = "default_spin_threshold_us")]
    pub spin_threshold_us: u64,
    /// Largest spin exponent before the spin helper resets (2^cap spins)
    #[serde(default = "default_spin_cap")]
    pub spin_cap: u32,
}

fn default_spin_threshold_us() -> u64 {
    20_000
}

fn default_spin_cap() -> u32 {
    10
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            spin_threshold_us: default_spin_threshold_us(),
            spin_cap: default_spin_cap(),
        }
    }
}

impl WaitConfig {
    /// Spin threshold as a `Duration`
    pub fn spin_threshold(&self) -> Duration {
        Duration::from_micros(self.spin_threshold_us)
    }

    /// Validate the wait configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.spin_threshold_us > 1_000_000 {
            return Err(format!(
                "spin_threshold_us must be at most 1 second (1,000,000 us), got {}",
                self.spin_threshold_us
            ));
        }
        if self.spin_cap == 0 || self.spin_cap > 20 {
            return Err(format!("spin_cap must be between 1 and 20, got {}", self.spin_cap));
        }
        Ok(())
    }
}

impl fmt::Display for WaitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "spin tail {}us, spin cap 2^{}",
            self.spin_threshold_us, self.spin_cap
        )
    }
}
