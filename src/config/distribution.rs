//! Distribution families and time units

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// Time unit applied to sampled values at output
///
/// A sampled real `v` with unit `Milliseconds` becomes `v` milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
}

impl Default for TimeUnit {
    fn default() -> Self {
        Self::Milliseconds
    }
}

impl TimeUnit {
    /// Seconds per one unit
    pub fn seconds_per_unit(self) -> f64 {
        match self {
            TimeUnit::Microseconds => 1e-6,
            TimeUnit::Milliseconds => 1e-3,
            TimeUnit::Seconds => 1.0,
            TimeUnit::Minutes => 60.0,
        }
    }

    /// Convert a real value in this unit to a `Duration`
    ///
    /// Zero, negative and NaN values map to `Duration::ZERO`; values beyond
    /// what `Duration` can hold saturate at `Duration::MAX`.
    pub fn to_duration(self, value: f64) -> Duration {
        if !(value > 0.0) {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(value * self.seconds_per_unit()).unwrap_or(Duration::MAX)
    }

    /// Convert a `Duration` back to a real value in this unit
    pub fn from_duration(self, duration: Duration) -> f64 {
        duration.as_secs_f64() / self.seconds_per_unit()
    }

    /// Short suffix used in human-readable output
    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "min",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeUnit::Microseconds => write!(f, "microseconds"),
            TimeUnit::Milliseconds => write!(f, "milliseconds"),
            TimeUnit::Seconds => write!(f, "seconds"),
            TimeUnit::Minutes => write!(f, "minutes"),
        }
    }
}

/// Distribution family and its parameters
///
/// Bounds live on [`DurationConfig`](super::DurationConfig); the variants only
/// carry what is specific to the family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DistributionKind {
    /// Flat density over the interval
    Uniform,
    /// Triangle peaking at `mode`
    Triangular { mode: f64 },
    /// Mean of `samples` uniforms, bell shaped
    Bates { samples: u32 },
    /// Normal truncated to the interval by rejection
    Normal { mean: f64, std_dev: f64 },
    /// Beta(alpha, beta) stretched over the interval
    Beta { alpha: f64, beta: f64 },
    /// Exponential truncated to the interval by rejection
    Exponential {
        #[serde(default)]
        rate: Option<f64>,
    },
    /// Density proportional to `x^power` (mirrored when `reverse`)
    Power {
        power: f64,
        #[serde(default)]
        reverse: bool,
    },
    /// Arcsine law, heavier near both endpoints
    Arcsine,
}

impl Default for DistributionKind {
    fn default() -> Self {
        Self::Uniform
    }
}

impl DistributionKind {
    /// Stable lowercase family name
    pub fn name(&self) -> &'static str {
        match self {
            DistributionKind::Uniform => "uniform",
            DistributionKind::Triangular { .. } => "triangular",
            DistributionKind::Bates { .. } => "bates",
            DistributionKind::Normal { .. } => "normal",
            DistributionKind::Beta { .. } => "beta",
            DistributionKind::Exponential { .. } => "exponential",
            DistributionKind::Power { .. } => "power",
            DistributionKind::Arcsine => "arcsine",
        }
    }

    /// Real-valued parameters by field name, for the finiteness check
    pub fn real_parameters(&self) -> Vec<(&'static str, f64)> {
        match self {
            DistributionKind::Uniform | DistributionKind::Arcsine => Vec::new(),
            DistributionKind::Bates { .. } => Vec::new(),
            DistributionKind::Triangular { mode } => vec![("mode", *mode)],
            DistributionKind::Normal { mean, std_dev } => {
                vec![("mean", *mean), ("std_dev", *std_dev)]
            }
            DistributionKind::Beta { alpha, beta } => vec![("alpha", *alpha), ("beta", *beta)],
            DistributionKind::Exponential { rate } => match rate {
                Some(rate) => vec![("rate", *rate)],
                None => Vec::new(),
            },
            DistributionKind::Power { power, .. } => vec![("power", *power)],
        }
    }

    /// Validate the family parameters against the interval
    ///
    /// Assumes the bounds and every real parameter are already known to be
    /// finite.
    pub fn validate(&self, minimum: f64, maximum: f64) -> Result<(), String> {
        match self {
            DistributionKind::Uniform | DistributionKind::Arcsine => Ok(()),
            DistributionKind::Triangular { mode } => {
                if *mode < minimum || *mode > maximum {
                    Err(format!(
                        "triangular mode must be in range [{}, {}], got {}",
                        minimum, maximum, mode
                    ))
                } else {
                    Ok(())
                }
            }
            DistributionKind::Bates { samples } => {
                if *samples < 1 {
                    Err(format!("bates samples must be at least 1, got {}", samples))
                } else {
                    Ok(())
                }
            }
            DistributionKind::Normal { std_dev, .. } => {
                if *std_dev <= 0.0 {
                    Err(format!(
                        "normal std_dev must be greater than 0, got {}",
                        std_dev
                    ))
                } else {
                    Ok(())
                }
            }
            DistributionKind::Beta { alpha, beta } => {
                if *alpha <= 0.0 {
                    Err(format!("beta alpha must be greater than 0, got {}", alpha))
                } else if *beta <= 0.0 {
                    Err(format!("beta beta must be greater than 0, got {}", beta))
                } else {
                    Ok(())
                }
            }
            DistributionKind::Exponential { rate } => match rate {
                Some(rate) if *rate <= 0.0 => Err(format!(
                    "exponential rate must be greater than 0, got {}",
                    rate
                )),
                Some(_) => Ok(()),
                None => {
                    let midpoint = (minimum + maximum) / 2.0;
                    if midpoint <= 0.0 {
                        Err(format!(
                            "exponential default rate needs a positive interval midpoint, got {}",
                            midpoint
                        ))
                    } else {
                        Ok(())
                    }
                }
            },
            DistributionKind::Power { power, .. } => {
                if *power < 0.0 {
                    Err(format!("power must be at least 0, got {}", power))
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionKind::Uniform => write!(f, "uniform"),
            DistributionKind::Triangular { mode } => write!(f, "triangular(mode={})", mode),
            DistributionKind::Bates { samples } => write!(f, "bates(samples={})", samples),
            DistributionKind::Normal { mean, std_dev } => {
                write!(f, "normal(mean={}, std_dev={})", mean, std_dev)
            }
            DistributionKind::Beta { alpha, beta } => {
                write!(f, "beta(alpha={}, beta={})", alpha, beta)
            }
            DistributionKind::Exponential { rate: Some(rate) } => {
                write!(f, "exponential(rate={})", rate)
            }
            DistributionKind::Exponential { rate: None } => write!(f, "exponential(rate=auto)"),
            DistributionKind::Power { power, reverse } => {
                write!(f, "power(power={}, reverse={})", power, reverse)
            }
            DistributionKind::Arcsine => write!(f, "arcsine"),
        }
    }
}

/// Bit pattern used for equality and hashing of floats
///
/// `-0.0` and `0.0` share a pattern, and every NaN collapses to one, so
/// `Eq` stays reflexive and agrees with `Hash`.
pub(crate) fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

impl PartialEq for DistributionKind {
    fn eq(&self, other: &Self) -> bool {
        use DistributionKind::*;
        let same = |a: f64, b: f64| canonical_bits(a) == canonical_bits(b);
        match (self, other) {
            (Uniform, Uniform) | (Arcsine, Arcsine) => true,
            (Triangular { mode: a }, Triangular { mode: b }) => same(*a, *b),
            (Bates { samples: a }, Bates { samples: b }) => a == b,
            (Normal { mean: m1, std_dev: s1 }, Normal { mean: m2, std_dev: s2 }) => {
                same(*m1, *m2) && same(*s1, *s2)
            }
            (Beta { alpha: a1, beta: b1 }, Beta { alpha: a2, beta: b2 }) => {
                same(*a1, *a2) && same(*b1, *b2)
            }
            (Exponential { rate: r1 }, Exponential { rate: r2 }) => match (r1, r2) {
                (Some(a), Some(b)) => same(*a, *b),
                (None, None) => true,
                _ => false,
            },
            (Power { power: p1, reverse: r1 }, Power { power: p2, reverse: r2 }) => {
                same(*p1, *p2) && r1 == r2
            }
            _ => false,
        }
    }
}

impl Eq for DistributionKind {}

impl Hash for DistributionKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        match self {
            DistributionKind::Bates { samples } => samples.hash(state),
            DistributionKind::Exponential { rate } => {
                rate.is_some().hash(state);
                if let Some(rate) = rate {
                    canonical_bits(*rate).hash(state);
                }
            }
            DistributionKind::Power { power, reverse } => {
                canonical_bits(*power).hash(state);
                reverse.hash(state);
            }
            other => {
                for (_, value) in other.real_parameters() {
                    canonical_bits(value).hash(state);
                }
            }
        }
    }
}
