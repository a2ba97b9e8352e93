//! durand - bounded random durations
//!
//! Draws random durations from a chosen distribution, strictly bounded to a
//! configured interval, for jitter, backoff, throttling and simulated latency.
//!
//! # Architecture
//!
//! - **Uniform sources**: cryptographically secure by default, seeded for
//!   reproducible runs
//! - **Samplers**: uniform, triangular, Bates, beta, power, arcsine,
//!   truncated exponential, truncated normal
//! - **Feasibility analysis**: rejection samplers get a finite retry budget,
//!   and configurations with no usable mass are rejected up front
//! - **Precision waits**: hybrid sleep/spin blocking wait, and a cancellable
//!   tokio wait
//!
//! # Example
//!
//! ```
//! use durand::{DurationConfig, RandomDuration, TimeUnit};
//!
//! let config = DurationConfig::triangular(100.0, 500.0, 200.0).with_unit(TimeUnit::Microseconds);
//! let backoff = RandomDuration::new(config).unwrap();
//! let outcome = backoff.wait().unwrap();
//! assert!(outcome.elapsed >= outcome.target);
//! ```

pub mod config;
pub mod distribution;
pub mod error;
pub mod feasibility;
pub mod generator;
pub mod output;
pub mod random;
pub mod stats;
pub mod util;
pub mod wait;

// Re-export commonly used types
pub use config::{Config, DistributionKind, DurationConfig, TimeUnit, WaitConfig};
pub use error::DurationError;
pub use generator::RandomDuration;
pub use random::{SecureUniform, SeededUniform, UniformSource};
pub use wait::{CancellationToken, WaitOutcome, WaitState};

/// Result type used throughout durand
pub type Result<T> = std::result::Result<T, DurationError>;
