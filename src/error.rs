//! Error types
//!
//! Two failures come out of the sampling path: a configuration that breaks one
//! of the numeric invariants, and a bounded rejection loop that ran out of
//! attempts. The non-blocking wait adds a third, cancellation.

use crate::config::DurationConfig;
use thiserror::Error;

/// Errors produced by configuration validation, sampling and waiting
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DurationError {
    /// The configuration violates an invariant
    ///
    /// Carries a copy of the offending configuration so the caller can report
    /// or correct it.
    #[error("invalid configuration ({config}): {message}")]
    InvalidConfig {
        config: Box<DurationConfig>,
        message: String,
    },

    /// A rejection-sampling loop exhausted its retry budget
    ///
    /// With a validated configuration this is astronomically unlikely; seeing
    /// it points at a broken invariant elsewhere.
    #[error("resampling exhausted for {distribution} after {attempts} attempts")]
    ResamplingExhausted {
        distribution: &'static str,
        attempts: u64,
    },

    /// The non-blocking wait was cancelled before its timer expired
    #[error("wait cancelled")]
    Cancelled,
}

impl DurationError {
    /// Build an `InvalidConfig` error from a configuration and message
    pub fn invalid(config: &DurationConfig, message: impl Into<String>) -> Self {
        DurationError::InvalidConfig {
            config: Box::new(config.clone()),
            message: message.into(),
        }
    }

    /// Returns true for `InvalidConfig`
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, DurationError::InvalidConfig { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DurationConfig;

    #[test]
    fn test_invalid_config_carries_copy() {
        let config = DurationConfig::uniform(5.0, 1.0);
        let err = DurationError::invalid(&config, "minimum (5) must not exceed maximum (1)");

        match &err {
            DurationError::InvalidConfig { config: carried, message } => {
                assert_eq!(**carried, config);
                assert!(message.contains("minimum"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.is_invalid_config());
        assert!(err.to_string().starts_with("invalid configuration"));
    }

    #[test]
    fn test_resampling_exhausted_display() {
        let err = DurationError::ResamplingExhausted {
            distribution: "normal",
            attempts: 42,
        };
        assert_eq!(
            err.to_string(),
            "resampling exhausted for normal after 42 attempts"
        );
        assert!(!err.is_invalid_config());
    }
}
