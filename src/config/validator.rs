//! Configuration validation
//!
//! Checks run in a fixed order and stop at the first failure, so the same
//! configuration always reports the same message:
//!
//! 1. bounds and every real parameter are finite
//! 2. `minimum <= maximum`
//! 3. the interval width is finite and wider than a relative epsilon
//! 4. family parameters (mode in range, shapes positive, ...)
//! 5. rejection families have non-negligible mass inside the bounds

use super::*;
use crate::error::DurationError;
use crate::feasibility;

/// Validate a duration configuration
///
/// Pure: validating the same configuration twice gives the same result.
pub fn validate_config(config: &DurationConfig) -> Result<()> {
    validate_finite(config)?;
    validate_bounds(config)?;
    config
        .distribution()
        .validate(config.minimum(), config.maximum())
        .map_err(|message| DurationError::invalid(config, message))?;
    validate_feasibility(config)?;
    Ok(())
}

/// Validate a complete file configuration
pub fn validate_file_config(config: &Config) -> anyhow::Result<()> {
    validate_config(&config.duration)?;
    config
        .wait
        .validate()
        .map_err(|message| anyhow::anyhow!("invalid wait configuration: {}", message))?;
    Ok(())
}

/// Smallest interval width accepted for the given bounds
///
/// Relative to the magnitude of the bounds so that `[1e9, 1e9 + 1]` is
/// accepted while two adjacent floats are not.
pub fn min_width(minimum: f64, maximum: f64) -> f64 {
    f64::EPSILON * 1.0_f64.max(minimum.abs()).max(maximum.abs())
}

fn validate_finite(config: &DurationConfig) -> Result<()> {
    let bounds = [("minimum", config.minimum()), ("maximum", config.maximum())];
    let parameters = config.distribution().real_parameters();

    for (field, value) in bounds.iter().chain(parameters.iter()) {
        if !value.is_finite() {
            return Err(DurationError::invalid(
                config,
                format!("{} must be finite, got {}", field, value),
            ));
        }
    }
    Ok(())
}

fn validate_bounds(config: &DurationConfig) -> Result<()> {
    if config.minimum() > config.maximum() {
        return Err(DurationError::invalid(
            config,
            format!(
                "minimum ({}) must not exceed maximum ({})",
                config.minimum(),
                config.maximum()
            ),
        ));
    }

    if !config.width().is_finite() {
        return Err(DurationError::invalid(
            config,
            format!(
                "interval width overflows: maximum ({}) - minimum ({}) is not finite",
                config.maximum(),
                config.minimum()
            ),
        ));
    }

    let threshold = min_width(config.minimum(), config.maximum());
    if config.width() <= threshold {
        return Err(DurationError::invalid(
            config,
            format!(
                "interval width {} must exceed {:e}",
                config.width(),
                threshold
            ),
        ));
    }
    Ok(())
}

fn validate_feasibility(config: &DurationConfig) -> Result<()> {
    match feasibility::analyze(config) {
        Some(analysis) if !analysis.is_feasible() => Err(DurationError::invalid(
            config,
            format!(
                "{} is infeasible: {}",
                config.distribution().name(),
                analysis
            ),
        )),
        _ => Ok(()),
    }
}
