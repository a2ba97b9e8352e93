//! Gamma variates (Marsaglia-Tsang)
//!
//! Used by the beta sampler. Shapes at or above one use the squeeze and
//! logarithmic acceptance tests of Marsaglia and Tsang; shapes below one are
//! boosted through `Gamma(shape + 1) * U^(1 / shape)`.
//!
//! Results are returned as natural logarithms. A gamma variate with a small
//! shape is routinely below `1e-300`, and the beta ratio built on top of it
//! is only stable when computed from the logs.

use super::normal::{standard_normal, BoxMullerCarry};
use crate::random::UniformSource;

/// Draw `ln G` with `G ~ Gamma(shape, 1)`
///
/// `shape` must be positive and finite. The acceptance rate is above 95% for
/// every shape, so the loop has no attempt cap.
pub fn sample_ln_gamma(shape: f64, source: &dyn UniformSource, carry: &mut BoxMullerCarry) -> f64 {
    if shape < 1.0 {
        let boosted = sample_ln_gamma(shape + 1.0, source, carry);
        // u in (0, 1]
        let u = 1.0 - source.uniform01();
        return boosted + u.ln() / shape;
    }

    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();

    loop {
        let x = standard_normal(source, carry);
        let t = 1.0 + c * x;
        if t <= 0.0 {
            continue;
        }
        let v = t * t * t;
        let u = source.uniform01();
        let x2 = x * x;

        // Squeeze
        if u < 1.0 - 0.0331 * x2 * x2 {
            return d.ln() + v.ln();
        }
        if u > 0.0 && u.ln() < 0.5 * x2 + d * (1.0 - v + v.ln()) {
            return d.ln() + v.ln();
        }
    }
}

/// Draw `G ~ Gamma(shape, 1)`
pub fn sample_gamma(shape: f64, source: &dyn UniformSource, carry: &mut BoxMullerCarry) -> f64 {
    sample_ln_gamma(shape, source, carry).exp()
}
