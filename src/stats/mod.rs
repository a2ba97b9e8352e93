//! Sample statistics
//!
//! Streaming summaries of sampled values: count, extremes, mean, variance and
//! skewness via a one-pass update, plus an HDR histogram of the converted
//! durations for percentiles.
//!
//! # Example
//!
//! ```
//! use durand::stats::SampleSummary;
//! use durand::config::TimeUnit;
//!
//! let mut summary = SampleSummary::new(TimeUnit::Milliseconds);
//! for value in [10.0, 12.0, 14.0] {
//!     summary.record(value);
//! }
//! assert_eq!(summary.moments().count(), 3);
//! assert!((summary.moments().mean() - 12.0).abs() < 1e-12);
//! ```

pub mod histogram;

use crate::config::TimeUnit;
use histogram::DurationHistogram;
use std::time::Duration;

/// One-pass mean, variance and skewness
///
/// Uses the incremental central-moment update, which stays accurate for long
/// runs where a naive sum of squares would cancel catastrophically.
#[derive(Debug, Clone, Copy, Default)]
pub struct Moments {
    count: u64,
    mean: f64,
    m2: f64,
    m3: f64,
    min: f64,
    max: f64,
}

impl Moments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation
    #[inline]
    pub fn record(&mut self, x: f64) {
        if self.count == 0 {
            self.min = x;
            self.max = x;
        } else {
            self.min = self.min.min(x);
            self.max = self.max.max(x);
        }

        let n1 = self.count as f64;
        self.count += 1;
        let n = self.count as f64;
        let delta = x - self.mean;
        let delta_n = delta / n;
        let term1 = delta * delta_n * n1;

        self.mean += delta_n;
        self.m3 += term1 * delta_n * (n - 2.0) - 3.0 * delta_n * self.m2;
        self.m2 += term1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Sample variance (n - 1 denominator), 0 with fewer than two values
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        self.m2 / (self.count - 1) as f64
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Standard error of the mean
    pub fn standard_error(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.std_dev() / (self.count as f64).sqrt()
    }

    /// Sample skewness `g1`, 0 when the spread is zero
    pub fn skewness(&self) -> f64 {
        if self.count < 2 || self.m2 == 0.0 {
            return 0.0;
        }
        (self.count as f64).sqrt() * self.m3 / self.m2.powf(1.5)
    }
}

/// Moments of the raw values plus a histogram of their durations
#[derive(Debug, Clone)]
pub struct SampleSummary {
    unit: TimeUnit,
    moments: Moments,
    histogram: DurationHistogram,
}

impl SampleSummary {
    /// Create an empty summary for values expressed in `unit`
    pub fn new(unit: TimeUnit) -> Self {
        Self {
            unit,
            moments: Moments::new(),
            histogram: DurationHistogram::new(),
        }
    }

    /// Record one sampled value
    #[inline]
    pub fn record(&mut self, value: f64) {
        self.moments.record(value);
        self.histogram.record(self.unit.to_duration(value));
    }

    /// Record one measured duration, converted into this summary's unit
    pub fn record_duration(&mut self, duration: Duration) {
        self.moments.record(self.unit.from_duration(duration));
        self.histogram.record(duration);
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn moments(&self) -> &Moments {
        &self.moments
    }

    pub fn histogram(&self) -> &DurationHistogram {
        &self.histogram
    }

    /// Percentile as a real value in this summary's unit
    pub fn percentile(&self, percentile: f64) -> Option<f64> {
        self.histogram
            .percentile(percentile)
            .map(|d| self.unit.from_duration(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moments_known_values() {
        let mut m = Moments::new();
        for x in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            m.record(x);
        }
        assert_eq!(m.count(), 8);
        assert!((m.mean() - 5.0).abs() < 1e-12);
        // Sum of squared deviations is 32
        assert!((m.variance() - 32.0 / 7.0).abs() < 1e-12);
        assert_eq!(m.min(), 2.0);
        assert_eq!(m.max(), 9.0);
    }

    #[test]
    fn test_moments_symmetric_skewness_is_zero() {
        let mut m = Moments::new();
        for x in [-3.0, -1.0, 0.0, 1.0, 3.0] {
            m.record(x);
        }
        assert!(m.skewness().abs() < 1e-12);
    }

    #[test]
    fn test_moments_right_skew() {
        let mut m = Moments::new();
        for x in [1.0, 1.0, 1.0, 1.0, 10.0] {
            m.record(x);
        }
        assert!(m.skewness() > 1.0, "skewness={}", m.skewness());
    }

    #[test]
    fn test_moments_empty_and_single() {
        let mut m = Moments::new();
        assert_eq!(m.variance(), 0.0);
        assert_eq!(m.standard_error(), 0.0);
        m.record(4.0);
        assert_eq!(m.variance(), 0.0);
        assert_eq!(m.skewness(), 0.0);
    }

    #[test]
    fn test_summary_percentile_in_unit() {
        let mut summary = SampleSummary::new(TimeUnit::Milliseconds);
        for i in 1..=100 {
            summary.record(i as f64);
        }
        let p50 = summary.percentile(50.0).unwrap();
        assert!((p50 - 50.0).abs() < 1.0, "p50={}", p50);
        assert_eq!(summary.histogram().len(), 100);
    }

    #[test]
    fn test_summary_record_duration() {
        let mut summary = SampleSummary::new(TimeUnit::Milliseconds);
        summary.record_duration(Duration::from_micros(1500));
        assert!((summary.moments().mean() - 1.5).abs() < 1e-9);
    }
}
