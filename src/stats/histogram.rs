//! Duration histogram using HdrHistogram
//!
//! Records sampled durations (or measured wait times) with nanosecond
//! resolution so the CLI can report percentiles.
//!
//! # Example
//!
//! ```
//! use durand::stats::histogram::DurationHistogram;
//! use std::time::Duration;
//!
//! let mut hist = DurationHistogram::new();
//! hist.record(Duration::from_micros(100));
//! hist.record(Duration::from_micros(150));
//! hist.record(Duration::from_micros(200));
//!
//! let p50 = hist.percentile(50.0);
//! assert!(p50.is_some());
//! ```

use hdrhistogram::Histogram;
use std::time::Duration;

/// Largest trackable value: 1 hour in nanoseconds
const MAX_TRACKABLE_NANOS: u64 = 3_600_000_000_000;
const _: () = assert!(MAX_TRACKABLE_NANOS >= 2);

/// Duration histogram wrapper
///
/// Tracks durations from 1 nanosecond to 1 hour with 3 significant digits.
/// Longer values are clamped to the upper bound; zero is recorded as 1ns.
#[derive(Debug, Clone)]
pub struct DurationHistogram {
    histogram: Histogram<u64>,
}

impl DurationHistogram {
    /// Create a new empty histogram
    pub fn new() -> Self {
        // Bounds are constants: low >= 1, high >= 2 * low, sigfig <= 5
        let histogram = Histogram::new_with_bounds(1, MAX_TRACKABLE_NANOS, 3)
            .expect("Failed to create histogram with valid bounds");

        Self { histogram }
    }

    /// Record one duration
    #[inline]
    pub fn record(&mut self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        let value = nanos.clamp(1, MAX_TRACKABLE_NANOS);
        // In range after the clamp
        let _ = self.histogram.record(value);
    }

    /// Value at a percentile (0.0 - 100.0), `None` when empty
    pub fn percentile(&self, percentile: f64) -> Option<Duration> {
        if self.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.value_at_percentile(percentile)))
    }

    /// Smallest recorded duration
    pub fn min(&self) -> Option<Duration> {
        if self.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.min()))
    }

    /// Largest recorded duration
    pub fn max(&self) -> Option<Duration> {
        if self.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.max()))
    }

    /// Number of recorded values
    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histogram.len() == 0
    }
}

impl Default for DurationHistogram {
    fn default() -> Self {
        Self::new()
    }
}
