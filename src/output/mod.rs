//! Report output
//!
//! Human-readable text and JSON renderings of the three CLI reports: sample
//! summaries, wait timing, and configuration checks.

pub mod json;
pub mod text;

use crate::stats::Moments;
use crate::wait::WaitOutcome;

/// Percentiles shown in every report
pub const REPORT_PERCENTILES: [f64; 4] = [50.0, 90.0, 99.0, 99.9];

/// Timing error of a batch of waits
#[derive(Debug, Clone, Copy, Default)]
pub struct WaitErrorStats {
    /// Signed `elapsed - target` in microseconds
    pub error_us: Moments,
    pub cancelled: u64,
}

impl WaitErrorStats {
    pub fn from_outcomes(outcomes: &[WaitOutcome]) -> Self {
        let mut stats = Self::default();
        for outcome in outcomes {
            if outcome.is_cancelled() {
                stats.cancelled += 1;
            } else {
                stats.error_us.record(outcome.error_nanos() as f64 / 1_000.0);
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wait::WaitState;
    use std::time::Duration;

    #[test]
    fn test_wait_error_stats() {
        let outcomes = [
            WaitOutcome {
                target: Duration::from_millis(10),
                elapsed: Duration::from_micros(10_004),
                final_state: WaitState::Done,
            },
            WaitOutcome {
                target: Duration::from_millis(10),
                elapsed: Duration::from_micros(10_002),
                final_state: WaitState::Done,
            },
            WaitOutcome {
                target: Duration::from_millis(10),
                elapsed: Duration::from_millis(1),
                final_state: WaitState::Cancelled,
            },
        ];
        let stats = WaitErrorStats::from_outcomes(&outcomes);
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.error_us.count(), 2);
        assert!((stats.error_us.mean() - 3.0).abs() < 1e-9);
    }
}
