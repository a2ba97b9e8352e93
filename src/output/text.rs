//! Text output formatting

use super::{WaitErrorStats, REPORT_PERCENTILES};
use crate::config::{DurationConfig, WaitConfig};
use crate::feasibility::Feasibility;
use crate::stats::SampleSummary;
use crate::util::time::{format_duration, format_offset};
use crate::wait::WaitOutcome;
use std::fmt::Write;

const RULE: &str = "═══════════════════════════════════════════════════════════";

fn header(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "{:^59}", title);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out);
}

/// Render a sample summary
pub fn render_sample_summary(config: &DurationConfig, summary: &SampleSummary) -> String {
    let mut out = String::new();
    header(&mut out, "SAMPLE SUMMARY");

    let suffix = config.unit().suffix();
    let moments = summary.moments();
    let _ = writeln!(out, "Distribution: {}", config);
    let _ = writeln!(out, "Samples:      {}", moments.count());
    let _ = writeln!(out);

    if moments.count() == 0 {
        let _ = writeln!(out, "  No samples drawn");
        return out;
    }

    let _ = writeln!(out, "Values:");
    let _ = writeln!(out, "  Min:      {:.6} {}", moments.min(), suffix);
    let _ = writeln!(out, "  Mean:     {:.6} {}", moments.mean(), suffix);
    let _ = writeln!(out, "  Max:      {:.6} {}", moments.max(), suffix);
    if moments.count() > 1 {
        let _ = writeln!(out, "  Std dev:  {:.6} {}", moments.std_dev(), suffix);
    }
    if moments.count() > 2 {
        let _ = writeln!(out, "  Skewness: {:.4}", moments.skewness());
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "  Percentiles:");
    for p in REPORT_PERCENTILES {
        if let Some(d) = summary.histogram().percentile(p) {
            let _ = writeln!(out, "    p{:<5}: {}", p, format_duration(d));
        }
    }
    out
}

/// Render the timing of a batch of waits
pub fn render_wait_report(
    config: &DurationConfig,
    wait: &WaitConfig,
    outcomes: &[WaitOutcome],
    verbose: bool,
) -> String {
    let mut out = String::new();
    header(&mut out, "WAIT REPORT");

    let _ = writeln!(out, "Distribution: {}", config);
    let _ = writeln!(out, "Wait:         {}", wait);
    let _ = writeln!(out, "Waits:        {}", outcomes.len());
    let _ = writeln!(out);

    if verbose {
        for (i, outcome) in outcomes.iter().enumerate() {
            let _ = writeln!(
                out,
                "  #{:<4} target {:>10}  actual {:>10}  error {:>10}  {}",
                i + 1,
                format_duration(outcome.target),
                format_duration(outcome.elapsed),
                format_offset(outcome.target, outcome.elapsed),
                outcome.final_state
            );
        }
        let _ = writeln!(out);
    }

    let stats = WaitErrorStats::from_outcomes(outcomes);
    if stats.error_us.count() > 0 {
        let _ = writeln!(out, "Timing error (actual - target):");
        let _ = writeln!(out, "  Min:  {:+.2}us", stats.error_us.min());
        let _ = writeln!(out, "  Mean: {:+.2}us", stats.error_us.mean());
        let _ = writeln!(out, "  Max:  {:+.2}us", stats.error_us.max());
    }
    if stats.cancelled > 0 {
        let _ = writeln!(out, "Cancelled: {}", stats.cancelled);
    }
    out
}

/// Render a configuration check
pub fn render_check(config: &DurationConfig, feasibility: Option<&Feasibility>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Configuration: {}", config);
    let _ = writeln!(out, "Status:        valid");
    match feasibility {
        Some(analysis) => {
            let _ = writeln!(out, "Hit probability: {:.6e}", analysis.hit_probability);
            match analysis.budget {
                Some(budget) => {
                    let _ = writeln!(out, "Retry budget:    {}", budget);
                    let _ = writeln!(out, "Sampler budget:  {}", budget.with_safety_margin());
                }
                None => {
                    let _ = writeln!(out, "Retry budget:    none (infeasible)");
                }
            }
        }
        None => {
            let _ = writeln!(out, "Sampling:      direct (no rejection)");
        }
    }
    out
}
