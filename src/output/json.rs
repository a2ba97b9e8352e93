//! JSON output formatting

use super::{WaitErrorStats, REPORT_PERCENTILES};
use crate::config::{DurationConfig, WaitConfig};
use crate::feasibility::Feasibility;
use crate::stats::{Moments, SampleSummary};
use crate::util::time::format_duration;
use crate::wait::WaitOutcome;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Duration with both nanoseconds and human-readable format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonDuration {
    pub nanos: u64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self {
            nanos: u64::try_from(d.as_nanos()).unwrap_or(u64::MAX),
            human: format_duration(d),
        }
    }
}

/// Moments of a set of real values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonMoments {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skewness: Option<f64>,
}

impl JsonMoments {
    fn from_moments(moments: &Moments) -> Self {
        Self {
            count: moments.count(),
            min: moments.min(),
            max: moments.max(),
            mean: moments.mean(),
            std_dev: (moments.count() > 1).then(|| moments.std_dev()),
            skewness: (moments.count() > 2).then(|| moments.skewness()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonPercentile {
    pub percentile: f64,
    pub duration: JsonDuration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSampleReport {
    pub config: DurationConfig,
    pub values: JsonMoments,
    pub percentiles: Vec<JsonPercentile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<Vec<JsonDuration>>,
}

impl JsonSampleReport {
    pub fn new(config: &DurationConfig, summary: &SampleSummary) -> Self {
        let percentiles = REPORT_PERCENTILES
            .iter()
            .filter_map(|&p| {
                summary.histogram().percentile(p).map(|d| JsonPercentile {
                    percentile: p,
                    duration: JsonDuration::from_duration(d),
                })
            })
            .collect();
        Self {
            config: config.clone(),
            values: JsonMoments::from_moments(summary.moments()),
            percentiles,
            samples: None,
        }
    }

    pub fn with_samples(mut self, samples: &[Duration]) -> Self {
        self.samples = Some(samples.iter().copied().map(JsonDuration::from_duration).collect());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWait {
    pub target: JsonDuration,
    pub elapsed: JsonDuration,
    pub error_nanos: i64,
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWaitReport {
    pub config: DurationConfig,
    pub wait: WaitConfig,
    pub waits: Vec<JsonWait>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_us: Option<JsonMoments>,
    pub cancelled: u64,
}

impl JsonWaitReport {
    pub fn new(config: &DurationConfig, wait: &WaitConfig, outcomes: &[WaitOutcome]) -> Self {
        let stats = WaitErrorStats::from_outcomes(outcomes);
        let waits = outcomes
            .iter()
            .map(|o| JsonWait {
                target: JsonDuration::from_duration(o.target),
                elapsed: JsonDuration::from_duration(o.elapsed),
                error_nanos: o.error_nanos(),
                state: o.final_state.to_string(),
            })
            .collect();
        Self {
            config: config.clone(),
            wait: *wait,
            waits,
            error_us: (stats.error_us.count() > 0).then(|| JsonMoments::from_moments(&stats.error_us)),
            cancelled: stats.cancelled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCheckReport {
    pub config: DurationConfig,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_budget: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampler_budget: Option<u64>,
}

impl JsonCheckReport {
    pub fn new(config: &DurationConfig, feasibility: Option<&Feasibility>) -> Self {
        let budget = feasibility.and_then(|f| f.budget);
        Self {
            config: config.clone(),
            valid: true,
            hit_probability: feasibility.map(|f| f.hit_probability),
            retry_budget: budget.map(|b| b.attempts()),
            sampler_budget: budget.map(|b| b.with_safety_margin().attempts()),
        }
    }
}

/// Serialize a report as pretty JSON
pub fn to_json_string<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize JSON report")
}
