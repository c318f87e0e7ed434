use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::error::AppResult;
use crate::metrics::MetricsAggregate;

use super::ThresholdResult;

/// Final run summary: the k6 summary field set plus per-check tallies and
/// threshold verdicts.
#[derive(Debug, Serialize)]
pub struct SummaryDocument {
    pub test: String,
    pub requests_total: u64,
    pub requests_per_second: f64,
    pub avg_latency_ms: f64,
    pub min_latency_ms: f64,
    pub max_latency_ms: f64,
    pub p50_latency_ms: f64,
    pub p90_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub p99_latency_ms: f64,
    pub error_rate: f64,
    /// Subset of the errors that hit the request timeout.
    pub timeouts: u64,
    pub checks: BTreeMap<String, CheckCounts>,
    pub thresholds: Vec<ThresholdResult>,
}

#[derive(Debug, Serialize)]
pub struct CheckCounts {
    pub passes: u64,
    pub failures: u64,
}

/// Folds the final aggregate into the summary document. Safe for
/// zero-request runs: every derived metric is reported as zero.
#[must_use]
pub fn build_summary(
    test: &str,
    aggregate: &MetricsAggregate,
    elapsed: Duration,
    thresholds: Vec<ThresholdResult>,
) -> SummaryDocument {
    let checks = aggregate
        .checks
        .iter()
        .map(|stat| {
            (
                stat.name.clone(),
                CheckCounts {
                    passes: stat.passes,
                    failures: stat.failures,
                },
            )
        })
        .collect();

    SummaryDocument {
        test: test.to_owned(),
        requests_total: aggregate.count,
        requests_per_second: aggregate.requests_per_second(elapsed),
        avg_latency_ms: micros_to_ms(aggregate.avg_micros()),
        min_latency_ms: micros_to_ms(aggregate.min_micros),
        max_latency_ms: micros_to_ms(aggregate.max_micros),
        p50_latency_ms: micros_to_ms(aggregate.percentile_micros(50)),
        p90_latency_ms: micros_to_ms(aggregate.percentile_micros(90)),
        p95_latency_ms: micros_to_ms(aggregate.percentile_micros(95)),
        p99_latency_ms: micros_to_ms(aggregate.percentile_micros(99)),
        error_rate: aggregate.error_rate(),
        timeouts: aggregate.timeout_count,
        checks,
        thresholds,
    }
}

impl SummaryDocument {
    /// Renders the two-space-indented JSON document printed to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

const fn micros_to_ms(micros: u64) -> f64 {
    micros as f64 / 1000.0
}
