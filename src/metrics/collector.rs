use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use super::{CheckStat, LatencyHistogram, MetricsAggregate, RequestOutcome, RequestStatus};

struct CollectorState {
    count: u64,
    error_count: u64,
    timeout_count: u64,
    sum_micros: u128,
    min_micros: u64,
    max_micros: u64,
    durations_micros: Vec<u64>,
    checks: Vec<CheckStat>,
    histogram: Option<LatencyHistogram>,
}

/// Thread-safe accumulator for request outcomes, shared across every
/// virtual-user task via `Arc`. Each `record` call updates the aggregate
/// atomically under the lock, so concurrent out-of-order recording is safe.
///
/// Every duration sample is retained so the final percentiles are exact
/// (nearest-rank over the full set); the embedded histogram only serves the
/// periodic progress log.
pub struct MetricsCollector {
    state: Mutex<CollectorState>,
}

impl MetricsCollector {
    #[must_use]
    pub fn new(check_names: Vec<String>) -> Self {
        let histogram = match LatencyHistogram::new() {
            Ok(histogram) => Some(histogram),
            Err(err) => {
                warn!("Failed to initialize latency histogram: {}", err);
                None
            }
        };

        Self {
            state: Mutex::new(CollectorState {
                count: 0,
                error_count: 0,
                timeout_count: 0,
                sum_micros: 0,
                min_micros: u64::MAX,
                max_micros: 0,
                durations_micros: Vec::new(),
                checks: check_names
                    .into_iter()
                    .map(|name| CheckStat {
                        name,
                        passes: 0,
                        failures: 0,
                    })
                    .collect(),
                histogram,
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CollectorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Folds one outcome into the aggregate.
    pub fn record(&self, outcome: &RequestOutcome) {
        let micros = u64::try_from(outcome.duration.as_micros()).unwrap_or(u64::MAX);

        let mut state = self.lock_state();
        state.count = state.count.saturating_add(1);
        if outcome.failed {
            state.error_count = state.error_count.saturating_add(1);
        }
        if outcome.status.is_timeout() {
            state.timeout_count = state.timeout_count.saturating_add(1);
        }
        state.sum_micros = state.sum_micros.saturating_add(u128::from(micros));
        if micros < state.min_micros {
            state.min_micros = micros;
        }
        if micros > state.max_micros {
            state.max_micros = micros;
        }
        state.durations_micros.push(micros);

        if outcome.check_results.len() != state.checks.len() {
            warn!(
                "Outcome carried {} check results, expected {}.",
                outcome.check_results.len(),
                state.checks.len()
            );
        }
        for (stat, passed) in state.checks.iter_mut().zip(&outcome.check_results) {
            if *passed {
                stat.passes = stat.passes.saturating_add(1);
            } else {
                stat.failures = stat.failures.saturating_add(1);
            }
        }

        let millis = micros.checked_div(1000).unwrap_or(0);
        if let Some(histogram) = state.histogram.as_mut()
            && let Err(err) = histogram.record(millis)
        {
            warn!("Disabling latency histogram after error: {}", err);
            state.histogram = None;
        }
    }

    /// Snapshot of the aggregate with duration samples sorted, so percentile
    /// lookups are deterministic for a fixed sample set.
    #[must_use]
    pub fn snapshot(&self) -> MetricsAggregate {
        let state = self.lock_state();
        let mut sorted = state.durations_micros.clone();
        sorted.sort_unstable();

        MetricsAggregate {
            count: state.count,
            error_count: state.error_count,
            timeout_count: state.timeout_count,
            sum_micros: state.sum_micros,
            min_micros: if state.count > 0 { state.min_micros } else { 0 },
            max_micros: state.max_micros,
            sorted_micros: sorted,
            checks: state.checks.clone(),
        }
    }

    /// Total and error counts, for the progress log.
    #[must_use]
    pub fn counts(&self) -> (u64, u64) {
        let state = self.lock_state();
        (state.count, state.error_count)
    }

    /// Approximate live p50/p90/p99 in milliseconds from the histogram.
    #[must_use]
    pub fn live_percentiles_ms(&self) -> (u64, u64, u64) {
        let state = self.lock_state();
        state
            .histogram
            .as_ref()
            .map_or((0, 0, 0), LatencyHistogram::percentiles)
    }
}

impl RequestOutcome {
    #[must_use]
    pub fn new(
        start: tokio::time::Instant,
        status: RequestStatus,
        failed: bool,
        check_results: Vec<bool>,
    ) -> Self {
        Self {
            start,
            duration: start.elapsed(),
            status,
            failed,
            check_results,
        }
    }
}
