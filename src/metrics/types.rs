use std::time::Duration;

use tokio::time::Instant;

/// Terminal state of one request attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestStatus {
    /// The server answered; carries the HTTP status code.
    Completed(u16),
    /// The request exceeded the configured request timeout.
    TimedOut,
    /// Connection-level failure (refused, reset, DNS, malformed URL).
    TransportError,
}

impl RequestStatus {
    #[must_use]
    pub const fn is_timeout(self) -> bool {
        matches!(self, RequestStatus::TimedOut)
    }
}

/// One completed (or failed) request iteration. Created once, never mutated;
/// retained only in aggregate form inside the collector.
#[derive(Clone, Debug)]
pub struct RequestOutcome {
    pub start: Instant,
    pub duration: Duration,
    pub status: RequestStatus,
    /// Whether this outcome counts toward the error rate, per the scenario's
    /// failure policy.
    pub failed: bool,
    /// One entry per declared check, in declaration order.
    pub check_results: Vec<bool>,
}

/// Running pass/fail tally for one named check.
#[derive(Clone, Debug)]
pub struct CheckStat {
    pub name: String,
    pub passes: u64,
    pub failures: u64,
}

/// Point-in-time aggregate over every outcome recorded so far. Read-only
/// during reporting; duration samples are sorted so percentile lookups are
/// deterministic regardless of arrival order.
#[derive(Clone, Debug)]
pub struct MetricsAggregate {
    pub count: u64,
    pub error_count: u64,
    pub timeout_count: u64,
    pub sum_micros: u128,
    pub min_micros: u64,
    pub max_micros: u64,
    pub sorted_micros: Vec<u64>,
    pub checks: Vec<CheckStat>,
}

impl MetricsAggregate {
    #[must_use]
    pub fn empty(check_names: &[String]) -> Self {
        Self {
            count: 0,
            error_count: 0,
            timeout_count: 0,
            sum_micros: 0,
            min_micros: 0,
            max_micros: 0,
            sorted_micros: Vec::new(),
            checks: check_names
                .iter()
                .map(|name| CheckStat {
                    name: name.clone(),
                    passes: 0,
                    failures: 0,
                })
                .collect(),
        }
    }

    /// Nearest-rank percentile over the full sample set: the value at rank
    /// `ceil(p * n / 100)` in sorted order. Returns 0 for an empty set.
    #[must_use]
    pub fn percentile_micros(&self, percentile: u8) -> u64 {
        let n = u64::try_from(self.sorted_micros.len()).unwrap_or(u64::MAX);
        if n == 0 {
            return 0;
        }
        let rank = u64::from(percentile)
            .saturating_mul(n)
            .saturating_add(99)
            .checked_div(100)
            .unwrap_or(0)
            .clamp(1, n);
        let index = usize::try_from(rank.saturating_sub(1)).unwrap_or(0);
        self.sorted_micros.get(index).copied().unwrap_or(0)
    }

    /// Error rate in `[0, 1]`; 0 (not NaN) when nothing was recorded.
    #[must_use]
    pub fn error_rate(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.error_count as f64 / self.count as f64
    }

    #[must_use]
    pub fn avg_micros(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }
        let avg = self
            .sum_micros
            .checked_div(u128::from(self.count))
            .unwrap_or(0);
        u64::try_from(avg).unwrap_or(u64::MAX)
    }

    /// Overall throughput over the run wall-clock.
    #[must_use]
    pub fn requests_per_second(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if self.count == 0 || secs <= 0.0 {
            return 0.0;
        }
        self.count as f64 / secs
    }
}
