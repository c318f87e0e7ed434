//! Metrics collection, aggregation, and percentile computation.
mod collector;
mod histogram;
mod types;

#[cfg(test)]
mod tests;

pub use collector::MetricsCollector;
pub use histogram::LatencyHistogram;
pub use types::{CheckStat, MetricsAggregate, RequestOutcome, RequestStatus};
