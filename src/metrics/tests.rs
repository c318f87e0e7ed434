use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use super::{MetricsAggregate, MetricsCollector, RequestOutcome, RequestStatus};

const EPSILON: f64 = 1e-9;

fn outcome(duration_ms: u64, status: RequestStatus, failed: bool) -> RequestOutcome {
    RequestOutcome {
        start: Instant::now(),
        duration: Duration::from_millis(duration_ms),
        status,
        failed,
        check_results: vec![!failed, true],
    }
}

fn collector() -> MetricsCollector {
    MetricsCollector::new(vec!["status ok".to_owned(), "has body".to_owned()])
}

fn record_all(target: &MetricsCollector, durations_ms: &[u64]) {
    for duration in durations_ms {
        target.record(&outcome(*duration, RequestStatus::Completed(200), false));
    }
}

#[test]
fn nearest_rank_percentiles_on_known_set() -> Result<(), String> {
    let target = collector();
    record_all(&target, &[100, 200, 300, 400, 500, 600, 700, 800, 900, 1000]);
    let aggregate = target.snapshot();

    let cases = [(50u8, 500_000u64), (90, 900_000), (95, 1_000_000), (99, 1_000_000)];
    for (percentile, expected) in cases {
        let got = aggregate.percentile_micros(percentile);
        if got != expected {
            return Err(format!("p{}: expected {}us, got {}us", percentile, expected, got));
        }
    }
    Ok(())
}

#[test]
fn percentiles_are_monotonic_and_avg_bounded() -> Result<(), String> {
    let target = collector();
    record_all(&target, &[7, 3, 90, 3, 42, 15, 250, 8, 61, 4, 1, 33]);
    let aggregate = target.snapshot();

    let p50 = aggregate.percentile_micros(50);
    let p90 = aggregate.percentile_micros(90);
    let p95 = aggregate.percentile_micros(95);
    let p99 = aggregate.percentile_micros(99);
    if !(p50 <= p90 && p90 <= p95 && p95 <= p99 && p99 <= aggregate.max_micros) {
        return Err(format!(
            "percentiles not monotonic: {} {} {} {} max {}",
            p50, p90, p95, p99, aggregate.max_micros
        ));
    }

    let avg = aggregate.avg_micros();
    if !(aggregate.min_micros <= avg && avg <= aggregate.max_micros) {
        return Err(format!(
            "avg {} outside [{}, {}]",
            avg, aggregate.min_micros, aggregate.max_micros
        ));
    }
    Ok(())
}

#[test]
fn percentiles_ignore_insertion_order() -> Result<(), String> {
    let sorted_order = collector();
    record_all(&sorted_order, &[10, 20, 30, 40, 50, 60, 70]);
    let shuffled_order = collector();
    record_all(&shuffled_order, &[60, 10, 70, 30, 50, 20, 40]);

    for percentile in [50u8, 90, 95, 99] {
        let left = sorted_order.snapshot().percentile_micros(percentile);
        let right = shuffled_order.snapshot().percentile_micros(percentile);
        if left != right {
            return Err(format!("p{} differs: {} vs {}", percentile, left, right));
        }
    }
    Ok(())
}

#[test]
fn concurrent_recording_is_deterministic() -> Result<(), String> {
    let shared = Arc::new(collector());
    let mut handles = Vec::new();
    for worker in 0u64..4 {
        let shared = Arc::clone(&shared);
        handles.push(std::thread::spawn(move || {
            for step in 0u64..25 {
                let millis = worker.saturating_mul(25).saturating_add(step).saturating_add(1);
                shared.record(&outcome(millis, RequestStatus::Completed(200), false));
            }
        }));
    }
    for handle in handles {
        handle
            .join()
            .map_err(|_panic| "recording thread panicked".to_owned())?;
    }

    let serial = collector();
    for millis in 1u64..=100 {
        serial.record(&outcome(millis, RequestStatus::Completed(200), false));
    }

    let concurrent_aggregate = shared.snapshot();
    let serial_aggregate = serial.snapshot();
    if concurrent_aggregate.count != serial_aggregate.count {
        return Err("sample counts differ".to_owned());
    }
    for percentile in [50u8, 90, 95, 99] {
        let left = concurrent_aggregate.percentile_micros(percentile);
        let right = serial_aggregate.percentile_micros(percentile);
        if left != right {
            return Err(format!("p{} differs under concurrency: {} vs {}", percentile, left, right));
        }
    }
    Ok(())
}

#[test]
fn zero_request_snapshot_reports_zeros() -> Result<(), String> {
    let aggregate = collector().snapshot();
    if aggregate.count != 0 {
        return Err("expected empty aggregate".to_owned());
    }
    if aggregate.error_rate().abs() > EPSILON {
        return Err(format!("expected zero error rate, got {}", aggregate.error_rate()));
    }
    if aggregate.percentile_micros(95) != 0 || aggregate.avg_micros() != 0 {
        return Err("expected zero latency stats".to_owned());
    }
    if aggregate.requests_per_second(Duration::from_secs(10)).abs() > EPSILON {
        return Err("expected zero throughput".to_owned());
    }
    Ok(())
}

#[test]
fn error_rate_matches_failed_outcomes() -> Result<(), String> {
    let target = collector();
    target.record(&outcome(10, RequestStatus::Completed(200), false));
    target.record(&outcome(12, RequestStatus::Completed(500), true));
    target.record(&outcome(14, RequestStatus::TimedOut, true));
    target.record(&outcome(16, RequestStatus::Completed(200), false));

    let aggregate = target.snapshot();
    if aggregate.error_count != 2 {
        return Err(format!("expected 2 errors, got {}", aggregate.error_count));
    }
    if aggregate.timeout_count != 1 {
        return Err(format!("expected 1 timeout, got {}", aggregate.timeout_count));
    }
    let rate = aggregate.error_rate();
    if (rate - 0.5).abs() > EPSILON || !(0.0..=1.0).contains(&rate) {
        return Err(format!("unexpected error rate {}", rate));
    }
    Ok(())
}

#[test]
fn check_results_are_tallied_per_check() -> Result<(), String> {
    let target = collector();
    target.record(&outcome(10, RequestStatus::Completed(200), false));
    target.record(&outcome(12, RequestStatus::Completed(500), true));

    let aggregate = target.snapshot();
    let first = aggregate
        .checks
        .first()
        .ok_or_else(|| "missing first check stat".to_owned())?;
    if first.passes != 1 || first.failures != 1 {
        return Err(format!(
            "check '{}': expected 1 pass / 1 failure, got {} / {}",
            first.name, first.passes, first.failures
        ));
    }
    let second = aggregate
        .checks
        .get(1)
        .ok_or_else(|| "missing second check stat".to_owned())?;
    if second.passes != 2 || second.failures != 0 {
        return Err(format!(
            "check '{}': expected 2 passes, got {} / {}",
            second.name, second.passes, second.failures
        ));
    }
    Ok(())
}

#[test]
fn single_sample_dominates_every_percentile() -> Result<(), String> {
    let target = collector();
    record_all(&target, &[37]);
    let aggregate = target.snapshot();
    for percentile in [50u8, 90, 95, 99] {
        if aggregate.percentile_micros(percentile) != 37_000 {
            return Err(format!("p{} should equal the only sample", percentile));
        }
    }
    Ok(())
}

#[test]
fn empty_aggregate_helper_matches_collector() -> Result<(), String> {
    let names = vec!["status ok".to_owned(), "has body".to_owned()];
    let aggregate = MetricsAggregate::empty(&names);
    if aggregate.checks.len() != 2 || aggregate.count != 0 {
        return Err("empty aggregate malformed".to_owned());
    }
    Ok(())
}
