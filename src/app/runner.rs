use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::config::RunPlan;
use crate::error::AppResult;
use crate::http;
use crate::metrics::MetricsCollector;
use crate::report::{SummaryDocument, build_summary, evaluate_thresholds};
use crate::sched::{self, VuContext};
use crate::shutdown::{ShutdownSender, setup_signal_shutdown_handler, shutdown_channel};

use super::spawn_progress_task;

/// Extra join time granted on top of the request timeout and pause, so a
/// virtual user mid-request can still land its outcome.
const GRACE_MARGIN: Duration = Duration::from_secs(1);

pub struct RunReport {
    pub document: SummaryDocument,
    pub passed: bool,
}

/// Executes one full load-test run: ramps virtual users through the stage
/// list, aggregates every outcome, then evaluates thresholds and builds the
/// summary document.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub async fn run(plan: RunPlan) -> AppResult<RunReport> {
    let client = http::build_client(plan.request_timeout, plan.connect_timeout)?;
    let (shutdown_tx, _shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let scenario = Arc::new(plan.scenario);
    let metrics = Arc::new(MetricsCollector::new(scenario.check_names()));
    let context = Arc::new(VuContext {
        client,
        base_url: plan.base_url,
        scenario: Arc::clone(&scenario),
        metrics: Arc::clone(&metrics),
        seed: plan.seed,
    });

    let progress_handle = spawn_progress_task(Arc::clone(&metrics), &shutdown_tx);
    if let Some(max_duration) = plan.max_duration {
        spawn_deadline_task(max_duration, &shutdown_tx);
    }

    let grace = plan
        .request_timeout
        .saturating_add(scenario.pause)
        .saturating_add(GRACE_MARGIN);

    info!(
        scenario = scenario.name,
        base_url = %context.base_url,
        stages = scenario.stages.len(),
        "Starting load test."
    );
    let started = Instant::now();
    sched::run_stages(&context, &scenario.stages, &shutdown_tx, grace).await;
    let elapsed = started.elapsed();

    // Stop the progress and signal tasks before reporting.
    drop(shutdown_tx.send(()));
    drop(progress_handle.await);
    drop(signal_handle.await);

    let aggregate = metrics.snapshot();
    let (threshold_results, passed) = evaluate_thresholds(&scenario.thresholds, &aggregate);
    let document = build_summary(scenario.name, &aggregate, elapsed, threshold_results);

    info!(
        requests = aggregate.count,
        errors = aggregate.error_count,
        elapsed_secs = elapsed.as_secs(),
        passed,
        "Run complete."
    );
    Ok(RunReport { document, passed })
}

fn spawn_deadline_task(max_duration: Duration, shutdown_tx: &ShutdownSender) {
    let shutdown_tx = shutdown_tx.clone();
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_rx.recv() => {}
            () = sleep(max_duration) => {
                debug!("Run deadline of {:?} reached; stopping virtual users.", max_duration);
                drop(shutdown_tx.send(()));
            }
        }
    });
}
