//! Staged virtual-user scheduler.
//!
//! Drives the number of live virtual-user tasks along a piecewise-linear
//! ramp: within each stage the active count interpolates from the previous
//! stage's target (0 initially) toward the stage's own target. When the
//! stage list is exhausted, or a shutdown is broadcast, every task finishes
//! its current iteration and exits; tasks that outlive the grace window are
//! aborted.
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use reqwest::Client;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval, sleep, timeout};
use tracing::{debug, warn};

use crate::http;
use crate::metrics::MetricsCollector;
use crate::scenario::Scenario;
use crate::shutdown::ShutdownSender;

const SCHEDULER_TICK: Duration = Duration::from_millis(100);

/// One window of the load profile: ramp toward `target` concurrent virtual
/// users over `duration`. A zero duration steps to the target immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub duration: Duration,
    pub target: u32,
}

impl Stage {
    #[must_use]
    pub const fn new(duration: Duration, target: u32) -> Self {
        Self { duration, target }
    }
}

/// Target concurrency at `elapsed` into the stage list, or `None` once the
/// list is exhausted.
#[must_use]
pub fn desired_concurrency(stages: &[Stage], elapsed: Duration) -> Option<u32> {
    let mut offset = Duration::ZERO;
    let mut previous: u32 = 0;
    for stage in stages {
        let end = offset.saturating_add(stage.duration);
        if elapsed < end {
            let into_stage = elapsed.saturating_sub(offset);
            return Some(interpolate(previous, stage.target, into_stage, stage.duration));
        }
        offset = end;
        previous = stage.target;
    }
    None
}

fn interpolate(from: u32, to: u32, elapsed: Duration, total: Duration) -> u32 {
    if total.is_zero() {
        return to;
    }
    let elapsed_ms = i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX);
    let total_ms = i64::try_from(total.as_millis()).unwrap_or(i64::MAX).max(1);
    let delta = i64::from(to).saturating_sub(i64::from(from));
    let step = delta
        .saturating_mul(elapsed_ms)
        .checked_div(total_ms)
        .unwrap_or(0);
    let value = i64::from(from).saturating_add(step);
    if value < 0 {
        0
    } else {
        u32::try_from(value).unwrap_or(u32::MAX)
    }
}

/// Shared state handed to every virtual-user task. The HTTP client pools
/// and reuses connections across all tasks; the collector is the only
/// shared mutable state.
pub struct VuContext {
    pub client: Client,
    pub base_url: String,
    pub scenario: Arc<Scenario>,
    pub metrics: Arc<MetricsCollector>,
    pub seed: Option<u64>,
}

struct VuHandle {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Runs the full stage list, resizing the virtual-user pool every tick.
/// Returns once every task has exited (or was aborted after `grace`).
pub async fn run_stages(
    context: &Arc<VuContext>,
    stages: &[Stage],
    shutdown_tx: &ShutdownSender,
    grace: Duration,
) {
    let mut shutdown_rx = shutdown_tx.subscribe();
    let mut ticker = interval(SCHEDULER_TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let started = Instant::now();
    let mut pool: Vec<VuHandle> = Vec::new();
    let mut retired: Vec<JoinHandle<()>> = Vec::new();
    let mut spawned_total: u64 = 0;

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                debug!("Scheduler interrupted by shutdown signal.");
                break;
            }
            _ = ticker.tick() => {
                match desired_concurrency(stages, started.elapsed()) {
                    Some(desired) => {
                        let desired = usize::try_from(desired).unwrap_or(usize::MAX);
                        resize_pool(context, &mut pool, &mut retired, &mut spawned_total, desired);
                    }
                    None => {
                        debug!("Stage list exhausted after {:?}.", started.elapsed());
                        break;
                    }
                }
            }
        }
    }

    for vu in &pool {
        drop(vu.stop.send(true));
    }
    let mut handles = retired;
    handles.extend(pool.into_iter().map(|vu| vu.handle));

    let deadline = Instant::now().checked_add(grace).unwrap_or_else(Instant::now);
    for handle in handles {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let abort = handle.abort_handle();
        match timeout(remaining, handle).await {
            Ok(_join) => {}
            Err(_elapsed) => {
                warn!("Virtual user did not finish within the grace window; aborting.");
                abort.abort();
            }
        }
    }
}

fn resize_pool(
    context: &Arc<VuContext>,
    pool: &mut Vec<VuHandle>,
    retired: &mut Vec<JoinHandle<()>>,
    spawned_total: &mut u64,
    desired: usize,
) {
    while pool.len() < desired {
        pool.push(spawn_vu(context, *spawned_total));
        *spawned_total = spawned_total.saturating_add(1);
    }
    while pool.len() > desired {
        if let Some(vu) = pool.pop() {
            // Graceful retirement: the task exits at its next iteration
            // boundary and is joined at run end.
            drop(vu.stop.send(true));
            retired.push(vu.handle);
        }
    }
}

fn spawn_vu(context: &Arc<VuContext>, index: u64) -> VuHandle {
    let (stop_tx, stop_rx) = watch::channel(false);
    let rng = context.seed.map_or_else(StdRng::from_entropy, |seed| {
        StdRng::seed_from_u64(seed.wrapping_add(index))
    });
    let context = Arc::clone(context);
    let handle = tokio::spawn(vu_loop(context, stop_rx, rng));
    VuHandle {
        stop: stop_tx,
        handle,
    }
}

async fn vu_loop(context: Arc<VuContext>, mut stop: watch::Receiver<bool>, mut rng: StdRng) {
    loop {
        if *stop.borrow() {
            break;
        }

        let plan = context.scenario.kind.build(&mut rng);
        let outcome =
            http::execute_iteration(&context.client, &context.base_url, &context.scenario, plan)
                .await;
        context.metrics.record(&outcome);

        if *stop.borrow() {
            break;
        }
        let pause = context.scenario.pause;
        if pause.is_zero() {
            tokio::task::yield_now().await;
            continue;
        }
        tokio::select! {
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
            () = sleep(pause) => {}
        }
    }
}
