use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

use crate::metrics::MetricsCollector;
use crate::shutdown::ShutdownSender;

const PROGRESS_INTERVAL: Duration = Duration::from_secs(2);

/// Spawns the periodic progress log. Percentiles here come from the
/// approximate histogram; the final summary recomputes them exactly.
#[must_use]
pub fn spawn_progress_task(
    metrics: Arc<MetricsCollector>,
    shutdown_tx: &ShutdownSender,
) -> JoinHandle<()> {
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        let mut ticker = interval(PROGRESS_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Skip the immediate first tick.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = ticker.tick() => {
                    let (count, errors) = metrics.counts();
                    let (p50, p90, p99) = metrics.live_percentiles_ms();
                    info!(
                        requests = count,
                        errors,
                        p50_ms = p50,
                        p90_ms = p90,
                        p99_ms = p99,
                        "progress"
                    );
                }
            }
        }
    })
}
