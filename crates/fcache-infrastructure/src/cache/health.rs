//! Periodic health monitor

use super::store::CacheStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Spawn the background task that probes the remote and sweeps expired
/// in-process entries every `interval`
///
/// The probe is the only path out of fallback mode. The task stops when
/// `shutdown` is cancelled.
pub fn spawn_health_monitor(
    store: Arc<CacheStore>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    debug!("cache health monitor stopped");
                    break;
                }
                _ = ticker.tick() => {
                    store.health_check().await;
                    store.reclaim_expired().await;
                }
            }
        }
    })
}
