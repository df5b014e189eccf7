//! Background eviction sweep
//!
//! The counter owns the sweep logic but not the timer; this module
//! provides the recurring driver as a cancellable tokio task.

use crate::core::temporal::Timestamp;
use crate::counter::ViewCounter;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Spawn the recurring eviction sweep for `counter`.
///
/// Ticks every `eviction_interval` until `shutdown` is cancelled. Missed
/// ticks are delayed rather than bursted.
pub fn spawn_sweeper(counter: Arc<ViewCounter>, shutdown: CancellationToken) -> JoinHandle<()> {
    let period = counter.config().eviction_interval;
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick of a tokio interval completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("eviction sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let stats = counter.evict_stale(Timestamp::now());
                    debug!(
                        entries_removed = stats.entries_removed,
                        clients_removed = stats.clients_removed,
                        clients_tracked = counter.client_count(),
                        "eviction sweep finished"
                    );
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::CounterConfig;
    use std::time::Duration;

    #[tokio::test]
    async fn test_sweeper_evicts_stale_entries() {
        let config = CounterConfig::default()
            .with_eviction_interval(Duration::from_millis(20))
            .with_stale_threshold(Duration::from_secs(3600));
        let counter = Arc::new(ViewCounter::new(config));

        // recorded two hours in the past, well past the stale threshold
        let stale = Timestamp::now().sub_millis(2 * 3600 * 1000);
        assert!(counter.should_count("10.0.0.1", "center-1", stale));
        assert_eq!(counter.client_count(), 1);

        let shutdown = CancellationToken::new();
        let handle = spawn_sweeper(counter.clone(), shutdown.clone());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(counter.client_count(), 0);

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_sweeper_stops_on_cancel() {
        let counter = Arc::new(ViewCounter::new(CounterConfig::default()));
        let shutdown = CancellationToken::new();
        let handle = spawn_sweeper(counter, shutdown.clone());

        shutdown.cancel();
        handle.await.unwrap();
    }
}
