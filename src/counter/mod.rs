//! Cooldown-deduplicated view tracking
//!
//! A [`ViewCounter`] remembers, per (client, resource) pair, when the last
//! counted view happened. A view is countable only when no counted view
//! exists for the pair within the cooldown window. Stored timestamps are
//! evicted once they age past the stale threshold so the map stays bounded
//! over the process lifetime.
//!
//! The counter never reads the clock itself; callers inject `now` into
//! every operation. The periodic sweep is driven externally, see
//! [`sweeper`].

use crate::core::temporal::Timestamp;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub mod sweeper;

/// Default minimum interval between two countable views from the same
/// client for the same resource
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(5 * 60);

/// Default period of the background eviction sweep
pub const DEFAULT_EVICTION_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Default age after which a stored timestamp is eligible for eviction
pub const DEFAULT_STALE_THRESHOLD: Duration = Duration::from_secs(60 * 60);

/// Configuration for a [`ViewCounter`], fixed at construction
#[derive(Debug, Clone, Copy)]
pub struct CounterConfig {
    /// Minimum interval between two countable views for one pair
    pub cooldown: Duration,
    /// How often the background sweep should run
    pub eviction_interval: Duration,
    /// Age after which a stored timestamp is evicted, independent of the
    /// cooldown duration
    pub stale_threshold: Duration,
}

impl CounterConfig {
    /// Set the cooldown window
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Set the sweep period
    pub fn with_eviction_interval(mut self, interval: Duration) -> Self {
        self.eviction_interval = interval;
        self
    }

    /// Set the stale threshold
    pub fn with_stale_threshold(mut self, threshold: Duration) -> Self {
        self.stale_threshold = threshold;
        self
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            eviction_interval: DEFAULT_EVICTION_INTERVAL,
            stale_threshold: DEFAULT_STALE_THRESHOLD,
        }
    }
}

/// Outcome of one eviction sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvictionStats {
    /// (client, resource) entries removed
    pub entries_removed: usize,
    /// Clients whose record emptied and was removed
    pub clients_removed: usize,
}

/// Tracks the last counted view per (client, resource) pair and decides
/// whether a new view falls outside the cooldown window.
///
/// State is process-wide and never persisted; a restart resets every pair
/// to first-view behavior, which only affects deduplication, not the
/// stored totals.
pub struct ViewCounter {
    config: CounterConfig,
    /// client id -> resource id -> last counted view
    state: Mutex<HashMap<String, HashMap<String, Timestamp>>>,
}

impl ViewCounter {
    /// Create a counter with the given configuration and empty state
    pub fn new(config: CounterConfig) -> Self {
        Self {
            config,
            state: Mutex::new(HashMap::new()),
        }
    }

    /// Get the counter configuration
    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// Decide whether a view observed at `now` should be counted.
    ///
    /// Returns true and records `now` when the pair has no counted view
    /// yet, or when the last one is at least a full cooldown old. Returns
    /// false without touching the stored timestamp otherwise.
    ///
    /// Identities are opaque; two real clients resolving to the same id
    /// share one cooldown window.
    pub fn should_count(&self, client_id: &str, resource_id: &str, now: Timestamp) -> bool {
        let cooldown_ms = self.config.cooldown.as_millis() as i64;
        let mut state = self.state.lock().expect("ViewCounter poisoned lock");
        let record = state.entry(client_id.to_string()).or_default();

        match record.get(resource_id) {
            Some(&last) if now.millis_since(last) < cooldown_ms => false,
            _ => {
                record.insert(resource_id.to_string(), now);
                true
            }
        }
    }

    /// Remove every entry whose last counted view is at least
    /// `stale_threshold` old at `now`, dropping clients whose record
    /// empties.
    ///
    /// A fully evicted client is indistinguishable from a brand-new one on
    /// its next [`should_count`](Self::should_count) call.
    pub fn evict_stale(&self, now: Timestamp) -> EvictionStats {
        let stale_ms = self.config.stale_threshold.as_millis() as i64;
        let mut stats = EvictionStats {
            entries_removed: 0,
            clients_removed: 0,
        };

        let mut state = self.state.lock().expect("ViewCounter poisoned lock");
        state.retain(|_, record| {
            let before = record.len();
            record.retain(|_, last| now.millis_since(*last) < stale_ms);
            stats.entries_removed += before - record.len();
            if record.is_empty() {
                stats.clients_removed += 1;
                return false;
            }
            true
        });

        stats
    }

    /// Number of clients currently tracked
    pub fn client_count(&self) -> usize {
        self.state.lock().expect("ViewCounter poisoned lock").len()
    }

    /// Total number of (client, resource) entries currently tracked
    pub fn entry_count(&self) -> usize {
        self.state
            .lock()
            .expect("ViewCounter poisoned lock")
            .values()
            .map(HashMap::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn counter() -> ViewCounter {
        ViewCounter::new(CounterConfig::default())
    }

    #[test]
    fn test_cooldown_boundary() {
        let c = counter();
        let cooldown = DEFAULT_COOLDOWN.as_millis() as i64;
        let t0 = Timestamp::from_millis(10_000);

        assert!(c.should_count("1.2.3.4", "center-42", t0));
        assert!(!c.should_count("1.2.3.4", "center-42", t0.add_millis(cooldown - 1)));
        assert!(c.should_count("1.2.3.4", "center-42", t0.add_millis(cooldown)));
    }

    #[test]
    fn test_independence_across_resources() {
        let c = counter();
        let t = Timestamp::from_millis(0);

        assert!(c.should_count("1.2.3.4", "center-1", t));
        assert!(c.should_count("1.2.3.4", "center-2", t));
        assert!(!c.should_count("1.2.3.4", "center-1", t));
    }

    #[test]
    fn test_independence_across_clients() {
        let c = counter();
        let t = Timestamp::from_millis(0);

        assert!(c.should_count("1.2.3.4", "center-42", t));
        assert!(c.should_count("5.6.7.8", "center-42", t));
        assert!(!c.should_count("1.2.3.4", "center-42", t));
    }

    #[test]
    fn test_example_scenario() {
        // cooldown = 5 min = 300000 ms
        let c = counter();

        assert!(c.should_count("1.2.3.4", "center-42", Timestamp::from_millis(0)));
        assert!(!c.should_count("1.2.3.4", "center-42", Timestamp::from_millis(100_000)));
        assert!(c.should_count("1.2.3.4", "center-42", Timestamp::from_millis(300_000)));
        assert!(c.should_count("5.6.7.8", "center-42", Timestamp::from_millis(0)));
    }

    #[test]
    fn test_eviction_at_threshold() {
        let c = counter();
        let stale = DEFAULT_STALE_THRESHOLD.as_millis() as i64;
        let t0 = Timestamp::from_millis(0);

        assert!(c.should_count("1.2.3.4", "center-42", t0));

        let stats = c.evict_stale(t0.add_millis(stale));
        assert_eq!(
            stats,
            EvictionStats {
                entries_removed: 1,
                clients_removed: 1,
            }
        );
        assert_eq!(c.client_count(), 0);

        // evicted pair behaves like a first-ever view again
        assert!(c.should_count("1.2.3.4", "center-42", t0.add_millis(stale)));
    }

    #[test]
    fn test_eviction_leaves_fresh_entries() {
        let c = counter();
        let cooldown = DEFAULT_COOLDOWN.as_millis() as i64;
        let t0 = Timestamp::from_millis(0);

        assert!(c.should_count("1.2.3.4", "center-42", t0));

        let stats = c.evict_stale(t0.add_millis(1_000));
        assert_eq!(
            stats,
            EvictionStats {
                entries_removed: 0,
                clients_removed: 0,
            }
        );
        assert_eq!(c.entry_count(), 1);

        // cooldown checks behave exactly as if no sweep had run
        assert!(!c.should_count("1.2.3.4", "center-42", t0.add_millis(cooldown - 1)));
        assert!(c.should_count("1.2.3.4", "center-42", t0.add_millis(cooldown)));
    }

    #[test]
    fn test_eviction_keeps_client_with_remaining_entries() {
        let c = counter();
        let stale = DEFAULT_STALE_THRESHOLD.as_millis() as i64;
        let t0 = Timestamp::from_millis(0);

        assert!(c.should_count("1.2.3.4", "center-1", t0));
        assert!(c.should_count("1.2.3.4", "center-2", t0.add_millis(stale / 2)));

        let stats = c.evict_stale(t0.add_millis(stale));
        assert_eq!(
            stats,
            EvictionStats {
                entries_removed: 1,
                clients_removed: 0,
            }
        );
        assert_eq!(c.client_count(), 1);
        assert_eq!(c.entry_count(), 1);
    }

    #[test]
    fn test_concurrent_calls_yield_single_count() {
        let c = Arc::new(counter());
        let t = Timestamp::from_millis(1_000);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let c = c.clone();
                std::thread::spawn(move || c.should_count("1.2.3.4", "center-42", t))
            })
            .collect();

        let granted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&counted| counted)
            .count();
        assert_eq!(granted, 1);
    }

    proptest! {
        #[test]
        fn counted_iff_outside_cooldown_window(
            gaps in proptest::collection::vec(0i64..600_000, 1..40)
        ) {
            let c = counter();
            let cooldown = DEFAULT_COOLDOWN.as_millis() as i64;

            let mut now = 0i64;
            let mut last_counted: Option<i64> = None;
            for gap in gaps {
                now += gap;
                let expected = match last_counted {
                    None => true,
                    Some(last) => now - last >= cooldown,
                };
                let counted =
                    c.should_count("203.0.113.9", "center-7", Timestamp::from_millis(now));
                prop_assert_eq!(counted, expected);
                if counted {
                    last_counted = Some(now);
                }
            }
        }
    }
}
