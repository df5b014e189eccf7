//! Persistent view-count store seam
//!
//! The store is the source of truth for view totals; the counter only
//! deduplicates. Implementations sit in front of whatever backend holds
//! the resource records.

use crate::error::{Error, Result};
use async_trait::async_trait;
use dashmap::DashMap;

/// Trait for view-count store implementations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ViewStore: Send + Sync {
    /// Increment the persisted view count for `resource_id`, returning the
    /// new total.
    ///
    /// Returns [`Error::NotFound`] when the resource is unknown (deleted
    /// or never approved).
    async fn increment_view_count(&self, resource_id: &str) -> Result<u64>;
}

/// In-memory implementation of [`ViewStore`]
///
/// Counts live in a concurrent map; increments are atomic per resource.
/// Used by tests and the CLI simulation.
pub struct InMemoryViewStore {
    counts: DashMap<String, u64>,
}

impl InMemoryViewStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            counts: DashMap::new(),
        }
    }

    /// Make `resource_id` known to the store with a zero view count
    pub fn register(&self, resource_id: &str) {
        self.counts.entry(resource_id.to_string()).or_insert(0);
    }

    /// Current view count for `resource_id`, if known
    pub fn view_count(&self, resource_id: &str) -> Option<u64> {
        self.counts.get(resource_id).map(|count| *count)
    }

    /// Remove `resource_id`; later increments report not-found
    pub fn remove(&self, resource_id: &str) {
        self.counts.remove(resource_id);
    }
}

impl Default for InMemoryViewStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ViewStore for InMemoryViewStore {
    async fn increment_view_count(&self, resource_id: &str) -> Result<u64> {
        match self.counts.get_mut(resource_id) {
            Some(mut count) => {
                *count += 1;
                Ok(*count)
            }
            None => Err(Error::NotFound(resource_id.to_string())),
        }
    }
}
