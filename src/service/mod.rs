//! View recording service
//!
//! Boundary glue between the cooldown counter and the persistent store: a
//! countable view becomes a store increment, a view inside the cooldown
//! window becomes a silent [`ViewOutcome::Throttled`], and a store-level
//! not-found surfaces as an error distinct from the cooldown case.

use crate::core::temporal::Timestamp;
use crate::counter::ViewCounter;
use crate::error::Result;
use crate::store::ViewStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Result of recording a single view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewOutcome {
    /// The view was counted; `total` is the resource's new view count
    Counted { total: u64 },
    /// The view fell inside the cooldown window and was not counted
    Throttled,
}

/// Records views against a store, deduplicated by the cooldown counter
pub struct ViewService {
    counter: Arc<ViewCounter>,
    store: Arc<dyn ViewStore>,
}

impl ViewService {
    /// Create a service over the given counter and store
    pub fn new(counter: Arc<ViewCounter>, store: Arc<dyn ViewStore>) -> Self {
        Self { counter, store }
    }

    /// Get the underlying counter
    pub fn counter(&self) -> &ViewCounter {
        &self.counter
    }

    /// Record a view from `client_id` for `resource_id` observed at `now`.
    ///
    /// A not-found from the store is propagated without retry; the counter
    /// entry written by the cooldown check is kept as-is, so the cooldown
    /// window applies even though nothing was persisted.
    pub async fn record_view(
        &self,
        client_id: &str,
        resource_id: &str,
        now: Timestamp,
    ) -> Result<ViewOutcome> {
        if !self.counter.should_count(client_id, resource_id, now) {
            debug!(client_id, resource_id, "view within cooldown, not counted");
            return Ok(ViewOutcome::Throttled);
        }

        let total = self.store.increment_view_count(resource_id).await?;
        debug!(client_id, resource_id, total, "view counted");
        Ok(ViewOutcome::Counted { total })
    }
}
