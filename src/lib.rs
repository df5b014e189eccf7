//! View-Tally: Cooldown-deduplicated view counting
//!
//! A small service component for directory and listing applications. It
//! decides, per (client, resource) pair, whether a view should be counted
//! against the resource's persisted total, applying a cooldown window and
//! periodically evicting stale tracking entries to bound memory.
//!
//! # Core Concepts
//!
//! - **Cooldown window**: minimum time between two countable views from
//!   the same client for the same resource
//! - **Eviction sweep**: periodic removal of stale tracking entries
//! - **View store**: the source of truth for persisted view totals
//!
//! # Example
//!
//! ```no_run
//! use view_tally::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> view_tally::error::Result<()> {
//! let counter = Arc::new(ViewCounter::new(CounterConfig::default()));
//! let store = Arc::new(InMemoryViewStore::new());
//! store.register("center-42");
//!
//! let service = ViewService::new(counter, store);
//! match service.record_view("203.0.113.7", "center-42", Timestamp::now()).await? {
//!     ViewOutcome::Counted { total } => println!("counted, total {total}"),
//!     ViewOutcome::Throttled => println!("already counted recently"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod counter;
pub mod error;
pub mod service;
pub mod store;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::core::*;
    pub use crate::counter::sweeper::spawn_sweeper;
    pub use crate::counter::{CounterConfig, EvictionStats, ViewCounter};
    pub use crate::error::{Error, Result};
    pub use crate::service::{ViewOutcome, ViewService};
    pub use crate::store::{InMemoryViewStore, ViewStore};
}
