//! Time handling for view tracking

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp representing a point in time with millisecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Milliseconds since Unix epoch
    millis: i64,
}

impl Timestamp {
    /// Create a timestamp from milliseconds since Unix epoch
    pub fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    /// Create a timestamp from seconds since Unix epoch
    pub fn from_secs(secs: i64) -> Self {
        Self {
            millis: secs * 1_000,
        }
    }

    /// Get current timestamp
    pub fn now() -> Self {
        Self {
            millis: Utc::now().timestamp_millis(),
        }
    }

    /// Get milliseconds since Unix epoch
    pub fn as_millis(&self) -> i64 {
        self.millis
    }

    /// Get seconds since Unix epoch
    pub fn as_secs(&self) -> i64 {
        self.millis / 1_000
    }

    /// Add duration in milliseconds, saturating at the numeric bounds
    pub fn add_millis(&self, millis: i64) -> Self {
        Self {
            millis: self.millis.saturating_add(millis),
        }
    }

    /// Subtract duration in milliseconds, saturating at the numeric bounds
    pub fn sub_millis(&self, millis: i64) -> Self {
        Self {
            millis: self.millis.saturating_sub(millis),
        }
    }

    /// Milliseconds elapsed since `earlier`; negative if `earlier` is in the future
    pub fn millis_since(&self, earlier: Timestamp) -> i64 {
        self.millis - earlier.millis
    }

    /// Convert to chrono DateTime
    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis).unwrap_or_else(Utc::now)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_datetime().to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            millis: dt.timestamp_millis(),
        }
    }
}
