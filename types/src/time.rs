//! Timestamp type used throughout the node.
//!
//! Timestamps are signed nanoseconds since the Unix epoch (UTC). The ledger
//! compares transaction timestamps against timelocks and fallback deadlines
//! at full precision, so seconds are not enough here. The zero value doubles
//! as "unset" for optional deadlines.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// A Unix timestamp in nanoseconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The zero timestamp; treated as "not set" wherever a deadline is optional.
    pub const ZERO: Self = Self(0);

    pub fn from_unix_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub fn from_unix_secs(secs: i64) -> Self {
        Self(secs.saturating_mul(NANOS_PER_SEC))
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as i64)
            .unwrap_or(0);
        Self(nanos)
    }

    pub fn as_unix_nanos(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Whether this timestamp is strictly later than `other`.
    pub fn is_after(&self, other: Timestamp) -> bool {
        self.0 > other.0
    }

    pub fn saturating_add_secs(&self, secs: i64) -> Self {
        Self(self.0.saturating_add(secs.saturating_mul(NANOS_PER_SEC)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}
