//! # Clock Adapters
//!
//! `SystemTimeSource` for production, `FixedTimeSource` for tests.

use crate::ports::outbound::TimeSource;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall clock backed by `SystemTime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
    }
}

/// A clock that only moves when told to.
///
/// ```rust
/// use cs_01_signature_verification::adapters::FixedTimeSource;
/// use cs_01_signature_verification::TimeSource;
///
/// let clock = FixedTimeSource::new(1_000);
/// clock.advance(5);
/// assert_eq!(clock.now(), 1_005);
/// ```
#[derive(Debug, Default)]
pub struct FixedTimeSource {
    timestamp: AtomicI64,
}

impl FixedTimeSource {
    /// Create a clock frozen at `timestamp` (unix seconds).
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp: AtomicI64::new(timestamp),
        }
    }

    /// Move the clock forward by `secs`.
    pub fn advance(&self, secs: i64) {
        self.timestamp.fetch_add(secs, Ordering::SeqCst);
    }

    /// Jump to `timestamp`.
    pub fn set(&self, timestamp: i64) {
        self.timestamp.store(timestamp, Ordering::SeqCst);
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> i64 {
        self.timestamp.load(Ordering::SeqCst)
    }
}
