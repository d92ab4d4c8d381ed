//! # Replay Window
//!
//! Freshness policy for dated envelopes: a timestamp is acceptable iff
//! `0 <= now - timestamp <= ttl`. Timestamps from the future are rejected.
//!
//! ## Known Gap
//!
//! Only the dated format carries a timestamp. Wallet-signed (ad hoc)
//! envelopes have no date and are therefore replayable for as long as the
//! signer keeps the permission. There is no nonce cache behind this window
//! either, so a dated envelope can be replayed until its TTL expires.

use super::errors::ReplayError;
use std::time::Duration;

/// Enforces a maximum message age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayGuard {
    ttl: Duration,
}

impl ReplayGuard {
    /// One hour, the reference deployment's command TTL.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

    /// Create a guard with the given TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Configured TTL.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Check `timestamp` (unix seconds) against this guard's TTL.
    ///
    /// # Errors
    ///
    /// - `ReplayError::FromFuture` - `timestamp > now`
    /// - `ReplayError::TooOld` - `now - timestamp > ttl`
    pub fn check(&self, timestamp: i64, now: i64) -> Result<(), ReplayError> {
        let Some(age) = now.checked_sub(timestamp) else {
            // Only overflows for a timestamp far in the past
            return Err(ReplayError::TooOld {
                timestamp,
                age: u64::MAX,
                ttl_secs: self.ttl.as_secs(),
            });
        };

        let Ok(age) = u64::try_from(age) else {
            return Err(ReplayError::FromFuture { timestamp, now });
        };

        if age > self.ttl.as_secs() {
            return Err(ReplayError::TooOld {
                timestamp,
                age,
                ttl_secs: self.ttl.as_secs(),
            });
        }
        Ok(())
    }

    /// Stateless form of [`ReplayGuard::check`].
    #[must_use]
    pub fn is_fresh(timestamp: i64, ttl: Duration, now: i64) -> bool {
        Self::new(ttl).check(timestamp, now).is_ok()
    }
}

impl Default for ReplayGuard {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;
    const TTL: Duration = Duration::from_secs(3600);

    #[test]
    fn test_same_instant_is_fresh() {
        assert!(ReplayGuard::is_fresh(NOW, TTL, NOW));
    }

    #[test]
    fn test_exactly_ttl_is_fresh() {
        assert!(ReplayGuard::is_fresh(NOW - 3600, TTL, NOW));
    }

    #[test]
    fn test_one_second_past_ttl_is_stale() {
        assert!(!ReplayGuard::is_fresh(NOW - 3601, TTL, NOW));
        assert_eq!(
            ReplayGuard::new(TTL).check(NOW - 3601, NOW),
            Err(ReplayError::TooOld {
                timestamp: NOW - 3601,
                age: 3601,
                ttl_secs: 3600,
            })
        );
    }

    #[test]
    fn test_future_timestamp_is_stale() {
        assert!(!ReplayGuard::is_fresh(NOW + 1, TTL, NOW));
        assert_eq!(
            ReplayGuard::new(TTL).check(NOW + 1, NOW),
            Err(ReplayError::FromFuture {
                timestamp: NOW + 1,
                now: NOW,
            })
        );
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        assert!(!ReplayGuard::is_fresh(i64::MIN, TTL, NOW));
        assert!(!ReplayGuard::is_fresh(i64::MAX, TTL, NOW));
    }

    #[test]
    fn test_zero_ttl_only_accepts_now() {
        let ttl = Duration::ZERO;
        assert!(ReplayGuard::is_fresh(NOW, ttl, NOW));
        assert!(!ReplayGuard::is_fresh(NOW - 1, ttl, NOW));
    }

    #[test]
    fn test_default_ttl_is_one_hour() {
        assert_eq!(ReplayGuard::default().ttl(), Duration::from_secs(3600));
    }
}
