//! # Static Permission Oracle
//!
//! Address → decision table held in memory. Unknown subjects get level 0.
//! Supports per-subject latency and failure injection so the pipeline can be
//! exercised without a chain client.

use crate::domain::decision::PermissionDecision;
use crate::domain::errors::OracleError;
use crate::ports::outbound::PermissionOracle;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::Address;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
struct Entry {
    decision: PermissionDecision,
    latency: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct StaticPermissionOracle {
    entries: RwLock<HashMap<Address, Entry>>,
    failure: RwLock<Option<OracleError>>,
    queries: AtomicU64,
}

impl StaticPermissionOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(address, level)` pairs.
    pub fn with_levels<I>(levels: I) -> Self
    where
        I: IntoIterator<Item = (Address, u64)>,
    {
        let oracle = Self::new();
        for (address, level) in levels {
            oracle.grant(address, level);
        }
        oracle
    }

    pub fn grant(&self, subject: Address, level: u64) {
        self.set_decision(subject, PermissionDecision::granted(level));
    }

    pub fn set_decision(&self, subject: Address, decision: PermissionDecision) {
        self.entries.write().entry(subject).or_default().decision = decision;
    }

    /// Delay answers for `subject`.
    pub fn set_latency(&self, subject: Address, latency: Duration) {
        self.entries.write().entry(subject).or_default().latency = Some(latency);
    }

    /// Make every query fail with `error` until cleared with `None`.
    pub fn fail_with(&self, error: Option<OracleError>) {
        *self.failure.write() = error;
    }

    /// Number of queries answered or failed so far.
    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PermissionOracle for StaticPermissionOracle {
    async fn check_permission(
        &self,
        caller: Address,
        subject: Address,
    ) -> Result<PermissionDecision, OracleError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        let entry = self.entries.read().get(&subject).copied().unwrap_or_default();

        if let Some(latency) = entry.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(error) = self.failure.read().clone() {
            return Err(error);
        }

        debug!(
            caller = %caller,
            subject = %subject,
            level = entry.decision.level,
            "Static permission lookup"
        );
        Ok(entry.decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    #[tokio::test]
    async fn test_unknown_subject_has_level_zero() {
        let oracle = StaticPermissionOracle::new();
        let decision = oracle.check_permission(addr(1), addr(2)).await.unwrap();
        assert_eq!(decision, PermissionDecision::granted(0));
        assert_eq!(oracle.query_count(), 1);
    }

    #[tokio::test]
    async fn test_granted_level() {
        let oracle = StaticPermissionOracle::with_levels([(addr(2), 3)]);
        let decision = oracle.check_permission(addr(1), addr(2)).await.unwrap();
        assert_eq!(decision.level, 3);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let oracle = StaticPermissionOracle::with_levels([(addr(2), 1)]);
        oracle.fail_with(Some(OracleError::Transport("connection refused".into())));
        assert!(oracle.check_permission(addr(1), addr(2)).await.is_err());

        oracle.fail_with(None);
        assert!(oracle.check_permission(addr(1), addr(2)).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let oracle = StaticPermissionOracle::with_levels([(addr(2), 1)]);
        oracle.set_latency(addr(2), Duration::from_secs(5));

        let start = tokio::time::Instant::now();
        oracle.check_permission(addr(1), addr(2)).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
