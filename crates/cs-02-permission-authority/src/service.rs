//! # Permission Authority Service
//!
//! Implements `AuthorizationApi` on top of the oracle and identity ports.
//! One oracle query per call, no retry, no cache.

use crate::domain::decision::PermissionDecision;
use crate::domain::errors::AuthorizationError;
use crate::domain::policy::PermissionPolicy;
use crate::ports::inbound::AuthorizationApi;
use crate::ports::outbound::{IdentityProvider, PermissionOracle};
use async_trait::async_trait;
use shared_types::{Address, Command};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct PermissionAuthorityClient {
    oracle: Arc<dyn PermissionOracle>,
    identity: Arc<dyn IdentityProvider>,
    policy: PermissionPolicy,
}

impl PermissionAuthorityClient {
    pub fn new(
        oracle: Arc<dyn PermissionOracle>,
        identity: Arc<dyn IdentityProvider>,
        policy: PermissionPolicy,
    ) -> Self {
        Self {
            oracle,
            identity,
            policy,
        }
    }

    pub fn policy(&self) -> &PermissionPolicy {
        &self.policy
    }

    pub async fn authorize(
        &self,
        signer: Address,
        command: Command,
    ) -> Result<PermissionDecision, AuthorizationError> {
        let caller = self.identity.identity();
        debug!(caller = %caller, signer = %signer, command = %command, "Querying permission authority");

        let decision = match self.oracle.check_permission(caller, signer).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(signer = %signer, command = %command, error = %e, "Permission authority unavailable");
                return Err(e.into());
            }
        };

        if self.policy.masks(&decision) {
            warn!(
                signer = %signer,
                error_code = decision.error_code,
                "Ignoring non-zero permission error code (force_error_code_zero)"
            );
        }

        match self.policy.evaluate(decision, command) {
            Ok(decision) => {
                info!(signer = %signer, command = %command, level = decision.level, "Command authorized");
                Ok(decision)
            }
            Err(e) => {
                info!(signer = %signer, command = %command, reason = %e, "Command not authorized");
                Err(e)
            }
        }
    }
}

#[async_trait]
impl AuthorizationApi for PermissionAuthorityClient {
    async fn authorize(
        &self,
        signer: Address,
        command: Command,
    ) -> Result<PermissionDecision, AuthorizationError> {
        PermissionAuthorityClient::authorize(self, signer, command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{StaticIdentity, StaticPermissionOracle};
    use crate::domain::errors::OracleError;
    use parking_lot::Mutex;

    const CAR: Address = Address([0xCA; 20]);
    const ALICE: Address = Address([0xA1; 20]);

    /// Records the caller/subject pairs it was asked about.
    #[derive(Default)]
    struct RecordingOracle {
        calls: Mutex<Vec<(Address, Address)>>,
    }

    #[async_trait]
    impl PermissionOracle for RecordingOracle {
        async fn check_permission(
            &self,
            caller: Address,
            subject: Address,
        ) -> Result<PermissionDecision, OracleError> {
            self.calls.lock().push((caller, subject));
            Ok(PermissionDecision::granted(1))
        }
    }

    fn client(oracle: Arc<dyn PermissionOracle>, policy: PermissionPolicy) -> PermissionAuthorityClient {
        PermissionAuthorityClient::new(oracle, Arc::new(StaticIdentity(CAR)), policy)
    }

    #[tokio::test]
    async fn test_queries_with_local_identity_as_caller() {
        let oracle = Arc::new(RecordingOracle::default());
        let client = client(oracle.clone(), PermissionPolicy::default());

        client.authorize(ALICE, Command::Unlock).await.unwrap();
        assert_eq!(*oracle.calls.lock(), vec![(CAR, ALICE)]);
    }

    #[tokio::test]
    async fn test_authorized_signer() {
        let oracle = Arc::new(StaticPermissionOracle::with_levels([(ALICE, 1)]));
        let client = client(oracle, PermissionPolicy::default());

        let decision = client.authorize(ALICE, Command::Lock).await.unwrap();
        assert_eq!(decision, PermissionDecision::granted(1));
    }

    #[tokio::test]
    async fn test_insufficient_level() {
        let oracle = Arc::new(StaticPermissionOracle::new());
        let client = client(oracle, PermissionPolicy::default());

        assert_eq!(
            client.authorize(ALICE, Command::Unlock).await,
            Err(AuthorizationError::Unauthorized {
                level: 0,
                required: 1
            })
        );
    }

    #[tokio::test]
    async fn test_oracle_failure_is_unavailable() {
        let oracle = Arc::new(StaticPermissionOracle::with_levels([(ALICE, 1)]));
        oracle.fail_with(Some(OracleError::Transport("timeout".into())));
        let client = client(oracle.clone(), PermissionPolicy::default());

        assert!(matches!(
            client.authorize(ALICE, Command::Unlock).await,
            Err(AuthorizationError::AuthorityUnavailable(_))
        ));
        assert_eq!(oracle.query_count(), 1);
    }

    #[tokio::test]
    async fn test_error_code_respected_by_default() {
        let oracle = Arc::new(StaticPermissionOracle::new());
        oracle.set_decision(
            ALICE,
            PermissionDecision {
                error_code: 2,
                level: 1,
            },
        );
        let strict = client(oracle.clone(), PermissionPolicy::default());
        let lenient = client(
            oracle,
            PermissionPolicy {
                force_error_code_zero: true,
                ..Default::default()
            },
        );

        assert_eq!(
            strict.authorize(ALICE, Command::Lock).await,
            Err(AuthorizationError::QueryRejected { error_code: 2 })
        );
        assert!(lenient.authorize(ALICE, Command::Lock).await.is_ok());
    }

    #[tokio::test]
    async fn test_every_call_queries_again() {
        let oracle = Arc::new(StaticPermissionOracle::with_levels([(ALICE, 1)]));
        let client = client(oracle.clone(), PermissionPolicy::default());

        client.authorize(ALICE, Command::Lock).await.unwrap();
        client.authorize(ALICE, Command::Unlock).await.unwrap();
        assert_eq!(oracle.query_count(), 2);
    }
}
