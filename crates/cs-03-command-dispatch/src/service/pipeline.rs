//! # Legacy Command Pipeline
//!
//! Handles one payload from the legacy command topic:
//!
//! ```text
//! bare token ──(allow_unsigned_tokens)──────────────────────────────→ dispatch
//! signed JSON ──→ verify (signature, replay window, command) ──→ authorize ──→ dispatch
//! ```
//!
//! Steps run strictly in order and stop at the first rejection. Bare tokens
//! skip both signature and permission checks.

use super::dispatcher::CommandDispatcher;
use crate::domain::outcome::{PipelineOutcome, PipelineRejection};
use cs_01_signature_verification::{
    CommandEnvelope, SignatureVerificationApi, TimeSource, VerificationReason,
};
use cs_02_permission_authority::{AuthorizationApi, AuthorizationError};
use std::sync::Arc;
use tracing::warn;

pub struct LegacyCommandPipeline {
    verifier: Arc<dyn SignatureVerificationApi>,
    authority: Arc<dyn AuthorizationApi>,
    dispatcher: Arc<CommandDispatcher>,
    clock: Arc<dyn TimeSource>,
    allow_unsigned_tokens: bool,
}

impl LegacyCommandPipeline {
    pub fn new(
        verifier: Arc<dyn SignatureVerificationApi>,
        authority: Arc<dyn AuthorizationApi>,
        dispatcher: Arc<CommandDispatcher>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            verifier,
            authority,
            dispatcher,
            clock,
            allow_unsigned_tokens: true,
        }
    }

    /// Enable or disable the bare `lock`/`unlock` carve-out.
    #[must_use]
    pub fn with_unsigned_tokens(mut self, allow: bool) -> Self {
        self.allow_unsigned_tokens = allow;
        self
    }

    pub fn allows_unsigned_tokens(&self) -> bool {
        self.allow_unsigned_tokens
    }

    pub async fn process(&self, raw: &str) -> PipelineOutcome {
        let text = match CommandEnvelope::classify(raw) {
            CommandEnvelope::Bare(command) => {
                if !self.allow_unsigned_tokens {
                    warn!(command = %command, "Unsigned command rejected");
                    return PipelineOutcome::Rejected(PipelineRejection::UnsignedDisabled);
                }
                warn!(command = %command, "Dispatching UNSIGNED command without authorization");
                self.dispatcher.execute(command);
                return PipelineOutcome::Dispatched {
                    command,
                    signer: None,
                };
            }
            CommandEnvelope::Signed(text) => text,
        };

        let verification = self.verifier.verify_envelope(text, self.clock.now());
        let Some((signer, command)) = verification.authorized_parts() else {
            return PipelineOutcome::Rejected(rejection_for(verification.reason()));
        };

        if let Err(e) = self.authority.authorize(signer, command).await {
            let rejection = match e {
                AuthorizationError::AuthorityUnavailable(_) => {
                    PipelineRejection::AuthorityUnavailable
                }
                AuthorizationError::QueryRejected { .. } | AuthorizationError::Unauthorized { .. } => {
                    PipelineRejection::Unauthorized
                }
            };
            return PipelineOutcome::Rejected(rejection);
        }

        self.dispatcher.execute(command);
        PipelineOutcome::Dispatched {
            command,
            signer: Some(signer),
        }
    }
}

fn rejection_for(reason: VerificationReason) -> PipelineRejection {
    match reason {
        VerificationReason::BadSignature => PipelineRejection::BadSignature,
        VerificationReason::Stale => PipelineRejection::Stale,
        VerificationReason::UnsupportedCommand => PipelineRejection::UnsupportedCommand,
        // `Ok` never comes without authorized parts
        VerificationReason::Malformed | VerificationReason::Ok => {
            PipelineRejection::MalformedEnvelope
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SimulatedActuator;
    use cs_01_signature_verification::adapters::FixedTimeSource;
    use cs_01_signature_verification::domain::ecdsa::test_helpers::{
        address_of, generate_keypair, sign_personal,
    };
    use cs_01_signature_verification::SignatureVerifier;
    use cs_02_permission_authority::{
        OracleError, PermissionAuthorityClient, PermissionPolicy, StaticIdentity,
        StaticPermissionOracle,
    };
    use k256::ecdsa::SigningKey;
    use shared_types::{Address, Command};
    use std::time::Duration;

    const NOW: i64 = 1_700_000_000;
    const CAR: Address = Address([0xCA; 20]);

    struct Harness {
        pipeline: LegacyCommandPipeline,
        oracle: Arc<StaticPermissionOracle>,
        actuator: Arc<SimulatedActuator>,
    }

    fn harness() -> Harness {
        let oracle = Arc::new(StaticPermissionOracle::new());
        let actuator = Arc::new(SimulatedActuator::new());
        let authority = PermissionAuthorityClient::new(
            oracle.clone(),
            Arc::new(StaticIdentity(CAR)),
            PermissionPolicy::default(),
        );
        let pipeline = LegacyCommandPipeline::new(
            Arc::new(SignatureVerifier::new(Duration::from_secs(3600))),
            Arc::new(authority),
            Arc::new(CommandDispatcher::new(actuator.clone())),
            Arc::new(FixedTimeSource::new(NOW)),
        );
        Harness {
            pipeline,
            oracle,
            actuator,
        }
    }

    fn dated(key: &SigningKey, msg: &str, date: i64) -> String {
        let sig = sign_personal(&format!("{msg}|{date}"), key).to_hex();
        format!(
            r#"{{"address":"{}","msg":"{msg}","date":{date},"sig":"{sig}"}}"#,
            address_of(key)
        )
    }

    fn adhoc(key: &SigningKey, msg: &str) -> String {
        let sig = sign_personal(msg, key).to_hex();
        format!(r#"{{"msg":"{msg}","sig":"{sig}"}}"#)
    }

    #[tokio::test]
    async fn test_bare_tokens_dispatch_immediately() {
        let h = harness();

        assert_eq!(
            h.pipeline.process("unlock").await,
            PipelineOutcome::Dispatched {
                command: Command::Unlock,
                signer: None
            }
        );
        assert!(h.pipeline.process(" lock\n").await.is_dispatched());
        assert_eq!(h.actuator.history(), vec![Command::Unlock, Command::Lock]);
        assert_eq!(h.oracle.query_count(), 0);
    }

    #[tokio::test]
    async fn test_bare_tokens_can_be_disabled() {
        let h = harness();
        let pipeline = h.pipeline.with_unsigned_tokens(false);

        assert_eq!(
            pipeline.process("unlock").await,
            PipelineOutcome::Rejected(PipelineRejection::UnsignedDisabled)
        );
        assert!(h.actuator.history().is_empty());
    }

    #[tokio::test]
    async fn test_authorized_dated_envelope_dispatches() {
        let h = harness();
        let (key, _) = generate_keypair();
        h.oracle.grant(address_of(&key), 1);

        let outcome = h.pipeline.process(&dated(&key, "unlock", NOW - 10)).await;
        assert_eq!(
            outcome,
            PipelineOutcome::Dispatched {
                command: Command::Unlock,
                signer: Some(address_of(&key))
            }
        );
        assert_eq!(h.actuator.history(), vec![Command::Unlock]);
    }

    #[tokio::test]
    async fn test_authorized_adhoc_envelope_dispatches() {
        let h = harness();
        let (key, _) = generate_keypair();
        h.oracle.grant(address_of(&key), 2);

        assert!(h.pipeline.process(&adhoc(&key, "lock")).await.is_dispatched());
        assert_eq!(h.actuator.history(), vec![Command::Lock]);
    }

    #[tokio::test]
    async fn test_stale_never_reaches_authority_or_dispatcher() {
        let h = harness();
        let (key, _) = generate_keypair();
        h.oracle.grant(address_of(&key), 1);

        let outcome = h.pipeline.process(&dated(&key, "unlock", NOW - 3601)).await;
        assert_eq!(outcome, PipelineOutcome::Rejected(PipelineRejection::Stale));
        assert_eq!(h.oracle.query_count(), 0);
        assert!(h.actuator.history().is_empty());
    }

    #[tokio::test]
    async fn test_insufficient_level_does_not_dispatch() {
        let h = harness();
        let (key, _) = generate_keypair();

        let outcome = h.pipeline.process(&dated(&key, "unlock", NOW)).await;
        assert_eq!(
            outcome,
            PipelineOutcome::Rejected(PipelineRejection::Unauthorized)
        );
        assert_eq!(h.oracle.query_count(), 1);
        assert!(h.actuator.history().is_empty());
    }

    #[tokio::test]
    async fn test_authority_failure_does_not_dispatch() {
        let h = harness();
        let (key, _) = generate_keypair();
        h.oracle.grant(address_of(&key), 1);
        h.oracle
            .fail_with(Some(OracleError::Transport("rpc down".to_string())));

        let outcome = h.pipeline.process(&adhoc(&key, "unlock")).await;
        assert_eq!(
            outcome,
            PipelineOutcome::Rejected(PipelineRejection::AuthorityUnavailable)
        );
        assert!(h.actuator.history().is_empty());
    }

    #[tokio::test]
    async fn test_bad_signature_never_reaches_authority() {
        let h = harness();
        let (key, _) = generate_keypair();
        let (other, _) = generate_keypair();
        let sig = sign_personal("unlock", &key).to_hex();
        let raw = format!(
            r#"{{"address":"{}","msg":"unlock","sig":"{sig}"}}"#,
            address_of(&other)
        );

        assert_eq!(
            h.pipeline.process(&raw).await,
            PipelineOutcome::Rejected(PipelineRejection::BadSignature)
        );
        assert_eq!(h.oracle.query_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let h = harness();
        assert_eq!(
            h.pipeline.process("open sesame").await,
            PipelineOutcome::Rejected(PipelineRejection::MalformedEnvelope)
        );
    }

    #[tokio::test]
    async fn test_signed_unsupported_command() {
        let h = harness();
        let (key, _) = generate_keypair();
        h.oracle.grant(address_of(&key), 1);

        assert_eq!(
            h.pipeline.process(&adhoc(&key, "honk")).await,
            PipelineOutcome::Rejected(PipelineRejection::UnsupportedCommand)
        );
        assert_eq!(h.oracle.query_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_signers_with_different_latencies() {
        let h = harness();
        let (slow, _) = generate_keypair();
        let (fast, _) = generate_keypair();
        h.oracle.grant(address_of(&slow), 1);
        h.oracle.grant(address_of(&fast), 1);
        h.oracle.set_latency(address_of(&slow), Duration::from_secs(5));
        h.oracle.set_latency(address_of(&fast), Duration::from_millis(10));

        let slow_envelope = dated(&slow, "lock", NOW);
        let fast_envelope = dated(&fast, "unlock", NOW);
        let (slow_outcome, fast_outcome) = tokio::join!(
            h.pipeline.process(&slow_envelope),
            h.pipeline.process(&fast_envelope)
        );

        assert!(slow_outcome.is_dispatched());
        assert!(fast_outcome.is_dispatched());
        // The fast signer is not held up by the slow query
        assert_eq!(h.actuator.history(), vec![Command::Unlock, Command::Lock]);
    }
}
