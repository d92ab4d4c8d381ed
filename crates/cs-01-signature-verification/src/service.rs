//! # Signature Verification Service
//!
//! Application service that implements the `SignatureVerificationApi` trait.
//!
//! ## Flow
//!
//! ```text
//! raw JSON ──parse──→ SignedEnvelope ─┬─ Adhoc ─→ recover(msg) ─────────────────────┐
//!    │                                 └─ Dated ─→ recover(msg|date) ─→ ReplayGuard ─┤
//!    ↓                                                                               ↓
//! Malformed                                                        command ∈ {lock, unlock}?
//! ```
//!
//! Each step short-circuits into a rejected [`VerificationResult`].

use crate::domain::ecdsa::{self, EcdsaSignature};
use crate::domain::entities::{VerificationReason, VerificationResult};
use crate::domain::envelope::{AdhocEnvelope, DatedEnvelope, EnvelopeFormat, SignedEnvelope};
use crate::domain::errors::SignatureError;
use crate::domain::replay::ReplayGuard;
use crate::ports::inbound::SignatureVerificationApi;
use shared_types::{Address, Command};
use std::time::Duration;
use tracing::{debug, warn};

/// Verifies signed command envelopes in either supported format.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureVerifier {
    replay: ReplayGuard,
}

impl SignatureVerifier {
    /// Create a verifier whose dated envelopes expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            replay: ReplayGuard::new(ttl),
        }
    }

    /// Verify a signed JSON envelope at time `now` (unix seconds).
    pub fn verify(&self, raw: &str, now: i64) -> VerificationResult {
        let envelope = match SignedEnvelope::parse(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(error = %e, "Rejecting malformed envelope");
                return VerificationResult::rejected(VerificationReason::Malformed, None);
            }
        };

        match &envelope {
            SignedEnvelope::Adhoc(adhoc) => self.verify_adhoc(adhoc),
            SignedEnvelope::Dated(dated) => self.verify_dated(dated, now),
        }
    }

    /// Undated wallet signature. Not replay-protected.
    fn verify_adhoc(&self, envelope: &AdhocEnvelope) -> VerificationResult {
        let format = EnvelopeFormat::Adhoc;

        let signer =
            match recover_claimed_signer(envelope.signed_text(), &envelope.sig, envelope.address)
            {
                Ok(signer) => signer,
                Err(e) => {
                    warn!(format = ?format, error = %e, "Envelope signature rejected");
                    return VerificationResult::rejected(VerificationReason::BadSignature, Some(format));
                }
            };

        resolve_command(signer, &envelope.msg, format)
    }

    fn verify_dated(&self, envelope: &DatedEnvelope, now: i64) -> VerificationResult {
        let format = EnvelopeFormat::Dated;

        let timestamp = match envelope.date.unix_seconds() {
            Ok(timestamp) => timestamp,
            Err(e) => {
                debug!(error = %e, "Rejecting dated envelope");
                return VerificationResult::rejected(VerificationReason::Malformed, Some(format));
            }
        };

        let signer =
            match recover_claimed_signer(&envelope.signed_text(), &envelope.sig, envelope.address)
            {
                Ok(signer) => signer,
                Err(e) => {
                    warn!(format = ?format, error = %e, "Envelope signature rejected");
                    return VerificationResult::rejected(VerificationReason::BadSignature, Some(format));
                }
            };

        if let Err(e) = self.replay.check(timestamp, now) {
            warn!(signer = %signer, error = %e, "Stale envelope rejected");
            return VerificationResult::rejected(VerificationReason::Stale, Some(format));
        }

        resolve_command(signer, &envelope.msg, format)
    }
}

impl SignatureVerificationApi for SignatureVerifier {
    fn verify_envelope(&self, raw: &str, now: i64) -> VerificationResult {
        self.verify(raw, now)
    }

    fn ttl(&self) -> Duration {
        self.replay.ttl()
    }
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Recover the signer of `text` and check it against the claimed address.
fn recover_claimed_signer(
    text: &str,
    sig_hex: &str,
    claimed: Option<Address>,
) -> Result<Address, SignatureError> {
    let signature = EcdsaSignature::from_hex(sig_hex)?;
    let recovered = ecdsa::recover_personal_signer(text, &signature)?;

    match claimed {
        Some(claimed) if claimed != recovered => Err(SignatureError::SignerMismatch {
            claimed,
            recovered,
        }),
        _ => Ok(recovered),
    }
}

fn resolve_command(signer: Address, text: &str, format: EnvelopeFormat) -> VerificationResult {
    match text.parse::<Command>() {
        Ok(cmd) => {
            debug!(signer = %signer, command = %cmd, format = ?format, "Envelope verified");
            VerificationResult::passed(signer, cmd, format)
        }
        Err(e) => {
            warn!(signer = %signer, error = %e, "Signed envelope carries unsupported command");
            VerificationResult::rejected(VerificationReason::UnsupportedCommand, Some(format))
        }
    }
}
