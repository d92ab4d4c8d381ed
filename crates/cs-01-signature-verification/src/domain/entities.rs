//! # Domain Entities
//!
//! The self-describing outcome of verifying one envelope.

use super::envelope::EnvelopeFormat;
use shared_types::{Address, Command};
use std::fmt;

/// Why an envelope passed or failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationReason {
    /// Signature recovered, command known and, for dated envelopes, fresh.
    Ok,
    /// Payload is neither a bare token nor a well-formed envelope.
    Malformed,
    /// Signature could not be recovered, or recovers the wrong signer.
    BadSignature,
    /// Dated envelope outside the replay window.
    Stale,
    /// Signed command text outside `{lock, unlock}`.
    UnsupportedCommand,
}

impl fmt::Display for VerificationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ok => "ok",
            Self::Malformed => "malformed envelope",
            Self::BadSignature => "bad signature",
            Self::Stale => "stale",
            Self::UnsupportedCommand => "unsupported command",
        };
        f.write_str(label)
    }
}

/// Result of verifying a signed envelope.
///
/// Only constructible through [`VerificationResult::passed`] and
/// [`VerificationResult::rejected`]: a passing result always carries both
/// the signer and the command, a rejected one carries neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pass: bool,
    address: Option<Address>,
    cmd: Option<Command>,
    reason: VerificationReason,
    format: Option<EnvelopeFormat>,
}

impl VerificationResult {
    /// A successful verification.
    #[must_use]
    pub fn passed(address: Address, cmd: Command, format: EnvelopeFormat) -> Self {
        Self {
            pass: true,
            address: Some(address),
            cmd: Some(cmd),
            reason: VerificationReason::Ok,
            format: Some(format),
        }
    }

    /// A failed verification. `format` is `None` when the envelope could not
    /// be parsed at all.
    #[must_use]
    pub fn rejected(reason: VerificationReason, format: Option<EnvelopeFormat>) -> Self {
        debug_assert!(reason != VerificationReason::Ok);
        Self {
            pass: false,
            address: None,
            cmd: None,
            reason,
            format,
        }
    }

    /// Whether the envelope may proceed to authorization.
    #[must_use]
    pub fn pass(&self) -> bool {
        self.pass
    }

    /// Recovered signer (passing results only).
    #[must_use]
    pub fn address(&self) -> Option<Address> {
        self.address
    }

    /// Verified command (passing results only).
    #[must_use]
    pub fn cmd(&self) -> Option<Command> {
        self.cmd
    }

    /// Outcome discriminator, `Ok` on success.
    #[must_use]
    pub fn reason(&self) -> VerificationReason {
        self.reason
    }

    /// Which signed format was detected, if parsing got that far.
    #[must_use]
    pub fn format(&self) -> Option<EnvelopeFormat> {
        self.format
    }

    /// Signer and command of a passing result.
    #[must_use]
    pub fn authorized_parts(&self) -> Option<(Address, Command)> {
        match (self.pass, self.address, self.cmd) {
            (true, Some(address), Some(cmd)) => Some((address, cmd)),
            _ => None,
        }
    }
}
