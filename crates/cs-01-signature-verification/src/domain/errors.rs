//! # Verification Errors
//!
//! Low-level error types. The pass/fail outcome reported to callers is the
//! coarser [`VerificationReason`](super::entities::VerificationReason).

use shared_types::Address;
use thiserror::Error;

/// Errors that can occur while recovering a signer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature encoding is invalid (wrong length, not hex, scalar out of range)
    #[error("Invalid signature format")]
    InvalidFormat,

    /// Signature has high S value (EIP-2 malleability protection)
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Invalid recovery ID (v must be 0, 1, 27, or 28)
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// Failed to recover public key from signature
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// Recovered signer does not match the address claimed in the envelope
    #[error("Signer mismatch: envelope claims {claimed}, signature recovers {recovered}")]
    SignerMismatch {
        claimed: Address,
        recovered: Address,
    },
}

/// Errors that can occur while parsing a signed envelope.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The payload is not JSON.
    #[error("Envelope is not valid JSON: {0}")]
    InvalidJson(String),

    /// The payload is JSON but not an object.
    #[error("Envelope is not a JSON object")]
    NotAnObject,

    /// A required field is missing or has the wrong shape.
    #[error("Envelope field error: {0}")]
    InvalidField(String),

    /// The `date` field could not be interpreted as a point in time.
    #[error("Unparseable envelope date: {0}")]
    InvalidDate(String),
}

/// Reasons a timestamp falls outside the replay window.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReplayError {
    /// The timestamp lies in the future.
    #[error("Message timestamp {timestamp} is in the future (now: {now})")]
    FromFuture { timestamp: i64, now: i64 },

    /// The message is older than the TTL.
    #[error("Message timestamp {timestamp} is {age}s old, exceeding ttl of {ttl_secs}s")]
    TooOld {
        timestamp: i64,
        age: u64,
        ttl_secs: u64,
    },
}
