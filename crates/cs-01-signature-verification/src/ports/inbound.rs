//! # Inbound Ports (Driving Ports / API)

use crate::domain::entities::VerificationResult;
use std::time::Duration;

/// Signed-envelope verification API.
///
/// Implementations must be thread-safe (`Send + Sync`) and free of side
/// effects: the result depends only on the payload, the configured TTL and
/// the `now` supplied by the caller.
pub trait SignatureVerificationApi: Send + Sync {
    /// Verify a signed JSON envelope (bare tokens are handled by the caller).
    ///
    /// `now` is unix seconds and is only consulted for dated envelopes.
    fn verify_envelope(&self, raw: &str, now: i64) -> VerificationResult;

    /// Replay window applied to dated envelopes.
    fn ttl(&self) -> Duration;
}
