//! # Signature Verification Subsystem (CS-01)
//!
//! Verifies signed lock/unlock envelopes received on the legacy command topic.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Envelope parsing, secp256k1 recovery and
//!   the replay window; no I/O
//! - **Ports Layer** (`ports/`): Trait definitions for inbound/outbound interfaces
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//! - **Adapters** (`adapters/`): Clock implementations
//!
//! ## Security Notes
//!
//! - **Two Formats**: the presence of a `date` key selects the dated format;
//!   everything else is treated as an undated wallet signature
//! - **Replay Gap**: undated envelopes are not replay-protected
//! - **Malleability Prevention (EIP-2)**: signatures with high S values are rejected

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{FixedTimeSource, SystemTimeSource};
pub use domain::ecdsa::{
    address_from_pubkey, keccak256, personal_message_hash, recover_personal_signer,
    EcdsaSignature,
};
pub use domain::entities::{VerificationReason, VerificationResult};
pub use domain::envelope::{
    AdhocEnvelope, CommandEnvelope, DatedEnvelope, EnvelopeDate, EnvelopeFormat, SignedEnvelope,
};
pub use domain::errors::{EnvelopeError, ReplayError, SignatureError};
pub use domain::replay::ReplayGuard;
pub use ports::inbound::SignatureVerificationApi;
pub use ports::outbound::TimeSource;
pub use service::SignatureVerifier;
