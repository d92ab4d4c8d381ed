//! # Shared Types Crate
//!
//! Cross-subsystem types for the car node.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identities, commands and protocol messages are
//!   defined once and reused by the verification, authority and dispatch crates.
//! - **Closed Sets**: every string-keyed dispatch axis on the wire (`Command`,
//!   `MessageType`, `RequestKind`) is parsed into an enum at the edge.

pub mod entities;
pub mod errors;
pub mod protocol;

pub use entities::*;
pub use errors::*;
pub use protocol::*;
