//! # Adapters Module
//!
//! In-memory implementations of the outbound ports for development wiring
//! and tests.

pub mod identity;
pub mod static_oracle;

pub use identity::StaticIdentity;
pub use static_oracle::StaticPermissionOracle;
