//! # Permission Authority Client (CS-02)
//!
//! Decides whether a verified signer may issue a command to this car by asking
//! the external permission authority and applying a local policy to the answer.
//!
//! ## Architecture
//!
//! ```text
//! LegacyCommandPipeline ──authorize(signer, cmd)──→ PermissionAuthorityClient
//!                                                        │
//!                                                        ├── IdentityProvider   (caller = this car)
//!                                                        └── PermissionOracle   (check_permission)
//! ```
//!
//! Decisions are never cached; every command triggers a fresh query.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{StaticIdentity, StaticPermissionOracle};
pub use domain::decision::PermissionDecision;
pub use domain::errors::{AuthorizationError, OracleError};
pub use domain::policy::PermissionPolicy;
pub use ports::inbound::AuthorizationApi;
pub use ports::outbound::{IdentityProvider, PermissionOracle};
pub use service::PermissionAuthorityClient;
