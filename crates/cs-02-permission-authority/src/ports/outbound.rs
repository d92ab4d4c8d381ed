//! # Outbound Ports (Driven Ports / SPI)

use crate::domain::decision::PermissionDecision;
use crate::domain::errors::OracleError;
use async_trait::async_trait;
use shared_types::Address;

/// The external permission authority (a contract call in production).
#[async_trait]
pub trait PermissionOracle: Send + Sync {
    /// Permission of `subject` as seen from `caller`.
    async fn check_permission(
        &self,
        caller: Address,
        subject: Address,
    ) -> Result<PermissionDecision, OracleError>;
}

/// Identity of this car on the permission authority.
pub trait IdentityProvider: Send + Sync {
    fn identity(&self) -> Address;
}
