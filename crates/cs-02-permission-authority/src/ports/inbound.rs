//! # Inbound Ports (Driving Ports / API)

use crate::domain::decision::PermissionDecision;
use crate::domain::errors::AuthorizationError;
use async_trait::async_trait;
use shared_types::{Address, Command};

/// Authorization of verified signers.
#[async_trait]
pub trait AuthorizationApi: Send + Sync {
    /// Query the authority for `signer` and apply the policy for `command`.
    ///
    /// `Ok` means the command may be dispatched.
    async fn authorize(
        &self,
        signer: Address,
        command: Command,
    ) -> Result<PermissionDecision, AuthorizationError>;
}
