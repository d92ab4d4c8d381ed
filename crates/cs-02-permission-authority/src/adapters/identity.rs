use crate::ports::outbound::IdentityProvider;
use shared_types::Address;

/// Fixed identity loaded from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticIdentity(pub Address);

impl IdentityProvider for StaticIdentity {
    fn identity(&self) -> Address {
        self.0
    }
}
