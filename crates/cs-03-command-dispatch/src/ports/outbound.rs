//! # Outbound Ports (Driven Ports / SPI)

use crate::domain::errors::{ProfileSinkError, TransportError};
use async_trait::async_trait;
use shared_types::{ActuatorState, Address, CarProfile, Command, MessageType};

/// The physical actuator layer.
pub trait Actuator: Send + Sync {
    /// Fire-and-forget; completion is not reported back.
    fn exec_cmd(&self, command: Command);

    /// Latest known state.
    fn state(&self) -> ActuatorState;
}

/// Outbound side of the authenticated protocol channel.
#[async_trait]
pub trait ProtocolTransport: Send + Sync {
    /// Send `data` to `to` as a message of type `kind`.
    async fn send(&self, to: Address, data: String, kind: MessageType)
        -> Result<(), TransportError>;
}

/// Destination of periodic profile snapshots.
#[async_trait]
pub trait ProfileSink: Send + Sync {
    async fn publish(&self, profile: CarProfile) -> Result<(), ProfileSinkError>;
}
