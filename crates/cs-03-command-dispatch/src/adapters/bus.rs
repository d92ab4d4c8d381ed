//! # Bus Adapters
//!
//! Outbound ports backed by the shared event bus. The broker client picks
//! `ProtocolOutbound` and `ProfileUpdated` events up from there.
//!
//! The bus is a single broadcast channel and topic filters are applied on the
//! receiving side, so the receiver count covers every live subscription,
//! including the node's own ingress. `NotConnected` therefore means "nothing is
//! subscribed to the bus at all" (e.g. during shutdown or in a detached
//! setup), not "no broker client is listening for outbound traffic".

use crate::domain::errors::{ProfileSinkError, TransportError};
use crate::ports::outbound::{ProfileSink, ProtocolTransport};
use async_trait::async_trait;
use shared_bus::{BusEvent, EventPublisher, InMemoryEventBus};
use shared_types::{Address, CarProfile, MessageType, ProtocolMessage};
use std::sync::Arc;
use tracing::debug;

/// Sends protocol messages from this car's identity.
pub struct BusProtocolTransport {
    bus: Arc<InMemoryEventBus>,
    identity: Address,
}

impl BusProtocolTransport {
    pub fn new(bus: Arc<InMemoryEventBus>, identity: Address) -> Self {
        Self { bus, identity }
    }
}

#[async_trait]
impl ProtocolTransport for BusProtocolTransport {
    async fn send(
        &self,
        to: Address,
        data: String,
        kind: MessageType,
    ) -> Result<(), TransportError> {
        let message = ProtocolMessage::new(kind, self.identity, to, data);
        let receivers = self.bus.publish(BusEvent::ProtocolOutbound(message)).await;
        if receivers == 0 {
            return Err(TransportError::NotConnected);
        }
        debug!(to = %to, kind = %kind, receivers, "Protocol message published");
        Ok(())
    }
}

pub struct BusProfileSink {
    bus: Arc<InMemoryEventBus>,
}

impl BusProfileSink {
    pub fn new(bus: Arc<InMemoryEventBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl ProfileSink for BusProfileSink {
    async fn publish(&self, profile: CarProfile) -> Result<(), ProfileSinkError> {
        match self.bus.publish(BusEvent::ProfileUpdated(profile)).await {
            0 => Err(ProfileSinkError::NotConnected),
            _ => Ok(()),
        }
    }
}
