//! # Protocol Router
//!
//! ```text
//! to != this car              → dropped, logged, no response
//! request  + getprofile       → response {info}
//! request  + getstatus        → response {loc, speed, locked}
//! command  + lock | unlock    → dispatch, response {err: null, result}
//! response                    → nothing
//! anything else               → dropped, logged, no response
//! ```
//!
//! A command response means "accepted for execution"; the actuator does not
//! confirm completion.

use super::dispatcher::CommandDispatcher;
use crate::domain::errors::{DispatchError, TransportError};
use crate::domain::outcome::{RouteOutcome, RouteRejection};
use crate::ports::outbound::ProtocolTransport;
use serde::Serialize;
use shared_types::{
    Address, CarInfo, CommandResponse, MessageType, ProfileResponse, ProtocolMessage,
    RequestKind, StatusResponse,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ProtocolRouter {
    dispatcher: Arc<CommandDispatcher>,
    transport: Arc<dyn ProtocolTransport>,
    identity: Address,
    info: CarInfo,
}

impl ProtocolRouter {
    pub fn new(
        dispatcher: Arc<CommandDispatcher>,
        transport: Arc<dyn ProtocolTransport>,
        identity: Address,
        info: CarInfo,
    ) -> Self {
        Self {
            dispatcher,
            transport,
            identity,
            info,
        }
    }

    pub async fn route(&self, message: &ProtocolMessage) -> RouteOutcome {
        if message.to != self.identity {
            warn!(
                from = %message.from,
                to = %message.to,
                "Dropping message addressed to another node"
            );
            return RouteOutcome::Unsupported(RouteRejection::Misaddressed(message.to));
        }

        let kind = match message.kind() {
            Ok(kind) => kind,
            Err(e) => {
                warn!(from = %message.from, error = %e, "Dropping protocol message");
                return RouteOutcome::Unsupported(RouteRejection::UnsupportedMessageType(e.0));
            }
        };

        match kind {
            MessageType::Request => self.handle_request(message).await,
            MessageType::Command => self.handle_command(message).await,
            MessageType::Response => {
                debug!(from = %message.from, "Ignoring protocol response");
                RouteOutcome::Terminal
            }
        }
    }

    async fn handle_request(&self, message: &ProtocolMessage) -> RouteOutcome {
        let request = match message.data.parse::<RequestKind>() {
            Ok(request) => request,
            Err(e) => {
                warn!(from = %message.from, request = %message.data, "Unsupported request");
                return RouteOutcome::Unsupported(RouteRejection::UnsupportedRequest(e.0));
            }
        };

        let delivered = match request {
            RequestKind::GetProfile => {
                let response = ProfileResponse {
                    info: self.info.clone(),
                };
                self.reply(message.from, &response).await
            }
            RequestKind::GetStatus => {
                let response = StatusResponse::from(&self.dispatcher.state());
                self.reply(message.from, &response).await
            }
        };

        RouteOutcome::Responded { delivered }
    }

    async fn handle_command(&self, message: &ProtocolMessage) -> RouteOutcome {
        let command = match self.dispatcher.execute_raw(&message.data) {
            Ok(command) => command,
            Err(DispatchError::UnsupportedCommand(data)) => {
                warn!(from = %message.from, command = %data, "Unsupported protocol command");
                return RouteOutcome::Unsupported(RouteRejection::UnsupportedCommand(data));
            }
        };
        info!(from = %message.from, command = %command, "Protocol command dispatched");

        let delivered = self
            .reply(message.from, &CommandResponse::accepted(command))
            .await;
        RouteOutcome::Responded { delivered }
    }

    /// Serialize and send a response. Failures are logged, never propagated.
    async fn reply<T: Serialize>(&self, to: Address, body: &T) -> bool {
        let result = match serde_json::to_string(body) {
            Ok(data) => self.transport.send(to, data, MessageType::Response).await,
            Err(e) => Err(TransportError::Encoding(e.to_string())),
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(to = %to, error = %e, "Failed to send protocol response");
                false
            }
        }
    }
}
