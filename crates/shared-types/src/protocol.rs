//! # Authenticated Channel Protocol
//!
//! Wire types for the typed request/response/command protocol that runs over
//! the authenticated channel.
//!
//! ```text
//! { "type": "request" | "response" | "command",
//!   "from": "0x..", "to": "0x..", "data": "<payload>" }
//! ```
//!
//! A request and its response carry no correlation token: the response is
//! addressed back to the request's `from` identity.

use crate::entities::{ActuatorState, Address, CarInfo, Command, GeoPoint};
use crate::errors::{UnknownMessageType, UnknownRequest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A message on the authenticated channel.
///
/// `message_type` stays a raw string on the wire so that messages with an
/// unknown type still decode and can be logged before being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolMessage {
    /// Raw message type.
    #[serde(rename = "type")]
    pub message_type: String,
    /// Sender identity.
    pub from: Address,
    /// Recipient identity.
    pub to: Address,
    /// Payload (request name, command token or JSON-encoded response body).
    pub data: String,
}

impl ProtocolMessage {
    /// Build a message of a known type.
    #[must_use]
    pub fn new(kind: MessageType, from: Address, to: Address, data: impl Into<String>) -> Self {
        Self {
            message_type: kind.as_str().to_string(),
            from,
            to,
            data: data.into(),
        }
    }

    /// Classify the message type.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMessageType` when the type is outside the protocol.
    pub fn kind(&self) -> Result<MessageType, UnknownMessageType> {
        self.message_type.parse()
    }
}

/// Protocol message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// Query for data; answered with one `Response`.
    Request,
    /// Answer to a `Request` or `Command`; terminal.
    Response,
    /// Actuation order; answered with one `Response` when supported.
    Command,
}

impl MessageType {
    /// Wire token for this type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Response => "response",
            Self::Command => "command",
        }
    }
}

impl FromStr for MessageType {
    type Err = UnknownMessageType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "request" => Ok(Self::Request),
            "response" => Ok(Self::Response),
            "command" => Ok(Self::Command),
            other => Err(UnknownMessageType(other.to_string())),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported `request` payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Static car information.
    GetProfile,
    /// Live location, speed and lock state.
    GetStatus,
}

impl FromStr for RequestKind {
    type Err = UnknownRequest;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "getprofile" => Ok(Self::GetProfile),
            "getstatus" => Ok(Self::GetStatus),
            other => Err(UnknownRequest(other.to_string())),
        }
    }
}

// =============================================================================
// RESPONSE BODIES
// =============================================================================

/// Body of the response to `getprofile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// Static car information.
    pub info: CarInfo,
}

/// Body of the response to `getstatus`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Last known position.
    pub loc: Option<GeoPoint>,
    /// Speed in km/h.
    pub speed: f64,
    /// Door lock state.
    pub locked: bool,
}

impl From<&ActuatorState> for StatusResponse {
    fn from(state: &ActuatorState) -> Self {
        Self {
            loc: state.location,
            speed: state.speed,
            locked: state.locked,
        }
    }
}

/// Body of the response to a supported `command`.
///
/// `result` reports that the command was accepted for execution, not that the
/// actuator confirmed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Always `None` for accepted commands; serialized as `null`.
    pub err: Option<String>,
    /// `"locked"` or `"unlocked"`.
    pub result: String,
}

impl CommandResponse {
    /// Response for an accepted command.
    #[must_use]
    pub fn accepted(command: Command) -> Self {
        Self {
            err: None,
            result: command.result_label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_field_is_named_type() {
        let msg = ProtocolMessage::new(
            MessageType::Request,
            Address::new([1; 20]),
            Address::new([2; 20]),
            "getstatus",
        );
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "request");
        assert_eq!(value["data"], "getstatus");
    }

    #[test]
    fn test_unknown_type_still_decodes() {
        let json = r#"{"type":"gossip","from":"0x0101010101010101010101010101010101010101","to":"0x0202020202020202020202020202020202020202","data":"x"}"#;
        let msg: ProtocolMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.kind(), Err(UnknownMessageType("gossip".to_string())));
    }

    #[test]
    fn test_request_kind_parse() {
        assert_eq!("getprofile".parse::<RequestKind>(), Ok(RequestKind::GetProfile));
        assert_eq!("getstatus".parse::<RequestKind>(), Ok(RequestKind::GetStatus));
        assert!("getstats".parse::<RequestKind>().is_err());
    }

    #[test]
    fn test_command_response_serializes_null_err() {
        let body = serde_json::to_string(&CommandResponse::accepted(Command::Unlock)).unwrap();
        assert_eq!(body, r#"{"err":null,"result":"unlocked"}"#);
    }
}
