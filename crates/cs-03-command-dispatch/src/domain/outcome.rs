//! Per-message outcomes, returned for tests and logged by the ingress.

use shared_types::{Address, Command};
use std::fmt;

/// Result of routing one protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// A response was produced; `delivered` is false if the transport failed.
    Responded { delivered: bool },
    /// The message was dropped without a response.
    Unsupported(RouteRejection),
    /// A `response` message; nothing to do.
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteRejection {
    /// Addressed to another node on the same bus.
    Misaddressed(Address),
    UnsupportedRequest(String),
    UnsupportedCommand(String),
    UnsupportedMessageType(String),
}

impl fmt::Display for RouteRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Misaddressed(to) => write!(f, "addressed to {to}"),
            Self::UnsupportedRequest(data) => write!(f, "unsupported request: {data}"),
            Self::UnsupportedCommand(data) => write!(f, "unsupported command: {data}"),
            Self::UnsupportedMessageType(kind) => write!(f, "unsupported message type: {kind}"),
        }
    }
}

/// Result of one envelope on the legacy command topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Handed to the actuator. `signer` is `None` for bare tokens.
    Dispatched {
        command: Command,
        signer: Option<Address>,
    },
    Rejected(PipelineRejection),
}

impl PipelineOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineRejection {
    MalformedEnvelope,
    BadSignature,
    Stale,
    AuthorityUnavailable,
    Unauthorized,
    UnsupportedCommand,
    /// Bare token received while unsigned tokens are disabled.
    UnsignedDisabled,
}

impl fmt::Display for PipelineRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::MalformedEnvelope => "malformed envelope",
            Self::BadSignature => "bad signature",
            Self::Stale => "stale envelope",
            Self::AuthorityUnavailable => "permission authority unavailable",
            Self::Unauthorized => "unauthorized",
            Self::UnsupportedCommand => "unsupported command",
            Self::UnsignedDisabled => "unsigned commands disabled",
        };
        f.write_str(reason)
    }
}
