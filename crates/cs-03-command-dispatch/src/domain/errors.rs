use thiserror::Error;

/// Dispatch failure. Nothing reaches the actuator when this is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unsupported command: {0}")]
    UnsupportedCommand(String),
}

/// Failure to hand a protocol message to the transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("no transport attached")]
    NotConnected,

    #[error("failed to encode payload: {0}")]
    Encoding(String),

    #[error("send failed: {0}")]
    Send(String),
}

/// Failure to publish a profile snapshot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileSinkError {
    #[error("no profile consumer attached")]
    NotConnected,

    #[error("profile publish failed: {0}")]
    Publish(String),
}
