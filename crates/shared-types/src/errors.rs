//! # Error Types
//!
//! Parse errors for the wire-level types defined in this crate.

use thiserror::Error;

/// Errors produced when decoding an [`Address`](crate::Address) from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The text is not valid hexadecimal.
    #[error("Invalid address encoding: {0}")]
    InvalidHex(String),

    /// The decoded value is not 20 bytes long.
    #[error("Invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
}

/// A command token outside the supported `{lock, unlock}` set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unsupported command: {0}")]
pub struct UnknownCommand(pub String);

/// A protocol message `type` outside `{request, response, command}`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unsupported message type: {0}")]
pub struct UnknownMessageType(pub String);

/// A protocol `request` payload outside `{getprofile, getstatus}`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unsupported request: {0}")]
pub struct UnknownRequest(pub String);
