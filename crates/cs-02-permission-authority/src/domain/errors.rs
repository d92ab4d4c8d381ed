//! Authorization error types.

use thiserror::Error;

/// Why a command was not authorized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The authority could not be queried.
    #[error("permission authority unavailable: {0}")]
    AuthorityUnavailable(#[from] OracleError),

    /// The authority answered with a non-zero error code.
    #[error("permission query rejected with error code {error_code}")]
    QueryRejected { error_code: u64 },

    /// The signer's level is below what the command requires.
    #[error("permission level {level} below required {required}")]
    Unauthorized { level: u64, required: u64 },
}

/// Failure of the permission oracle transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("call reverted: {0}")]
    Reverted(String),
}
