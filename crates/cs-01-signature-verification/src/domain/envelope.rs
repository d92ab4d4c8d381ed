//! # Command Envelopes
//!
//! Classification and parsing of raw payloads received on the legacy command
//! topic.
//!
//! ```text
//! "lock" / "unlock"                           → CommandEnvelope::Bare
//! {"msg", "sig", "address"?, "version"?}      → SignedEnvelope::Adhoc
//! {"msg", "sig", "date", "address"?}          → SignedEnvelope::Dated
//! ```
//!
//! The format is selected by the presence of the `date` key alone, whatever
//! its value.

use super::errors::EnvelopeError;
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use shared_types::{Address, Command};

/// A raw payload, classified before any JSON parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEnvelope<'a> {
    /// Unsigned `lock`/`unlock` token.
    Bare(Command),
    /// Anything else; expected to be a signed JSON envelope.
    Signed(&'a str),
}

impl<'a> CommandEnvelope<'a> {
    /// Classify a raw payload. Surrounding whitespace is ignored.
    #[must_use]
    pub fn classify(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<Command>() {
            Ok(command) => Self::Bare(command),
            Err(_) => Self::Signed(trimmed),
        }
    }
}

/// Which signed-message format an envelope uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeFormat {
    /// Wallet "sign message" output without a timestamp.
    Adhoc,
    /// Signed message carrying a `date`.
    Dated,
}

/// A signed envelope in one of the two supported formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignedEnvelope {
    /// Undated wallet signature.
    Adhoc(AdhocEnvelope),
    /// Dated signature.
    Dated(DatedEnvelope),
}

impl SignedEnvelope {
    /// Parse a signed JSON envelope.
    ///
    /// # Errors
    ///
    /// Any [`EnvelopeError`] describing why the payload is not a well-formed
    /// envelope of the selected format.
    pub fn parse(raw: &str) -> Result<Self, EnvelopeError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| EnvelopeError::InvalidJson(e.to_string()))?;
        let object = value.as_object().ok_or(EnvelopeError::NotAnObject)?;

        if object.contains_key("date") {
            let dated: DatedEnvelope = serde_json::from_value(value)
                .map_err(|e| EnvelopeError::InvalidField(e.to_string()))?;
            Ok(Self::Dated(dated))
        } else {
            let adhoc: AdhocEnvelope = serde_json::from_value(value)
                .map_err(|e| EnvelopeError::InvalidField(e.to_string()))?;
            Ok(Self::Adhoc(adhoc))
        }
    }

    /// The format of this envelope.
    #[must_use]
    pub fn format(&self) -> EnvelopeFormat {
        match self {
            Self::Adhoc(_) => EnvelopeFormat::Adhoc,
            Self::Dated(_) => EnvelopeFormat::Dated,
        }
    }
}

/// Wallet-signed message: the signature covers `msg` only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdhocEnvelope {
    /// Address the sender claims to sign with.
    #[serde(default)]
    pub address: Option<Address>,
    /// The command text.
    #[serde(alias = "message")]
    pub msg: String,
    /// Hex `r || s || v` signature.
    #[serde(alias = "signature")]
    pub sig: String,
    /// Wallet format version, informational.
    #[serde(default)]
    pub version: Option<String>,
}

impl AdhocEnvelope {
    /// The exact text the signature covers.
    #[must_use]
    pub fn signed_text(&self) -> &str {
        &self.msg
    }
}

/// Dated signed message: the signature covers `msg|date`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatedEnvelope {
    /// Address the sender claims to sign with.
    #[serde(default)]
    pub address: Option<Address>,
    /// The command text.
    #[serde(alias = "message")]
    pub msg: String,
    /// Hex `r || s || v` signature.
    #[serde(alias = "signature")]
    pub sig: String,
    /// When the command was signed.
    pub date: EnvelopeDate,
}

impl DatedEnvelope {
    /// The exact text the signature covers: `msg`, a `|`, then the date as
    /// transmitted.
    #[must_use]
    pub fn signed_text(&self) -> String {
        format!("{}|{}", self.msg, self.date.as_transmitted())
    }
}

/// Integers at or above this are read as unix milliseconds. Second
/// timestamps stay below it until the year 33658; millisecond timestamps
/// have been above it since September 2001.
pub const UNIX_MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// The `date` field: a unix timestamp (seconds or milliseconds) or an
/// RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeDate {
    /// Seconds or milliseconds since the unix epoch, told apart by
    /// magnitude (see [`UNIX_MILLIS_THRESHOLD`]).
    Unix(i64),
    /// RFC 3339 timestamp, e.g. `2024-05-01T12:00:00Z`.
    Text(String),
}

impl EnvelopeDate {
    /// The date rendered exactly as it appeared on the wire.
    #[must_use]
    pub fn as_transmitted(&self) -> String {
        match self {
            Self::Unix(secs) => secs.to_string(),
            Self::Text(text) => text.clone(),
        }
    }

    /// The date as unix seconds. Millisecond integers are floored to the
    /// second they fall in.
    ///
    /// # Errors
    ///
    /// `EnvelopeError::InvalidDate` if a text date is not RFC 3339.
    pub fn unix_seconds(&self) -> Result<i64, EnvelopeError> {
        match self {
            Self::Unix(value)
                if !(-UNIX_MILLIS_THRESHOLD..UNIX_MILLIS_THRESHOLD).contains(value) =>
            {
                Ok(value.div_euclid(1000))
            }
            Self::Unix(secs) => Ok(*secs),
            Self::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.timestamp())
                .map_err(|_| EnvelopeError::InvalidDate(text.clone())),
        }
    }
}
