//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `Address`
//! - **Actuation**: `Command`, `ActuatorState`, `GeoPoint`
//! - **Profile**: `CarInfo`, `CarProfile`

use crate::errors::{AddressError, UnknownCommand};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 20-byte Ethereum-style account address.
///
/// Identifies command signers, protocol peers and the local car account.
/// Rendered as lowercase `0x`-prefixed hex; parsing accepts either case with
/// or without the prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Create an address from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let bytes = hex::decode(digits).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        let array: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AddressError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// CLUSTER B: ACTUATION
// =============================================================================

/// The closed set of commands the car accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Lock the doors.
    Lock,
    /// Unlock the doors.
    Unlock,
}

impl Command {
    /// Wire token for this command.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lock => "lock",
            Self::Unlock => "unlock",
        }
    }

    /// Past-tense label reported back to protocol peers.
    #[must_use]
    pub fn result_label(&self) -> &'static str {
        match self {
            Self::Lock => "locked",
            Self::Unlock => "unlocked",
        }
    }
}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lock" => Ok(Self::Lock),
            "unlock" => Ok(Self::Unlock),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// Snapshot of the physical car as reported by the actuator layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorState {
    /// Last known position, if a fix has been received.
    pub location: Option<GeoPoint>,
    /// Speed in km/h.
    pub speed: f64,
    /// Whether the doors are locked.
    pub locked: bool,
}

impl Default for ActuatorState {
    fn default() -> Self {
        Self {
            location: None,
            speed: 0.0,
            locked: true,
        }
    }
}

// =============================================================================
// CLUSTER C: PROFILE
// =============================================================================

/// Static description of the car, served by `getprofile`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CarInfo {
    /// Fleet identifier.
    pub id: String,
    /// Make and model.
    pub model: String,
    /// Licence plate.
    pub plate: String,
    /// Owning account, when registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Address>,
}

/// Periodic profile snapshot: static info plus live state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarProfile {
    /// Static car description.
    pub info: CarInfo,
    /// Last known position.
    pub loc: Option<GeoPoint>,
    /// Speed in km/h.
    pub speed: f64,
    /// Door lock state.
    pub locked: bool,
}

impl CarProfile {
    /// Build a snapshot from the static info and the current actuator state.
    #[must_use]
    pub fn snapshot(info: &CarInfo, state: &ActuatorState) -> Self {
        Self {
            info: info.clone(),
            loc: state.location,
            speed: state.speed,
            locked: state.locked,
        }
    }
}
