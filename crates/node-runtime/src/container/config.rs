//! # Node Configuration
//!
//! Defaults, then an optional TOML file, then `CS_*` environment overrides.
//!
//! ```toml
//! [node]
//! identity = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
//! start_location = { lat = 52.52, lng = 13.405 }
//!
//! [node.car]
//! id = "car-7"
//! model = "Model 3"
//! plate = "B-CS-77"
//!
//! [commands]
//! topic = "carsharing/car/commands"
//! ttl_secs = 3600
//! allow_unsigned_tokens = false
//!
//! [authority.policy]
//! force_error_code_zero = false
//! unlock_level = 1
//!
//! [[authority.allowlist]]
//! address = "0xb0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0"
//! level = 1
//!
//! [profile]
//! interval_secs = 30
//! ```
//!
//! A broken file is fatal. A broken environment value is logged and ignored.

use cs_02_permission_authority::PermissionPolicy;
use cs_03_command_dispatch::DEFAULT_PROFILE_INTERVAL;
use serde::{Deserialize, Serialize};
use shared_bus::CAR_COMMANDS_TOPIC;
use shared_types::{Address, CarInfo, GeoPoint};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const ENV_CONFIG_PATH: &str = "CS_CONFIG";
pub const ENV_IDENTITY: &str = "CS_IDENTITY";
pub const ENV_COMMAND_TTL_SECS: &str = "CS_COMMAND_TTL_SECS";
pub const ENV_FORCE_ERROR_CODE_ZERO: &str = "CS_FORCE_ERROR_CODE_ZERO";
pub const ENV_PROFILE_INTERVAL_SECS: &str = "CS_PROFILE_INTERVAL_SECS";

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub node: NodeSection,
    pub commands: CommandsConfig,
    pub authority: AuthorityConfig,
    pub profile: ProfileConfig,
}

/// Identity and static description of this car.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSection {
    /// Account the permission authority knows this car by.
    pub identity: Address,
    pub car: CarInfo,
    /// Initial position fed to the simulated actuator.
    pub start_location: Option<GeoPoint>,
}

/// Legacy command topic settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    pub topic: String,
    /// Replay window for dated envelopes.
    pub ttl_secs: u64,
    /// Accept bare `lock`/`unlock` without signature or permission check.
    pub allow_unsigned_tokens: bool,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            topic: CAR_COMMANDS_TOPIC.to_string(),
            ttl_secs: 3600,
            allow_unsigned_tokens: true,
        }
    }
}

impl CommandsConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorityConfig {
    pub policy: PermissionPolicy,
    /// Levels served by the in-memory permission oracle.
    pub allowlist: Vec<AllowlistEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowlistEntry {
    pub address: Address,
    pub level: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub interval_secs: u64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_PROFILE_INTERVAL.as_secs(),
        }
    }
}

impl ProfileConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Configuration errors. All of them abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl NodeConfig {
    /// Load from `path` (if any), apply process environment overrides and
    /// validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::parse(&content)?;
        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `CS_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_IDENTITY) {
            match value.parse::<Address>() {
                Ok(identity) => {
                    self.node.identity = identity;
                    info!(identity = %identity, "Loaded car identity from environment");
                }
                Err(e) => warn!(error = %e, "{ENV_IDENTITY} is not a valid address, ignoring"),
            }
        }

        if let Some(value) = lookup(ENV_COMMAND_TTL_SECS) {
            match value.parse() {
                Ok(ttl) => self.commands.ttl_secs = ttl,
                Err(_) => warn!(value = %value, "{ENV_COMMAND_TTL_SECS} is not a number, ignoring"),
            }
        }

        if let Some(value) = lookup(ENV_FORCE_ERROR_CODE_ZERO) {
            match value.parse() {
                Ok(force) => self.authority.policy.force_error_code_zero = force,
                Err(_) => warn!(value = %value, "{ENV_FORCE_ERROR_CODE_ZERO} must be true or false, ignoring"),
            }
        }

        if let Some(value) = lookup(ENV_PROFILE_INTERVAL_SECS) {
            match value.parse() {
                Ok(secs) => self.profile.interval_secs = secs,
                Err(_) => warn!(value = %value, "{ENV_PROFILE_INTERVAL_SECS} is not a number, ignoring"),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.commands.topic.trim().is_empty() {
            return Err(ConfigError::Invalid("commands.topic must not be empty".into()));
        }
        if self.profile.interval_secs == 0 {
            return Err(ConfigError::Invalid("profile.interval_secs must be positive".into()));
        }
        if self.node.identity == Address::ZERO {
            warn!("Car identity is the zero address; set {ENV_IDENTITY} for real deployments");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = NodeConfig::default();
        assert_eq!(config.commands.topic, "carsharing/car/commands");
        assert_eq!(config.commands.ttl(), Duration::from_secs(3600));
        assert!(config.commands.allow_unsigned_tokens);
        assert!(!config.authority.policy.force_error_code_zero);
        assert_eq!(config.profile.interval(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_file() {
        let config = NodeConfig::parse(
            r#"
            [node]
            identity = "0xcacacacacacacacacacacacacacacacacacacaca"

            [node.car]
            id = "car-7"
            model = "Model 3"
            plate = "B-CS-77"

            [commands]
            ttl_secs = 60

            [authority.policy]
            unlock_level = 2

            [[authority.allowlist]]
            address = "0xb0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0"
            level = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.node.identity, Address([0xCA; 20]));
        assert_eq!(config.node.car.plate, "B-CS-77");
        assert_eq!(config.commands.ttl_secs, 60);
        assert_eq!(config.commands.topic, CAR_COMMANDS_TOPIC);
        assert_eq!(config.authority.policy.unlock_level, 2);
        assert_eq!(config.authority.policy.lock_level, 1);
        assert_eq!(
            config.authority.allowlist,
            vec![AllowlistEntry {
                address: Address([0xB0; 20]),
                level: 2
            }]
        );
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            NodeConfig::parse("[commands]\nttl_secs = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = NodeConfig::default();
        config.apply_env_overrides(env(&[
            (ENV_IDENTITY, "0xcacacacacacacacacacacacacacacacacacacaca"),
            (ENV_COMMAND_TTL_SECS, "120"),
            (ENV_FORCE_ERROR_CODE_ZERO, "true"),
            (ENV_PROFILE_INTERVAL_SECS, "5"),
        ]));

        assert_eq!(config.node.identity, Address([0xCA; 20]));
        assert_eq!(config.commands.ttl_secs, 120);
        assert!(config.authority.policy.force_error_code_zero);
        assert_eq!(config.profile.interval_secs, 5);
    }

    #[test]
    fn test_invalid_env_values_ignored() {
        let mut config = NodeConfig::default();
        config.apply_env_overrides(env(&[
            (ENV_IDENTITY, "not-an-address"),
            (ENV_COMMAND_TTL_SECS, "-1"),
            (ENV_FORCE_ERROR_CODE_ZERO, "yes"),
        ]));
        assert_eq!(config, NodeConfig::default());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = NodeConfig::default();
        config.profile.interval_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = NodeConfig::from_file(Path::new("/nonexistent/car-node.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("car-node.toml");
        fs::write(&path, "[profile]\ninterval_secs = 10\n").unwrap();

        let config = NodeConfig::from_file(&path).unwrap();
        assert_eq!(config.profile.interval_secs, 10);
    }
}
