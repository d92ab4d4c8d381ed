//! # Subsystem Container
//!
//! Node configuration and the container that wires the subsystems together.

pub mod config;
pub mod subsystems;

pub use config::{
    AllowlistEntry, AuthorityConfig, CommandsConfig, ConfigError, NodeConfig, NodeSection,
    ProfileConfig,
};
pub use subsystems::SubsystemContainer;
