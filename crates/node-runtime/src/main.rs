//! # Car Node
//!
//! Usage: `car-node [CONFIG_PATH]`
//!
//! The config path can also be given through `CS_CONFIG`. Log verbosity
//! follows `RUST_LOG` and defaults to `info`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use node_runtime::container::config::ENV_CONFIG_PATH;
use node_runtime::{NodeConfig, NodeRuntime};

fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(ENV_CONFIG_PATH).map(PathBuf::from))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    // Load configuration
    let path = config_path();
    let config = NodeConfig::load(path.as_deref()).context("Failed to load configuration")?;

    let mut runtime = NodeRuntime::new(config);
    runtime.start();

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    runtime.shutdown().await;
    Ok(())
}
