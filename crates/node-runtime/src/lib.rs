//! # Node Runtime Library
//!
//! Wiring and lifecycle of the car node. The `car-node` binary in `main.rs`
//! only loads configuration, installs logging and waits for Ctrl-C.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, TOML file, `CS_*` environment)
//! 2. Build subsystems (`SubsystemContainer`)
//! 3. Start the command ingress and the profile publisher
//! 4. On shutdown, signal both tasks and wait for them to finish

pub mod container;

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use shared_bus::InMemoryEventBus;

pub use crate::container::{ConfigError, NodeConfig, SubsystemContainer};

/// The running car node.
pub struct NodeRuntime {
    container: Arc<SubsystemContainer>,
    tasks: Vec<JoinHandle<()>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl NodeRuntime {
    /// Create a node on a fresh in-memory bus.
    pub fn new(config: NodeConfig) -> Self {
        let bus = Arc::new(InMemoryEventBus::new());
        Self::from_container(SubsystemContainer::new(config, bus))
    }

    pub fn from_container(container: SubsystemContainer) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            container: Arc::new(container),
            tasks: Vec::new(),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Spawn the ingress loop and the profile timer.
    ///
    /// The ingress is subscribed before this returns.
    pub fn start(&mut self) {
        info!("===========================================");
        info!("  Car Node Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        if self.container.config.commands.allow_unsigned_tokens {
            warn!(
                topic = %self.container.config.commands.topic,
                "Unsigned lock/unlock tokens are ACCEPTED without authorization"
            );
        }

        let ingress = self.container.ingress();
        self.tasks.push(ingress.start(self.shutdown_rx.clone()));

        let publisher = self.container.profile_publisher();
        self.tasks
            .push(tokio::spawn(publisher.run(self.shutdown_rx.clone())));

        info!(
            topic = %self.container.config.commands.topic,
            identity = %self.container.config.node.identity,
            "Car node running"
        );
    }

    /// Signal shutdown and wait for all tasks.
    pub async fn shutdown(self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        for task in self.tasks {
            if let Err(e) = task.await {
                error!(error = %e, "Task ended abnormally");
            }
        }

        info!("Shutdown complete");
    }

    pub fn container(&self) -> Arc<SubsystemContainer> {
        Arc::clone(&self.container)
    }
}
