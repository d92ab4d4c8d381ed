//! # Subsystem Container
//!
//! Builds every subsystem from `NodeConfig` and holds the shared handles.
//!
//! ```text
//! CS-01 SignatureVerifier ─┐
//! CS-02 PermissionAuthority├──→ LegacyCommandPipeline ─┐
//! CS-03 CommandDispatcher ─┴──→ ProtocolRouter ────────┴──→ CommandIngress
//! ```
//!
//! The permission oracle, actuator and clock are in-memory adapters; a
//! deployment with a chain client or device layer swaps them through
//! [`SubsystemContainer::with_adapters`].

use std::sync::Arc;

use tracing::info;

use cs_01_signature_verification::{SignatureVerifier, SystemTimeSource, TimeSource};
use cs_02_permission_authority::{
    PermissionAuthorityClient, PermissionOracle, StaticIdentity, StaticPermissionOracle,
};
use cs_03_command_dispatch::{
    BusProfileSink, BusProtocolTransport, CommandDispatcher, CommandIngress, LegacyCommandPipeline,
    ProfilePublisher, ProtocolRouter, SimulatedActuator,
};
use shared_bus::InMemoryEventBus;

use crate::container::config::NodeConfig;

/// Central container holding all subsystem instances.
pub struct SubsystemContainer {
    pub config: NodeConfig,
    pub bus: Arc<InMemoryEventBus>,
    pub actuator: Arc<SimulatedActuator>,
    pub dispatcher: Arc<CommandDispatcher>,
    pub pipeline: Arc<LegacyCommandPipeline>,
    pub router: Arc<ProtocolRouter>,
}

impl SubsystemContainer {
    /// Wire the node with the configured allowlist oracle and the system clock.
    pub fn new(config: NodeConfig, bus: Arc<InMemoryEventBus>) -> Self {
        let oracle = StaticPermissionOracle::with_levels(
            config
                .authority
                .allowlist
                .iter()
                .map(|entry| (entry.address, entry.level)),
        );
        Self::with_adapters(config, bus, Arc::new(oracle), Arc::new(SystemTimeSource))
    }

    pub fn with_adapters(
        config: NodeConfig,
        bus: Arc<InMemoryEventBus>,
        oracle: Arc<dyn PermissionOracle>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        let actuator = Arc::new(SimulatedActuator::new());
        if let Some(location) = config.node.start_location {
            actuator.update_position(location, 0.0);
        }
        let dispatcher = Arc::new(CommandDispatcher::new(actuator.clone()));

        let verifier = Arc::new(SignatureVerifier::new(config.commands.ttl()));
        let authority = Arc::new(PermissionAuthorityClient::new(
            oracle,
            Arc::new(StaticIdentity(config.node.identity)),
            config.authority.policy,
        ));
        let pipeline = Arc::new(
            LegacyCommandPipeline::new(verifier, authority, dispatcher.clone(), clock)
                .with_unsigned_tokens(config.commands.allow_unsigned_tokens),
        );

        let transport = Arc::new(BusProtocolTransport::new(bus.clone(), config.node.identity));
        let router = Arc::new(ProtocolRouter::new(
            dispatcher.clone(),
            transport,
            config.node.identity,
            config.node.car.clone(),
        ));

        info!(
            identity = %config.node.identity,
            car = %config.node.car.id,
            ttl_secs = config.commands.ttl_secs,
            "Subsystems initialized"
        );

        Self {
            config,
            bus,
            actuator,
            dispatcher,
            pipeline,
            router,
        }
    }

    pub fn ingress(&self) -> CommandIngress {
        CommandIngress::new(
            self.bus.clone(),
            self.pipeline.clone(),
            self.router.clone(),
            self.config.commands.topic.clone(),
        )
    }

    pub fn profile_publisher(&self) -> ProfilePublisher {
        ProfilePublisher::new(
            self.config.node.car.clone(),
            self.actuator.clone(),
            Arc::new(BusProfileSink::new(self.bus.clone())),
            self.config.profile.interval(),
        )
    }
}
