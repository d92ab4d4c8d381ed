//! # Command Ingress
//!
//! Subscribes to the shared bus and feeds each message to the legacy pipeline
//! or the protocol router. Every message runs in its own task with its own
//! message id, so a slow permission query only delays its own command.

use crate::domain::topic::BusTopic;
use crate::service::{LegacyCommandPipeline, ProtocolRouter};
use shared_bus::{BusEvent, EventFilter, EventStream, EventTopic, InMemoryEventBus};
use shared_types::ProtocolMessage;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

pub struct CommandIngress {
    bus: Arc<InMemoryEventBus>,
    pipeline: Arc<LegacyCommandPipeline>,
    router: Arc<ProtocolRouter>,
    commands_topic: String,
}

impl CommandIngress {
    pub fn new(
        bus: Arc<InMemoryEventBus>,
        pipeline: Arc<LegacyCommandPipeline>,
        router: Arc<ProtocolRouter>,
        commands_topic: impl Into<String>,
    ) -> Self {
        Self {
            bus,
            pipeline,
            router,
            commands_topic: commands_topic.into(),
        }
    }

    /// Subscribe now and run the receive loop in the background.
    ///
    /// Events published after this returns are guaranteed to be seen.
    pub fn start(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let events = self.bus.event_stream(EventFilter::topics(vec![
            EventTopic::Broker,
            EventTopic::ProtocolInbound,
        ]));
        tokio::spawn(self.run(events, shutdown))
    }

    async fn run(self, mut events: EventStream, mut shutdown: watch::Receiver<bool>) {
        info!(topic = %self.commands_topic, "Command ingress started");

        loop {
            tokio::select! {
                event = events.next() => match event {
                    Some(event) => {
                        self.handle(event);
                    }
                    None => {
                        warn!("Event bus closed, command ingress stopping");
                        break;
                    }
                },
                _ = shutdown.changed() => {
                    info!("Command ingress shutting down");
                    break;
                }
            }
        }
    }

    /// Spawn a task for one bus event. Returns `None` for ignored events.
    pub fn handle(&self, event: BusEvent) -> Option<JoinHandle<()>> {
        match (BusTopic::of(&event, &self.commands_topic), event) {
            (BusTopic::CarCommands, BusEvent::TopicMessage { payload, .. }) => {
                Some(self.spawn_command(payload))
            }
            (BusTopic::ProtocolInbound, BusEvent::ProtocolInbound(message)) => {
                Some(self.spawn_protocol(message))
            }
            _ => None,
        }
    }

    fn spawn_command(&self, payload: Vec<u8>) -> JoinHandle<()> {
        let pipeline = Arc::clone(&self.pipeline);
        let span = info_span!("command", id = %Uuid::new_v4(), topic = %self.commands_topic);

        tokio::spawn(
            async move {
                let raw = match String::from_utf8(payload) {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!(error = %e, "Dropping non UTF-8 command payload");
                        return;
                    }
                };
                let outcome = pipeline.process(&raw).await;
                debug!(outcome = ?outcome, "Command processed");
            }
            .instrument(span),
        )
    }

    fn spawn_protocol(&self, message: ProtocolMessage) -> JoinHandle<()> {
        let router = Arc::clone(&self.router);
        let span = info_span!(
            "protocol",
            id = %Uuid::new_v4(),
            from = %message.from,
            kind = %message.message_type
        );

        tokio::spawn(
            async move {
                let outcome = router.route(&message).await;
                debug!(outcome = ?outcome, "Protocol message routed");
            }
            .instrument(span),
        )
    }
}
