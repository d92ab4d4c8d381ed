//! # Bus Events
//!
//! Defines all event types that flow through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::{CarProfile, ProtocolMessage};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BusEvent {
    // =========================================================================
    // LEGACY CHANNEL
    // =========================================================================
    /// Raw payload received on a broker topic.
    ///
    /// The topic stays a string here; the ingress classifies it.
    TopicMessage {
        /// Broker topic name.
        topic: String,
        /// Raw message bytes.
        payload: Vec<u8>,
    },

    // =========================================================================
    // AUTHENTICATED CHANNEL
    // =========================================================================
    /// A protocol message received by the authenticated-channel client.
    ProtocolInbound(ProtocolMessage),

    /// A protocol message the node wants delivered to a peer.
    ProtocolOutbound(ProtocolMessage),

    // =========================================================================
    // PROFILE
    // =========================================================================
    /// A fresh profile snapshot ready for publication.
    ProfileUpdated(CarProfile),
}

impl BusEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::TopicMessage { .. } => EventTopic::Broker,
            Self::ProtocolInbound(_) => EventTopic::ProtocolInbound,
            Self::ProtocolOutbound(_) => EventTopic::ProtocolOutbound,
            Self::ProfileUpdated(_) => EventTopic::Profile,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Raw broker topic traffic.
    Broker,
    /// Authenticated-channel messages addressed to this node.
    ProtocolInbound,
    /// Authenticated-channel messages leaving this node.
    ProtocolOutbound,
    /// Profile snapshots.
    Profile,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &BusEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
