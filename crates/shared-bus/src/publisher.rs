//! # Event Publisher
//!
//! The broker client, the protocol transport and the profile sink all publish
//! through [`EventPublisher`]; [`InMemoryEventBus`] is the only implementation.

use crate::events::{BusEvent, EventFilter};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, trace};

#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish `event`. Returns how many receivers were attached; filtering
    /// happens on the receiving side, so this counts non-matching ones too.
    async fn publish(&self, event: BusEvent) -> usize;

    /// Events handed to [`publish`](Self::publish) so far, delivered or not.
    fn events_published(&self) -> u64;
}

/// Broadcast bus shared by every task of the node.
///
/// A slow receiver that falls more than `capacity` events behind loses the
/// oldest ones and logs the gap.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<BusEvent>,
    published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Receive events matching `filter` one at a time.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, "Bus subscription opened");
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// Receive events matching `filter` as a `Stream`.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        debug!(topics = ?filter.topics, "Bus stream opened");
        EventStream::new(self.sender.subscribe(), filter)
    }

    /// Publish a raw broker payload, as the broker bridge does.
    pub async fn publish_topic_message(&self, topic: &str, payload: impl Into<Vec<u8>>) -> usize {
        self.publish(BusEvent::TopicMessage {
            topic: topic.to_string(),
            payload: payload.into(),
        })
        .await
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: BusEvent) -> usize {
        let topic = event.topic();
        self.published.fetch_add(1, Ordering::Relaxed);

        // `send` only fails when nobody is listening
        let receivers = self.sender.send(event).unwrap_or(0);
        if receivers == 0 {
            debug!(topic = ?topic, "Event dropped, no receivers attached");
        } else {
            trace!(topic = ?topic, receivers, "Event published");
        }
        receivers
    }

    fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}
