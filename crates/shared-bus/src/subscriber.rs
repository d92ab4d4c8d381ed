//! # Event Subscriber
//!
//! Two ways to consume the bus: [`Subscription`] for `recv().await` loops and
//! [`EventStream`] for `Stream` combinators. Both apply their [`EventFilter`]
//! locally and skip over lag instead of failing.

use crate::events::{BusEvent, EventFilter};
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::warn;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Every sender is gone.
    #[error("Event bus closed")]
    Closed,
}

pub struct Subscription {
    receiver: broadcast::Receiver<BusEvent>,
    filter: EventFilter,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<BusEvent>, filter: EventFilter) -> Self {
        Self { receiver, filter }
    }

    /// Next matching event, or `None` once the bus is dropped.
    pub async fn recv(&mut self) -> Option<BusEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "Bus subscriber lagging, events lost");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next matching event if one is already queued.
    pub fn try_recv(&mut self) -> Result<Option<BusEvent>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                Ok(_) | Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Closed) => return Err(SubscriptionError::Closed),
            }
        }
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

/// Filtered `Stream` of bus events. Ends when the bus is dropped.
pub struct EventStream {
    inner: BroadcastStream<BusEvent>,
    filter: EventFilter,
}

impl EventStream {
    pub(crate) fn new(receiver: broadcast::Receiver<BusEvent>, filter: EventFilter) -> Self {
        Self {
            inner: BroadcastStream::new(receiver),
            filter,
        }
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Stream for EventStream {
    type Item = BusEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match ready!(Pin::new(&mut self.inner).poll_next(cx)) {
                Some(Ok(event)) if self.filter.matches(&event) => return Poll::Ready(Some(event)),
                Some(Ok(_)) => {}
                Some(Err(BroadcastStreamRecvError::Lagged(missed))) => {
                    warn!(missed, "Bus stream lagging, events lost");
                }
                None => return Poll::Ready(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventTopic;
    use crate::publisher::InMemoryEventBus;
    use crate::{EventPublisher, CAR_COMMANDS_TOPIC};
    use shared_types::{ActuatorState, Address, CarInfo, CarProfile, MessageType, ProtocolMessage};
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    fn profile() -> BusEvent {
        BusEvent::ProfileUpdated(CarProfile::snapshot(
            &CarInfo::default(),
            &ActuatorState::default(),
        ))
    }

    fn response() -> BusEvent {
        BusEvent::ProtocolOutbound(ProtocolMessage::new(
            MessageType::Response,
            Address::new([1; 20]),
            Address::new([2; 20]),
            "{}",
        ))
    }

    #[tokio::test]
    async fn test_recv_skips_filtered_events() {
        let bus = InMemoryEventBus::new();
        let mut outbound = bus.subscribe(EventFilter::topics(vec![EventTopic::ProtocolOutbound]));

        bus.publish(profile()).await;
        bus.publish(response()).await;

        let event = timeout(Duration::from_millis(100), outbound.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert!(matches!(event, BusEvent::ProtocolOutbound(_)));
        assert!(matches!(outbound.try_recv(), Ok(None)));
    }

    #[tokio::test]
    async fn test_recv_none_after_bus_dropped() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::all());
        drop(bus);

        assert!(sub.recv().await.is_none());
        assert!(matches!(sub.try_recv(), Err(SubscriptionError::Closed)));
    }

    #[tokio::test]
    async fn test_lagging_subscriber_keeps_newest() {
        let bus = InMemoryEventBus::with_capacity(2);
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Broker]));

        for payload in ["lock", "unlock", "lock"] {
            bus.publish_topic_message(CAR_COMMANDS_TOPIC, payload).await;
        }

        match sub.recv().await {
            Some(BusEvent::TopicMessage { payload, .. }) => assert_eq!(payload, b"unlock"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dropping_subscription_detaches() {
        let bus = InMemoryEventBus::new();
        let sub = bus.subscribe(EventFilter::all());
        assert_eq!(bus.subscriber_count(), 1);
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_stream_filters_and_ends() {
        let bus = InMemoryEventBus::new();
        let mut stream = bus.event_stream(EventFilter::topics(vec![EventTopic::Profile]));

        bus.publish(response()).await;
        bus.publish(profile()).await;
        drop(bus);

        let first = timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timeout");
        assert!(matches!(first, Some(BusEvent::ProfileUpdated(_))));
        assert!(stream.next().await.is_none());
    }
}
