//! # Shared Bus - In-Process Event Bus
//!
//! Carries everything that crosses the boundary between the broker client and
//! the command pipeline:
//!
//! ```text
//! ┌──────────────┐  TopicMessage /        ┌──────────────┐
//! │ Broker client│  ProtocolInbound       │   Ingress    │
//! │              │ ──────┐                │              │
//! └──────────────┘       │                └──────────────┘
//!        ↑               ▼                       ↑
//!        │         ┌──────────────┐              │
//!        └──────── │  Event Bus   │ ─────────────┘
//!  ProtocolOutbound└──────────────┘  subscribe()
//! ```
//!
//! The broker itself is not part of this crate; only the typed events it
//! exchanges with the node are.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{BusEvent, EventFilter, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Well-known broker topic carrying legacy car command envelopes.
pub const CAR_COMMANDS_TOPIC: &str = "carsharing/car/commands";
