//! # Command Dispatch (CS-03)
//!
//! Everything between the shared bus and the actuator.
//!
//! ```text
//!                      ┌──────────────────────── CommandIngress ────────────────────────┐
//! BusEvent::TopicMessage ──→ LegacyCommandPipeline: verify → replay → authorize ──┐      │
//!                      │                                                          ↓      │
//! BusEvent::ProtocolInbound ──→ ProtocolRouter ──────────────────────────→ CommandDispatcher ──→ Actuator
//!                      │              │                                                  │
//!                      └──────────────┼──────────────────────────────────────────────────┘
//!                                     └──→ ProtocolTransport (responses)
//! ```
//!
//! Each inbound message is handled in its own task; within a message the
//! steps are strictly ordered and stop at the first rejection.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{
    BusProfileSink, BusProtocolTransport, CommandIngress, SimulatedActuator,
};
pub use domain::errors::{DispatchError, ProfileSinkError, TransportError};
pub use domain::outcome::{PipelineOutcome, PipelineRejection, RouteOutcome, RouteRejection};
pub use domain::topic::BusTopic;
pub use ports::outbound::{Actuator, ProfileSink, ProtocolTransport};
pub use service::{
    CommandDispatcher, LegacyCommandPipeline, ProfilePublisher, ProtocolRouter,
    DEFAULT_PROFILE_INTERVAL,
};
