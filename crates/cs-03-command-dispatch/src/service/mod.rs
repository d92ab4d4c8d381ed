//! # Service Layer
//!
//! - `CommandDispatcher`: closed command set → actuator
//! - `ProtocolRouter`: authenticated request/response/command channel
//! - `LegacyCommandPipeline`: verify → replay → authorize → dispatch
//! - `ProfilePublisher`: periodic profile snapshots

mod dispatcher;
mod pipeline;
mod profile;
mod router;

pub use dispatcher::CommandDispatcher;
pub use pipeline::LegacyCommandPipeline;
pub use profile::{ProfilePublisher, DEFAULT_PROFILE_INTERVAL};
pub use router::ProtocolRouter;

#[cfg(test)]
pub(crate) mod test_support;
