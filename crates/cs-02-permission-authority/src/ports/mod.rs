//! # Ports Layer
//!
//! - **Inbound (Driving)**: `AuthorizationApi` called by the command pipeline
//! - **Outbound (Driven)**: the permission oracle and the local identity

pub mod inbound;
pub mod outbound;
