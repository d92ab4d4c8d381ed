//! # Adapters Module
//!
//! Infrastructure adapters implementing the ports.

pub mod clock;

pub use clock::{FixedTimeSource, SystemTimeSource};
