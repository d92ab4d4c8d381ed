//! # Domain Layer
//!
//! Outcome and error types for dispatch, routing and the legacy pipeline.

pub mod errors;
pub mod outcome;
pub mod topic;
