//! # Domain Layer
//!
//! Permission decisions and the policy that turns them into an authorization.

pub mod decision;
pub mod errors;
pub mod policy;
