//! # Domain Layer
//!
//! Pure envelope parsing, signature recovery and freshness logic with no I/O
//! dependencies. This is the inner layer of the hexagonal architecture.

pub mod ecdsa;
pub mod entities;
pub mod envelope;
pub mod errors;
pub mod replay;
