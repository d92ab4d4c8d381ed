//! # Ports Layer
//!
//! Driven ports only: the actuator, the protocol transport and the profile
//! sink. The pipeline and router are called directly by the ingress.

pub mod outbound;
