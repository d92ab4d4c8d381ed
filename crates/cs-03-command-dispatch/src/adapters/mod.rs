//! # Adapters Module
//!
//! - `SimulatedActuator`: in-memory actuator state
//! - `BusProtocolTransport` / `BusProfileSink`: publish onto the shared bus
//! - `CommandIngress`: bus subscriber driving the pipeline and router

pub mod actuator;
pub mod bus;
pub mod ingress;

pub use actuator::SimulatedActuator;
pub use bus::{BusProfileSink, BusProtocolTransport};
pub use ingress::CommandIngress;
