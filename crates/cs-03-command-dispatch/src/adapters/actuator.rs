//! In-memory actuator used when no device layer is attached.

use crate::ports::outbound::Actuator;
use parking_lot::RwLock;
use shared_types::{ActuatorState, Command, GeoPoint};
use std::collections::VecDeque;
use tracing::debug;

/// How many executed commands [`SimulatedActuator::history`] remembers.
pub const HISTORY_CAPACITY: usize = 64;

#[derive(Debug, Default)]
pub struct SimulatedActuator {
    state: RwLock<ActuatorState>,
    history: RwLock<VecDeque<Command>>,
}

impl SimulatedActuator {
    /// Start locked, stationary, without a position fix.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ActuatorState) -> Self {
        Self {
            state: RwLock::new(state),
            history: RwLock::new(VecDeque::with_capacity(HISTORY_CAPACITY)),
        }
    }

    /// Feed a position fix.
    pub fn update_position(&self, location: GeoPoint, speed: f64) {
        let mut state = self.state.write();
        state.location = Some(location);
        state.speed = speed;
    }

    /// The last [`HISTORY_CAPACITY`] executed commands, oldest first.
    pub fn history(&self) -> Vec<Command> {
        self.history.read().iter().copied().collect()
    }
}

impl Actuator for SimulatedActuator {
    fn exec_cmd(&self, command: Command) {
        self.state.write().locked = matches!(command, Command::Lock);
        let mut history = self.history.write();
        if history.len() == HISTORY_CAPACITY {
            history.pop_front();
        }
        history.push_back(command);
        drop(history);
        debug!(command = %command, "Simulated actuator executed command");
    }

    fn state(&self) -> ActuatorState {
        self.state.read().clone()
    }
}
