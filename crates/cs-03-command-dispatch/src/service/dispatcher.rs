use crate::domain::errors::DispatchError;
use crate::ports::outbound::Actuator;
use shared_types::{ActuatorState, Command};
use std::sync::Arc;
use tracing::{info, warn};

/// Hands commands to the actuator. Only `lock` and `unlock` ever get there.
pub struct CommandDispatcher {
    actuator: Arc<dyn Actuator>,
}

impl CommandDispatcher {
    pub fn new(actuator: Arc<dyn Actuator>) -> Self {
        Self { actuator }
    }

    pub fn execute(&self, command: Command) {
        info!(command = %command, "Dispatching command to actuator");
        self.actuator.exec_cmd(command);
    }

    /// Parse and execute a command token.
    pub fn execute_raw(&self, raw: &str) -> Result<Command, DispatchError> {
        let command = raw.parse::<Command>().map_err(|e| {
            warn!(command = raw, "Refusing unsupported command");
            DispatchError::UnsupportedCommand(e.0)
        })?;
        self.execute(command);
        Ok(command)
    }

    pub fn state(&self) -> ActuatorState {
        self.actuator.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SimulatedActuator;

    #[test]
    fn test_execute_reaches_actuator() {
        let actuator = Arc::new(SimulatedActuator::new());
        let dispatcher = CommandDispatcher::new(actuator.clone());

        dispatcher.execute(Command::Unlock);
        assert!(!dispatcher.state().locked);
        assert_eq!(actuator.history(), vec![Command::Unlock]);
    }

    #[test]
    fn test_execute_raw() {
        let actuator = Arc::new(SimulatedActuator::new());
        let dispatcher = CommandDispatcher::new(actuator.clone());

        assert_eq!(dispatcher.execute_raw("unlock"), Ok(Command::Unlock));
        assert_eq!(dispatcher.execute_raw("lock"), Ok(Command::Lock));
        assert_eq!(actuator.history(), vec![Command::Unlock, Command::Lock]);
    }

    #[test]
    fn test_unsupported_never_reaches_actuator() {
        let actuator = Arc::new(SimulatedActuator::new());
        let dispatcher = CommandDispatcher::new(actuator.clone());

        assert_eq!(
            dispatcher.execute_raw("honk"),
            Err(DispatchError::UnsupportedCommand("honk".to_string()))
        );
        assert!(actuator.history().is_empty());
    }
}
