use shared_bus::BusEvent;

/// Which handler a bus event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusTopic {
    /// Legacy command envelopes on the configured broker topic.
    CarCommands,
    /// Typed protocol messages addressed to this car.
    ProtocolInbound,
    /// Anything else on the bus.
    Ignored,
}

impl BusTopic {
    /// Classify `event` given the configured legacy command topic.
    pub fn of(event: &BusEvent, commands_topic: &str) -> Self {
        match event {
            BusEvent::TopicMessage { topic, .. } if topic == commands_topic => Self::CarCommands,
            BusEvent::ProtocolInbound(_) => Self::ProtocolInbound,
            _ => Self::Ignored,
        }
    }
}
