//! Port doubles shared by the service tests.

use crate::domain::errors::TransportError;
use crate::ports::outbound::ProtocolTransport;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{Address, MessageType};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(Address, String, MessageType)>>,
    failing: AtomicBool,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<(Address, String, MessageType)> {
        self.sent.lock().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProtocolTransport for RecordingTransport {
    async fn send(
        &self,
        to: Address,
        data: String,
        kind: MessageType,
    ) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Send("link down".to_string()));
        }
        self.sent.lock().push((to, data, kind));
        Ok(())
    }
}
