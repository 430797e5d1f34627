//! Mock message sender for testing.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{DispatchError, DispatchResult};
use crate::telegram::{MessageSender, SendStatus};

/// Mock sender that records every message and replays queued outcomes.
///
/// Once the queue is empty every send answers `200 {"ok":true}`.
#[derive(Clone, Default)]
pub struct MockSender {
    outcomes: Arc<RwLock<VecDeque<DispatchResult<SendStatus>>>>,
    captured: Arc<RwLock<Vec<(String, String)>>>,
}

impl MockSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an HTTP response.
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.outcomes.write().push_back(Ok(SendStatus::new(status, body)));
        self
    }

    /// Queue a transport failure.
    pub fn disconnect(self, message: impl Into<String>) -> Self {
        self.outcomes
            .write()
            .push_back(Err(DispatchError::Transport(message.into())));
        self
    }

    /// Captured `(chat_id, text)` pairs.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.captured.read().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.captured.read().iter().map(|(_, text)| text.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.captured.read().len()
    }

    pub fn clear(&self) {
        self.captured.write().clear();
    }
}

#[async_trait]
impl MessageSender for MockSender {
    async fn send_message(&self, chat_id: &str, text: &str) -> DispatchResult<SendStatus> {
        self.captured
            .write()
            .push((chat_id.to_string(), text.to_string()));

        let outcome = self.outcomes.write().pop_front();
        outcome.unwrap_or_else(|| Ok(SendStatus::new(200, r#"{"ok":true}"#)))
    }
}
