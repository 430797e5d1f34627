//! Mock completion client for testing.
//!
//! Replays queued responses and records every conversation it receives, so
//! tests can drive the wizard without network access.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{ChatError, ChatResult};
use crate::llm::CompletionClient;
use crate::types::{LlmResponse, Message};

/// Predefined outcome of one `complete` call.
#[derive(Debug, Clone)]
pub enum MockReply {
    Content(String),
    Failure(String),
}

/// Mock completion client.
#[derive(Clone)]
pub struct MockCompletion {
    model: String,
    /// Replies consumed in order; an exhausted queue answers with empty text.
    replies: Arc<RwLock<VecDeque<MockReply>>>,
    /// Every conversation passed to `complete`.
    captured: Arc<RwLock<Vec<Vec<Message>>>>,
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompletion {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            replies: Arc::new(RwLock::new(VecDeque::new())),
            captured: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Queue a successful reply.
    pub fn reply(self, content: impl Into<String>) -> Self {
        self.replies.write().push_back(MockReply::Content(content.into()));
        self
    }

    /// Queue a failed call.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.replies.write().push_back(MockReply::Failure(message.into()));
        self
    }

    /// All captured conversations.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.captured.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.captured.read().len()
    }

    /// User content of the most recent call.
    pub fn last_user_content(&self) -> Option<String> {
        self.captured
            .read()
            .last()
            .and_then(|messages| messages.last())
            .map(|m| m.content.clone())
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, messages: &[Message]) -> ChatResult<LlmResponse> {
        self.captured.write().push(messages.to_vec());

        let reply = self.replies.write().pop_front();
        match reply {
            Some(MockReply::Failure(message)) => Err(ChatError::Network(message)),
            Some(MockReply::Content(content)) => Ok(LlmResponse {
                content,
                model: self.model.clone(),
                ..Default::default()
            }),
            None => Ok(LlmResponse {
                model: self.model.clone(),
                ..Default::default()
            }),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order() {
        let mock = MockCompletion::new().reply("first").fail("boom").reply("third");

        let messages = [Message::user("hi")];
        assert_eq!(mock.complete(&messages).await.unwrap().content, "first");
        assert!(mock.complete(&messages).await.is_err());
        assert_eq!(mock.complete(&messages).await.unwrap().content, "third");
        assert_eq!(mock.complete(&messages).await.unwrap().content, "");

        assert_eq!(mock.call_count(), 4);
        assert_eq!(mock.last_user_content().as_deref(), Some("hi"));
    }
}
