//! Sequential chunked delivery.

use tracing::{info, warn};

use crate::chunk::chunk_message;
use crate::error::{DispatchError, DispatchResult};
use crate::telegram::MessageSender;

/// Outcome of a completed delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub chat_id: String,
    pub chunks_sent: usize,
}

/// Chunk `text` and send every chunk to `chat_id` in order.
///
/// Stops at the first chunk that fails; chunks already sent stay sent.
pub async fn deliver(
    sender: &dyn MessageSender,
    chat_id: &str,
    text: &str,
    limit: usize,
) -> DispatchResult<DeliveryReport> {
    let chunks = chunk_message(text, limit);
    let total = chunks.len();
    info!(chat_id, total, "Delivering message");

    for (i, chunk) in chunks.iter().enumerate() {
        let index = i + 1;
        let status = match sender.send_message(chat_id, chunk).await {
            Ok(status) => status,
            Err(DispatchError::Transport(message)) => {
                warn!(chunk = index, total, "Send failed: {}", message);
                return Err(DispatchError::Network {
                    chunk: index,
                    total,
                    message,
                });
            }
            Err(other) => return Err(other),
        };

        if !status.is_success() {
            warn!(chunk = index, total, status = status.status, "Chunk rejected");
            return Err(DispatchError::Rejected {
                chunk: index,
                total,
                status: status.status,
                body: status.body,
            });
        }
    }

    Ok(DeliveryReport {
        chat_id: chat_id.to_string(),
        chunks_sent: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSender;

    #[tokio::test]
    async fn test_all_chunks_sent_in_order() {
        let sender = MockSender::new();
        let text = "first paragraph\n\nsecond paragraph";
        let report = deliver(&sender, "-1", text, 20).await.unwrap();

        assert_eq!(report.chunks_sent, 2);
        assert_eq!(sender.texts(), vec!["first paragraph", "second paragraph"]);
        assert!(sender.calls().iter().all(|(chat, _)| chat == "-1"));
    }

    #[tokio::test]
    async fn test_stops_at_first_rejection() {
        let sender = MockSender::new().respond(200, "{}").respond(400, "Bad Request: chat not found");
        let text = "one one one\n\ntwo two two\n\nthree three";
        let err = deliver(&sender, "-1", text, 12).await.unwrap_err();

        match &err {
            DispatchError::Rejected { chunk, total, status, body } => {
                assert_eq!((*chunk, *total, *status), (2, 3, 400));
                assert!(body.contains("chat not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.is_partial());
        assert_eq!(sender.call_count(), 2);
    }

    #[tokio::test]
    async fn test_network_failure_on_first_chunk() {
        let sender = MockSender::new().disconnect("connection refused");
        let err = deliver(&sender, "-1", "hello", 4000).await.unwrap_err();

        assert!(matches!(err, DispatchError::Network { chunk: 1, total: 1, .. }));
        assert!(!err.is_partial());
    }

    #[tokio::test]
    async fn test_transport_error_mid_delivery_keeps_message() {
        let sender = MockSender::new().respond(200, "{}").disconnect("operation timed out");
        let err = deliver(&sender, "-1", "first\n\nsecond", 6).await.unwrap_err();

        match &err {
            DispatchError::Network { chunk, total, message } => {
                assert_eq!((*chunk, *total), (2, 2));
                assert_eq!(message, "operation timed out");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.is_partial());
    }

    struct UnconfiguredSender;

    #[async_trait::async_trait]
    impl MessageSender for UnconfiguredSender {
        async fn send_message(&self, _chat_id: &str, _text: &str) -> DispatchResult<crate::SendStatus> {
            Err(DispatchError::NoDestination)
        }
    }

    #[tokio::test]
    async fn test_other_sender_errors_pass_through() {
        let err = deliver(&UnconfiguredSender, "-1", "hello", 4000).await.unwrap_err();
        assert!(matches!(err, DispatchError::NoDestination));
    }
}
