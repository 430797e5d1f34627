//! Telegram Bot API sender.
//!
//! API endpoint: `https://api.telegram.org/bot<token>/sendMessage`. Text is
//! sent without a parse mode so Markdown arrives verbatim, and link previews
//! are disabled.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use specwire_config::MessagingSettings;

use crate::error::{DispatchError, DispatchResult};

/// Public Bot API root.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Timeout applied to each send.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP status and body returned for one send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendStatus {
    pub status: u16,
    pub body: String,
}

impl SendStatus {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can post one text message to a chat.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Post `text` to `chat_id`.
    ///
    /// A response with any status is `Ok`; [`DispatchError::Transport`] means
    /// the request itself failed (connection, timeout).
    async fn send_message(&self, chat_id: &str, text: &str) -> DispatchResult<SendStatus>;
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

/// Sender backed by the Telegram Bot API.
pub struct TelegramSender {
    client: reqwest::Client,
    bot_token: String,
    api_base: String,
}

impl TelegramSender {
    pub fn new(bot_token: impl Into<String>) -> DispatchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| DispatchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            bot_token: bot_token.into(),
            api_base: TELEGRAM_API_BASE.to_string(),
        })
    }

    /// Build from settings; fails when no bot token is configured.
    pub fn from_settings(settings: &MessagingSettings) -> DispatchResult<Self> {
        let sender = Self::new(settings.require_bot_token()?)?;
        match settings.api_base {
            Some(ref base) => Ok(sender.with_api_base(base.clone())),
            None => Ok(sender),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send_message(&self, chat_id: &str, text: &str) -> DispatchResult<SendStatus> {
        let body = SendMessageRequest {
            chat_id,
            text,
            disable_web_page_preview: true,
        };

        debug!(chat_id, chars = text.chars().count(), "Posting sendMessage");
        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Ok(SendStatus { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let sender = TelegramSender::new("123:abc")
            .unwrap()
            .with_api_base("http://localhost:9000/");
        assert_eq!(sender.endpoint(), "http://localhost:9000/bot123:abc/sendMessage");
    }

    #[test]
    fn test_from_settings_requires_token() {
        assert!(matches!(
            TelegramSender::from_settings(&MessagingSettings::default()),
            Err(DispatchError::Config(_))
        ));
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(SendMessageRequest {
            chat_id: "-100",
            text: "hi",
            disable_web_page_preview: true,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"chat_id": "-100", "text": "hi", "disable_web_page_preview": true})
        );
    }

    #[test]
    fn test_send_status() {
        assert!(SendStatus::new(200, "{}").is_success());
        assert!(!SendStatus::new(429, "Too Many Requests").is_success());
    }
}
