//! LLM adapter for chat completions.
//!
//! Supports OpenAI and Anthropic APIs. Models disagree on which request
//! parameters they accept (`max_tokens` vs `max_completion_tokens`, fixed
//! temperature), so each call walks a fixed list of parameter shapes and
//! returns the first accepted response.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use specwire_config::{CompletionProvider, CompletionSettings};

use crate::error::{ChatError, ChatResult};
use crate::types::{LlmResponse, Message, MessageRole};

/// Sampling temperature for every call.
pub const TEMPERATURE: f32 = 0.2;

/// Completion budget for every call.
pub const MAX_TOKENS: u32 = 2000;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Something that turns a conversation into a completion.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Complete the conversation.
    async fn complete(&self, messages: &[Message]) -> ChatResult<LlmResponse>;

    /// Model identifier used for the calls.
    fn model(&self) -> &str;
}

/// Name of the field carrying the token budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenField {
    MaxCompletionTokens,
    MaxTokens,
}

/// One combination of optional request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamShape {
    pub token_field: TokenField,
    pub temperature: bool,
}

impl ParamShape {
    const fn new(token_field: TokenField, temperature: bool) -> Self {
        Self {
            token_field,
            temperature,
        }
    }
}

/// OpenAI shapes, tried in order.
pub const OPENAI_SHAPES: &[ParamShape] = &[
    ParamShape::new(TokenField::MaxCompletionTokens, true),
    ParamShape::new(TokenField::MaxTokens, true),
    ParamShape::new(TokenField::MaxCompletionTokens, false),
    ParamShape::new(TokenField::MaxTokens, false),
];

/// Anthropic always requires `max_tokens`; only temperature varies.
pub const ANTHROPIC_SHAPES: &[ParamShape] = &[
    ParamShape::new(TokenField::MaxTokens, true),
    ParamShape::new(TokenField::MaxTokens, false),
];

/// Walk `shapes` in order until one is accepted.
///
/// Only [`ChatError::Rejected`] moves on to the next shape; any other error
/// ends the negotiation immediately.
pub async fn negotiate<F, Fut>(shapes: &[ParamShape], mut attempt: F) -> ChatResult<LlmResponse>
where
    F: FnMut(ParamShape) -> Fut,
    Fut: std::future::Future<Output = ChatResult<LlmResponse>>,
{
    let mut last_rejection = None;

    for (index, shape) in shapes.iter().enumerate() {
        debug!(attempt = index + 1, ?shape, "Trying completion parameter shape");
        match attempt(*shape).await {
            Ok(response) => {
                if index > 0 {
                    info!(?shape, "Completion accepted after {} rejected shapes", index);
                }
                return Ok(response);
            }
            Err(ChatError::Rejected { status, body }) => {
                debug!(status, "Parameter shape rejected: {}", body);
                last_rejection = Some(format!("HTTP {}: {}", status, body));
            }
            Err(other) => return Err(other),
        }
    }

    Err(ChatError::NegotiationExhausted {
        attempts: shapes.len(),
        last: last_rejection.unwrap_or_else(|| "no shapes to try".to_string()),
    })
}

/// LLM adapter that handles API calls
pub struct LlmAdapter {
    provider: CompletionProvider,
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl LlmAdapter {
    /// Create a new LLM adapter with explicit configuration
    pub fn new(provider: CompletionProvider, api_key: String, model: String) -> Self {
        let base_url = match provider {
            CompletionProvider::OpenAI => OPENAI_BASE_URL,
            CompletionProvider::Anthropic => ANTHROPIC_BASE_URL,
        };

        Self {
            provider,
            api_key,
            model,
            base_url: base_url.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create an adapter from resolved settings.
    pub fn from_settings(settings: &CompletionSettings) -> Self {
        let adapter = Self::new(
            settings.provider,
            settings.api_key.clone(),
            settings.model.clone(),
        );
        match settings.base_url {
            Some(ref url) => adapter.with_base_url(url.clone()),
            None => adapter,
        }
    }

    /// Point the adapter at another endpoint root (proxy, test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the current provider
    pub fn provider(&self) -> CompletionProvider {
        self.provider
    }

    /// Get the endpoint root
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // OpenAI chat completion, one parameter shape
    async fn complete_openai(&self, messages: &[Message], shape: ParamShape) -> ChatResult<LlmResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = OpenAIRequest::new(&self.model, messages, shape);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure("OpenAI", status.as_u16(), body));
        }

        let result: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::InvalidResponse("No choices in OpenAI response".to_string()))?
            .message
            .content
            .unwrap_or_default();

        let (input_tokens, output_tokens) = result
            .usage
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or((0, 0));

        Ok(LlmResponse {
            content: content.trim().to_string(),
            input_tokens,
            output_tokens,
            model: self.model.clone(),
        })
    }

    // Anthropic chat completion, one parameter shape
    async fn complete_anthropic(&self, messages: &[Message], shape: ParamShape) -> ChatResult<LlmResponse> {
        let url = format!("{}/messages", self.base_url);
        let request = AnthropicRequest::new(&self.model, messages, shape);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure("Anthropic", status.as_u16(), body));
        }

        let result: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

        let content = result
            .content
            .iter()
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        let (input_tokens, output_tokens) = result
            .usage
            .map(|u| (u.input_tokens, u.output_tokens))
            .unwrap_or((0, 0));

        Ok(LlmResponse {
            content: content.trim().to_string(),
            input_tokens,
            output_tokens,
            model: self.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for LlmAdapter {
    async fn complete(&self, messages: &[Message]) -> ChatResult<LlmResponse> {
        let response = match self.provider {
            CompletionProvider::OpenAI => {
                negotiate(OPENAI_SHAPES, |shape| self.complete_openai(messages, shape)).await?
            }
            CompletionProvider::Anthropic => {
                negotiate(ANTHROPIC_SHAPES, |shape| self.complete_anthropic(messages, shape)).await?
            }
        };

        debug!(
            model = %response.model,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Completion received"
        );
        Ok(response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn classify_failure(provider: &str, status: u16, body: String) -> ChatError {
    if status == 400 || status == 422 {
        ChatError::Rejected { status, body }
    } else {
        ChatError::Api {
            provider: provider.to_string(),
            status,
            body,
        }
    }
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl OpenAIRequest {
    fn new(model: &str, messages: &[Message], shape: ParamShape) -> Self {
        let (max_completion_tokens, max_tokens) = match shape.token_field {
            TokenField::MaxCompletionTokens => (Some(MAX_TOKENS), None),
            TokenField::MaxTokens => (None, Some(MAX_TOKENS)),
        };

        Self {
            model: model.to_string(),
            messages: messages
                .iter()
                .map(|m| OpenAIMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            max_completion_tokens,
            max_tokens,
            temperature: shape.temperature.then_some(TEMPERATURE),
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

// Anthropic API types
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl AnthropicRequest {
    fn new(model: &str, messages: &[Message], shape: ParamShape) -> Self {
        // Anthropic requires system message to be separate
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect();

        Self {
            model: model.to_string(),
            max_tokens: MAX_TOKENS,
            system: (!system.is_empty()).then(|| system.join("\n\n")),
            messages: messages
                .iter()
                .filter(|m| m.role != MessageRole::System)
                .map(|m| AnthropicMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            temperature: shape.temperature.then_some(TEMPERATURE),
        }
    }
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u64,
    output_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    text: Option<String>,
}
