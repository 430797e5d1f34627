//! Error types for the completion client.

use thiserror::Error;

/// Result type for chat operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Completion errors
#[derive(Error, Debug)]
pub enum ChatError {
    /// The request never reached the provider
    #[error("Network error: {0}")]
    Network(String),

    /// The provider refused this parameter shape (HTTP 400/422)
    #[error("Request rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Any other non-success status
    #[error("{provider} API error {status}: {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    /// Every parameter shape was rejected
    #[error("All {attempts} parameter shapes rejected; last: {last}")]
    NegotiationExhausted { attempts: usize, last: String },

    /// The response body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
