//! Error types for message delivery.

use thiserror::Error;

use specwire_config::ConfigError;

/// Result type alias for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors that can occur while routing or sending a message.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Telegram rejected chunk {chunk}/{total} with HTTP {status}: {body}")]
    Rejected {
        chunk: usize,
        total: usize,
        status: u16,
        body: String,
    },

    #[error("Network error while sending chunk {chunk}/{total}: {message}")]
    Network {
        chunk: usize,
        total: usize,
        message: String,
    },

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("No destination: select a department or configure a default chat id")]
    NoDestination,

    #[error("Unknown department: {0}")]
    UnknownDepartment(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl DispatchError {
    /// Whether any chunk was already delivered before this failure.
    pub fn is_partial(&self) -> bool {
        match self {
            Self::Rejected { chunk, .. } | Self::Network { chunk, .. } => *chunk > 1,
            _ => false,
        }
    }
}
