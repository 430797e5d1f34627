//! Error types for the core module.

use thiserror::Error;

use crate::session::Stage;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while driving a session.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Cannot {operation} in the {current} stage (expected {expected})")]
    InvalidStage {
        current: Stage,
        expected: Stage,
        operation: String,
    },

    #[error("Input text is empty")]
    EmptyInput,

    #[error("Question {index} does not exist ({count} questions)")]
    AnswerOutOfRange { index: usize, count: usize },

    #[error("Unknown department: {0}")]
    UnknownDepartment(String),

    #[error("No document to export")]
    EmptyDocument,

    #[error("Delivery error: {0}")]
    Dispatch(#[from] specwire_dispatch::DispatchError),

    #[error("Configuration error: {0}")]
    Config(#[from] specwire_config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
