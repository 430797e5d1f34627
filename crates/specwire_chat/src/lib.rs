//! # specwire_chat - completion side of specwire
//!
//! This crate talks to the language model and makes sense of what comes
//! back:
//! - Completion client for OpenAI and Anthropic, with request-parameter
//!   negotiation
//! - Fixed prompts and the document outline
//! - Clarifying-question extraction from free-form output
//! - Document model and the deterministic fallback document
//! - A mock client for tests
//!
//! ## Flow
//!
//! ```text
//! idea ──▶ questions_messages ──▶ CompletionClient ──▶ extract_questions
//!                                                         │
//! answers ─▶ document_messages ──▶ CompletionClient ──▶ finalize_document
//! ```

pub mod document;
pub mod error;
pub mod llm;
pub mod mock;
pub mod prompts;
pub mod questions;
pub mod types;

pub use document::{fallback_document, finalize_document, Document, Section, SynthesizedDocument};
pub use error::{ChatError, ChatResult};
pub use llm::{CompletionClient, LlmAdapter, ParamShape, TokenField};
pub use mock::{MockCompletion, MockReply};
pub use questions::{extract_questions, ExtractedQuestions, QuestionSource, FALLBACK_QUESTIONS, MAX_QUESTIONS};
pub use types::*;
