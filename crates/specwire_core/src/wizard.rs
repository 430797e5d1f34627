//! The three-stage drafting wizard.
//!
//! The wizard owns the immutable collaborators (completion client, messaging
//! settings); all mutable state lives in the [`Session`] passed to each step.
//! Completion failures never abort a step: they are reported as [`Notice`]s
//! and the step continues with fallback content.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use specwire_chat::{
    extract_questions, finalize_document,
    prompts::{document_messages, questions_messages},
    CompletionClient, Message,
};
use specwire_config::MessagingSettings;
use specwire_dispatch::{
    compose_message, deliver, resolve_destination, DeliveryReport, MessageSender,
    DEFAULT_CHUNK_LIMIT,
};

use crate::error::{CoreError, CoreResult};
use crate::session::{Session, Stage};

/// File name used when exporting the document.
pub const EXPORT_FILE_NAME: &str = "prompt_spec.md";

/// Non-fatal report produced by a wizard step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The completion call failed; its output was treated as empty.
    CompletionFailed(String),
    /// No questions could be extracted; the generic list was used.
    FallbackQuestions,
    /// The model produced no document; the local skeleton was used.
    FallbackDocument,
    /// The model's document lacks these outline sections.
    MissingSections(Vec<String>),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompletionFailed(reason) => write!(f, "Completion call failed: {}", reason),
            Self::FallbackQuestions => write!(f, "Using the generic clarifying questions"),
            Self::FallbackDocument => write!(f, "Using the local document skeleton"),
            Self::MissingSections(sections) => {
                write!(f, "Document is missing sections: {}", sections.join(", "))
            }
        }
    }
}

/// Drives a [`Session`] through input → questions → draft → send.
pub struct Wizard {
    llm: Arc<dyn CompletionClient>,
    messaging: MessagingSettings,
    chunk_limit: usize,
}

impl Wizard {
    pub fn new(llm: Arc<dyn CompletionClient>, messaging: MessagingSettings) -> Self {
        Self {
            llm,
            messaging,
            chunk_limit: DEFAULT_CHUNK_LIMIT,
        }
    }

    pub fn with_chunk_limit(mut self, limit: usize) -> Self {
        self.chunk_limit = limit;
        self
    }

    pub fn messaging(&self) -> &MessagingSettings {
        &self.messaging
    }

    /// input → questions.
    ///
    /// Replaces the question list and clears every previous answer.
    pub async fn generate_questions(&self, session: &mut Session) -> CoreResult<Vec<Notice>> {
        session.require_stage(Stage::Input, "generate questions")?;
        if session.input.trim().is_empty() {
            return Err(CoreError::EmptyInput);
        }

        let mut notices = Vec::new();
        let raw = self
            .complete(&questions_messages(&session.input), &mut notices)
            .await;

        let extracted = extract_questions(&raw);
        if extracted.is_fallback() {
            notices.push(Notice::FallbackQuestions);
        }

        session.answers = (0..extracted.questions.len())
            .map(|i| (i, String::new()))
            .collect();
        session.questions = extracted.questions;
        session.enter(Stage::Questions);

        info!(
            session = %session.id,
            questions = session.questions.len(),
            source = ?extracted.source,
            "Questions ready"
        );
        Ok(notices)
    }

    /// questions → draft.
    ///
    /// Always leaves a non-empty document in the session. The first
    /// configured department becomes the selection if none is set.
    pub async fn build_document(&self, session: &mut Session) -> CoreResult<Vec<Notice>> {
        session.require_stage(Stage::Questions, "build the document")?;

        let clarifications = session.clarifications();
        let mut notices = Vec::new();
        let raw = self
            .complete(&document_messages(&session.input, &clarifications), &mut notices)
            .await;

        let synthesized = finalize_document(&raw, &session.input, &clarifications);
        if synthesized.is_fallback {
            notices.push(Notice::FallbackDocument);
        } else if !synthesized.missing_sections.is_empty() {
            notices.push(Notice::MissingSections(
                synthesized
                    .missing_sections
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ));
        }

        session.document = synthesized.markdown;
        if session.department.is_none() {
            session.department = self
                .messaging
                .department_labels()
                .first()
                .map(|label| label.to_string());
        }
        session.enter(Stage::Draft);

        info!(
            session = %session.id,
            chars = session.document.chars().count(),
            fallback = synthesized.is_fallback,
            "Document ready"
        );
        Ok(notices)
    }

    /// Choose the destination department, or `None` for the default chat.
    pub fn select_department(&self, session: &mut Session, label: Option<&str>) -> CoreResult<()> {
        session.require_stage(Stage::Draft, "select a department")?;
        if let Some(label) = label {
            if !self.messaging.departments.contains_key(label) {
                return Err(CoreError::UnknownDepartment(label.to_string()));
            }
        }
        session.department = label.map(str::to_string);
        Ok(())
    }

    /// The full text that [`Wizard::send`] would deliver.
    pub fn final_message(&self, session: &Session) -> String {
        compose_message(
            &session.document,
            session.department.as_deref(),
            Some(&session.submitter),
        )
    }

    /// draft → input on success.
    ///
    /// On failure the session stays in draft so the send can be retried.
    pub async fn send(
        &self,
        session: &mut Session,
        sender: &dyn MessageSender,
    ) -> CoreResult<DeliveryReport> {
        session.require_stage(Stage::Draft, "send the document")?;

        let chat_id = resolve_destination(&self.messaging, session.department.as_deref())?;
        let text = self.final_message(session);

        let report = match deliver(sender, &chat_id, &text, self.chunk_limit).await {
            Ok(report) => report,
            Err(e) => {
                warn!(session = %session.id, "Send failed, staying in draft: {}", e);
                return Err(e.into());
            }
        };

        info!(
            session = %session.id,
            chunks = report.chunks_sent,
            "Document sent, starting a new session"
        );
        *session = Session::new();
        Ok(report)
    }

    /// Write the document to `dir/prompt_spec.md`.
    pub fn export(&self, session: &Session, dir: impl AsRef<Path>) -> CoreResult<PathBuf> {
        session.require_stage(Stage::Draft, "export the document")?;
        if session.document.trim().is_empty() {
            return Err(CoreError::EmptyDocument);
        }

        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(EXPORT_FILE_NAME);
        fs::write(&path, &session.document)?;

        info!(path = %path.display(), "Document exported");
        Ok(path)
    }

    async fn complete(&self, messages: &[Message], notices: &mut Vec<Notice>) -> String {
        match self.llm.complete(messages).await {
            Ok(response) => response.content,
            Err(e) => {
                warn!(model = self.llm.model(), "Completion failed: {}", e);
                notices.push(Notice::CompletionFailed(e.to_string()));
                String::new()
            }
        }
    }
}
