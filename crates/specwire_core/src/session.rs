//! Session state for one drafting run.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use specwire_chat::Clarification;

use crate::error::{CoreError, CoreResult};

/// Wizard stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    /// Capturing the idea or draft.
    #[default]
    Input,
    /// Answering clarifying questions.
    Questions,
    /// Reviewing, editing and sending the document.
    Draft,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Questions => write!(f, "questions"),
            Self::Draft => write!(f, "draft"),
        }
    }
}

/// Everything the wizard knows about the current run.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub stage: Stage,
    pub input: String,
    pub questions: Vec<String>,
    /// Answer text keyed by zero-based question index.
    pub answers: BTreeMap<usize, String>,
    pub document: String,
    pub department: Option<String>,
    pub submitter: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            stage: Stage::Input,
            input: String::new(),
            questions: Vec::new(),
            answers: BTreeMap::new(),
            document: String::new(),
            department: None,
            submitter: String::new(),
        }
    }

    /// Fail with `InvalidStage` unless the session is in `expected`.
    pub fn require_stage(&self, expected: Stage, operation: &str) -> CoreResult<()> {
        if self.stage != expected {
            return Err(CoreError::InvalidStage {
                current: self.stage,
                expected,
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Replace the input text.
    pub fn set_input(&mut self, text: impl Into<String>) -> CoreResult<()> {
        self.require_stage(Stage::Input, "edit the input")?;
        self.input = text.into();
        self.touch();
        Ok(())
    }

    /// Record the answer to question `index` (zero-based).
    pub fn answer(&mut self, index: usize, text: impl Into<String>) -> CoreResult<()> {
        self.require_stage(Stage::Questions, "answer a question")?;
        if index >= self.questions.len() {
            return Err(CoreError::AnswerOutOfRange {
                index,
                count: self.questions.len(),
            });
        }
        self.answers.insert(index, text.into());
        self.touch();
        Ok(())
    }

    /// input → questions with questions and answers supplied up front.
    pub fn load_clarifications(&mut self, clarifications: Vec<Clarification>) -> CoreResult<()> {
        self.require_stage(Stage::Input, "load answers")?;
        if self.input.trim().is_empty() {
            return Err(CoreError::EmptyInput);
        }

        self.questions = Vec::with_capacity(clarifications.len());
        self.answers.clear();
        for (i, clarification) in clarifications.into_iter().enumerate() {
            self.questions.push(clarification.question);
            self.answers.insert(i, clarification.answer);
        }
        self.enter(Stage::Questions);
        Ok(())
    }

    /// Step back one stage: draft → questions, questions → input.
    ///
    /// Answers and the document are kept.
    pub fn back(&mut self) -> CoreResult<Stage> {
        let previous = match self.stage {
            Stage::Draft => Stage::Questions,
            Stage::Questions => Stage::Input,
            Stage::Input => {
                return Err(CoreError::InvalidStage {
                    current: Stage::Input,
                    expected: Stage::Questions,
                    operation: "go back".to_string(),
                })
            }
        };
        self.enter(previous);
        Ok(previous)
    }

    /// Replace the document text.
    pub fn edit_document(&mut self, markdown: impl Into<String>) -> CoreResult<()> {
        self.require_stage(Stage::Draft, "edit the document")?;
        self.document = markdown.into();
        self.touch();
        Ok(())
    }

    /// Set who is submitting; allowed in any stage.
    pub fn set_submitter(&mut self, submitter: impl Into<String>) {
        self.submitter = submitter.into();
        self.touch();
    }

    /// Question/answer pairs in question order.
    pub fn clarifications(&self) -> Vec<Clarification> {
        self.questions
            .iter()
            .enumerate()
            .map(|(i, question)| {
                let answer = self.answers.get(&i).map(String::as_str).unwrap_or_default();
                Clarification::new(question.clone(), answer.trim())
            })
            .collect()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|a| !a.trim().is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_questions() -> Session {
        let mut session = Session::new();
        session.questions = vec!["Who?".to_string(), "Where?".to_string()];
        session.stage = Stage::Questions;
        session
    }

    #[test]
    fn test_new_session() {
        let session = Session::new();
        assert_eq!(session.stage, Stage::Input);
        assert!(session.questions.is_empty());
        assert_eq!(session.created_at, session.updated_at);
        assert_ne!(session.id, Session::new().id);
    }

    #[test]
    fn test_set_input_only_in_input_stage() {
        let mut session = Session::new();
        session.set_input("idea").unwrap();
        assert_eq!(session.input, "idea");

        session.stage = Stage::Draft;
        let err = session.set_input("late").unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidStage {
                current: Stage::Draft,
                expected: Stage::Input,
                ..
            }
        ));
        assert_eq!(err.to_string(), "Cannot edit the input in the draft stage (expected input)");
    }

    #[test]
    fn test_answer_range() {
        let mut session = with_questions();
        session.answer(1, "Online").unwrap();
        assert!(matches!(
            session.answer(2, "x"),
            Err(CoreError::AnswerOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_clarifications_follow_question_order() {
        let mut session = with_questions();
        session.answer(1, "  Online  ").unwrap();

        let pairs = session.clarifications();
        assert_eq!(pairs[0], Clarification::new("Who?", ""));
        assert_eq!(pairs[1], Clarification::new("Where?", "Online"));
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn test_load_clarifications() {
        let mut session = Session::new();
        assert!(matches!(
            session.load_clarifications(vec![Clarification::new("Who?", "Me")]),
            Err(CoreError::EmptyInput)
        ));

        session.set_input("idea").unwrap();
        session
            .load_clarifications(vec![Clarification::new("Who?", "Me"), Clarification::new("Why?", "")])
            .unwrap();
        assert_eq!(session.stage, Stage::Questions);
        assert_eq!(session.questions, vec!["Who?", "Why?"]);
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn test_back_transitions() {
        let mut session = with_questions();
        session.stage = Stage::Draft;
        assert_eq!(session.back().unwrap(), Stage::Questions);
        assert_eq!(session.back().unwrap(), Stage::Input);
        assert!(session.back().is_err());
        assert_eq!(session.questions.len(), 2);
    }

    #[test]
    fn test_edit_document_requires_draft() {
        let mut session = with_questions();
        assert!(session.edit_document("# Doc").is_err());
        session.stage = Stage::Draft;
        session.edit_document("# Doc").unwrap();
        assert_eq!(session.document, "# Doc");
    }

    #[test]
    fn test_submitter_any_stage() {
        let mut session = with_questions();
        session.set_submitter("Ann");
        assert_eq!(session.submitter, "Ann");
    }
}
