//! End-to-end runs of the wizard against mock completion and mock Telegram.

use std::sync::Arc;

use specwire_chat::{prompts::OUTLINE, MockCompletion};
use specwire_config::{MessagingSettings, SecretStore};
use specwire_core::{Session, Stage, Wizard};
use specwire_dispatch::{MockSender, HEADER_TITLE};

const IDEA: &str = "Build a chatbot for refunds";

fn messaging(with_departments: bool) -> MessagingSettings {
    let departments = if with_departments {
        "[telegram.departments]\nSupport = \"-2002\"\n"
    } else {
        ""
    };
    let store = SecretStore::from_toml_str(&format!(
        "[telegram]\nbot_token = \"123:abc\"\nchat_id = -1001\n{}",
        departments
    ))
    .unwrap();
    MessagingSettings::resolve(&store)
}

/// A model document long enough to need two 4000-character messages.
fn long_document() -> String {
    let mut parts = vec!["# Refund Assistant".to_string()];
    for (heading, _) in OUTLINE.iter().skip(1) {
        parts.push(format!("## {}\n{}", heading, "Detail. ".repeat(60).trim_end()));
    }
    parts.join("\n\n")
}

async fn drafted(wizard: &Wizard, mock: &MockCompletion) -> Session {
    let mut session = Session::new();
    session.set_input(IDEA).unwrap();

    let notices = wizard.generate_questions(&mut session).await.unwrap();
    assert!(notices.is_empty());
    assert_eq!(session.stage, Stage::Questions);
    assert_eq!(session.questions, vec!["Who are the users?", "What channels?"]);
    assert!(mock.last_user_content().unwrap().contains(IDEA));

    session.answer(0, "Online shoppers").unwrap();
    session.answer(1, "Web chat and Telegram").unwrap();

    let notices = wizard.build_document(&mut session).await.unwrap();
    assert!(notices.is_empty());
    assert_eq!(session.stage, Stage::Draft);

    let prompt = mock.last_user_content().unwrap();
    assert!(prompt.contains("1. Who are the users?\nAnswer: Online shoppers"));
    assert!(prompt.contains("2. What channels?\nAnswer: Web chat and Telegram"));
    session
}

fn mock_model() -> MockCompletion {
    MockCompletion::new()
        .reply("1. Who are the users?\n2. What channels?")
        .reply(long_document())
}

#[tokio::test]
async fn test_refund_bot_to_department() {
    let mock = mock_model();
    let wizard = Wizard::new(Arc::new(mock.clone()), messaging(true));
    let mut session = drafted(&wizard, &mock).await;
    assert_eq!(session.department.as_deref(), Some("Support"));
    session.set_submitter("Ann (@ann)");

    let sender = MockSender::new();
    let report = wizard.send(&mut session, &sender).await.unwrap();

    assert_eq!(report.chunks_sent, 2);
    let calls = sender.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|(chat_id, _)| chat_id == "-2002"));
    assert!(calls[0].1.starts_with(HEADER_TITLE));
    assert!(calls[0].1.contains("Department: Support\nSubmitter: Ann (@ann)"));
    assert!(calls[1].1.contains("Readiness Checklist"));
    assert!(calls.iter().all(|(_, text)| text.chars().count() <= 4000));

    assert_eq!(session.stage, Stage::Input);
    assert!(session.input.is_empty());
    assert!(session.document.is_empty());
}

#[tokio::test]
async fn test_refund_bot_to_default_chat() {
    let mock = mock_model();
    let wizard = Wizard::new(Arc::new(mock.clone()), messaging(false));
    let mut session = drafted(&wizard, &mock).await;
    assert!(session.department.is_none());

    let sender = MockSender::new();
    wizard.send(&mut session, &sender).await.unwrap();

    let calls = sender.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|(chat_id, _)| chat_id == "-1001"));
    assert!(!calls[0].1.contains("Department:"));
}

#[tokio::test]
async fn test_retry_after_partial_failure() {
    let mock = mock_model();
    let wizard = Wizard::new(Arc::new(mock.clone()), messaging(true));
    let mut session = drafted(&wizard, &mock).await;

    let sender = MockSender::new()
        .respond(200, "{}")
        .respond(429, "Too Many Requests: retry after 3");
    let err = wizard.send(&mut session, &sender).await.unwrap_err();
    assert!(err.to_string().contains("chunk 2/2"));
    assert_eq!(session.stage, Stage::Draft);

    sender.clear();
    wizard.send(&mut session, &sender).await.unwrap();
    assert_eq!(sender.call_count(), 2);
    assert_eq!(session.stage, Stage::Input);
}

#[tokio::test]
async fn test_edits_survive_back_and_forth() {
    let mock = mock_model().reply("# Second draft");
    let wizard = Wizard::new(Arc::new(mock.clone()), messaging(true));
    let mut session = drafted(&wizard, &mock).await;

    session.edit_document("# Edited by hand").unwrap();
    assert_eq!(session.back().unwrap(), Stage::Questions);
    assert_eq!(session.clarifications()[0].answer, "Online shoppers");

    wizard.build_document(&mut session).await.unwrap();
    assert_eq!(session.document, "# Second draft");
    assert_eq!(mock.call_count(), 3);
}
