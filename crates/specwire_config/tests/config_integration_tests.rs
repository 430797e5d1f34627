//! Integration tests for secrets loading and settings resolution.

use std::fs;
use tempfile::tempdir;

use specwire_config::{aliases, ConfigError, SecretStore, Settings};

const SECRETS: &str = r#"
OPENAI_API_KEY = "sk-live"

[Telegram]
Telegram_Bot_Token = "42:secret"
Default_Chat_ID = -1009

[Telegram.departments]
Marketing = "-1001"
Support = "-1002"
"#;

#[test]
fn test_load_file_and_resolve_settings() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("secrets.toml");
    fs::write(&path, SECRETS).unwrap();

    let store = SecretStore::load(&path).unwrap();
    let settings = Settings::resolve(&store).unwrap();

    assert_eq!(settings.completion.api_key, "sk-live");
    assert_eq!(settings.completion.model, "gpt-4o-mini");
    assert_eq!(settings.messaging.bot_token.as_deref(), Some("42:secret"));
    assert_eq!(settings.messaging.default_chat_id.as_deref(), Some("-1009"));
    assert_eq!(
        settings.messaging.department_labels(),
        vec!["Marketing", "Support"]
    );
}

/// A value defined only in the nested scope, under an alternate name,
/// with different case, is still found.
#[test]
fn test_nested_alternate_case_insensitive() {
    let store = SecretStore::from_toml_str(
        r#"
        [TeleGram]
        TELEGRAM_chat_ID = "-55"
        "#,
    )
    .unwrap();

    assert_eq!(store.resolve(aliases::DEFAULT_CHAT).as_deref(), Some("-55"));
}

#[test]
fn test_missing_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("absent.toml");

    assert!(matches!(SecretStore::load(&path), Err(ConfigError::NotFound(_))));

    let empty = SecretStore::load_or_empty(&path).unwrap();
    assert!(empty.resolve(aliases::BOT_TOKEN).is_none());
}

#[test]
fn test_malformed_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("secrets.toml");
    fs::write(&path, "OPENAI_API_KEY = \n").unwrap();

    assert!(matches!(SecretStore::load(&path), Err(ConfigError::Toml(_))));
}

#[test]
fn test_env_overlay_fills_gaps() {
    let store = SecretStore::from_toml_str("[telegram]\nbot_token = \"file\"\n")
        .unwrap()
        .with_env_overlay([("OPENAI_API_KEY", "sk-env"), ("TELEGRAM_CHAT_ID", "-8")]);

    let settings = Settings::resolve(&store).unwrap();
    assert_eq!(settings.completion.api_key, "sk-env");
    assert_eq!(settings.messaging.bot_token.as_deref(), Some("file"));
    assert_eq!(settings.messaging.default_chat_id.as_deref(), Some("-8"));
}
