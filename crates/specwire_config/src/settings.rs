//! Resolved application settings.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::secrets::{aliases, SecretStore};

/// Model used when the configuration does not name one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Completion provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionProvider {
    #[default]
    OpenAI,
    Anthropic,
}

impl FromStr for CompletionProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(ConfigError::Invalid {
                setting: "provider".to_string(),
                message: format!("unknown provider '{}' (expected openai or anthropic)", other),
            }),
        }
    }
}

impl fmt::Display for CompletionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAI => write!(f, "openai"),
            Self::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// Settings for the completion endpoint.
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub provider: CompletionProvider,
    pub api_key: String,
    pub model: String,
    /// Overrides the provider's public endpoint (proxies, tests).
    pub base_url: Option<String>,
}

impl CompletionSettings {
    /// Resolve completion settings. The API key is required.
    pub fn resolve(store: &SecretStore) -> ConfigResult<Self> {
        let provider = match store.resolve(aliases::PROVIDER) {
            Some(raw) => raw.parse()?,
            None => CompletionProvider::default(),
        };

        let key_aliases = match provider {
            CompletionProvider::OpenAI => aliases::OPENAI_API_KEY,
            CompletionProvider::Anthropic => aliases::ANTHROPIC_API_KEY,
        };
        let api_key = store
            .resolve(key_aliases)
            .ok_or_else(|| ConfigError::missing("completion API key", key_aliases))?;

        let model = store.resolve(aliases::MODEL).unwrap_or_else(|| {
            debug!("No model configured, using {}", DEFAULT_MODEL);
            DEFAULT_MODEL.to_string()
        });

        Ok(Self {
            provider,
            api_key,
            model,
            base_url: store.resolve(aliases::COMPLETION_BASE_URL),
        })
    }
}

/// Settings for the Telegram side.
///
/// Every field is optional here; the send path checks what it needs.
#[derive(Debug, Clone, Default)]
pub struct MessagingSettings {
    pub bot_token: Option<String>,
    pub default_chat_id: Option<String>,
    /// Department label → chat id.
    pub departments: BTreeMap<String, String>,
    pub api_base: Option<String>,
}

impl MessagingSettings {
    pub fn resolve(store: &SecretStore) -> Self {
        Self {
            bot_token: store.resolve(aliases::BOT_TOKEN),
            default_chat_id: store.resolve(aliases::DEFAULT_CHAT),
            departments: store.resolve_map(aliases::DEPARTMENTS).unwrap_or_default(),
            api_base: store.resolve(aliases::TELEGRAM_API_BASE),
        }
    }

    /// The bot token, or a `Missing` error.
    pub fn require_bot_token(&self) -> ConfigResult<&str> {
        self.bot_token
            .as_deref()
            .ok_or_else(|| ConfigError::missing("telegram bot token", aliases::BOT_TOKEN))
    }

    /// Department labels in display order.
    pub fn department_labels(&self) -> Vec<&str> {
        self.departments.keys().map(String::as_str).collect()
    }
}

/// Everything resolved once at start-up.
#[derive(Debug, Clone)]
pub struct Settings {
    pub completion: CompletionSettings,
    pub messaging: MessagingSettings,
}

impl Settings {
    pub fn resolve(store: &SecretStore) -> ConfigResult<Self> {
        let completion = CompletionSettings::resolve(store)?;
        let messaging = MessagingSettings::resolve(store);

        info!(
            provider = %completion.provider,
            model = %completion.model,
            departments = messaging.departments.len(),
            "Configuration resolved"
        );

        Ok(Self {
            completion,
            messaging,
        })
    }
}

/// Mask a secret for display, keeping only the last four characters.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
