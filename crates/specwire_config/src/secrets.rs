//! Tolerant secret lookup across alias spellings and two scopes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Name of the nested table holding messaging settings.
pub const MESSAGING_SCOPE: &str = "telegram";

/// Environment variables copied into the top-level scope when absent there.
pub const ENV_KEYS: &[&str] = &[
    "OPENAI_API_KEY",
    "OPENAI_MODEL",
    "OPENAI_BASE_URL",
    "ANTHROPIC_API_KEY",
    "LLM_PROVIDER",
    "TELEGRAM_BOT_TOKEN",
    "TELEGRAM_CHAT_ID",
    "TELEGRAM_DEPARTMENTS",
    "TELEGRAM_API_BASE",
];

/// Accepted spellings for each logical setting, in lookup order.
pub mod aliases {
    pub const OPENAI_API_KEY: &[&str] = &["OPENAI_API_KEY", "openai_api_key", "api_key"];
    pub const ANTHROPIC_API_KEY: &[&str] = &["ANTHROPIC_API_KEY", "anthropic_api_key"];
    pub const MODEL: &[&str] = &["OPENAI_MODEL", "openai_model", "model"];
    pub const PROVIDER: &[&str] = &["LLM_PROVIDER", "llm_provider", "provider"];
    pub const COMPLETION_BASE_URL: &[&str] = &["OPENAI_BASE_URL", "openai_base_url", "base_url"];
    pub const BOT_TOKEN: &[&str] = &[
        "bot_token",
        "TELEGRAM_BOT_TOKEN",
        "telegram_bot_token",
        "token",
    ];
    pub const DEFAULT_CHAT: &[&str] = &[
        "default_chat_id",
        "TELEGRAM_CHAT_ID",
        "telegram_chat_id",
        "chat_id",
    ];
    pub const DEPARTMENTS: &[&str] = &["departments", "TELEGRAM_DEPARTMENTS", "depts"];
    pub const TELEGRAM_API_BASE: &[&str] = &["TELEGRAM_API_BASE", "api_base"];
}

/// Location of the secrets file: `$SPECWIRE_SECRETS` or `.specwire/secrets.toml`.
pub fn default_secrets_path() -> PathBuf {
    std::env::var("SPECWIRE_SECRETS")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".specwire").join("secrets.toml"))
}

/// Read-only view over the parsed secrets document.
#[derive(Debug, Clone, Default)]
pub struct SecretStore {
    root: Table,
}

impl SecretStore {
    /// Create a store over an already parsed table.
    pub fn new(root: Table) -> Self {
        Self { root }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let root: Table = toml::from_str(content)?;
        Ok(Self { root })
    }

    /// Load a secrets file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        debug!("Loading secrets from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a secrets file, treating a missing file as an empty document.
    pub fn load_or_empty(path: &Path) -> ConfigResult<Self> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => {
                debug!("No secrets file at {:?}, starting empty", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Copy the given variables into the top-level scope, never replacing
    /// keys already present in the file.
    pub fn with_env_overlay<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let key = key.into();
            if !self.root.contains_key(&key) {
                self.root.insert(key, Value::String(value.into()));
            }
        }
        self
    }

    /// Overlay the process environment for every name in [`ENV_KEYS`].
    pub fn with_process_env(self) -> Self {
        let vars: Vec<(String, String)> = ENV_KEYS
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
            .collect();
        self.with_env_overlay(vars)
    }

    /// Resolve a scalar setting.
    ///
    /// Order: every alias at the top level, every alias in the messaging
    /// scope, then both again ignoring case. Blank strings do not count.
    pub fn resolve(&self, aliases: &[&str]) -> Option<String> {
        self.search(aliases, scalar_value)
    }

    /// Resolve a label → value mapping (a TOML table, or a JSON object string
    /// as supplied through the environment). Same order as [`Self::resolve`].
    pub fn resolve_map(&self, aliases: &[&str]) -> Option<BTreeMap<String, String>> {
        self.search(aliases, map_value)
    }

    fn search<T>(&self, aliases: &[&str], extract: impl Fn(&Value) -> Option<T>) -> Option<T> {
        for exact in [true, false] {
            for alias in aliases {
                if let Some(found) = lookup(&self.root, alias, exact, &extract) {
                    return Some(found);
                }
            }

            let Some(scope) = self.messaging_scope(exact) else {
                continue;
            };
            for alias in aliases {
                if let Some(found) = lookup(scope, alias, exact, &extract) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn messaging_scope(&self, exact: bool) -> Option<&Table> {
        if exact {
            return self.root.get(MESSAGING_SCOPE).and_then(Value::as_table);
        }
        self.root
            .iter()
            .filter(|(key, _)| same_key(key, MESSAGING_SCOPE))
            .find_map(|(_, value)| value.as_table())
    }
}

fn lookup<T>(
    table: &Table,
    key: &str,
    exact: bool,
    extract: &impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    if exact {
        return table.get(key).and_then(extract);
    }
    table
        .iter()
        .filter(|(candidate, _)| same_key(candidate, key))
        .find_map(|(_, value)| extract(value))
}

fn same_key(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn scalar_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Integer(i) => Some(i.to_string()),
        _ => None,
    }
}

fn map_value(value: &Value) -> Option<BTreeMap<String, String>> {
    let map: BTreeMap<String, String> = match value {
        Value::Table(table) => table
            .iter()
            .filter_map(|(label, v)| scalar_value(v).map(|v| (label.clone(), v)))
            .collect(),
        Value::String(raw) => {
            let parsed: serde_json::Map<String, serde_json::Value> =
                serde_json::from_str(raw.trim()).ok()?;
            parsed
                .into_iter()
                .filter_map(|(label, v)| match v {
                    serde_json::Value::String(s) if !s.trim().is_empty() => {
                        Some((label, s.trim().to_string()))
                    }
                    serde_json::Value::Number(n) => Some((label, n.to_string())),
                    _ => None,
                })
                .collect()
        }
        _ => return None,
    };
    (!map.is_empty()).then_some(map)
}
