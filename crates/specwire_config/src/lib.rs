//! # specwire_config
//!
//! Secrets and settings resolution for specwire.
//!
//! Configuration lives in a small TOML secrets file. The same logical value
//! (bot token, default chat, API key) is accepted under several spellings and
//! in two places: at the top level, or inside the `[telegram]` table.
//!
//! ## Example
//!
//! ```rust
//! use specwire_config::{aliases, SecretStore};
//!
//! let store = SecretStore::from_toml_str(
//!     r#"
//!     [Telegram]
//!     Telegram_Bot_Token = "123:abc"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(store.resolve(aliases::BOT_TOKEN).as_deref(), Some("123:abc"));
//! ```

pub mod error;
pub mod secrets;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use secrets::{aliases, default_secrets_path, SecretStore, ENV_KEYS, MESSAGING_SCOPE};
pub use settings::{mask, CompletionProvider, CompletionSettings, MessagingSettings, Settings};
