//! CLI command definitions.
//!
//! Each subcommand maps to one step of the drafting flow, or to the whole
//! flow for `run`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use specwire_chat::{CompletionClient, LlmAdapter};
use specwire_config::{default_secrets_path, CompletionSettings, SecretStore, Settings};
use specwire_core::Notice;
use specwire_dispatch::DispatchError;

pub mod chunk;
pub mod config;
pub mod draft;
pub mod questions;
pub mod run;
pub mod send;

/// specwire - guided prompt-spec drafting with Telegram delivery
#[derive(Parser)]
#[command(name = "specwire")]
#[command(version, about = "specwire - guided prompt-spec drafting with Telegram delivery")]
#[command(long_about = r#"
specwire turns a rough idea into a structured prompt-engineering spec.
A language model asks clarifying questions, drafts the document from your
answers, and the result is delivered to a Telegram chat.

COMMANDS:
  run        → Interactive wizard (input → questions → draft → send)
  questions  → Generate clarifying questions for an idea
  draft      → Build the document from an idea and an answers file
  chunk      → Preview how a document is split into messages
  send       → Send a document to Telegram
  config     → Show the resolved configuration (secrets masked)

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Configuration error
  4 - Delivery error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Secrets file (defaults to .specwire/secrets.toml)
    #[arg(long, global = true, env = "SPECWIRE_SECRETS")]
    pub secrets: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive wizard
    Run(run::RunArgs),

    /// Generate clarifying questions
    Questions(questions::QuestionsArgs),

    /// Build the spec document
    Draft(draft::DraftArgs),

    /// Preview message chunks for a document
    Chunk(chunk::ChunkArgs),

    /// Send a document to Telegram
    Send(send::SendArgs),

    /// Show resolved configuration
    Config(config::ConfigArgs),
}

/// Options shared by every command.
pub struct Globals {
    pub secrets: Option<PathBuf>,
    pub quiet: bool,
}

impl Globals {
    pub fn secrets_path(&self) -> PathBuf {
        self.secrets.clone().unwrap_or_else(default_secrets_path)
    }

    /// Secrets file plus environment overlay.
    ///
    /// An explicitly given file must exist; the default location may be absent.
    pub fn store(&self) -> Result<SecretStore> {
        let path = self.secrets_path();
        let store = match self.secrets {
            Some(_) => SecretStore::load(&path),
            None => SecretStore::load_or_empty(&path),
        }
        .with_context(|| format!("Failed to load secrets from {}", path.display()))?;

        Ok(store.with_process_env())
    }

    pub fn settings(&self) -> Result<Settings> {
        Ok(Settings::resolve(&self.store()?)?)
    }
}

pub fn completion_client(settings: &CompletionSettings) -> Arc<dyn CompletionClient> {
    Arc::new(LlmAdapter::from_settings(settings))
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        eprintln!("⚠️  {}", notice);
    }
}

/// Warning for a delivery that failed after some chunks went out.
pub fn partial_delivery_note(err: &DispatchError) -> Option<String> {
    if !err.is_partial() {
        return None;
    }
    match err {
        DispatchError::Rejected { chunk, total, .. } | DispatchError::Network { chunk, total, .. } => {
            Some(format!(
                "{} of {} chunk(s) were already delivered; a retry sends the whole message again",
                chunk - 1,
                total
            ))
        }
        _ => None,
    }
}
