//! Config command - Show the resolved configuration with secrets masked.

use anyhow::Result;
use clap::Args;

use specwire_config::{mask, CompletionSettings, MessagingSettings};

use super::Globals;

#[derive(Args)]
pub struct ConfigArgs {}

pub async fn execute(_args: ConfigArgs, globals: &Globals) -> Result<()> {
    let path = globals.secrets_path();
    let store = globals.store()?;

    let file_state = if path.exists() { "" } else { " (not found)" };
    println!("📁 Secrets file: {}{}", path.display(), file_state);

    println!("\n🤖 Completion");
    match CompletionSettings::resolve(&store) {
        Ok(completion) => {
            println!("   Provider: {}", completion.provider);
            println!("   Model:    {}", completion.model);
            println!("   API key:  {}", mask(&completion.api_key));
            if let Some(url) = completion.base_url {
                println!("   Base URL: {}", url);
            }
        }
        Err(e) => println!("   ❌ {}", e),
    }

    let messaging = MessagingSettings::resolve(&store);
    println!("\n📨 Telegram");
    match messaging.bot_token {
        Some(ref token) => println!("   Bot token:    {}", mask(token)),
        None => println!("   Bot token:    ❌ missing"),
    }
    println!(
        "   Default chat: {}",
        messaging.default_chat_id.as_deref().unwrap_or("(none)")
    );
    if messaging.departments.is_empty() {
        println!("   Departments:  (none, the default chat is used)");
    } else {
        println!("   Departments:");
        for (label, chat_id) in &messaging.departments {
            println!("      - {} → {}", label, chat_id);
        }
    }

    Ok(())
}
