//! Send command - Deliver an existing document to Telegram.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use specwire_config::MessagingSettings;
use specwire_dispatch::{
    chunk_message, compose_message, deliver, resolve_destination, TelegramSender,
    DEFAULT_CHUNK_LIMIT,
};

use super::{partial_delivery_note, read_text, Globals};

#[derive(Args)]
pub struct SendArgs {
    /// Markdown document to send
    #[arg(short, long)]
    file: PathBuf,

    /// Department label to route to (default chat when omitted)
    #[arg(short, long)]
    department: Option<String>,

    /// Who is submitting the document
    #[arg(short, long)]
    submitter: Option<String>,

    /// Show what would be sent without contacting Telegram
    #[arg(long)]
    dry_run: bool,
}

pub async fn execute(args: SendArgs, globals: &Globals) -> Result<()> {
    let messaging = MessagingSettings::resolve(&globals.store()?);
    let document = read_text(&args.file)?;

    let chat_id = resolve_destination(&messaging, args.department.as_deref())?;
    let text = compose_message(&document, args.department.as_deref(), args.submitter.as_deref());

    if args.dry_run {
        let chunks = chunk_message(&text, DEFAULT_CHUNK_LIMIT);
        println!("🔍 Dry run: {} chunk(s) to chat {}", chunks.len(), chat_id);
        for (i, chunk) in chunks.iter().enumerate() {
            println!("   {}. {} chars", i + 1, chunk.chars().count());
        }
        return Ok(());
    }

    let sender = TelegramSender::from_settings(&messaging)?;
    info!("Sending {} to chat {}", args.file.display(), chat_id);

    let report = match deliver(&sender, &chat_id, &text, DEFAULT_CHUNK_LIMIT).await {
        Ok(report) => report,
        Err(e) => {
            if let Some(note) = partial_delivery_note(&e) {
                eprintln!("⚠️  {}", note);
            }
            return Err(anyhow::Error::new(e).context("Sending document to Telegram"));
        }
    };

    if !globals.quiet {
        println!(
            "✅ Sent {} message(s) to chat {}",
            report.chunks_sent, report.chat_id
        );
    }
    Ok(())
}
