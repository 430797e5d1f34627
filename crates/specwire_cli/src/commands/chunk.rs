//! Chunk command - Preview how a document is split into messages.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use specwire_dispatch::{chunk_message, DEFAULT_CHUNK_LIMIT, TELEGRAM_MESSAGE_LIMIT};

use super::read_text;

#[derive(Args)]
pub struct ChunkArgs {
    /// Document to split
    #[arg(short, long)]
    file: PathBuf,

    /// Maximum characters per chunk
    #[arg(short, long, default_value_t = DEFAULT_CHUNK_LIMIT)]
    limit: usize,
}

pub async fn execute(args: ChunkArgs) -> Result<()> {
    validate_limit(args.limit)?;

    let text = read_text(&args.file)?;
    let chunks = chunk_message(&text, args.limit);
    let total = chunks.len();

    println!("📦 {} chunk(s), limit {} characters", total, args.limit);
    for (i, chunk) in chunks.iter().enumerate() {
        let chars = chunk.chars().count();
        let marker = if chars > args.limit { " ⚠️  oversized line" } else { "" };
        println!("\n--- chunk {}/{} ({} chars){} ---", i + 1, total, chars, marker);
        println!("{}", chunk);
    }

    Ok(())
}

/// A chunk limit must fit in one Telegram message.
fn validate_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        anyhow::bail!("Invalid argument: --limit must be positive");
    }
    if limit > TELEGRAM_MESSAGE_LIMIT {
        anyhow::bail!(
            "Invalid argument: --limit must not exceed {} (Telegram message limit)",
            TELEGRAM_MESSAGE_LIMIT
        );
    }
    Ok(())
}
