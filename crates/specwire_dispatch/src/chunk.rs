//! Splitting long text into message-sized chunks.
//!
//! Paragraph boundaries are preferred, then line boundaries. A single line
//! longer than the limit is emitted as-is; it is never cut mid-line.

/// Hard limit of a Telegram text message.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// Default chunk budget, kept below [`TELEGRAM_MESSAGE_LIMIT`].
pub const DEFAULT_CHUNK_LIMIT: usize = 4000;

/// Split `text` into ordered chunks of at most `limit` characters.
///
/// Lengths are counted in `char`s. Each chunk has its trailing whitespace
/// removed, and whitespace-only chunks are never produced.
pub fn chunk_message(text: &str, limit: usize) -> Vec<String> {
    let text = text.trim();
    if char_len(text) <= limit {
        return vec![text.to_string()];
    }

    let paragraphs = text
        .split("\n\n")
        .map(|paragraph| format!("{}\n\n", paragraph.trim()));

    accumulate(paragraphs, limit)
        .into_iter()
        .flat_map(|chunk| {
            if char_len(&chunk) <= limit {
                vec![chunk]
            } else {
                accumulate(chunk.split_inclusive('\n').map(str::to_string), limit)
            }
        })
        .collect()
}

/// Greedy accumulate-and-flush over `pieces`.
fn accumulate(pieces: impl IntoIterator<Item = String>, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut size = 0;

    for piece in pieces {
        let len = char_len(&piece);
        if size + len > limit && !is_blank(&current) {
            chunks.push(current.trim_end().to_string());
            current.clear();
            size = 0;
        }
        if is_blank(&current) {
            current.clear();
            size = 0;
        }
        current.push_str(&piece);
        size += len;
    }

    if !is_blank(&current) {
        chunks.push(current.trim_end().to_string());
    }
    chunks
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
