//! Clarifying-question extraction from free-form model output.
//!
//! Models do not reliably follow the "numbered list" instruction, so the
//! output is tried against several shapes in turn: a JSON document, an
//! enumerated list, plain lines. When nothing usable comes out, a fixed set of
//! generic questions is returned instead.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Upper bound on the number of questions kept.
pub const MAX_QUESTIONS: usize = 10;

/// Generic questions used when the model output yields nothing.
pub const FALLBACK_QUESTIONS: [&str; 9] = [
    "What is the main goal, and which metric defines success?",
    "Who is the target audience, and what do they already know?",
    "What inputs will the model receive (form fields, files, context)?",
    "What style, tone and length constraints apply to the output?",
    "What are the main risks, and what must the model never do?",
    "Can you share examples of good and bad answers?",
    "Which channel or product will the prompt be integrated into?",
    "What should be logged, and how will quality be measured?",
    "Are there legal, privacy or compliance requirements to respect?",
];

const TRAILING_PUNCTUATION: &[char] = &[
    '?', '!', '.', ';', ':', '…', '？', '！', '。', '．', '；', '：',
];

/// Which strategy produced the questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSource {
    /// A JSON array, or an object with a list-of-strings field
    Structured,
    /// Numbered or bulleted lines
    Enumerated,
    /// Every non-empty line
    Lines,
    /// [`FALLBACK_QUESTIONS`]
    Fallback,
}

/// Result of [`extract_questions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedQuestions {
    pub questions: Vec<String>,
    pub source: QuestionSource,
}

impl ExtractedQuestions {
    pub fn is_fallback(&self) -> bool {
        self.source == QuestionSource::Fallback
    }
}

/// Extract at most [`MAX_QUESTIONS`] questions, each ending in `?`.
///
/// Output that is JSON (whole, or inside a code fence) is only ever read as
/// JSON: when it holds no usable list the generic questions are returned,
/// never the JSON text itself.
pub fn extract_questions(raw: &str) -> ExtractedQuestions {
    let (source, mut questions) = match from_structured(raw) {
        Some(questions) => (QuestionSource::Structured, questions),
        None => {
            let enumerated = from_enumerated(raw);
            if enumerated.is_empty() {
                (QuestionSource::Lines, from_lines(raw))
            } else {
                (QuestionSource::Enumerated, enumerated)
            }
        }
    };

    if questions.is_empty() {
        debug!(?source, "No questions in completion output, using the generic list");
        return ExtractedQuestions {
            questions: FALLBACK_QUESTIONS.iter().map(|q| q.to_string()).collect(),
            source: QuestionSource::Fallback,
        };
    }

    questions.truncate(MAX_QUESTIONS);
    debug!(?source, count = questions.len(), "Questions extracted");
    ExtractedQuestions { questions, source }
}

/// Trim, drop trailing punctuation and end with a single `?`.
pub fn normalize_question(candidate: &str) -> Option<String> {
    let core = candidate
        .trim()
        .trim_end_matches(TRAILING_PUNCTUATION)
        .trim_end();

    if core.is_empty() {
        None
    } else {
        Some(format!("{}?", core))
    }
}

fn enumeration_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"^(?:\d+[.)]\s*|[-*•·]\s+)(.+)$").expect("enumeration pattern is valid")
    })
}

fn from_enumerated(raw: &str) -> Vec<String> {
    let marker = enumeration_marker();
    raw.lines()
        .filter_map(|line| marker.captures(line.trim()))
        .filter_map(|caps| caps.get(1).and_then(|m| normalize_question(m.as_str())))
        .collect()
}

fn from_lines(raw: &str) -> Vec<String> {
    raw.lines().filter_map(normalize_question).collect()
}

/// `None` when the output is not JSON at all.
///
/// The whole text and a fenced block are authoritative: once they parse, the
/// (possibly empty) list they hold is the answer. A `{...}` or `[...]` span
/// buried in prose only counts when it actually yields questions.
fn from_structured(raw: &str) -> Option<Vec<String>> {
    let trimmed = raw.trim();
    if let Some(value) = parse_container(trimmed) {
        return Some(questions_in(&value));
    }
    if let Some(value) = fenced_block(trimmed).and_then(parse_container) {
        return Some(questions_in(&value));
    }

    [('{', '}'), ('[', ']')]
        .into_iter()
        .filter_map(|(open, close)| enclosed_span(trimmed, open, close))
        .filter_map(parse_container)
        .map(|value| questions_in(&value))
        .find(|questions| !questions.is_empty())
}

/// Parse `text` as a JSON array or object; scalars do not count.
fn parse_container(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text).ok()? {
        value @ (Value::Array(_) | Value::Object(_)) => Some(value),
        _ => None,
    }
}

fn questions_in(value: &Value) -> Vec<String> {
    let list = match value {
        Value::Array(items) => string_items(items),
        Value::Object(map) => map
            .get("questions")
            .and_then(Value::as_array)
            .map(|items| string_items(items))
            .filter(|items| !items.is_empty())
            .or_else(|| {
                map.values()
                    .filter_map(Value::as_array)
                    .map(|items| string_items(items))
                    .find(|items| !items.is_empty())
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    list.iter()
        .filter_map(|item| normalize_question(item))
        .collect()
}

fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// Body of the first Markdown code fence (```` ``` ```` or ```` ```json ````)
/// anywhere in the text.
fn fenced_block(raw: &str) -> Option<&str> {
    let start = raw.find("```")?;
    let after = &raw[start + 3..];
    let body = &after[after.find('\n')? + 1..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Text from the first `open` to the last `close`, inclusive.
fn enclosed_span(raw: &str, open: char, close: char) -> Option<&str> {
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    (end > start).then(|| &raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_list() {
        let extracted = extract_questions("1. What is X?\n2. What is Y?");
        assert_eq!(extracted.questions, vec!["What is X?", "What is Y?"]);
        assert_eq!(extracted.source, QuestionSource::Enumerated);
    }

    #[test]
    fn test_paren_numbers_and_bullets() {
        let raw = "Here are my questions:\n1) Who pays\n- Which languages.\n• Any deadlines:\n* Budget";
        let extracted = extract_questions(raw);
        assert_eq!(
            extracted.questions,
            vec!["Who pays?", "Which languages?", "Any deadlines?", "Budget?"]
        );
    }

    #[test]
    fn test_bold_text_is_not_a_bullet() {
        let extracted = extract_questions("**Scope**\n**Users**");
        assert_eq!(extracted.source, QuestionSource::Lines);
        assert_eq!(extracted.questions, vec!["**Scope**?", "**Users**?"]);
    }

    #[test]
    fn test_plain_lines() {
        let extracted = extract_questions("Who are the users\n\n  What is the budget!  \n");
        assert_eq!(extracted.source, QuestionSource::Lines);
        assert_eq!(extracted.questions, vec!["Who are the users?", "What is the budget?"]);
    }

    #[test]
    fn test_structured_object() {
        let extracted = extract_questions(r#"{"questions": ["A", "B"]}"#);
        assert_eq!(extracted.questions, vec!["A?", "B?"]);
        assert_eq!(extracted.source, QuestionSource::Structured);
    }

    #[test]
    fn test_structured_other_field_and_fence() {
        let raw = "```json\n{\"items\": [\"Why now.\", \"\", \"For whom\"]}\n```";
        let extracted = extract_questions(raw);
        assert_eq!(extracted.questions, vec!["Why now?", "For whom?"]);
    }

    #[test]
    fn test_structured_array() {
        let extracted = extract_questions(r#"["One?", "Two"]"#);
        assert_eq!(extracted.questions, vec!["One?", "Two?"]);
    }

    #[test]
    fn test_structured_inside_chatty_output() {
        let raw = "Here are the questions:\n```json\n{\"questions\": [\"Who pays\", \"Why now\"]}\n```\nGood luck!";
        let extracted = extract_questions(raw);
        assert_eq!(extracted.source, QuestionSource::Structured);
        assert_eq!(extracted.questions, vec!["Who pays?", "Why now?"]);
    }

    #[test]
    fn test_bare_object_inside_prose() {
        let raw = "Sure thing. {\"questions\": [\"Which locale\"]} Anything else?";
        let extracted = extract_questions(raw);
        assert_eq!(extracted.questions, vec!["Which locale?"]);
    }

    #[test]
    fn test_json_without_questions_falls_back() {
        for raw in [
            r#"{"questions": []}"#,
            r#"{"error": "rate limited"}"#,
            r#"["???", "..."]"#,
            "```json\n{\"questions\": []}\n```",
        ] {
            let extracted = extract_questions(raw);
            assert!(extracted.is_fallback(), "{raw} should fall back");
            assert_eq!(extracted.questions.len(), FALLBACK_QUESTIONS.len());
        }
    }

    #[test]
    fn test_braces_in_enumerated_text() {
        let extracted = extract_questions("1. Should replies use {name} placeholders\n2. Which locale");
        assert_eq!(extracted.source, QuestionSource::Enumerated);
        assert_eq!(
            extracted.questions,
            vec!["Should replies use {name} placeholders?", "Which locale?"]
        );
    }

    #[test]
    fn test_json_scalar_is_plain_text() {
        let extracted = extract_questions("42");
        assert_eq!(extracted.source, QuestionSource::Lines);
        assert_eq!(extracted.questions, vec!["42?"]);
    }

    #[test]
    fn test_fallback_on_empty() {
        let extracted = extract_questions("");
        assert!(extracted.is_fallback());
        assert_eq!(extracted.questions.len(), 9);
        assert!(extracted.questions.iter().all(|q| q.ends_with('?')));
    }

    #[test]
    fn test_fallback_on_punctuation_only() {
        let extracted = extract_questions("???\n...\n   \n");
        assert!(extracted.is_fallback());
    }

    #[test]
    fn test_capped_at_ten() {
        let raw: String = (1..=25).map(|i| format!("{}. Question {}\n", i, i)).collect();
        let extracted = extract_questions(&raw);
        assert_eq!(extracted.questions.len(), MAX_QUESTIONS);
        assert_eq!(extracted.questions[9], "Question 10?");

        let json = serde_json::json!({ "questions": (0..15).map(|i| format!("Q{}", i)).collect::<Vec<_>>() });
        assert_eq!(extract_questions(&json.to_string()).questions.len(), MAX_QUESTIONS);
    }

    #[test]
    fn test_short_lists_not_padded() {
        let extracted = extract_questions("1. Only one");
        assert_eq!(extracted.questions, vec!["Only one?"]);
    }

    #[test]
    fn test_normalize_question() {
        assert_eq!(normalize_question("  Why?!  ").as_deref(), Some("Why?"));
        assert_eq!(normalize_question("Что дальше？").as_deref(), Some("Что дальше?"));
        assert_eq!(normalize_question(" ;: "), None);
    }
}
