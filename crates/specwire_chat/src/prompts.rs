//! Fixed prompts and prompt assembly.

use crate::types::{Clarification, Message};

/// System instruction shared by both completion calls.
pub const SYSTEM_PROMPT: &str = "You are an experienced product manager and prompt engineer. \
Work concisely and in a structured way. If the user only gives an idea, first ask relevant, \
non-trivial clarifying questions (5-10). Once the answers are in, assemble a detailed but \
lean specification a prompt engineer can act on. The specification targets prompts inside \
LLM-based products.";

/// Instruction appended to the user's text when asking for questions.
pub const QUESTIONS_INSTRUCTION: &str = "Produce 5-10 clarifying questions about the idea or draft above. \
Output strictly a numbered list, one question per line, no sub-lists.";

/// The fixed document outline: heading and what the section should hold.
pub const OUTLINE: &[(&str, &str)] = &[
    ("Title", "Short and to the point."),
    ("Goal", "1-3 sentences on the problem and the target metric."),
    (
        "Context & Constraints",
        "Channels, users, languages, privacy/security, legal constraints.",
    ),
    ("User Scenarios", "Bullet list of typical scenarios (3-6)."),
    (
        "Inputs",
        "What the model receives (form fields, files, context, system instructions).",
    ),
    (
        "Output",
        "Format of the model's answer, style, structure, length requirements.",
    ),
    ("Acceptance Criteria", "Clear, checkable criteria (bullet list)."),
    (
        "Generation Constraints",
        "Forbidden topics/styles, tone, safety rules.",
    ),
    (
        "Prompt Technical Details",
        "System message, variables, few-shot examples if needed, temperature/top_p, context length.",
    ),
    ("Telemetry & Logging", "What we log and how we measure quality."),
    ("Risks & Assumptions", "Main risks and how to mitigate them."),
    ("Readiness Checklist", "A short list of 5-8 items."),
];

/// Outline instruction appended when asking for the document.
pub fn document_instruction() -> String {
    let mut out = String::from(
        "Using the idea/draft and the answers, assemble the specification \
         (Markdown, no filler) following this outline:\n\n",
    );

    for (index, (heading, guidance)) in OUTLINE.iter().enumerate() {
        let marker = if index == 0 { "#" } else { "##" };
        out.push_str(&format!("{} {}\n{}\n\n", marker, heading, guidance));
    }

    out.push_str("Make every section informative and practical.");
    out
}

/// Numbered question/answer block, entries separated by blank lines.
pub fn answers_block(clarifications: &[Clarification]) -> String {
    clarifications
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}\nAnswer: {}", i + 1, c.question, c.answer.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Conversation asking for clarifying questions.
pub fn questions_messages(input: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!("Text:\n\n{}\n\n{}", input, QUESTIONS_INSTRUCTION)),
    ]
}

/// Conversation asking for the finished document.
pub fn document_messages(input: &str, clarifications: &[Clarification]) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            "Original text (idea/draft):\n\n{}\n\nAnswers to the clarifying questions:\n\n{}\n\n{}",
            input,
            answers_block(clarifications),
            document_instruction()
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageRole;

    #[test]
    fn test_outline_has_title_and_eleven_sections() {
        assert_eq!(OUTLINE[0].0, "Title");
        assert_eq!(OUTLINE.len(), 12);
    }

    #[test]
    fn test_document_instruction_lists_outline() {
        let instruction = document_instruction();
        assert!(instruction.contains("# Title\n"));
        assert!(instruction.contains("## Readiness Checklist\n"));
        assert!(!instruction.contains("## Title"));
    }

    #[test]
    fn test_answers_block() {
        let block = answers_block(&[
            Clarification::new("Who are the users?", " Support agents "),
            Clarification::new("What channels?", ""),
        ]);
        assert_eq!(
            block,
            "1. Who are the users?\nAnswer: Support agents\n\n2. What channels?\nAnswer: "
        );
    }

    #[test]
    fn test_messages_shape() {
        let messages = questions_messages("Build a chatbot");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert!(messages[1].content.contains("Build a chatbot"));
        assert!(messages[1].content.ends_with(QUESTIONS_INSTRUCTION));

        let messages = document_messages("Idea", &[Clarification::new("Q?", "A")]);
        assert!(messages[1].content.contains("1. Q?\nAnswer: A"));
        assert!(messages[1].content.contains("## Goal"));
    }
}
