//! Specification document model and the local fallback document.

use tracing::warn;

use crate::prompts::OUTLINE;
use crate::types::Clarification;

/// Body of every outline section in the fallback document.
pub const PLACEHOLDER: &str = "_To be specified._";

/// Stands in for a blank answer.
pub const UNANSWERED: &str = "—";

/// Heading of the fallback section holding the original text.
pub const UNCERTAINTIES: &str = "Uncertainties";

/// Heading of the fallback section listing every question and answer.
pub const CLARIFICATIONS: &str = "Clarifications";

/// One heading and the text under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

/// A Markdown document viewed as ordered heading → body pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Text before the first heading.
    pub preamble: String,
    pub sections: Vec<Section>,
}

impl Document {
    /// Split Markdown on ATX headings (`#` to `######`), ignoring headings
    /// inside fenced code blocks.
    pub fn parse(markdown: &str) -> Self {
        let mut doc = Document::default();
        let mut body: Vec<&str> = Vec::new();
        let mut heading: Option<String> = None;
        let mut in_fence = false;

        for line in markdown.lines() {
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
            }

            let parsed = if in_fence { None } else { parse_heading(line) };
            match parsed {
                Some(title) => {
                    doc.flush(heading.take(), &body);
                    body.clear();
                    heading = Some(title);
                }
                None => body.push(line),
            }
        }
        doc.flush(heading, &body);
        doc
    }

    fn flush(&mut self, heading: Option<String>, body: &[&str]) {
        let text = body.join("\n").trim().to_string();
        match heading {
            Some(heading) => self.sections.push(Section {
                heading,
                body: text,
            }),
            None => self.preamble = text,
        }
    }

    /// Body of the first section whose heading matches, ignoring case.
    pub fn section(&self, heading: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.heading.eq_ignore_ascii_case(heading))
            .map(|s| s.body.as_str())
    }

    pub fn headings(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.heading.as_str()).collect()
    }

    /// Outline headings (other than the title) absent from this document.
    pub fn missing_sections(&self) -> Vec<&'static str> {
        OUTLINE
            .iter()
            .skip(1)
            .map(|(heading, _)| *heading)
            .filter(|heading| self.section(heading).is_none())
            .collect()
    }

    /// Render back to Markdown. The first section is the `#` title.
    pub fn render(&self) -> String {
        let mut parts = Vec::new();
        if !self.preamble.is_empty() {
            parts.push(self.preamble.clone());
        }
        for (index, section) in self.sections.iter().enumerate() {
            let marker = if index == 0 { "#" } else { "##" };
            if section.body.is_empty() {
                parts.push(format!("{} {}", marker, section.heading));
            } else {
                parts.push(format!("{} {}\n\n{}", marker, section.heading, section.body));
            }
        }
        parts.join("\n\n")
    }
}

fn parse_heading(line: &str) -> Option<String> {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &trimmed[hashes..];
    if !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    let title = rest.trim().trim_end_matches('#').trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// A finished document and how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedDocument {
    pub markdown: String,
    /// The completion was empty and the local skeleton was used.
    pub is_fallback: bool,
    /// Outline sections the model left out (always empty for the fallback).
    pub missing_sections: Vec<&'static str>,
}

/// Accept the completion text, or build the fallback when it is blank.
pub fn finalize_document(
    completion: &str,
    input: &str,
    clarifications: &[Clarification],
) -> SynthesizedDocument {
    let markdown = completion.trim();
    if markdown.is_empty() {
        warn!("Completion returned no document, assembling the local skeleton");
        return SynthesizedDocument {
            markdown: fallback_document(input, clarifications),
            is_fallback: true,
            missing_sections: Vec::new(),
        };
    }

    let missing_sections = Document::parse(markdown).missing_sections();
    if !missing_sections.is_empty() {
        warn!(missing = ?missing_sections, "Document is missing outline sections");
    }

    SynthesizedDocument {
        markdown: markdown.to_string(),
        is_fallback: false,
        missing_sections,
    }
}

/// Deterministic skeleton: placeholders for the outline, the original text
/// under "Uncertainties", and every question with its answer.
pub fn fallback_document(input: &str, clarifications: &[Clarification]) -> String {
    let mut sections: Vec<Section> = OUTLINE
        .iter()
        .map(|(heading, _)| Section {
            heading: heading.to_string(),
            body: PLACEHOLDER.to_string(),
        })
        .collect();

    let original = input.trim();
    sections.push(Section {
        heading: UNCERTAINTIES.to_string(),
        body: if original.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            original.to_string()
        },
    });

    let listed = clarifications
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let answer = if c.is_unanswered() {
                UNANSWERED
            } else {
                c.answer.trim()
            };
            format!("{}. {}\n   Answer: {}", i + 1, c.question, answer)
        })
        .collect::<Vec<_>>()
        .join("\n");
    sections.push(Section {
        heading: CLARIFICATIONS.to_string(),
        body: if listed.is_empty() {
            UNANSWERED.to_string()
        } else {
            listed
        },
    });

    Document {
        preamble: String::new(),
        sections,
    }
    .render()
}
