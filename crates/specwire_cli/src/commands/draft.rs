//! Draft command - Build the spec document without the interactive wizard.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use tracing::info;

use specwire_chat::Clarification;
use specwire_core::{Session, Wizard};

use super::{completion_client, print_notices, read_text, Globals};

#[derive(Args)]
pub struct DraftArgs {
    /// File holding the idea or draft
    #[arg(short, long)]
    input: PathBuf,

    /// YAML list of {question, answer} entries; questions are generated when omitted
    #[arg(short, long)]
    answers: Option<PathBuf>,

    /// Write the document here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct AnswerEntry {
    question: String,
    #[serde(default)]
    answer: String,
}

fn load_answers(path: &Path) -> Result<Vec<Clarification>> {
    let content = read_text(path)?;
    let entries: Vec<AnswerEntry> = serde_yaml::from_str(&content)
        .with_context(|| format!("Invalid answers file {}", path.display()))?;

    Ok(entries
        .into_iter()
        .map(|entry| Clarification::new(entry.question, entry.answer))
        .collect())
}

pub async fn execute(args: DraftArgs, globals: &Globals) -> Result<()> {
    let settings = globals.settings()?;
    let wizard = Wizard::new(completion_client(&settings.completion), settings.messaging);

    let mut session = Session::new();
    session.set_input(read_text(&args.input)?)?;

    match args.answers {
        Some(ref path) => {
            let clarifications = load_answers(path)?;
            info!("Loaded {} answers from {}", clarifications.len(), path.display());
            session.load_clarifications(clarifications)?;
        }
        None => {
            let notices = wizard.generate_questions(&mut session).await?;
            print_notices(&notices);
            if !globals.quiet {
                eprintln!("📋 Drafting with {} unanswered questions", session.questions.len());
            }
        }
    }

    let notices = wizard.build_document(&mut session).await?;
    print_notices(&notices);

    match args.output {
        Some(path) => {
            fs::write(&path, &session.document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !globals.quiet {
                println!("✅ Document written to {}", path.display());
            }
        }
        None => println!("{}", session.document),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_answers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.yaml");
        fs::write(
            &path,
            "- question: Who are the users?\n  answer: Shoppers\n- question: What channels?\n",
        )
        .unwrap();

        let answers = load_answers(&path).unwrap();
        assert_eq!(answers[0], Clarification::new("Who are the users?", "Shoppers"));
        assert!(answers[1].is_unanswered());
    }

    #[test]
    fn test_invalid_answers_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.yaml");
        fs::write(&path, "question: not a list").unwrap();

        let err = load_answers(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid answers file"));
    }
}
