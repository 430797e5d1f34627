//! Questions command - Generate clarifying questions for an idea.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use specwire_core::{Session, Wizard};

use super::{completion_client, print_notices, read_text, Globals};

#[derive(Args)]
pub struct QuestionsArgs {
    /// File holding the idea or draft
    #[arg(short, long)]
    input: PathBuf,

    /// Print the questions as a JSON array
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: QuestionsArgs, globals: &Globals) -> Result<()> {
    let settings = globals.settings()?;
    info!("Generating questions with {}", settings.completion.model);

    let wizard = Wizard::new(completion_client(&settings.completion), settings.messaging);
    let mut session = Session::new();
    session.set_input(read_text(&args.input)?)?;

    let notices = wizard.generate_questions(&mut session).await?;
    print_notices(&notices);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&session.questions)?);
    } else {
        for (i, question) in session.questions.iter().enumerate() {
            println!("{}. {}", i + 1, question);
        }
    }

    Ok(())
}
