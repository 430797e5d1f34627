//! Run command - Interactive drafting wizard.
//!
//! Walks one session through input → questions → draft → send on the
//! terminal. Ctrl-D or `quit` at any prompt ends the run.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use specwire_core::{CoreError, Session, Stage, Wizard};
use specwire_dispatch::TelegramSender;

use super::{completion_client, partial_delivery_note, print_notices, read_text, Globals};

#[derive(Args)]
pub struct RunArgs {
    /// Start with the idea read from this file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory for the exported document
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
enum InputChoice {
    Generate,
    Edit,
}

fn parse_input_choice(choice: &str) -> Option<InputChoice> {
    match choice.trim() {
        "g" => Some(InputChoice::Generate),
        "e" => Some(InputChoice::Edit),
        _ => None,
    }
}

pub async fn execute(args: RunArgs, globals: &Globals) -> Result<()> {
    let settings = globals.settings()?;
    let wizard = Wizard::new(completion_client(&settings.completion), settings.messaging);
    let mut rl = DefaultEditor::new()?;

    let mut session = Session::new();
    if let Some(ref path) = args.input {
        session.set_input(read_text(path)?)?;
    }
    info!(session = %session.id, "Interactive session started");

    println!("📝 specwire: type `quit` at any prompt to leave");
    loop {
        let flow = match session.stage {
            Stage::Input => input_step(&wizard, &mut session, &mut rl).await?,
            Stage::Questions => questions_step(&wizard, &mut session, &mut rl).await?,
            Stage::Draft => draft_step(&wizard, &mut session, &mut rl, &args).await?,
        };
        if let Flow::Quit = flow {
            break;
        }
    }

    println!("👋 Bye");
    Ok(())
}

/// One line from the editor; `None` means the user wants out.
fn prompt(rl: &mut DefaultEditor, text: &str) -> Result<Option<String>> {
    prompt_with(rl, text, "")
}

fn prompt_with(rl: &mut DefaultEditor, text: &str, initial: &str) -> Result<Option<String>> {
    match rl.readline_with_initial(text, (initial, "")) {
        Ok(line) if line.trim() == "quit" => Ok(None),
        Ok(line) => {
            if !line.trim().is_empty() {
                let _ = rl.add_history_entry(line.as_str());
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Multi-line text, finished by an empty line.
fn read_block(rl: &mut DefaultEditor) -> Result<Option<String>> {
    let mut lines = Vec::new();
    loop {
        match prompt(rl, "… ")? {
            None => return Ok(None),
            Some(line) if line.trim().is_empty() => break,
            Some(line) => lines.push(line),
        }
    }
    Ok(Some(lines.join("\n")))
}

async fn input_step(wizard: &Wizard, session: &mut Session, rl: &mut DefaultEditor) -> Result<Flow> {
    if session.input.trim().is_empty() {
        println!("\n💡 Step 1. Describe your idea or paste a draft spec (empty line to finish):");
        match read_block(rl)? {
            Some(text) => session.set_input(text)?,
            None => return Ok(Flow::Quit),
        }
    } else {
        println!("\n💡 Step 1. Current input:\n{}", session.input);
        loop {
            let Some(choice) = prompt(rl, "[g]enerate questions, [e]dit input > ")? else {
                return Ok(Flow::Quit);
            };
            match parse_input_choice(&choice) {
                Some(InputChoice::Generate) => break,
                Some(InputChoice::Edit) => {
                    session.set_input(String::new())?;
                    return Ok(Flow::Continue);
                }
                None => println!("⚠️  Unknown choice: {}", choice.trim()),
            }
        }
    }

    println!("⏳ Generating clarifying questions...");
    match wizard.generate_questions(session).await {
        Ok(notices) => print_notices(&notices),
        Err(CoreError::EmptyInput) => println!("⚠️  Nothing to work with yet, please enter some text"),
        Err(e) => return Err(e.into()),
    }
    Ok(Flow::Continue)
}

async fn questions_step(
    wizard: &Wizard,
    session: &mut Session,
    rl: &mut DefaultEditor,
) -> Result<Flow> {
    println!("\n❓ Step 2. Answer the questions (empty to skip):");
    for i in 0..session.questions.len() {
        println!("\n{}. {}", i + 1, session.questions[i]);
        let current = session.answers.get(&i).cloned().unwrap_or_default();
        match prompt_with(rl, "> ", &current)? {
            Some(answer) => session.answer(i, answer.trim())?,
            None => return Ok(Flow::Quit),
        }
    }

    loop {
        let Some(choice) = prompt(rl, "\n[b]uild document, [r]e-answer, [back] to input > ")? else {
            return Ok(Flow::Quit);
        };
        match choice.trim() {
            "b" => {
                println!("⏳ Building the document...");
                let notices = wizard.build_document(session).await?;
                print_notices(&notices);
                return Ok(Flow::Continue);
            }
            "r" => return Ok(Flow::Continue),
            "back" => {
                session.back()?;
                return Ok(Flow::Continue);
            }
            other => println!("⚠️  Unknown choice: {}", other),
        }
    }
}

async fn draft_step(
    wizard: &Wizard,
    session: &mut Session,
    rl: &mut DefaultEditor,
    args: &RunArgs,
) -> Result<Flow> {
    println!("\n📄 Step 3. Document preview:\n\n{}\n", session.document);
    show_meta(wizard, session);

    loop {
        let Some(line) = prompt(
            rl,
            "\n[send], [dept <label>|-], [who <name>], [export], [reload], [show], [back] > ",
        )?
        else {
            return Ok(Flow::Quit);
        };
        let (command, rest) = match line.trim().split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line.trim(), ""),
        };

        match command {
            "send" => {
                let sender = match TelegramSender::from_settings(wizard.messaging()) {
                    Ok(sender) => sender,
                    Err(e) => {
                        println!("❌ {}", e);
                        continue;
                    }
                };
                println!("⏳ Sending to Telegram...");
                match wizard.send(session, &sender).await {
                    Ok(report) => {
                        println!("✅ Sent {} message(s), starting over", report.chunks_sent);
                        return Ok(Flow::Continue);
                    }
                    Err(e) => {
                        println!("❌ {}\n   The draft is kept, you can retry.", e);
                        if let CoreError::Dispatch(ref inner) = e {
                            if let Some(note) = partial_delivery_note(inner) {
                                println!("⚠️  {}", note);
                            }
                        }
                    }
                }
            }
            "dept" => {
                let label = if rest.is_empty() || rest == "-" { None } else { Some(rest) };
                match wizard.select_department(session, label) {
                    Ok(()) => show_meta(wizard, session),
                    Err(e) => println!("❌ {}", e),
                }
            }
            "who" => {
                session.set_submitter(rest);
                show_meta(wizard, session);
            }
            "export" => match wizard.export(session, &args.out_dir) {
                Ok(path) => println!(
                    "💾 Saved to {}; edit it and use `reload` to pick up changes",
                    path.display()
                ),
                Err(e) => println!("❌ {}", e),
            },
            "reload" => {
                let path = args.out_dir.join(specwire_core::EXPORT_FILE_NAME);
                match read_text(&path) {
                    Ok(text) => {
                        session.edit_document(text)?;
                        println!("🔄 Reloaded {}", path.display());
                    }
                    Err(e) => println!("❌ {:#}", e),
                }
            }
            "show" => return Ok(Flow::Continue),
            "back" => {
                session.back()?;
                return Ok(Flow::Continue);
            }
            other => println!("⚠️  Unknown command: {}", other),
        }
    }
}

fn show_meta(wizard: &Wizard, session: &Session) {
    let labels = wizard.messaging().department_labels();
    if !labels.is_empty() {
        println!("🏢 Departments: {}", labels.join(", "));
    }
    println!(
        "📮 Destination: {}",
        session.department.as_deref().unwrap_or("default chat")
    );
    if !session.submitter.trim().is_empty() {
        println!("👤 Submitter: {}", session.submitter);
    }
}
