mod command;
mod render;

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use quill_application::{AnalysisReport, CoachingSession, SendOutcome};
use quill_core::secret::SecretService;
use quill_core::session::LearnerSession;
use quill_core::task::WritingTask;
use quill_infrastructure::{ConfigService, QuillPaths, SecretServiceImpl};

use crate::command::{COMMANDS, Command};

/// Interactive adaptive writing coach.
#[derive(Parser, Debug)]
#[command(name = "quill", version, about)]
struct Args {
    /// Directory holding config.toml and secret.json
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Override the Gemini model from config.toml
    #[arg(long)]
    model: Option<String>,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Results produced by background work, printed by the output task.
enum ReplEvent {
    Reply(SendOutcome),
    Analysis(Option<AnalysisReport>),
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Loads settings and secrets and wires the coaching session.
async fn bootstrap(args: &Args) -> Result<CoachingSession> {
    let paths = QuillPaths::new(args.config_dir.as_deref());

    let config_service = ConfigService::new(&paths)?;
    let mut config = config_service
        .get_config()
        .await
        .with_context(|| format!("Failed to load {:?}", config_service.path()))?;
    if let Some(model) = &args.model {
        config.coach.model = model.clone();
    }

    let secret_service = SecretServiceImpl::new(&paths)?;
    if !secret_service.secret_file_exists().await {
        tracing::info!("No secret.json found; relying on GEMINI_API_KEY");
    }
    let secrets = secret_service.load_secrets().await?;

    let task = WritingTask::default();
    let responder = quill_interaction::responder_from_secrets(&secrets, &config.coach, &task);

    Ok(CoachingSession::new(
        LearnerSession::new(task),
        responder,
        config.coach,
    ))
}

/// The main entry point for the Quill REPL.
///
/// Chat messages and analysis runs execute in background tasks; their
/// results are funneled through a channel to a single output task so the
/// prompt stays responsive while the coach is thinking.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let coach = bootstrap(&args).await?;
    let snapshot = coach.snapshot().await;

    // Channel for results of background work
    let (event_tx, mut event_rx) = mpsc::channel::<ReplEvent>(32);

    let output_handler = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                ReplEvent::Reply(SendOutcome::Replied { reply, mastery }) => {
                    for line in reply.lines() {
                        println!("{}", line.bright_blue());
                    }
                    println!("{}", format!("(mastery {})", mastery).bright_black());
                }
                ReplEvent::Reply(SendOutcome::Failed { notice, .. }) => {
                    println!("{}", notice.red());
                }
                ReplEvent::Reply(SendOutcome::Dropped) => {
                    println!(
                        "{}",
                        "Still waiting for the coach; message not sent.".yellow()
                    );
                }
                ReplEvent::Analysis(Some(report)) => render::print_analysis(&report),
                ReplEvent::Analysis(None) => {
                    println!("{}", "Analysis cancelled.".bright_black());
                }
            }
        }
    });

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    render::print_banner(&snapshot.task);
    if let Some(greeting) = snapshot.messages.first() {
        render::print_message(greeting);
        println!();
    }

    // Cancels whatever background work is in flight on CTRL-C
    let mut inflight = CancellationToken::new();

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match Command::parse(trimmed) {
                    Command::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Command::Chat(text) => {
                        let coach = coach.clone();
                        let tx = event_tx.clone();
                        let cancel = inflight.clone();
                        tokio::spawn(async move {
                            let outcome = coach.send_message(&text, cancel).await;
                            let _ = tx.send(ReplEvent::Reply(outcome)).await;
                        });
                    }
                    Command::Analyze => {
                        println!("{}", "Analyzing structure...".bright_black());
                        let coach = coach.clone();
                        let tx = event_tx.clone();
                        let cancel = inflight.clone();
                        tokio::spawn(async move {
                            let report = coach.analyze(cancel).await;
                            let _ = tx.send(ReplEvent::Analysis(report)).await;
                        });
                    }
                    Command::Write(text) => {
                        coach.update_draft(text).await;
                        println!("{}", "Draft replaced.".bright_black());
                    }
                    Command::Append(text) => {
                        coach.append_draft(&text).await;
                        println!("{}", "Line added.".bright_black());
                    }
                    Command::Clear => {
                        coach.clear_draft().await;
                        println!("{}", "Draft cleared.".bright_black());
                    }
                    Command::ShowDraft => render::print_draft(&coach.snapshot().await.draft),
                    Command::ShowState => render::print_state(&coach.snapshot().await),
                    Command::ShowHistory => render::print_history(&coach.snapshot().await),
                    Command::ShowTask => render::print_task(&snapshot.task),
                    Command::Help => render::print_help(),
                    Command::Unknown(name) => {
                        println!("{}", format!("Unknown command: {}", name).bright_black());
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                inflight.cancel();
                inflight = CancellationToken::new();
                println!(
                    "{}",
                    "CTRL-C detected. Pending work cancelled; type 'quit' to exit.".yellow()
                );
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    // Stop background work and let the output task drain
    inflight.cancel();
    drop(event_tx);
    let _ = output_handler.await;

    Ok(())
}
