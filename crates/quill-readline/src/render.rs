//! Colored terminal rendering for the REPL.

use colored::Colorize;
use quill_application::AnalysisReport;
use quill_core::mastery::{CognitiveLoad, Engagement, MAX_MASTERY};
use quill_core::session::{ChatMessage, ChatRole, ConversationStatus, SessionSnapshot};
use quill_core::task::WritingTask;

const BAR_WIDTH: usize = 20;

pub fn print_banner(task: &WritingTask) {
    println!("{}", "=== Quill: Adaptive Writing Coach ===".bright_magenta().bold());
    print_task(task);
    println!(
        "{}",
        "Type '/help' for commands. Anything else is sent to your coach.".bright_black()
    );
    println!();
}

pub fn print_task(task: &WritingTask) {
    println!("{}", task.title.bright_yellow().bold());
    println!("{}", task.description.yellow());
    for goal in &task.goals {
        println!("  {}", format!("- {}", goal).yellow());
    }
}

pub fn print_help() {
    let rows = [
        ("/write <text>", "Replace your draft"),
        ("/append <text>", "Add a line to your draft"),
        ("/clear", "Empty your draft"),
        ("/draft", "Show your draft"),
        ("/analyze", "Check the structure of your draft"),
        ("/state", "Show your learning state"),
        ("/history", "Show the conversation"),
        ("/task", "Show the writing task"),
        ("quit", "Leave the session"),
    ];
    for (command, description) in rows {
        println!("  {:<16} {}", command.bright_cyan(), description.bright_black());
    }
}

pub fn print_message(message: &ChatMessage) {
    let time = message.timestamp.format("%H:%M");
    match message.role {
        ChatRole::User => {
            println!("{}", format!("[{}] you", time).green());
            for line in message.content.lines() {
                println!("{}", line.green());
            }
        }
        ChatRole::Agent => {
            let label = match message.tag {
                Some(tag) => format!("[{}] coach ({:?})", time, tag).to_lowercase(),
                None => format!("[{}] coach", time),
            };
            println!("{}", label.bright_magenta());
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
        }
        ChatRole::System => {
            println!("{}", format!("[{}] system: {}", time, message.content).red());
        }
    }
}

pub fn print_history(snapshot: &SessionSnapshot) {
    for message in &snapshot.messages {
        print_message(message);
        println!();
    }
}

pub fn print_draft(draft: &str) {
    if draft.is_empty() {
        println!("{}", "(draft is empty)".bright_black());
        return;
    }
    println!("{}", format!("--- draft ({} chars) ---", draft.chars().count()).bright_black());
    println!("{}", draft);
    println!("{}", "---".bright_black());
}

pub fn print_state(snapshot: &SessionSnapshot) {
    let state = snapshot.mastery;
    println!(
        "{} {} {}",
        "mastery".bold(),
        mastery_bar(state.mastery),
        format!("{}/{}", state.mastery, MAX_MASTERY).bold()
    );

    let load = match state.cognitive_load {
        CognitiveLoad::Low => "low".bright_black(),
        CognitiveLoad::Optimal => "optimal".green(),
        CognitiveLoad::High => "high".red(),
    };
    let engagement = match state.engagement {
        Engagement::Active => "active".green(),
        Engagement::Passive => "passive".bright_black(),
    };
    println!("{} {}   {} {}", "load".bold(), load, "engagement".bold(), engagement);

    if snapshot.status == ConversationStatus::AwaitingResponse {
        println!("{}", "Waiting for the coach...".yellow());
    }
    if let Some(result) = &snapshot.latest_analysis {
        println!("{} {}", "last analysis".bold(), result.verdict.summary().bright_black());
    }
}

pub fn print_analysis(report: &AnalysisReport) {
    println!("{}", report.result.diagnostic_text.bright_yellow());
    println!(
        "{}",
        format!(
            "({} chars, {}) mastery {}",
            report.result.char_count,
            report.result.verdict.summary(),
            report.mastery
        )
        .bright_black()
    );
}

fn mastery_bar(mastery: u8) -> String {
    let filled = usize::from(mastery) * BAR_WIDTH / usize::from(MAX_MASTERY);
    format!(
        "[{}{}]",
        "#".repeat(filled).green(),
        "-".repeat(BAR_WIDTH - filled).bright_black()
    )
}
