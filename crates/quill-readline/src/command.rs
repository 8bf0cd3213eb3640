//! REPL input parsing.

/// Slash commands offered for completion, in display order.
pub const COMMANDS: &[&str] = &[
    "/write", "/append", "/clear", "/draft", "/analyze", "/state", "/history", "/task", "/help",
];

/// A parsed line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the draft.
    Write(String),
    /// Add a line to the draft.
    Append(String),
    Clear,
    ShowDraft,
    Analyze,
    ShowState,
    ShowHistory,
    ShowTask,
    Help,
    Quit,
    /// Anything that is not a command goes to the coach.
    Chat(String),
    /// A slash word we do not know.
    Unknown(String),
}

impl Command {
    /// Parses a trimmed, non-empty input line.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line == "quit" || line == "exit" {
            return Command::Quit;
        }
        if !line.starts_with('/') {
            return Command::Chat(line.to_string());
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "/write" => Command::Write(rest.to_string()),
            "/append" => Command::Append(rest.to_string()),
            "/clear" => Command::Clear,
            "/draft" => Command::ShowDraft,
            "/analyze" => Command::Analyze,
            "/state" => Command::ShowState,
            "/history" => Command::ShowHistory,
            "/task" => Command::ShowTask,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}
