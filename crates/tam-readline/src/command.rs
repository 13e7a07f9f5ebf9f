/// Slash commands understood by the REPL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NewChat,
    NewPatient,
    Help,
    Quit,
    Unknown(String),
}

pub const COMMANDS: [(&str, &str); 4] = [
    ("/new-chat", "discard this conversation and start over"),
    ("/new-patient", "forget the current patient and register another"),
    ("/help", "show this list"),
    ("/quit", "leave tam"),
];

impl Command {
    /// Parses a trimmed input line. Anything not starting with `/` is a
    /// chat message and yields `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let word = line.strip_prefix('/')?.split_whitespace().next().unwrap_or("");
        let command = match word {
            "new-chat" => Command::NewChat,
            "new-patient" => Command::NewPatient,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(format!("/{}", other)),
        };
        Some(command)
    }
}

/// Commands starting with the typed prefix.
pub fn matching_commands(prefix: &str) -> impl Iterator<Item = &'static str> + '_ {
    COMMANDS
        .iter()
        .map(|(name, _)| *name)
        .filter(move |name| name.starts_with(prefix))
}
