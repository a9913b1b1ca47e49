//! REPL input parsing.

use parley_core::scenario::ScenarioCatalog;

/// Slash commands offered for completion and hints.
pub const COMMANDS: &[&str] = &[
    "/scenarios",
    "/scenario",
    "/custom",
    "/restart",
    "/history",
    "/help",
];

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    ListScenarios,
    /// `/scenario <name or menu number>`
    Select(String),
    /// `/custom <description>`
    Custom(String),
    Restart,
    History,
    /// Anything that is not a command: a reply, or a custom description.
    /// Kept exactly as typed.
    Text(String),
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        if trimmed == "quit" || trimmed == "exit" {
            return Self::Quit;
        }
        if !trimmed.starts_with('/') {
            return Self::Text(line.to_string());
        }

        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };

        match name {
            "/help" => Self::Help,
            "/scenarios" => Self::ListScenarios,
            "/scenario" if rest.is_empty() => Self::ListScenarios,
            "/scenario" => Self::Select(rest.to_string()),
            // Blank text is passed through so the controller can reject it.
            "/custom" => Self::Custom(rest.to_string()),
            "/restart" => Self::Restart,
            "/history" => Self::History,
            _ => Self::Unknown(name.to_string()),
        }
    }
}

/// Resolves a 1-based menu number or a case-insensitive name to a catalog
/// name.
pub fn resolve_scenario<'a>(catalog: &'a ScenarioCatalog, arg: &str) -> Option<&'a str> {
    let arg = arg.trim();
    if let Ok(index) = arg.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| catalog.iter().nth(i))
            .map(|s| s.name.as_str());
    }
    catalog
        .names()
        .find(|name| name.eq_ignore_ascii_case(arg))
}
