//! Per-session state.

use super::message::{ConversationMessage, MessageRole};
use super::phase::SessionPhase;
use crate::scenario::{Scenario, ScenarioKind};
use serde::{Deserialize, Serialize};

/// State of one user session.
///
/// A session contains:
/// - The currently selected scenario
/// - The append-only message log for that scenario
/// - The seed prompt currently in force (empty until the scenario is seeded)
/// - The custom-scenario description, if one was accepted
///
/// One instance exists per session and is owned by its controller; nothing
/// here is shared between sessions or persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    current_scenario: String,
    current_kind: ScenarioKind,
    messages: Vec<ConversationMessage>,
    active_seed_prompt: String,
    custom_scenario_text: String,
}

impl SessionState {
    /// Creates a session positioned on `scenario` with an empty log.
    pub fn new(scenario: &Scenario) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            current_scenario: scenario.name.clone(),
            current_kind: scenario.kind,
            messages: Vec::new(),
            active_seed_prompt: String::new(),
            custom_scenario_text: String::new(),
        }
    }

    pub fn current_scenario(&self) -> &str {
        &self.current_scenario
    }

    pub fn current_kind(&self) -> ScenarioKind {
        self.current_kind
    }

    /// Messages in the order they were appended.
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// The seed prompt in force; empty means not yet seeded.
    pub fn active_seed_prompt(&self) -> &str {
        &self.active_seed_prompt
    }

    pub fn custom_scenario_text(&self) -> &str {
        &self.custom_scenario_text
    }

    pub fn phase(&self) -> SessionPhase {
        if !self.messages.is_empty() {
            SessionPhase::Active
        } else if self.current_kind == ScenarioKind::Custom {
            SessionPhase::AwaitingCustomInput
        } else {
            SessionPhase::Uninitialized
        }
    }

    /// Switches to `scenario`, dropping the log, seed prompt and custom text.
    pub fn reset_for(&mut self, scenario: &Scenario) {
        self.current_scenario = scenario.name.clone();
        self.current_kind = scenario.kind;
        self.messages.clear();
        self.active_seed_prompt.clear();
        self.custom_scenario_text.clear();
    }

    /// Records a resolved seed prompt and the reply it produced.
    pub fn seed(
        &mut self,
        seed_prompt: impl Into<String>,
        custom_text: Option<&str>,
        first_reply: impl Into<String>,
    ) {
        self.active_seed_prompt = seed_prompt.into();
        if let Some(text) = custom_text {
            self.custom_scenario_text = text.to_string();
        }
        self.messages.push(ConversationMessage::assistant(first_reply));
    }

    /// Appends a message to the end of the log.
    pub fn append(&mut self, role: MessageRole, content: impl Into<String>) {
        self.messages.push(ConversationMessage::new(role, content));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioCatalog;

    #[test]
    fn test_new_session_is_uninitialized_on_default() {
        let catalog = ScenarioCatalog::builtin();
        let state = SessionState::new(catalog.default_scenario());

        assert_eq!(state.current_scenario(), "Networking Event");
        assert!(state.messages().is_empty());
        assert!(state.active_seed_prompt().is_empty());
        assert_eq!(state.phase(), SessionPhase::Uninitialized);
        assert!(uuid::Uuid::parse_str(&state.id).is_ok());
    }

    #[test]
    fn test_seed_makes_session_active() {
        let catalog = ScenarioCatalog::builtin();
        let mut state = SessionState::new(catalog.default_scenario());

        state.seed("seed", None, "Hello there!");

        assert_eq!(state.phase(), SessionPhase::Active);
        assert_eq!(state.active_seed_prompt(), "seed");
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.messages()[0].role, MessageRole::Assistant);
        assert_eq!(state.messages()[0].content, "Hello there!");
    }

    #[test]
    fn test_reset_clears_everything_scenario_specific() {
        let catalog = ScenarioCatalog::builtin();
        let mut state = SessionState::new(catalog.custom_scenario());
        assert_eq!(state.phase(), SessionPhase::AwaitingCustomInput);

        state.seed("prefix + text", Some("a job review"), "Welcome.");
        state.append(MessageRole::User, "Thanks");
        assert_eq!(state.custom_scenario_text(), "a job review");

        let id = state.id.clone();
        state.reset_for(catalog.get("Job Interview").unwrap());

        assert_eq!(state.id, id);
        assert_eq!(state.current_scenario(), "Job Interview");
        assert_eq!(state.current_kind(), ScenarioKind::Predefined);
        assert!(state.messages().is_empty());
        assert!(state.active_seed_prompt().is_empty());
        assert!(state.custom_scenario_text().is_empty());
        assert_eq!(state.phase(), SessionPhase::Uninitialized);
    }

    #[test]
    fn test_append_preserves_order() {
        let catalog = ScenarioCatalog::builtin();
        let mut state = SessionState::new(catalog.default_scenario());
        state.seed("seed", None, "first");
        state.append(MessageRole::User, "second");
        state.append(MessageRole::Assistant, "third");

        let contents: Vec<&str> = state.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }
}
