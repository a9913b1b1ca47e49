//! Scenario state machine.
//!
//! `ScenarioController` owns one session's state and drives it through
//! discrete events raised by the presentation layer:
//!
//! ```text
//!            select(predefined) / ensure_initialized
//! Uninitialized ─────────────────────────────────────▶ Active ◀─┐
//!       │                                               │       │ submit_user_turn
//!       │ select(custom)                                └───────┘
//!       ▼                                               ▲
//! AwaitingCustomInput ─── submit_custom_scenario(text) ─┘
//! ```
//!
//! Each event issues at most one generation call. Calls take `&mut self`, so
//! a session can never have two requests in flight.

use parley_core::error::{ParleyError, Result};
use parley_core::generation::Generator;
use parley_core::prompt::{build_follow_up_prompt, build_seed_prompt};
use parley_core::scenario::{Scenario, ScenarioCatalog, ScenarioKind};
use parley_core::session::{MessageRole, SessionPhase, SessionState};
use serde::Serialize;
use std::sync::Arc;

/// What an event did to the session, for the presentation layer to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// A scenario was seeded; `reply` is its opening message.
    Started { reply: String },
    /// A user turn was answered.
    Replied { reply: String },
    /// The custom variant is selected and needs a description.
    AwaitingCustomInput,
    /// The event was a no-op (e.g. re-selecting the running scenario).
    Unchanged,
}

/// Drives one session through the scenario state machine.
pub struct ScenarioController {
    catalog: Arc<ScenarioCatalog>,
    generator: Arc<dyn Generator>,
    state: SessionState,
}

impl ScenarioController {
    /// Creates a controller for a fresh session on the catalog's default
    /// scenario. Nothing is generated until an event arrives.
    pub fn new(catalog: Arc<ScenarioCatalog>, generator: Arc<dyn Generator>) -> Self {
        let state = SessionState::new(catalog.default_scenario());
        tracing::info!(
            session_id = %state.id,
            scenario = %state.current_scenario(),
            generator = %generator.label(),
            "Session created"
        );
        Self {
            catalog,
            generator,
            state,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    /// The scenario currently selected, for headers like
    /// "Scenario: {name} - {description}".
    pub fn current_scenario(&self) -> Result<&Scenario> {
        self.catalog.get(self.state.current_scenario())
    }

    /// Consumes the controller at session end, handing back its state.
    pub fn into_state(self) -> SessionState {
        self.state
    }

    /// Seeds the current scenario if it has not been seeded yet.
    ///
    /// No-op when the log already has messages. For the custom variant this
    /// only reports that a description is needed.
    pub async fn ensure_initialized(&mut self) -> Result<TurnOutcome> {
        match self.state.phase() {
            SessionPhase::Active => Ok(TurnOutcome::Unchanged),
            SessionPhase::AwaitingCustomInput => Ok(TurnOutcome::AwaitingCustomInput),
            SessionPhase::Uninitialized => {
                let catalog = Arc::clone(&self.catalog);
                let scenario = catalog.get(self.state.current_scenario())?;
                self.seed(scenario, None).await
            }
        }
    }

    /// Switches the session to the scenario called `name`.
    ///
    /// Re-selecting the running scenario while it has messages is a no-op.
    /// Any other selection drops the log and, for predefined scenarios,
    /// seeds the new one. On a generation failure the session keeps the
    /// scenario and log it had before the call.
    ///
    /// # Errors
    ///
    /// - `ParleyError::NotFound` if `name` is not in the catalog
    /// - `ParleyError::Generation` if seeding fails
    pub async fn select_scenario(&mut self, name: &str) -> Result<TurnOutcome> {
        let catalog = Arc::clone(&self.catalog);
        let scenario = catalog.get(name)?;

        if scenario.name == self.state.current_scenario() && !self.state.messages().is_empty() {
            tracing::debug!(
                session_id = %self.state.id,
                scenario = %scenario.name,
                "Scenario already running, ignoring re-selection"
            );
            return Ok(TurnOutcome::Unchanged);
        }

        tracing::info!(
            session_id = %self.state.id,
            from = %self.state.current_scenario(),
            to = %scenario.name,
            "Switching scenario"
        );
        self.start(scenario).await
    }

    /// Starts the current scenario over with an empty log.
    pub async fn restart_scenario(&mut self) -> Result<TurnOutcome> {
        let catalog = Arc::clone(&self.catalog);
        let scenario = catalog.get(self.state.current_scenario())?;

        tracing::info!(
            session_id = %self.state.id,
            scenario = %scenario.name,
            "Restarting scenario"
        );
        self.start(scenario).await
    }

    /// Accepts the description for the custom variant and seeds it.
    ///
    /// # Errors
    ///
    /// - `ParleyError::InvalidTransition` unless awaiting custom input
    /// - `ParleyError::Validation` if `text` is blank; the session stays in
    ///   `AwaitingCustomInput` and nothing is generated
    /// - `ParleyError::Generation` if seeding fails
    pub async fn submit_custom_scenario(&mut self, text: &str) -> Result<TurnOutcome> {
        let phase = self.state.phase();
        if phase != SessionPhase::AwaitingCustomInput {
            return Err(ParleyError::invalid_transition(
                "submit a custom scenario",
                phase,
            ));
        }

        let catalog = Arc::clone(&self.catalog);
        let scenario = catalog.get(self.state.current_scenario())?;
        self.seed(scenario, Some(text)).await
    }

    /// Switches to the custom variant and seeds it with `text` in one step,
    /// from any phase.
    ///
    /// The text is checked and the opening message generated before the
    /// session is touched, so a blank description or a generation failure
    /// leaves the current scenario and log as they were.
    ///
    /// # Errors
    ///
    /// - `ParleyError::Validation` if `text` is blank
    /// - `ParleyError::Generation` if seeding fails
    pub async fn start_custom_scenario(&mut self, text: &str) -> Result<TurnOutcome> {
        let catalog = Arc::clone(&self.catalog);
        let scenario = catalog.custom_scenario();

        tracing::info!(
            session_id = %self.state.id,
            from = %self.state.current_scenario(),
            to = %scenario.name,
            "Starting custom scenario"
        );
        self.seed(scenario, Some(text)).await
    }

    /// Appends the user's reply and asks for the next coached turn.
    ///
    /// If generation fails the user message stays in the log; the caller
    /// decides whether to resubmit.
    ///
    /// # Errors
    ///
    /// - `ParleyError::InvalidTransition` unless the scenario is active
    /// - `ParleyError::Validation` if `text` is blank (nothing is appended)
    /// - `ParleyError::Generation` if the follow-up call fails
    pub async fn submit_user_turn(&mut self, text: &str) -> Result<TurnOutcome> {
        let phase = self.state.phase();
        if phase != SessionPhase::Active {
            return Err(ParleyError::invalid_transition("submit a turn", phase));
        }
        if text.trim().is_empty() {
            return Err(ParleyError::validation("Please enter a response."));
        }

        self.state.append(MessageRole::User, text);
        let prompt = build_follow_up_prompt(self.state.messages(), self.state.current_kind());

        tracing::debug!(
            session_id = %self.state.id,
            messages = self.state.messages().len(),
            prompt_len = prompt.len(),
            "Requesting follow-up"
        );
        let reply = self.generate(prompt).await?;
        self.state.append(MessageRole::Assistant, reply.clone());

        Ok(TurnOutcome::Replied { reply })
    }

    async fn start(&mut self, scenario: &Scenario) -> Result<TurnOutcome> {
        match scenario.kind {
            ScenarioKind::Custom => {
                self.state.reset_for(scenario);
                Ok(TurnOutcome::AwaitingCustomInput)
            }
            ScenarioKind::Predefined => self.seed(scenario, None).await,
        }
    }

    /// Generates the opening message and commits the switch only on success.
    async fn seed(&mut self, scenario: &Scenario, custom_text: Option<&str>) -> Result<TurnOutcome> {
        let prompt = build_seed_prompt(scenario, custom_text)?;
        let reply = self.generate(prompt.clone()).await?;

        self.state.reset_for(scenario);
        self.state.seed(prompt, custom_text, reply.clone());

        tracing::info!(
            session_id = %self.state.id,
            scenario = %scenario.name,
            "Scenario started"
        );
        Ok(TurnOutcome::Started { reply })
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        match self.generator.generate(&prompt).await {
            Ok(reply) => Ok(reply),
            Err(source) => {
                tracing::warn!(
                    session_id = %self.state.id,
                    error = %source,
                    retryable = source.is_retryable(),
                    "Generation failed"
                );
                Err(ParleyError::generation(prompt, source))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parley_core::generation::GenerationFailure;

    struct EchoGenerator;

    #[async_trait]
    impl Generator for EchoGenerator {
        fn label(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationFailure> {
            Ok(format!("echo({} chars)", prompt.len()))
        }
    }

    fn controller() -> ScenarioController {
        ScenarioController::new(Arc::new(ScenarioCatalog::builtin()), Arc::new(EchoGenerator))
    }

    #[test]
    fn test_new_controller_starts_on_default_without_generating() {
        let controller = controller();
        assert_eq!(controller.phase(), SessionPhase::Uninitialized);
        assert_eq!(
            controller.current_scenario().unwrap().name,
            "Networking Event"
        );
        assert!(controller.state().messages().is_empty());
    }

    #[tokio::test]
    async fn test_submit_turn_before_start_is_invalid() {
        let mut controller = controller();
        let err = controller.submit_user_turn("Hello").await.unwrap_err();
        assert!(matches!(err, ParleyError::InvalidTransition { .. }));
        assert!(controller.state().messages().is_empty());
    }

    #[tokio::test]
    async fn test_custom_submission_outside_custom_is_invalid() {
        let mut controller = controller();
        controller.ensure_initialized().await.unwrap();
        let err = controller
            .submit_custom_scenario("A job review")
            .await
            .unwrap_err();
        assert!(matches!(err, ParleyError::InvalidTransition { .. }));
        assert_eq!(controller.state().messages().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_user_turn_is_rejected_without_appending() {
        let mut controller = controller();
        controller.ensure_initialized().await.unwrap();

        let err = controller.submit_user_turn("  ").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(controller.state().messages().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_custom_start_keeps_active_conversation() {
        let mut controller = controller();
        controller.ensure_initialized().await.unwrap();
        controller.submit_user_turn("Hi there").await.unwrap();

        let err = controller.start_custom_scenario("   ").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(controller.state().current_scenario(), "Networking Event");
        assert_eq!(controller.state().messages().len(), 3);
        assert_eq!(controller.phase(), SessionPhase::Active);
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let json = serde_json::to_value(TurnOutcome::Started {
            reply: "Hi".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"type": "started", "data": {"reply": "Hi"}}));

        let json = serde_json::to_value(TurnOutcome::Unchanged).unwrap();
        assert_eq!(json, serde_json::json!({"type": "unchanged"}));
    }
}
