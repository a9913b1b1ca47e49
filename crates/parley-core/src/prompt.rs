//! Prompt composition.
//!
//! Exactly two prompt shapes are ever sent to the generation boundary:
//!
//! - the seed prompt that opens a scenario, and
//! - the follow-up prompt that carries the whole transcript and asks for the
//!   next turn plus coaching feedback.
//!
//! Both are plain string composition; nothing here performs I/O.

use crate::error::{ParleyError, Result};
use crate::scenario::{Scenario, ScenarioKind};
use crate::session::ConversationMessage;
use std::fmt::Write;

const FOLLOW_UP_HEADER: &str =
    "Continue the social skills coaching scenario based on the following conversation:";

const PREDEFINED_FOCUS: &str = "approachability, conversation skills, and rapport-building (or other relevant skills for the chosen scenario)";

const CUSTOM_FOCUS: &str = "the social skills relevant to the custom scenario";

/// Builds the prompt that starts `scenario`.
///
/// Predefined scenarios return their template verbatim. The custom variant
/// appends `custom_text` to its prefix and rejects missing or blank text.
///
/// # Errors
///
/// Returns `ParleyError::Validation` for the custom variant when
/// `custom_text` is `None`, empty, or whitespace-only.
pub fn build_seed_prompt(scenario: &Scenario, custom_text: Option<&str>) -> Result<String> {
    match scenario.kind {
        ScenarioKind::Predefined => Ok(scenario.seed_template.clone()),
        ScenarioKind::Custom => match custom_text {
            Some(text) if !text.trim().is_empty() => {
                Ok(format!("{}{}", scenario.seed_template, text))
            }
            _ => Err(ParleyError::validation(
                "Please enter your custom scenario.",
            )),
        },
    }
}

/// Flattens the log into `"{role}: {content}\n\n"` blocks in log order.
pub fn render_transcript(messages: &[ConversationMessage]) -> String {
    let mut transcript = String::new();
    for message in messages {
        // Writing into a String cannot fail.
        let _ = write!(transcript, "{}: {}\n\n", message.role, message.content);
    }
    transcript
}

/// Builds the coaching prompt sent after a user turn.
///
/// The only scenario-dependent part is which skills the feedback focuses on.
pub fn build_follow_up_prompt(messages: &[ConversationMessage], kind: ScenarioKind) -> String {
    let focus = match kind {
        ScenarioKind::Predefined => PREDEFINED_FOCUS,
        ScenarioKind::Custom => CUSTOM_FOCUS,
    };

    format!(
        "{FOLLOW_UP_HEADER}\n\n{transcript}\n\nAs the social skills coach, provide the next turn in the conversation, and then provide specific feedback on the user's last response, focusing on {focus}. If the user's response was ineffective, explain why and suggest how they could have responded better.\n",
        transcript = render_transcript(messages),
    )
}
