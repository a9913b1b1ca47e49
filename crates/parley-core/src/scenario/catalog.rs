//! Ordered scenario registry and the built-in scenarios.

use super::model::{Scenario, ScenarioKind};
use crate::error::{ParleyError, Result};
use std::collections::HashSet;

/// Name of the scenario a new session starts in.
pub const DEFAULT_SCENARIO_NAME: &str = "Networking Event";

/// Name of the built-in custom variant.
pub const CUSTOM_SCENARIO_NAME: &str = "Custom Scenario";

/// Read-only registry of scenarios in menu order.
///
/// Invariants checked at construction:
/// - names are unique
/// - exactly one entry is the custom variant
/// - the default scenario is present
#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
    default_index: usize,
    custom_index: usize,
}

impl ScenarioCatalog {
    /// Builds a catalog from scenarios in display order.
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Config` if any catalog invariant is violated.
    pub fn new(scenarios: Vec<Scenario>, default_name: &str) -> Result<Self> {
        let mut seen = HashSet::new();
        for scenario in &scenarios {
            if !seen.insert(scenario.name.as_str()) {
                return Err(ParleyError::config(format!(
                    "duplicate scenario name '{}'",
                    scenario.name
                )));
            }
        }

        let custom: Vec<usize> = scenarios
            .iter()
            .enumerate()
            .filter(|(_, s)| s.kind == ScenarioKind::Custom)
            .map(|(i, _)| i)
            .collect();
        let custom_index = match custom.as_slice() {
            [index] => *index,
            _ => {
                return Err(ParleyError::config(format!(
                    "catalog must contain exactly one custom scenario, found {}",
                    custom.len()
                )));
            }
        };

        let default_index = scenarios
            .iter()
            .position(|s| s.name == default_name)
            .ok_or_else(|| ParleyError::not_found("scenario", default_name))?;

        Ok(Self {
            scenarios,
            default_index,
            custom_index,
        })
    }

    /// The scenarios every session offers out of the box.
    pub fn builtin() -> Self {
        Self {
            scenarios: builtin_scenarios(),
            // Networking Event
            default_index: 1,
            // Custom Scenario
            custom_index: 5,
        }
    }

    /// Looks up a scenario by exact name.
    pub fn get(&self, name: &str) -> Result<&Scenario> {
        self.scenarios
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ParleyError::not_found("scenario", name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scenarios.iter().any(|s| s.name == name)
    }

    /// Scenarios in menu order.
    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// The scenario a fresh session starts in.
    pub fn default_scenario(&self) -> &Scenario {
        &self.scenarios[self.default_index]
    }

    /// The custom variant.
    pub fn custom_scenario(&self) -> &Scenario {
        &self.scenarios[self.custom_index]
    }
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::predefined(
            "Job Interview",
            "Practice answering common interview questions, handling unexpected questions, and demonstrating professionalism.",
            "Act as a social skills coach. Simulate a job interview. I am the interviewee. Ask me the first interview question and provide feedback on my responses.",
        ),
        Scenario::predefined(
            DEFAULT_SCENARIO_NAME,
            "Simulate introducing yourself, making small talk, and exchanging contact information.",
            "Act as a social skills coach at a networking event. Initiate a conversation with me and guide me through introducing myself and making small talk. Provide feedback on my approachability, conversation skills, and ability to build rapport after my responses.",
        ),
        Scenario::predefined(
            "Doctor's Appointment",
            "Practice clearly explaining symptoms, asking questions, and understanding medical advice.",
            "Act as a doctor. I am your patient. Start the appointment by asking about my reason for visiting today. Provide feedback on my clarity and accuracy in describing my symptoms and answering your questions.",
        ),
        Scenario::predefined(
            "Attending a Party",
            "Practice navigating social situations, making introductions, and engaging in conversations.",
            "Act as a social skills coach at a party. Initiate a casual conversation with me. Provide feedback on my social awareness, conversation skills, and ability to mingle after my responses.",
        ),
        Scenario::predefined(
            "Expressing disagreement",
            "Practice stating your opinion in a respectful manner.",
            "Act as a social skills coach. Let's role-play a scenario where we have different opinions on a topic. I will state my initial view. You then present a contrasting view and provide feedback on how I express my disagreement and respond to your view.",
        ),
        Scenario::custom(
            CUSTOM_SCENARIO_NAME,
            "Enter your own custom social scenario.",
            "Act as a social skills coach. Simulate the following social scenario: ",
        ),
    ]
}
