//! Scenario model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Distinguishes complete seed instructions from the custom-scenario prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScenarioKind {
    /// The seed template is a complete instruction.
    Predefined,
    /// The seed template is a prefix that needs user-supplied text appended.
    Custom,
}

/// A named social-interaction template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique display name, also used as the lookup key
    pub name: String,
    /// Human-readable summary shown next to the name
    pub description: String,
    /// Instruction sent to start the role-play (a prefix for `Custom`)
    pub seed_template: String,
    /// Whether this is the custom variant
    pub kind: ScenarioKind,
}

impl Scenario {
    /// Creates a predefined scenario.
    pub fn predefined(
        name: impl Into<String>,
        description: impl Into<String>,
        seed_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            seed_template: seed_template.into(),
            kind: ScenarioKind::Predefined,
        }
    }

    /// Creates the custom variant, whose template is only a prefix.
    pub fn custom(
        name: impl Into<String>,
        description: impl Into<String>,
        seed_prefix: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            seed_template: seed_prefix.into(),
            kind: ScenarioKind::Custom,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.kind == ScenarioKind::Custom
    }
}
