//! Derived session phase.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Where a session sits in the scenario state machine.
///
/// The phase is computed from `SessionState`, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionPhase {
    /// A predefined scenario is selected but has not been seeded yet.
    Uninitialized,
    /// The custom variant is selected and no description has been accepted.
    AwaitingCustomInput,
    /// The seed prompt is resolved and the log holds at least one message.
    Active,
}
