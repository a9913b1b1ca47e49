//! Error types for Parley.

use crate::generation::GenerationFailure;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the whole application.
///
/// Every fallible operation in the core returns this to its immediate
/// caller; nothing is swallowed on the way up.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ParleyError {
    /// User input rejected before any state change (recoverable, re-prompt).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The generation boundary failed; the prompt that was attempted is kept
    /// so the caller can show it or resubmit.
    #[error("Generation failed: {source}")]
    Generation {
        prompt: String,
        #[source]
        source: GenerationFailure,
    },

    /// Configuration error (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// An operation was invoked in a phase that does not accept it
    #[error("Cannot {operation} while session is {phase}")]
    InvalidTransition {
        operation: &'static str,
        phase: String,
    },
}

impl ParleyError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Generation error for the attempted prompt
    pub fn generation(prompt: impl Into<String>, source: GenerationFailure) -> Self {
        Self::Generation {
            prompt: prompt.into(),
            source,
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an InvalidTransition error
    pub fn invalid_transition(operation: &'static str, phase: impl ToString) -> Self {
        Self::InvalidTransition {
            operation,
            phase: phase.to_string(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a Generation error
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the prompt a failed generation was attempted with.
    pub fn attempted_prompt(&self) -> Option<&str> {
        match self {
            Self::Generation { prompt, .. } => Some(prompt),
            _ => None,
        }
    }
}

/// A type alias for `Result<T, ParleyError>`.
pub type Result<T> = std::result::Result<T, ParleyError>;
