//! Generation boundary.
//!
//! The core treats text generation as an opaque call: one prompt in, one
//! reply out. Concrete clients (e.g. the Gemini REST agent in
//! `parley-interaction`) implement [`Generator`]; tests substitute a mock.
//!
//! No retry, streaming or token-limit handling happens on this side of the
//! boundary. A failure is reported once and left to the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a generation backend.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationFailure {
    /// The request never produced an HTTP response (connect error, timeout, ...).
    #[error("request failed: {message}")]
    Request { message: String, is_retryable: bool },

    /// The service answered with a non-success status.
    #[error("service returned {status_code}: {message}")]
    Http {
        status_code: u16,
        message: String,
        is_retryable: bool,
        retry_after_secs: Option<u64>,
    },

    /// The service answered, but the body could not be used.
    #[error("unusable response: {0}")]
    MalformedResponse(String),

    /// The prompt was rejected before anything was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GenerationFailure {
    /// Whether the backend considers the failure transient.
    ///
    /// This is informational only; the controller never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request { is_retryable, .. } | Self::Http { is_retryable, .. } => *is_retryable,
            Self::MalformedResponse(_) | Self::InvalidRequest(_) => false,
        }
    }

    /// Delay suggested by the service, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Http {
                retry_after_secs: Some(secs),
                ..
            } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }
}

/// A text-generation backend.
///
/// Implementations must be safe to share across sessions; per-session
/// sequencing is the controller's job.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Short human-readable label for logs (e.g. the model name).
    fn label(&self) -> &str;

    /// Generates a reply for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationFailure>;
}
