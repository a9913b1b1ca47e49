//! Process configuration for the generation backend.
//!
//! Read once at startup from the environment:
//!
//! | variable | required | meaning |
//! |---|---|---|
//! | `GOOGLE_API_KEY` | yes | Gemini API credential |
//! | `GEMINI_MODEL_NAME` | no | model override (default `gemini-2.5-flash`) |
//! | `PARLEY_REQUEST_TIMEOUT_SECS` | no | HTTP timeout in whole seconds |

use parley_core::error::{ParleyError, Result};
use std::fmt;
use std::time::Duration;

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const MODEL_NAME_VAR: &str = "GEMINI_MODEL_NAME";
pub const REQUEST_TIMEOUT_VAR: &str = "PARLEY_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Settings for the Gemini client.
#[derive(Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub api_key: String,
    pub model: String,
    pub request_timeout: Option<Duration>,
}

impl GenerationConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Config` if the API key is missing or blank, or
    /// if the timeout is not a positive integer.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                ParleyError::config(format!("{API_KEY_VAR} is not set in the environment"))
            })?;

        let model = lookup(MODEL_NAME_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let request_timeout = match lookup(REQUEST_TIMEOUT_VAR) {
            None => None,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ParleyError::config(format!(
                        "{REQUEST_TIMEOUT_VAR} must be a positive number of seconds, got '{raw}'"
                    )));
                }
            },
        };

        Ok(Self {
            api_key,
            model,
            request_timeout,
        })
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = GenerationConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_is_config_error() {
        let err = GenerationConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "   ")])).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "k-123")])).unwrap();
        assert_eq!(config.api_key, "k-123");
        assert_eq!(config.model, DEFAULT_GEMINI_MODEL);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = GenerationConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "k-123"),
            (MODEL_NAME_VAR, "gemini-2.5-pro"),
            (REQUEST_TIMEOUT_VAR, "45"),
        ]))
        .unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(45)));
    }

    #[test]
    fn test_invalid_timeout_is_config_error() {
        for raw in ["0", "soon", "-3"] {
            let err = GenerationConfig::from_lookup(lookup_from(&[
                (API_KEY_VAR, "k-123"),
                (REQUEST_TIMEOUT_VAR, raw),
            ]))
            .unwrap_err();
            assert!(err.is_config(), "expected config error for '{raw}'");
        }
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config =
            GenerationConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "super-secret")])).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
