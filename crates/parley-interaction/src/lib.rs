//! Outbound integrations: the Gemini REST client and the process
//! configuration it is built from.

pub mod config;
pub mod gemini_api_agent;

pub use config::GenerationConfig;
pub use gemini_api_agent::GeminiApiAgent;
