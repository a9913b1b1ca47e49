//! Domain layer for Parley.
//!
//! Scenarios, session state, prompt composition and the generation boundary
//! contract. Nothing in this crate performs I/O.

pub mod error;
pub mod generation;
pub mod prompt;
pub mod scenario;
pub mod session;

// Re-export common error type
pub use error::ParleyError;
pub use generation::{GenerationFailure, Generator};
