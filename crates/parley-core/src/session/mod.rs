//! Session domain module.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`MessageRole`, `ConversationMessage`)
//! - `model`: Per-session state (`SessionState`)
//! - `phase`: Derived state-machine phase (`SessionPhase`)

mod message;
mod model;
mod phase;

// Re-export public API
pub use message::{ConversationMessage, MessageRole};
pub use model::SessionState;
pub use phase::SessionPhase;
