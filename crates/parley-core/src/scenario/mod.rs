//! Scenario catalog module.
//!
//! A scenario is a named social situation with a short description and the
//! seed instruction that starts the role-play. The catalog is built once per
//! process and shared read-only between sessions.
//!
//! # Module Structure
//!
//! - `model`: Scenario model (`Scenario`, `ScenarioKind`)
//! - `catalog`: Ordered registry and the built-in scenarios (`ScenarioCatalog`)
//!
//! # Usage
//!
//! ```ignore
//! use parley_core::scenario::{ScenarioCatalog, ScenarioKind};
//! ```

mod catalog;
mod model;

// Re-export public API
pub use catalog::{CUSTOM_SCENARIO_NAME, DEFAULT_SCENARIO_NAME, ScenarioCatalog};
pub use model::{Scenario, ScenarioKind};
