//! Application layer for Parley.
//!
//! Coordinates the scenario catalog, per-session state, prompt composition
//! and the generation backend into the scenario state machine.

pub mod scenario_controller;

pub use scenario_controller::{ScenarioController, TurnOutcome};
