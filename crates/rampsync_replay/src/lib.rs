//! Headless scenario replay for rampsync: feeds scripted edits through the
//! core API and reports the resulting parameter state.

/// Step-by-step replay of a parsed scenario.
pub mod runner;
/// Scenario file format.
pub mod scenario;

pub use runner::{replay, replay_to_json, ReplayReport, StepOutcome};
pub use scenario::{load_scenario, parse_scenario, AnyScenario, Scenario, Step};
