pub mod capture;
pub mod compare;
pub mod demo;
pub mod export;
pub mod palette;
pub mod store;

pub use store::{CapturedValue, SaveOutcome, Scenario, ScenarioStore, ScenarioValues};
