//! Scenario error types

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("Unknown scenario '{0}'. Available scenarios: album, product, product-search")]
    UnknownScenario(String),

    #[error("Scenario '{0}' has no task with a positive weight")]
    NoRunnableTasks(String),
}
