//! Scenario definitions for Stampede
//!
//! A scenario describes what one simulated user does: which requests it
//! sends (and how often relative to each other), how long it thinks between
//! them, and what makes a response count as a failure. Scenarios are pure;
//! sending and timing belong to `stampede-runner`.

pub mod check;
pub mod error;
pub mod payload;
pub mod request;
pub mod scenario;
pub mod scenarios;
pub mod task;
pub mod wait;

pub use check::{CheckFailure, ResponseCheck};
pub use error::ScenarioError;
pub use payload::{Album, Product};
pub use request::RequestSpec;
pub use scenario::{Scenario, ScenarioKind, ScenarioSummary};
pub use scenarios::{AlbumScenario, ProductScenario, ProductSearchScenario};
pub use task::{Task, TaskSet};
pub use wait::WaitTime;

pub use rand::rngs::StdRng;
