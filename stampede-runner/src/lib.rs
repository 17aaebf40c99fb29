//! Load test harness for Stampede
//!
//! Starts simulated users at a fixed spawn rate, lets each of them run a
//! [`Scenario`](stampede_core::Scenario), collects per-request statistics and
//! turns them into a [`RunReport`] once the run stops.

pub mod error;
pub mod report;
pub mod runner;
pub mod settings;
pub mod stats;
pub mod user;

pub use error::{RunnerError, RunnerResult};
pub use report::RunReport;
pub use runner::{LoadRunner, StopHandle, StopReason};
pub use settings::RunSettings;
pub use stats::{
    bucket_response_time, EndpointStats, FailureStats, Percentile, RequestOutcome, StatsCollector,
    StatsSnapshot, AGGREGATED_NAME, PERCENTILES,
};
pub use user::{execute_request, SimulatedUser, UserSummary};
