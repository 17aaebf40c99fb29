//! Run settings

use crate::error::{RunnerError, RunnerResult};
use stampede_config::LoadConfig;
use std::time::Duration;

const MAX_SPAWN_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// How many users to run, how fast to start them and when to stop
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub users: u32,
    /// Users started per second
    pub spawn_rate: f64,
    pub run_time: Option<Duration>,
    /// Tasks per user before it stops (setup requests not counted)
    pub iterations: Option<u64>,
    /// User `n` is seeded with `seed + n`
    pub seed: Option<u64>,
    /// How long stopping users may take to finish their current request
    pub stop_timeout: Duration,
}

impl Default for RunSettings {
    fn default() -> Self {
        (&LoadConfig::default()).into()
    }
}

impl From<&LoadConfig> for RunSettings {
    fn from(config: &LoadConfig) -> Self {
        Self {
            users: config.users,
            spawn_rate: config.spawn_rate,
            run_time: config.run_time,
            iterations: config.iterations,
            seed: config.seed,
            stop_timeout: config.stop_timeout,
        }
    }
}

impl RunSettings {
    pub fn validate(&self) -> RunnerResult<()> {
        if self.users == 0 {
            return Err(RunnerError::InvalidSettings(
                "users must be greater than 0".to_string(),
            ));
        }
        if !(self.spawn_rate.is_finite() && self.spawn_rate > 0.0) {
            return Err(RunnerError::InvalidSettings(format!(
                "spawn_rate must be a positive number, got {}",
                self.spawn_rate
            )));
        }
        if self.iterations == Some(0) {
            return Err(RunnerError::InvalidSettings(
                "iterations must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Delay between two consecutive user starts
    ///
    /// Capped at one day.
    pub fn spawn_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.spawn_rate)
            .unwrap_or(MAX_SPAWN_INTERVAL)
            .min(MAX_SPAWN_INTERVAL)
    }

    /// Whether the run only ends on an external stop
    pub fn is_unbounded(&self) -> bool {
        self.run_time.is_none() && self.iterations.is_none()
    }
}
