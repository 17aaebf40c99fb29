//! Load shape configuration: how many simulated users, how fast they
//! start and when the run ends

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Load shape configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Number of concurrent simulated users
    #[serde(default = "default_users")]
    pub users: u32,

    /// Users started per second
    #[serde(default = "default_spawn_rate")]
    pub spawn_rate: f64,

    /// Stop after this long (runs until interrupted or iterations are done if unset)
    #[serde(
        with = "crate::domains::utils::serde_duration_option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub run_time: Option<Duration>,

    /// Tasks each user runs before it stops
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u64>,

    /// Seed for reproducible request mixes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Grace period for in-flight requests once the run stops
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_stop_timeout"
    )]
    pub stop_timeout: Duration,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            users: default_users(),
            spawn_rate: default_spawn_rate(),
            run_time: None,
            iterations: None,
            seed: None,
            stop_timeout: default_stop_timeout(),
        }
    }
}

impl Validatable for LoadConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.users, "users", self.domain_name())?;
        validate_positive(self.spawn_rate, "spawn_rate", self.domain_name())?;

        if !self.spawn_rate.is_finite() {
            return Err(self.validation_error("spawn_rate must be a finite number"));
        }

        if let Some(run_time) = self.run_time {
            if run_time.is_zero() {
                return Err(self.validation_error("run_time must be greater than 0"));
            }
        }

        if let Some(iterations) = self.iterations {
            validate_positive(iterations, "iterations", self.domain_name())?;
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "load"
    }
}

fn default_users() -> u32 {
    1
}

fn default_spawn_rate() -> f64 {
    1.0
}

fn default_stop_timeout() -> Duration {
    Duration::from_secs(10)
}
