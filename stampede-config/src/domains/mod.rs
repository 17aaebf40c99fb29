//! Domain-specific configuration modules

pub mod http;
pub mod load;
pub mod logging;
pub mod report;
pub mod scenarios;
pub mod target;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main Stampede configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StampedeConfig {
    /// Service under test
    #[serde(default)]
    pub target: target::TargetConfig,

    /// Simulated user count, ramp and run limits
    #[serde(default)]
    pub load: load::LoadConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Per-scenario tuning
    #[serde(default)]
    pub scenarios: scenarios::ScenariosConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Report outputs and exit code policy
    #[serde(default)]
    pub report: report::ReportConfig,
}

impl StampedeConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.target.validate()?;
        self.load.validate()?;
        self.http.validate()?;
        self.scenarios.validate()?;
        self.logging.validate()?;
        self.report.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = StampedeConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
