//! Report output configuration

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Write the full run report as JSON here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_path: Option<PathBuf>,

    /// Write the per-request stats table as CSV here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_path: Option<PathBuf>,

    /// Process exit code when any request failed
    #[serde(default = "default_exit_code_on_error")]
    pub exit_code_on_error: i32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            json_path: None,
            csv_path: None,
            exit_code_on_error: default_exit_code_on_error(),
        }
    }
}

impl Validatable for ReportConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !(0..=255).contains(&self.exit_code_on_error) {
            return Err(self.validation_error(format!(
                "exit_code_on_error must be between 0 and 255, got {}",
                self.exit_code_on_error
            )));
        }

        if let (Some(json), Some(csv)) = (&self.json_path, &self.csv_path) {
            if json == csv {
                return Err(self.validation_error("json_path and csv_path must differ"));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "report"
    }
}

fn default_exit_code_on_error() -> i32 {
    1
}
