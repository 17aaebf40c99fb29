//! Domain-driven configuration management for Stampede
//!
//! Configuration is split by functional domain (target, load shape, HTTP
//! client, scenarios, logging, reporting), loaded from YAML with
//! `STAMPEDE_*` environment overrides and validated per domain.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    http::HttpConfig,
    load::LoadConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    report::ReportConfig,
    scenarios::{BodyEncoding, ProductScenarioConfig, ScenariosConfig, SearchScenarioConfig},
    target::TargetConfig,
    StampedeConfig,
};

// Re-export utilities
pub use domains::utils::{serde_duration, serde_duration_option};
