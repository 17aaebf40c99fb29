//! Logging setup for Stampede
//!
//! Everything logs through `tracing`; this crate only decides which
//! subscriber gets installed. Output always goes to stderr so stdout stays
//! reserved for the run report.

pub mod init;

pub use init::{build_env_filter, init_logging_from_config, select_env_filter};
