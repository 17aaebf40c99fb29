//! Installs the global subscriber, so it lives in its own test binary

use stampede_config::LoggingConfig;
use stampede_logging::init_logging_from_config;
use tracing::Level;

#[test]
fn test_rust_log_drives_the_installed_subscriber() {
    temp_env::with_var("RUST_LOG", Some("debug"), || {
        init_logging_from_config(&LoggingConfig::default(), None).unwrap();
    });

    assert!(tracing::enabled!(Level::DEBUG));
    assert!(!tracing::enabled!(Level::TRACE));
}
