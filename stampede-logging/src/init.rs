use anyhow::Result;
use stampede_config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Initialize logging from configuration
///
/// `level_override` (typically the `--log-level` flag) wins over the
/// configured level. When neither is set, `RUST_LOG` is used, then `info`.
pub fn init_logging_from_config(config: &LoggingConfig, level_override: Option<&str>) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(select_env_filter(config, level_override))
        .with_writer(std::io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    // Use try_init to avoid panic if global subscriber already set
    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

/// Pick the filter for a run: flag, then config, then `RUST_LOG`, then `info`
pub fn select_env_filter(config: &LoggingConfig, level_override: Option<&str>) -> EnvFilter {
    let directives = level_override
        .map(str::to_string)
        .or_else(|| config.level.map(|level| level.to_string()));

    match directives {
        Some(directives) => build_env_filter(&directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Build a filter from a level or directive string with env and `info` fallbacks
pub fn build_env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
