use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use stampede_config::{ConfigLoader, StampedeConfig};
use stampede_core::{
    AlbumScenario, ProductScenario, ProductSearchScenario, Scenario, ScenarioKind,
};
use stampede_http::HttpManager;
use stampede_logging::init_logging_from_config;
use stampede_runner::{LoadRunner, RunReport, RunSettings};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

mod cli;

use cli::{Cli, Commands, ConfigCommands, RunArgs};

/// Goes to stderr directly; logging is not installed until config has loaded
fn missing_config_notice(path: &Path) -> String {
    format!(
        "Configuration file not found: {}. Using environment and defaults.",
        path.display()
    )
}

/// Load configuration from file or use defaults
fn load_config(config_path: Option<&PathBuf>) -> Result<StampedeConfig> {
    let loader = ConfigLoader::new();

    match config_path {
        Some(path) => {
            if path.exists() {
                info!("Loading configuration from: {:?}", path);
                loader
                    .from_file(path)
                    .context(format!("Failed to load configuration from {:?}", path))
            } else {
                eprintln!("{} {}", "!".yellow().bold(), missing_config_notice(path));
                loader
                    .from_env()
                    .context("Failed to load configuration from environment")
            }
        }
        None => {
            debug!("No configuration file specified. Loading from environment or defaults.");
            loader
                .from_env()
                .context("Failed to load configuration from environment")
        }
    }
}

/// Fold `run` flags into the loaded configuration and re-validate it
fn apply_run_overrides(config: &mut StampedeConfig, args: &RunArgs) -> Result<()> {
    if let Some(host) = &args.host {
        config.target.host = host.clone();
    }
    if let Some(users) = args.users {
        config.load.users = users;
    }
    if let Some(spawn_rate) = args.spawn_rate {
        config.load.spawn_rate = spawn_rate;
    }
    if let Some(run_time) = args.run_time {
        config.load.run_time = Some(
            Duration::try_from_secs_f64(run_time)
                .context(format!("Invalid run time: {}", run_time))?,
        );
    }
    if args.iterations.is_some() {
        config.load.iterations = args.iterations;
    }
    if args.seed.is_some() {
        config.load.seed = args.seed;
    }
    if let Some(product_count) = args.product_count {
        config.scenarios.product.product_count = product_count;
    }
    if let Some(encoding) = args.body_encoding {
        config.scenarios.product.body_encoding = encoding;
    }
    if args.json.is_some() {
        config.report.json_path = args.json.clone();
    }
    if args.csv.is_some() {
        config.report.csv_path = args.csv.clone();
    }

    config
        .validate_all()
        .context("Invalid configuration after applying command line flags")?;
    Ok(())
}

/// Process exit status for a configured code, 1 when it does not fit a byte
fn exit_status(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

async fn run_scenario<S: Scenario>(scenario: S, config: &StampedeConfig) -> Result<RunReport> {
    let client = HttpManager::with_config(&config.target.host, config.http.clone().into())
        .context(format!("Failed to create HTTP client for {}", config.target.host))?;

    let runner = LoadRunner::new(scenario, Arc::new(client), RunSettings::from(&config.load))
        .with_target(config.target.host.clone());

    let stop = runner.stop_handle();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl-C, stopping users");
            stop.stop();
        }
    });

    let report = runner.run().await;
    ctrl_c.abort();

    report.context("Load test failed")
}

/// Run a load test and write its reports
async fn run_command(config: &StampedeConfig, args: &RunArgs) -> Result<ExitCode> {
    info!(
        "Running {} scenario against {}",
        args.scenario, config.target.host
    );

    let report = match args.scenario {
        ScenarioKind::Album => run_scenario(AlbumScenario::new(), config).await?,
        ScenarioKind::Product => {
            run_scenario(ProductScenario::from_config(&config.scenarios.product), config).await?
        }
        ScenarioKind::ProductSearch => {
            run_scenario(
                ProductSearchScenario::from_config(&config.scenarios.search),
                config,
            )
            .await?
        }
    };

    if !args.quiet {
        println!("{}", report.render_table());
    }

    if let Some(path) = &config.report.json_path {
        report
            .write_json(path)
            .context(format!("Failed to write JSON report to {:?}", path))?;
    }
    if let Some(path) = &config.report.csv_path {
        report
            .write_csv(path)
            .context(format!("Failed to write CSV report to {:?}", path))?;
    }

    let summary = format!(
        "{} requests, {} failures in {:.1}s ({})",
        report.aggregated.num_requests,
        report.aggregated.num_failures,
        report.duration_secs,
        report.stop_reason
    );

    if report.has_failures() {
        eprintln!("{} {}", "✗".red().bold(), summary);
        Ok(ExitCode::from(exit_status(
            config.report.exit_code_on_error,
        )))
    } else {
        eprintln!("{} {}", "✓".green().bold(), summary);
        Ok(ExitCode::SUCCESS)
    }
}

/// Print every built-in scenario with its tasks and weights
fn handle_scenarios(config: &StampedeConfig) {
    for kind in ScenarioKind::all() {
        let summary = kind.summary(&config.scenarios);
        println!("{}  {}", kind.as_str().green().bold(), summary.description);
        println!("    wait time: {}", summary.wait_time);
        for (task, weight) in &summary.tasks {
            println!("    {:<20} weight {}", task, weight);
        }
        println!();
    }
}

/// Handle configuration validation
fn handle_config_validate(config_file: &PathBuf) -> Result<()> {
    info!("Validating configuration file: {:?}", config_file);

    if !config_file.exists() {
        return Err(anyhow::anyhow!(
            "Configuration file not found: {:?}",
            config_file
        ));
    }

    match load_config(Some(config_file)) {
        Ok(_config) => {
            println!("{} Configuration file is valid", "✓".green());
            info!("Configuration validation passed");
            Ok(())
        }
        Err(e) => {
            println!("{} Configuration validation failed: {:#}", "✗".red(), e);
            error!("Configuration validation failed: {}", e);
            Err(e)
        }
    }
}

/// Handle configuration generation
fn handle_config_generate(output: &Path, force: bool) -> Result<()> {
    info!("Generating configuration at: {:?}", output);

    if output.exists() && !force {
        return Err(anyhow::anyhow!(
            "Output file already exists: {:?}. Use --force to overwrite.",
            output
        ));
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("Failed to create output directory")?;
        }
    }

    fs::write(output, StampedeConfig::generate_sample())
        .context("Failed to write configuration file")?;

    println!("{} Configuration generated at: {:?}", "✓".green(), output);
    println!(
        "Validate with: stampede config validate --config-file {:?}",
        output
    );

    Ok(())
}

/// Render the effective configuration as YAML or JSON
fn render_config(config: &StampedeConfig, format: &str) -> Result<String> {
    match format.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml::to_string(config).context("Failed to serialize to YAML"),
        "json" => serde_json::to_string_pretty(config).context("Failed to serialize to JSON"),
        _ => Err(anyhow::anyhow!(
            "Unknown output format: {}. Valid formats: yaml, json",
            format
        )),
    }
}

fn handle_config_show(config: &StampedeConfig, format: &str) -> Result<()> {
    debug!("Showing configuration (format: {})", format);
    println!("{}", render_config(config, format)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_ref())?;

    init_logging_from_config(&config.logging, cli.log_level.as_deref())?;
    debug!("Stampede CLI starting");

    match &cli.command {
        Some(Commands::Run(args)) => {
            apply_run_overrides(&mut config, args)?;
            run_command(&config, args).await
        }
        Some(Commands::Scenarios) => {
            handle_scenarios(&config);
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Config { config_cmd }) => {
            match config_cmd {
                ConfigCommands::Validate { config_file } => handle_config_validate(config_file)?,
                ConfigCommands::Generate { output, force } => {
                    handle_config_generate(output, *force)?
                }
                ConfigCommands::Show {
                    config_file,
                    format,
                } => {
                    if config_file.is_some() {
                        config = load_config(config_file.as_ref())?;
                    }
                    handle_config_show(&config, format)?
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        None => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            cmd.print_help().context("Failed to print help")?;
            println!();
            Ok(ExitCode::SUCCESS)
        }
    }
}
