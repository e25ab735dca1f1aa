use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use swarmpilot_config::{ConfigLoader, LogLevel, SwarmPilotConfig};
use swarmpilot_runtime::OrchestrationError;
use tracing::info;

mod cli;
mod commands;

use cli::{Cli, Commands, ConfigCommands};

/// Exit status for scenario, configuration and usage errors
const EXIT_INVALID: u8 = 1;
const EXIT_CONTROL_API: u8 = 2;
const EXIT_CANCELLED_UNCLEAN: u8 = 3;
const EXIT_CANCELLED: u8 = 130;

/// Load configuration from file or environment, then apply CLI overrides
fn load_config(cli: &Cli) -> Result<SwarmPilotConfig> {
    let loader = ConfigLoader::new();

    let mut config = match &cli.config {
        Some(path) => loader
            .from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => loader
            .from_env()
            .context("Failed to load configuration from environment")?,
    };

    if let Some(scenario) = &cli.scenario {
        config.orchestration.scenario_source = Some(scenario.clone());
    }
    if let Some(host) = &cli.host {
        config.orchestration.target_host = host.clone();
    }
    if let Some(control_url) = &cli.control_url {
        config.control_api.base_url = control_url.clone();
    }
    if let Some(level) = &cli.log_level {
        match level.parse::<LogLevel>() {
            Ok(level) => config.logging.level = level,
            Err(_) => eprintln!("Invalid log level '{}', keeping '{}'", level, config.logging.level),
        }
    }

    config
        .validate_all()
        .context("Invalid configuration after command-line overrides")?;
    Ok(config)
}

/// Map a failure onto the process exit status
fn exit_code(error: &anyhow::Error) -> u8 {
    let orchestration = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<OrchestrationError>());

    match orchestration {
        Some(OrchestrationError::Cancelled { final_stop_ok: true }) => EXIT_CANCELLED,
        Some(OrchestrationError::Cancelled { final_stop_ok: false }) => EXIT_CANCELLED_UNCLEAN,
        Some(OrchestrationError::ControlApi { .. } | OrchestrationError::InvariantViolation(_)) => {
            EXIT_CONTROL_API
        }
        None => EXIT_INVALID,
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    // Config commands work on their own file and must not fail on a broken default config
    if let Some(Commands::Config { config_cmd }) = &cli.command {
        swarmpilot_logging::init_simple_tracing(cli.log_level.as_deref().unwrap_or("warn"))?;
        return match config_cmd {
            ConfigCommands::Validate { config_file } => {
                commands::config::handle_config_validate(config_file)
            }
            ConfigCommands::Generate { output, force } => {
                commands::config::handle_config_generate(output.as_deref(), *force)
            }
        };
    }

    let config = load_config(&cli)?;
    swarmpilot_logging::init_logging_from_config(&config.logging)?;
    info!("SwarmPilot {} starting", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Some(Commands::Run) => commands::run::handle_run(&config).await,
        Some(Commands::Validate { source }) => {
            commands::scenario::handle_validate(&config, source.as_deref()).await
        }
        Some(Commands::Plan { source, format }) => {
            commands::scenario::handle_plan(&config, source.as_deref(), *format).await
        }
        Some(Commands::Generate(args)) => commands::generate::handle_generate(args),
        Some(Commands::Config { .. }) => Ok(()),
        None => {
            // If no subcommand is provided, print help
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            cmd.print_help().context("Failed to print help")?;
            println!();
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}
