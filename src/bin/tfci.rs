//! tfci CLI Binary
//!
//! Runs one command inside a CI step and reports its outputs to the CI platform.

use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use tfci::cli::{Cli, RunContext};
use tfci::config::{ConfigLoader, TfciConfig};
use tfci::environment::{build_environment, process_env, EnvSource};
use tfci::error::ApiError;
use tfci::logging::init_logging;
use tracing::{error, info, info_span};

fn main() {
    let cli = Cli::parse();

    let config = match build_config(&cli, &process_env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", tfci::cli::map_error(&e).red());
            process::exit(1);
        }
    };

    // Initialize logging early
    if let Err(e) = init_logging(Some(&config.logging)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let environment = build_environment(&process_env, &config.output.environment_options());
    let mut context = RunContext::new(config, environment);
    let span = info_span!("tfci", platform = %context.platform());
    let _enter = span.enter();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting tfci");

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("{}", tfci::cli::map_error(&e).red());
            process::exit(1);
        }
    }
}

/// Build the effective configuration.
/// Precedence: CLI flags override TF_LOG* variables override config files override defaults.
fn build_config(cli: &Cli, env: &dyn EnvSource) -> Result<TfciConfig, ApiError> {
    let mut config = match cli.config {
        Some(ref config_path) => ConfigLoader::load_from_file(config_path)?,
        None => ConfigLoader::load(&cli.workspace)?,
    };

    config.logging.apply_env(env);

    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.logging.format = format.clone();
    }
    if let Some(platform) = cli.platform {
        config.output.platform = platform;
    }
    if cli.no_echo {
        config.output.echo_stdout = false;
    }

    Ok(config)
}
