//! Strata CLI Binary
//!
//! Command-line interface for resolving studio, project and task settings.

use clap::Parser;
use strata::cli::{map_error, Cli, RunContext};
use strata::config::ConfigLoader;
use strata::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{debug, error};

fn main() {
    let cli = Cli::parse();

    let logging_config = match build_logging_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let context = match RunContext::new(
        cli.workspace.clone(),
        cli.config.clone(),
        cli.overrides.clone(),
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing run context: {:#}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            debug!("Command completed");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Logging config from the config files, then CLI flags on top
fn build_logging_config(cli: &Cli) -> Result<LoggingConfig, String> {
    let loaded = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(&cli.workspace),
    };
    // Load errors surface again, with context, when the run context is built
    let mut config = loaded.map(|c| c.logging).unwrap_or_default();

    if let Some(level) = &cli.log_level {
        config.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.format = format.parse().map_err(|e| format!("{}", e))?;
    }
    Ok(config)
}
