//! Shared components for CLI commands
//!
//! This module contains the logging setup, configuration loading and output
//! helpers used across the command implementations.

use crate::cli::args::{CommonArgs, OutputFormat};
use crate::config::Config;
use crate::{Error, Result};
use colored::Colorize;
use serde::Serialize;
use tracing::{debug, info};

/// Set up structured logging for a command
///
/// `RUST_LOG` wins over the verbosity flags when set.
pub fn setup_logging(common: &CommonArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = common.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("watershed_processor={}", log_level)));

    let result = if common.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    result.map_err(|e| Error::configuration(format!("Failed to initialise logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using the layered approach (defaults -> file -> args)
pub fn load_config(common: &CommonArgs) -> Result<Config> {
    common.validate()?;

    match &common.config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => debug!("No explicit config file, checking the user config directory"),
    }

    let mut config = Config::load(common.config_file.as_deref())?;
    if let Some(base_dir) = &common.base_dir {
        config = config.with_base_dir(base_dir);
    }

    debug!("Dataset root: {}", config.paths.base_dir.display());
    Ok(config)
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)
        .map_err(|e| Error::json("stdout", "Failed to serialize output", Some(e)))?;
    println!("{}", content);
    Ok(())
}

/// Print a section heading in human output
pub fn print_heading(format: OutputFormat, title: &str) {
    if format == OutputFormat::Human {
        println!("\n{}", title.bold());
        println!("{}", "━".repeat(title.chars().count().max(40)));
    }
}

/// Print a `label: value` line in human output
pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("   • {}: {}", label, value);
}
