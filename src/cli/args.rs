//! Command-line argument definitions for the watershed processor
//!
//! This module defines the CLI interface using the clap derive API. Every
//! subcommand shares the dataset root, config file and verbosity flags.

use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the watershed processor
///
/// Normalizes hydrological time-series into canonical per-location/per-year
/// JSON records and maintains the manifest index over them.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watershed-processor",
    version,
    about = "Normalize watershed time-series into canonical JSON records with a manifest index",
    long_about = "Processes USGS gauge payloads, water-quality CSV exports and research-paper text \
                  from a raw data directory into canonical per-location/per-year JSON records, \
                  rebuilds the manifest index that consumers use to locate them, and validates \
                  the persisted records against schema and plausibility rules."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Process raw payloads into canonical records, then rebuild the manifest
    Process(ProcessArgs),
    /// Rebuild the manifest from the persisted record files
    Index(IndexArgs),
    /// Validate persisted records and write the validation report
    Validate(ValidateArgs),
    /// Resolve station and parameter codes against the configured tables
    Resolve(ResolveArgs),
}

/// Flags shared by every subcommand
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct CommonArgs {
    /// Dataset root holding `data/`, `raw-data/` and `manifest.json`
    ///
    /// Overrides `[paths] base_dir` from the config file.
    #[arg(
        short = 'b',
        long = "base-dir",
        value_name = "PATH",
        help = "Dataset root directory"
    )]
    pub base_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// watershed-processor/config.toml in the user config directory.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors and critical messages
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the process command
#[derive(Debug, Clone, Default, Parser)]
pub struct ProcessArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Raw payload directory, defaulting to `<base-dir>/raw-data`
    #[arg(
        short = 'r',
        long = "raw-data",
        value_name = "PATH",
        help = "Directory holding raw provider payloads"
    )]
    pub raw_data_dir: Option<PathBuf>,

    /// Skip the manifest rebuild after writing records
    #[arg(long = "skip-index", help = "Do not rebuild the manifest after processing")]
    pub skip_index: bool,

    /// Create the manifest when it does not exist yet
    #[arg(
        long = "init-manifest",
        help = "Create a fresh manifest if none exists",
        conflicts_with = "skip_index"
    )]
    pub init_manifest: bool,

    /// List the payloads that would be processed without writing anything
    #[arg(
        long = "dry-run",
        help = "Show what would be processed without writing records"
    )]
    pub dry_run: bool,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the run summary"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the index command
#[derive(Debug, Clone, Default, Parser)]
pub struct IndexArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Create the manifest when it does not exist yet
    #[arg(long = "init-manifest", help = "Create a fresh manifest if none exists")]
    pub init_manifest: bool,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the index summary"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the validate command
#[derive(Debug, Clone, Default, Parser)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Exit with an error when any file is invalid
    #[arg(long = "strict", help = "Fail when any record is invalid")]
    pub strict: bool,

    /// Print the report without writing validation-report.json
    #[arg(long = "no-report", help = "Do not write validation-report.json")]
    pub no_report: bool,

    /// Maximum issues listed per section in human output
    #[arg(
        long = "max-issues",
        value_name = "COUNT",
        default_value_t = 20,
        help = "Maximum errors and warnings listed in human output"
    )]
    pub max_issues: usize,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the validation report"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the resolve command
#[derive(Debug, Clone, Default, Parser)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Station code to resolve, e.g. 15276000
    #[arg(short = 's', long = "station", value_name = "CODE")]
    pub station: Option<String>,

    /// Parameter code to resolve, e.g. 00060
    #[arg(short = 'p', long = "parameter", value_name = "CODE")]
    pub parameter: Option<String>,

    /// List every configured station and parameter code
    #[arg(long = "list", help = "List the configured resolver tables")]
    pub list: bool,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for resolved codes"
    )]
    pub output_format: OutputFormat,
}

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON format for scripting
    Json,
}

impl CommonArgs {
    /// Validate the shared arguments
    pub fn validate(&self) -> Result<()> {
        if let Some(base_dir) = &self.base_dir {
            if !base_dir.is_dir() {
                return Err(Error::configuration(format!(
                    "Base directory does not exist: {}",
                    base_dir.display()
                )));
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ResolveArgs {
    /// Validate that something was asked for
    pub fn validate(&self) -> Result<()> {
        self.common.validate()?;

        if self.station.is_none() && self.parameter.is_none() && !self.list {
            return Err(Error::configuration(
                "Specify --station, --parameter or --list".to_string(),
            ));
        }

        Ok(())
    }
}
