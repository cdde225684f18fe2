//! Command implementations for the watershed processor CLI
//!
//! Each subcommand is implemented in its own module:
//! - `process`: run the pipeline over the raw data, then rebuild the manifest
//! - `index`: rebuild the manifest only
//! - `validate`: validate persisted records and write the report
//! - `resolve`: look up station and parameter codes

pub mod index;
pub mod process;
pub mod resolve;
pub mod shared;
pub mod validate;

use crate::Result;
use crate::cli::args::Commands;

/// Dispatch to the subcommand handler
pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Process(args) => process::run_process(args).map(|_| ()),
        Commands::Index(args) => index::run_index(args).map(|_| ()),
        Commands::Validate(args) => validate::run_validate(args).map(|_| ()),
        Commands::Resolve(args) => resolve::run_resolve(args).map(|_| ()),
    }
}
