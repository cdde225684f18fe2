//! Index command implementation

use super::shared::{load_config, print_field, print_heading, print_json, setup_logging};
use crate::app::services::manifest_indexer::{IndexStats, ManifestIndexer};
use crate::cli::args::{IndexArgs, OutputFormat};
use crate::Result;
use tracing::info;

/// Rebuild the manifest from the record files on disk
pub fn run_index(args: IndexArgs) -> Result<IndexStats> {
    setup_logging(&args.common)?;
    let config = load_config(&args.common)?;

    let indexer = ManifestIndexer::from_config(&config);
    info!("Rebuilding {}", indexer.manifest_path().display());
    let stats = indexer.reindex(args.init_manifest)?;

    match args.output_format {
        OutputFormat::Human => {
            print_heading(args.output_format, "Manifest rebuilt");
            print_field("Files indexed", stats.files_indexed);
            print_field("Files skipped", stats.files_skipped);
            print_field("Locations covered", stats.locations_covered);
            print_field(
                "Years covered",
                stats
                    .years_covered
                    .iter()
                    .map(|year| year.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            print_field("Changed", if stats.changed { "yes" } else { "no" });
        }
        OutputFormat::Json => print_json(&stats)?,
    }

    Ok(stats)
}
