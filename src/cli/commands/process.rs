//! Process command implementation
//!
//! Runs the normalization pipeline over the raw data directory and then
//! rebuilds the manifest from the files on disk.

use super::shared::{load_config, print_field, print_heading, print_json, setup_logging};
use crate::app::services::manifest_indexer::{IndexStats, ManifestIndexer};
use crate::app::services::pipeline::{Pipeline, RunSummary};
use crate::app::services::sources::{RawDataDirectory, SourceProvider};
use crate::cli::args::{OutputFormat, ProcessArgs};
use crate::Result;
use colored::Colorize;
use indicatif::HumanDuration;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Diagnostics listed individually in human output
const MAX_LISTED_DIAGNOSTICS: usize = 20;

/// Process command runner
///
/// This function orchestrates the processing workflow:
/// 1. Set up logging and configuration
/// 2. Check the manifest can be loaded, unless indexing is skipped
/// 3. Run the pipeline over every raw payload
/// 4. Rebuild the manifest and report
pub fn run_process(args: ProcessArgs) -> Result<RunSummary> {
    let start_time = Instant::now();

    setup_logging(&args.common)?;
    info!("Starting watershed processor");
    debug!("Command line arguments: {:?}", args);

    let mut config = load_config(&args.common)?;
    if let Some(raw_data_dir) = &args.raw_data_dir {
        config = config.with_raw_data_dir(raw_data_dir);
    }

    let provider = RawDataDirectory::new(config.raw_data_dir());
    info!("Reading payloads from {}", provider.dir().display());

    if args.dry_run {
        return run_dry_run(&provider, args.output_format);
    }

    let indexer = ManifestIndexer::from_config(&config);
    if !args.skip_index {
        // Fail before writing anything when the manifest is unusable
        indexer.load(args.init_manifest)?;
    }

    let pipeline = Pipeline::from_config(&config)?.with_progress(args.common.show_progress());
    let summary = pipeline.run(&provider)?;

    let index_stats = if args.skip_index {
        info!("Skipping manifest rebuild");
        None
    } else {
        Some(indexer.reindex(args.init_manifest)?)
    };

    match args.output_format {
        OutputFormat::Human => {
            print_human_report(&summary, index_stats.as_ref(), start_time.elapsed())
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "summary": summary,
            "index": index_stats,
            "processing_time_seconds": start_time.elapsed().as_secs_f64(),
        }))?,
    }

    Ok(summary)
}

/// List the payloads that would be processed
fn run_dry_run(provider: &RawDataDirectory, format: OutputFormat) -> Result<RunSummary> {
    info!("Performing dry run - no files will be written");

    let payloads = provider.list_payloads()?;
    match format {
        OutputFormat::Human => {
            print_heading(format, "Dry run");
            for payload in &payloads {
                println!("   • {} ({})", payload.name, payload.format.label());
            }
            println!("\n{} payloads would be processed", payloads.len());
        }
        OutputFormat::Json => {
            let listed: Vec<_> = payloads
                .iter()
                .map(|p| serde_json::json!({ "name": p.name, "format": p.format.label() }))
                .collect();
            print_json(&listed)?;
        }
    }

    Ok(RunSummary::new())
}

fn print_human_report(summary: &RunSummary, index: Option<&IndexStats>, elapsed: Duration) {
    print_heading(OutputFormat::Human, "Watershed processing complete");
    print_field("Payloads processed", summary.payloads_processed);
    print_field("Payloads skipped", summary.payloads_skipped);
    print_field("Payloads failed", summary.payloads_failed);
    print_field("Samples read", summary.samples_read);
    print_field("Daily values", summary.days_produced);
    print_field("Series built", summary.series_built);
    print_field("Records written", summary.records_written);
    if let Some(index) = index {
        print_field("Manifest", index.summary());
    }
    print_field("Processing time", HumanDuration(elapsed));

    if !summary.diagnostics.is_empty() {
        println!(
            "\n{} {} diagnostics",
            "⚠".yellow(),
            summary.diagnostics.len()
        );
        for diagnostic in summary.diagnostics.iter().take(MAX_LISTED_DIAGNOSTICS) {
            println!(
                "   • [{}] {}: {}",
                diagnostic.kind.to_string().yellow(),
                diagnostic.subject,
                diagnostic.message
            );
        }
        if summary.diagnostics.len() > MAX_LISTED_DIAGNOSTICS {
            println!(
                "   … and {} more",
                summary.diagnostics.len() - MAX_LISTED_DIAGNOSTICS
            );
        }
    }

    if summary.is_successful() {
        println!("\n{}", "✓ Run completed".green());
    } else {
        println!("\n{}", "✗ Run completed with failures".red());
    }
}
