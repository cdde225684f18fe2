//! Validate command implementation
//!
//! Validates every persisted record, writes `validation-report.json` at the
//! dataset root and prints the report.

use super::shared::{load_config, print_field, print_heading, print_json, setup_logging};
use crate::app::services::record_writer::RecordWriter;
use crate::app::services::validator::{ValidationReport, Validator};
use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::constants::VALIDATION_REPORT_FILENAME;
use crate::{Error, Result};
use colored::Colorize;
use tracing::info;

/// Validate command runner
///
/// With `--strict`, any invalid file turns into an error after the report
/// has been written and printed.
pub fn run_validate(args: ValidateArgs) -> Result<ValidationReport> {
    setup_logging(&args.common)?;
    let config = load_config(&args.common)?;

    let validator = Validator::from_config(&config)?;
    let report = validator.validate_dataset(&config.paths.base_dir)?;

    if !args.no_report {
        RecordWriter::new(config.paths.base_dir.clone())
            .write_json(VALIDATION_REPORT_FILENAME, &report)?;
        info!("Wrote {}", config.validation_report_path().display());
    }

    match args.output_format {
        OutputFormat::Human => print_human_report(&report, args.max_issues),
        OutputFormat::Json => print_json(&report)?,
    }

    if args.strict && !report.is_successful() {
        return Err(Error::validation_failed(
            report.files_invalid,
            report.files_checked,
        ));
    }

    Ok(report)
}

fn print_human_report(report: &ValidationReport, max_issues: usize) {
    print_heading(OutputFormat::Human, "Validation report");
    print_field("Files checked", report.files_checked);
    print_field("Valid", report.files_valid.to_string().green());
    print_field("Invalid", report.files_invalid.to_string().red());
    print_field("Success rate", format!("{:.1}%", report.success_rate()));
    for (category, count) in &report.statistics.files_by_category {
        print_field(&format!("{} files", category), count);
    }

    if !report.errors.is_empty() {
        println!("\n{} ({})", "Errors".red().bold(), report.errors.len());
        for error in report.errors.iter().take(max_issues) {
            println!("   • {}: {}", error.file, error.error);
        }
        if report.errors.len() > max_issues {
            println!("   … and {} more", report.errors.len() - max_issues);
        }
    }

    if !report.warnings.is_empty() {
        println!("\n{} ({})", "Warnings".yellow().bold(), report.warnings.len());
        for warning in report.warnings.iter().take(max_issues) {
            println!("   • {}: {}", warning.file, warning.warning);
        }
        if report.warnings.len() > max_issues {
            println!("   … and {} more", report.warnings.len() - max_issues);
        }
    }

    let assessment = report.assessment();
    if report.success_rate() >= 95.0 {
        println!("\n{}", assessment.green());
    } else if report.success_rate() >= 85.0 {
        println!("\n{}", assessment.yellow());
    } else {
        println!("\n{}", assessment.red());
    }
}
