use clap::Parser;
use std::process;
use watershed_processor::cli::{args::Args, commands};

fn main() {
    let args = Args::parse();

    // Without a subcommand, show an overview of the available commands
    let Some(command) = args.command else {
        show_help_and_commands();
        process::exit(0);
    };

    match commands::run(command) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Watershed Processor - Hydrological Time-Series Normalizer");
    println!("=========================================================");
    println!();
    println!("Normalize USGS gauge readings, water-quality CSV exports and research-paper");
    println!("values into canonical per-location/per-year JSON records with a manifest index.");
    println!();
    println!("USAGE:");
    println!("    watershed-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Process raw payloads into records and rebuild the manifest");
    println!("    index       Rebuild the manifest from the record files");
    println!("    validate    Validate records and write validation-report.json");
    println!("    resolve     Resolve station and parameter codes");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # First run against a new dataset root:");
    println!("    watershed-processor process --base-dir /srv/afca --init-manifest");
    println!();
    println!("    # Validate and fail on invalid records:");
    println!("    watershed-processor validate --base-dir /srv/afca --strict");
    println!();
    println!("    # Look up a USGS station and parameter code:");
    println!("    watershed-processor resolve --station 15276000 --parameter 00060");
    println!();
    println!("For detailed help on any command, use:");
    println!("    watershed-processor <COMMAND> --help");
}
