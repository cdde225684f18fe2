//! Resolve command implementation

use super::shared::{load_config, print_heading, print_json, setup_logging};
use crate::app::models::Parameter;
use crate::app::services::resolver::Resolver;
use crate::cli::args::{OutputFormat, ResolveArgs};
use crate::Result;
use colored::Colorize;
use serde::Serialize;

/// Outcome of resolving one code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub kind: &'static str,
    pub code: String,
    /// Resolved value, or `None` when the code is unknown
    pub resolved: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Resolve the requested codes against the configured tables
pub fn run_resolve(args: ResolveArgs) -> Result<Vec<Resolution>> {
    setup_logging(&args.common)?;
    args.validate()?;
    let config = load_config(&args.common)?;
    let resolver = Resolver::from_config(&config.resolver)?;

    let mut resolutions = Vec::new();
    if let Some(code) = &args.station {
        resolutions.push(resolve_station(&resolver, code));
    }
    if let Some(code) = &args.parameter {
        resolutions.push(resolve_parameter(&resolver, code));
    }
    if args.list {
        resolutions.extend(list_tables(&resolver));
    }

    match args.output_format {
        OutputFormat::Human => {
            print_heading(args.output_format, "Resolved codes");
            for resolution in &resolutions {
                match (&resolution.resolved, &resolution.error) {
                    (Some(value), _) => println!(
                        "   • {} {} → {}",
                        resolution.kind,
                        resolution.code.bold(),
                        value
                    ),
                    (None, error) => println!(
                        "   • {} {} → {}",
                        resolution.kind,
                        resolution.code.bold(),
                        error.as_deref().unwrap_or("unknown").red()
                    ),
                }
            }
        }
        OutputFormat::Json => print_json(&resolutions)?,
    }

    Ok(resolutions)
}

/// Resolve one station code
pub fn resolve_station(resolver: &Resolver, code: &str) -> Resolution {
    match resolver.resolve_location(code) {
        Ok(location) => Resolution {
            kind: "station",
            code: code.to_string(),
            resolved: serde_json::to_value(location).ok(),
            error: None,
        },
        Err(e) => Resolution {
            kind: "station",
            code: code.to_string(),
            resolved: None,
            error: Some(e.to_string()),
        },
    }
}

/// Resolve one parameter code
pub fn resolve_parameter(resolver: &Resolver, code: &str) -> Resolution {
    match resolver.resolve_parameter(code) {
        Ok((parameter, unit)) => Resolution {
            kind: "parameter",
            code: code.to_string(),
            resolved: Some(serde_json::json!({
                "parameter": parameter,
                "unit": unit,
                "category": parameter.category().manifest_key(),
            })),
            error: None,
        },
        Err(e) => Resolution {
            kind: "parameter",
            code: code.to_string(),
            resolved: None,
            error: Some(e.to_string()),
        },
    }
}

/// Every configured station and parameter code
fn list_tables(resolver: &Resolver) -> Vec<Resolution> {
    let mut listed = Vec::new();

    for location in resolver.locations() {
        for code in resolver.station_codes_for(location.location_id) {
            listed.push(resolve_station(resolver, code));
        }
    }
    for parameter in Parameter::ALL {
        for code in resolver.codes_for_parameter(parameter) {
            listed.push(resolve_parameter(resolver, code));
        }
    }

    listed
}
