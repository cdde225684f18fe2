//! Raw source adapters
//!
//! This module turns opaque provider payloads into [`SourceSeries`]: a
//! station reference, a parameter reference and the raw samples. Retrieval
//! itself sits behind the [`SourceProvider`] trait so any provider can feed
//! the pipeline.
//!
//! # Payload Formats
//!
//! - [`usgs_json`] - USGS NWIS instantaneous/daily value JSON
//! - [`csv_export`] - water-quality CSV exports, one column per parameter code
//! - [`paper_text`] - regex extraction from research-paper text
//!
//! [`raw_directory`] provides the file-backed provider over `raw-data/`.

use crate::app::models::{Location, Parameter, RawSample};
use crate::app::services::resolver::Resolver;
use crate::Result;

pub mod csv_export;
pub mod paper_text;
pub mod raw_directory;
pub mod usgs_json;

#[cfg(test)]
pub mod tests;

pub use paper_text::PaperExtractor;
pub use raw_directory::RawDataDirectory;

/// Payload encoding, decided from the payload name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadFormat {
    UsgsJson,
    CsvExport,
    PaperText,
}

impl PayloadFormat {
    /// Format for a file extension, if supported
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(PayloadFormat::UsgsJson),
            "csv" => Some(PayloadFormat::CsvExport),
            "txt" => Some(PayloadFormat::PaperText),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PayloadFormat::UsgsJson => "usgs-json",
            PayloadFormat::CsvExport => "csv-export",
            PayloadFormat::PaperText => "paper-text",
        }
    }
}

/// Handle to a payload a provider can deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadRef {
    pub name: String,
    pub format: PayloadFormat,
}

/// Payload content as delivered by a provider
#[derive(Debug, Clone)]
pub struct RawPayload {
    pub name: String,
    pub format: PayloadFormat,
    pub content: String,
}

/// Source of raw payloads
pub trait SourceProvider {
    /// Payloads available for processing, in processing order
    fn list_payloads(&self) -> Result<Vec<PayloadRef>>;

    /// Retrieve one payload; failures are `ProviderFailure`
    fn fetch(&self, payload: &PayloadRef) -> Result<RawPayload>;
}

/// How a series names its station
#[derive(Debug, Clone, PartialEq)]
pub enum StationRef {
    /// Source station code, resolved through the station table
    Code(String),
    /// Location already known to the adapter
    Resolved(Location),
}

/// How a series names its parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterRef {
    /// Source parameter code, resolved through the parameter table
    Code(String),
    /// Canonical parameter already known to the adapter
    Canonical(Parameter),
}

/// Raw samples of one station and parameter from one payload
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSeries {
    pub station: StationRef,
    pub parameter: ParameterRef,
    pub samples: Vec<RawSample>,
    /// Source label written into records
    pub source: String,
}

/// Reason an adapter dropped part of a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadIssueKind {
    /// Row or entry that could not be parsed
    MalformedEntry,
    /// Extracted value with no date on its line
    Undated,
    /// Extracted value with no attributable location
    Unattributed,
    /// Extracted value outside the accepted range
    Implausible,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayloadIssue {
    pub kind: PayloadIssueKind,
    pub message: String,
}

/// Adapter output for one payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPayload {
    pub series: Vec<SourceSeries>,
    pub issues: Vec<PayloadIssue>,
}

impl ParsedPayload {
    pub fn add_issue(&mut self, kind: PayloadIssueKind, message: impl Into<String>) {
        self.issues.push(PayloadIssue {
            kind,
            message: message.into(),
        });
    }

    /// Total raw samples across all series
    pub fn sample_count(&self) -> usize {
        self.series.iter().map(|s| s.samples.len()).sum()
    }
}

/// Parse a payload with the adapter for its format
///
/// Structural failures (unparsable JSON, unreadable CSV header) are
/// `ProviderFailure`, aborting only this payload.
pub fn parse_payload(
    payload: &RawPayload,
    resolver: &Resolver,
    extractor: &PaperExtractor,
) -> Result<ParsedPayload> {
    match payload.format {
        PayloadFormat::UsgsJson => usgs_json::parse_usgs_json(&payload.name, &payload.content),
        PayloadFormat::CsvExport => csv_export::parse_csv_export(&payload.name, &payload.content),
        PayloadFormat::PaperText => Ok(extractor.extract(&payload.content, resolver)),
    }
}
