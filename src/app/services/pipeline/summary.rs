//! Run summary and diagnostics

use crate::app::services::record_writer::WrittenRecord;
use crate::app::services::sources::PayloadIssueKind;
use serde::Serialize;

/// Kind of a recoverable condition met during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnknownParameter,
    UnknownLocation,
    MalformedSample,
    ProviderFailure,
    Undated,
    Unattributed,
    Implausible,
    WriteFailure,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::UnknownParameter => "unknown_parameter",
            DiagnosticKind::UnknownLocation => "unknown_location",
            DiagnosticKind::MalformedSample => "malformed_sample",
            DiagnosticKind::ProviderFailure => "provider_failure",
            DiagnosticKind::Undated => "undated",
            DiagnosticKind::Unattributed => "unattributed",
            DiagnosticKind::Implausible => "implausible",
            DiagnosticKind::WriteFailure => "write_failure",
        }
    }
}

impl From<PayloadIssueKind> for DiagnosticKind {
    fn from(kind: PayloadIssueKind) -> Self {
        match kind {
            PayloadIssueKind::MalformedEntry => DiagnosticKind::MalformedSample,
            PayloadIssueKind::Undated => DiagnosticKind::Undated,
            PayloadIssueKind::Unattributed => DiagnosticKind::Unattributed,
            PayloadIssueKind::Implausible => DiagnosticKind::Implausible,
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recoverable condition, tied to the payload or record it concerns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Payload name or record path
    pub subject: String,
    pub message: String,
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Payloads that yielded at least one series
    pub payloads_processed: usize,
    /// Payloads that parsed but yielded nothing usable
    pub payloads_skipped: usize,
    /// Payloads that could not be fetched or parsed
    pub payloads_failed: usize,
    pub samples_read: usize,
    pub days_produced: usize,
    pub series_built: usize,
    /// Series replaced by a later payload covering the same location, parameter and year
    pub series_replaced: usize,
    pub records_written: usize,
    /// Dataset-relative paths of the written records
    pub written_paths: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_diagnostic(
        &mut self,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(Diagnostic {
            kind,
            subject: subject.into(),
            message: message.into(),
        });
    }

    pub fn add_written(&mut self, record: &WrittenRecord) {
        self.records_written += 1;
        self.written_paths.push(record.relative_path.clone());
    }

    /// Number of diagnostics of one kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    /// Total payloads seen by the run
    pub fn payloads_total(&self) -> usize {
        self.payloads_processed + self.payloads_skipped + self.payloads_failed
    }

    /// Whether every payload was read and every record written
    pub fn is_successful(&self) -> bool {
        self.payloads_failed == 0 && self.count(DiagnosticKind::WriteFailure) == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "Payloads: {} processed, {} skipped, {} failed; {} series built, {} records written, {} diagnostics",
            self.payloads_processed,
            self.payloads_skipped,
            self.payloads_failed,
            self.series_built,
            self.records_written,
            self.diagnostics.len()
        )
    }
}
