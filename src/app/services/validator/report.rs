//! Validation report structures

use super::checks::FileFindings;
use crate::app::models::Category;
use crate::app::models::manifest::now_timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classification of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// File is not valid JSON
    JsonError,
    /// File could not be read
    IoError,
    /// A required field is absent
    MissingField,
    /// A field has the wrong JSON type
    TypeError,
    /// The `data` array is absent
    MissingData,
    /// A value is present but unusable
    InvalidValue,
    /// A value lies outside its plausible range
    UnusualValue,
    /// Statistics are inconsistent with themselves or the data
    StatisticsWarning,
}

/// A finding that makes a file invalid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub file: String,
    pub error: String,
    #[serde(rename = "type")]
    pub kind: IssueKind,
}

/// A finding that leaves a file valid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub file: String,
    pub warning: String,
    #[serde(rename = "type")]
    pub kind: IssueKind,
}

/// Aggregate figures of a validation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportStatistics {
    /// Percentage of checked files that are valid
    pub success_rate: f64,
    /// Files checked per category, keyed by manifest category name
    pub files_by_category: BTreeMap<String, usize>,
}

/// Structured result of validating a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub validation_date: String,
    pub files_checked: usize,
    pub files_valid: usize,
    pub files_invalid: usize,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub statistics: ReportStatistics,
}

impl ValidationReport {
    /// Create an empty report stamped with the current time
    pub fn new() -> Self {
        Self {
            validation_date: now_timestamp(),
            files_checked: 0,
            files_valid: 0,
            files_invalid: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
            statistics: ReportStatistics {
                success_rate: 100.0,
                files_by_category: BTreeMap::new(),
            },
        }
    }

    /// Fold one file's findings into the report
    pub fn add_file(&mut self, category: Category, file: &str, findings: FileFindings) {
        self.files_checked += 1;
        *self
            .statistics
            .files_by_category
            .entry(category.manifest_key().to_string())
            .or_insert(0) += 1;

        if findings.is_valid() {
            self.files_valid += 1;
        } else {
            self.files_invalid += 1;
        }

        self.errors
            .extend(findings.errors.into_iter().map(|(kind, message)| ValidationError {
                file: file.to_string(),
                error: message,
                kind,
            }));
        self.warnings
            .extend(findings.warnings.into_iter().map(|(kind, message)| ValidationWarning {
                file: file.to_string(),
                warning: message,
                kind,
            }));

        self.statistics.success_rate = self.success_rate();
    }

    /// Percentage of checked files that are valid
    pub fn success_rate(&self) -> f64 {
        if self.files_checked == 0 {
            100.0
        } else {
            (self.files_valid as f64 / self.files_checked as f64) * 100.0
        }
    }

    /// Whether every checked file is valid
    pub fn is_successful(&self) -> bool {
        self.files_invalid == 0
    }

    /// Overall data-quality assessment from the success rate
    pub fn assessment(&self) -> &'static str {
        let rate = self.success_rate();
        if rate >= 95.0 {
            "Data quality is excellent"
        } else if rate >= 85.0 {
            "Data quality is good with minor issues"
        } else {
            "Data quality needs improvement"
        }
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "Validation: {} files checked, {} valid, {} invalid ({:.1}% success) | Errors: {} | Warnings: {}",
            self.files_checked,
            self.files_valid,
            self.files_invalid,
            self.success_rate(),
            self.errors.len(),
            self.warnings.len()
        )
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}
