//! Offline validation of persisted records
//!
//! This module checks every JSON file under the category directories for
//! schema conformance and value plausibility and produces a structured
//! [`ValidationReport`]. Validation is read-only with respect to the records.
//!
//! Schema problems (missing fields, wrong types, unparsable JSON) are errors
//! and make a file invalid. Implausible values and inconsistent statistics
//! are warnings; the file stays valid.

use crate::app::models::{Category, Parameter};
use crate::config::{Config, RangeConfig};
use crate::constants::{DATA_DIR_NAME, RECORD_FILE_EXTENSION};
use crate::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub mod checks;
pub mod report;

#[cfg(test)]
pub mod tests;

pub use checks::FileFindings;
pub use report::{IssueKind, ReportStatistics, ValidationError, ValidationReport, ValidationWarning};

/// Validator holding the plausibility ranges
#[derive(Debug, Clone)]
pub struct Validator {
    ranges: BTreeMap<Parameter, RangeConfig>,
}

impl Validator {
    /// Create a validator with explicit ranges
    pub fn new(ranges: BTreeMap<Parameter, RangeConfig>) -> Self {
        Self { ranges }
    }

    /// Create a validator from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.plausible_ranges()?))
    }

    /// Plausible range for a parameter, if one is configured
    pub fn range(&self, parameter: Parameter) -> Option<&RangeConfig> {
        self.ranges.get(&parameter)
    }

    /// Validate every record file beneath `base_dir/data`
    pub fn validate_dataset(&self, base_dir: &Path) -> Result<ValidationReport> {
        let mut report = ValidationReport::new();

        for (category, path) in discover_record_files(base_dir)? {
            let display = relative_display(base_dir, &path);
            let findings = self.validate_file(&path, category);
            report.add_file(category, &display, findings);
        }

        info!(
            "Validated {} files: {} valid, {} invalid, {} warnings",
            report.files_checked,
            report.files_valid,
            report.files_invalid,
            report.warnings.len()
        );

        Ok(report)
    }

    /// Validate one record file
    pub fn validate_file(&self, path: &Path, category: Category) -> FileFindings {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                return FileFindings::single_error(IssueKind::IoError, format!("Unreadable file: {}", e));
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(document) => self.validate_document(&document, category),
            Err(e) => FileFindings::single_error(
                IssueKind::JsonError,
                format!("Invalid JSON format: {}", e),
            ),
        }
    }

    /// Validate a parsed record document of the given category
    pub fn validate_document(&self, document: &Value, category: Category) -> FileFindings {
        let mut findings = FileFindings::default();

        match category {
            Category::Watershed => checks::check_watershed(document, &mut findings),
            _ => checks::check_time_series(document, category, &self.ranges, &mut findings),
        }

        debug!(
            "{} record: {} errors, {} warnings",
            category,
            findings.errors.len(),
            findings.warnings.len()
        );
        findings
    }
}

impl Default for Validator {
    fn default() -> Self {
        let ranges = crate::constants::DEFAULT_PLAUSIBLE_RANGES
            .iter()
            .filter_map(|(name, min, max)| {
                name.parse::<Parameter>()
                    .ok()
                    .map(|parameter| (parameter, RangeConfig { min: *min, max: *max }))
            })
            .collect();
        Self::new(ranges)
    }
}

/// Every `.json` file directly inside each category directory, sorted
pub fn discover_record_files(base_dir: &Path) -> Result<Vec<(Category, PathBuf)>> {
    let data_dir = base_dir.join(DATA_DIR_NAME);
    let mut files = Vec::new();

    for category in Category::ALL {
        let dir = data_dir.join(category.dir_name());
        if !dir.is_dir() {
            continue;
        }

        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                Error::directory_traversal(format!("Failed to scan {}", dir.display()), e)
            })?;
            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension().is_some_and(|ext| ext == RECORD_FILE_EXTENSION)
            {
                files.push((category, path.to_path_buf()));
            }
        }
    }

    Ok(files)
}

/// Path shown in reports: relative to the dataset root with `/` separators
fn relative_display(base_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base_dir).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
