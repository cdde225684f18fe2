//! Record writer implementation

use super::paths::record_relative_path;
use crate::app::models::manifest::now_timestamp;
use crate::app::models::record::{CanonicalRecord, QualityRecord, SeriesRecord};
use crate::app::models::{Category, Parameter, ParameterSeries};
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of one successful record write
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenRecord {
    pub category: Category,
    pub location_id: u32,
    pub year: i32,
    /// Dataset-relative path, as stored in the manifest
    pub relative_path: String,
    pub rows: usize,
}

/// Writer persisting canonical records beneath a dataset root
#[derive(Debug, Clone)]
pub struct RecordWriter {
    base_dir: PathBuf,
}

impl RecordWriter {
    /// Create a writer for the dataset rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Dataset root
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Absolute location of a dataset-relative path
    pub fn resolve(&self, relative_path: &str) -> PathBuf {
        relative_path
            .split('/')
            .fold(self.base_dir.clone(), |path, part| path.join(part))
    }

    /// Persist a single series
    ///
    /// A quality-category series is written as a consolidated water-quality
    /// record containing only that series.
    pub fn write_series(&self, series: &ParameterSeries) -> Result<WrittenRecord> {
        match series.category() {
            Category::Quality => self.write_quality(&[series]),
            _ => {
                let record = SeriesRecord::from_series(series, &now_timestamp());
                self.write_record(&CanonicalRecord::Series(record))
            }
        }
    }

    /// Persist the quality-category series of one location and year as one file
    pub fn write_quality(&self, series: &[&ParameterSeries]) -> Result<WrittenRecord> {
        let record = QualityRecord::from_series(series, &now_timestamp())?;
        self.write_record(&CanonicalRecord::Quality(record))
    }

    /// Persist an assembled record at its conventional path
    pub fn write_record(&self, record: &CanonicalRecord) -> Result<WrittenRecord> {
        let category = record.category();
        let relative_path = record_relative_path(category, record.location_id(), record.year());

        self.write_json(&relative_path, record)?;

        info!(
            "Wrote {} record for location {} year {} ({} rows)",
            category,
            record.location_id(),
            record.year(),
            record.row_count()
        );

        Ok(WrittenRecord {
            category,
            location_id: record.location_id(),
            year: record.year(),
            relative_path,
            rows: record.row_count(),
        })
    }

    /// Serialize `value` as pretty JSON and replace the file at `relative_path`
    pub fn write_json<T: Serialize + ?Sized>(&self, relative_path: &str, value: &T) -> Result<()> {
        let path = self.resolve(relative_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::io(format!("Failed to create directory {}", parent.display()), e)
            })?;
        }

        let mut content = serde_json::to_string_pretty(value).map_err(|e| {
            Error::json(relative_path, "Failed to serialize record", Some(e))
        })?;
        content.push('\n');

        // Write-then-rename keeps the replace atomic
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, content)
            .map_err(|e| Error::io(format!("Failed to write {}", temp_path.display()), e))?;
        std::fs::rename(&temp_path, &path)
            .map_err(|e| Error::io(format!("Failed to replace {}", path.display()), e))?;

        debug!("Persisted {}", path.display());
        Ok(())
    }
}

/// Group series into write units
///
/// Single-parameter series form their own unit; quality-category series are
/// grouped per (location, year) so they land in one consolidated file.
pub fn group_series_for_writing(series: &[ParameterSeries]) -> Vec<Vec<&ParameterSeries>> {
    type UnitKey = (Category, u32, i32, Option<Parameter>);
    let mut units: BTreeMap<UnitKey, Vec<&ParameterSeries>> = BTreeMap::new();

    for item in series {
        let parameter = match item.category() {
            Category::Quality => None,
            _ => Some(item.parameter),
        };
        units
            .entry((item.category(), item.location_id, item.year, parameter))
            .or_default()
            .push(item);
    }

    units.into_values().collect()
}
