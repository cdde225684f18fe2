//! Record directory scanning

use crate::app::models::Category;
use crate::app::services::record_writer::paths::{RecordKey, parse_record_filename};
use crate::constants::{DATA_DIR_NAME, RECORD_FILE_EXTENSION};
use crate::{Error, Result};
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// A record file whose name parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFile {
    pub category: Category,
    pub key: RecordKey,
    /// Dataset-relative path using `/` separators
    pub relative_path: String,
}

/// Result of scanning every category directory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexScan {
    /// Indexed files in category then filename order
    pub files: Vec<IndexedFile>,
    /// JSON files whose names did not match the convention
    pub skipped: Vec<String>,
}

impl IndexScan {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Scan `data/<category-prefix>/` under `base_dir` for record files
///
/// Missing category directories are treated as empty. Only `.json` files are
/// considered; files with unrecognized names are reported in `skipped`.
pub fn scan_records(base_dir: &Path) -> Result<IndexScan> {
    let data_dir = base_dir.join(DATA_DIR_NAME);
    let mut scan = IndexScan::default();

    for category in Category::ALL {
        let dir = data_dir.join(category.dir_name());
        if !dir.is_dir() {
            debug!("Category directory {} absent", dir.display());
            continue;
        }

        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                Error::directory_traversal(format!("Failed to scan {}", dir.display()), e)
            })?;

            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().is_none_or(|ext| ext != RECORD_FILE_EXTENSION)
            {
                continue;
            }

            let filename = entry.file_name().to_string_lossy().into_owned();
            match parse_record_filename(category, &filename) {
                Some(key) => scan.files.push(IndexedFile {
                    category,
                    key,
                    relative_path: format!("{}/{}/{}", DATA_DIR_NAME, category.dir_name(), filename),
                }),
                None => scan
                    .skipped
                    .push(format!("{}/{}", category.dir_name(), filename)),
            }
        }
    }

    debug!(
        "Scanned {} record files ({} skipped)",
        scan.files.len(),
        scan.skipped.len()
    );
    Ok(scan)
}
