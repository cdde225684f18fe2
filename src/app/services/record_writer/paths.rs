//! Record path convention
//!
//! Time-series records live at `data/<category-prefix>/location-<id>-<year>.json`
//! and watershed boundaries at `data/02-watersheds/location-<id>.json`. Paths
//! stored in the manifest are relative to the dataset root and always use `/`.

use crate::app::models::Category;
use crate::constants::{DATA_DIR_NAME, RECORD_FILE_EXTENSION, RECORD_FILE_PREFIX};

/// Location and optional year recovered from a record filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub location_id: u32,
    pub year: Option<i32>,
}

/// Filename of a time-series record
pub fn record_filename(location_id: u32, year: i32) -> String {
    format!(
        "{}{}-{}.{}",
        RECORD_FILE_PREFIX, location_id, year, RECORD_FILE_EXTENSION
    )
}

/// Filename of a watershed boundary record
pub fn watershed_filename(location_id: u32) -> String {
    format!("{}{}.{}", RECORD_FILE_PREFIX, location_id, RECORD_FILE_EXTENSION)
}

/// Dataset-relative path of a time-series record
pub fn record_relative_path(category: Category, location_id: u32, year: i32) -> String {
    format!(
        "{}/{}/{}",
        DATA_DIR_NAME,
        category.dir_name(),
        record_filename(location_id, year)
    )
}

/// Recover location and year from a record filename
///
/// Yearly categories expect `location-<id>-<year>.json`; the watershed
/// category expects `location-<id>.json`. Anything else yields `None`.
pub fn parse_record_filename(category: Category, filename: &str) -> Option<RecordKey> {
    let stem = filename
        .strip_suffix(RECORD_FILE_EXTENSION)?
        .strip_suffix('.')?
        .strip_prefix(RECORD_FILE_PREFIX)?;

    let parts: Vec<&str> = stem.split('-').collect();

    let key = match (category.is_yearly(), parts.as_slice()) {
        (true, [id, year]) => RecordKey {
            location_id: parse_digits(id)?,
            year: Some(parse_digits(year)?),
        },
        (false, [id]) => RecordKey {
            location_id: parse_digits(id)?,
            year: None,
        },
        _ => return None,
    };

    // Zero-padded ids or years would alias another file's key
    let canonical = match key.year {
        Some(year) => record_filename(key.location_id, year),
        None => watershed_filename(key.location_id),
    };
    (canonical == filename).then_some(key)
}

/// Parse an all-digit component, rejecting signs and empty text
fn parse_digits<T: std::str::FromStr>(text: &str) -> Option<T> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
