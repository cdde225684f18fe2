//! Tests for manifest indexing
//!
//! Fixtures build a temporary dataset root with record files laid out the
//! way the record writer produces them.

pub mod indexer_tests;

use crate::config::Config;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Create a file at a dataset-relative path with placeholder JSON content
pub fn touch_record(base_dir: &Path, relative_path: &str) {
    let path = base_dir.join(relative_path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "{}\n").unwrap();
}

/// Dataset root with a small set of records for two locations
pub fn create_test_dataset() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();

    touch_record(base, "data/02-watersheds/location-410.json");
    touch_record(base, "data/03-temperature/location-410-2023.json");
    touch_record(base, "data/03-temperature/location-410-2022.json");
    touch_record(base, "data/05-flow/location-410-2023.json");
    touch_record(base, "data/04-quality/location-411-2021.json");
    touch_record(base, "data/06-stage/location-411-2023.json");

    temp_dir
}

/// Config rooted at `base_dir`
pub fn create_test_config(base_dir: &Path) -> Config {
    Config::default().with_base_dir(base_dir)
}
