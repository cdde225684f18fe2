//! Canonical record writer
//!
//! This module assembles canonical record files from parameter series and
//! persists them under `data/<category-prefix>/`, keyed by location and
//! year. Every write is a full replace of the target file.
//!
//! # Architecture
//!
//! - [`paths`] - Path convention and filename parsing shared with the indexer
//! - [`writer`] - `RecordWriter` and write-unit grouping

pub mod paths;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use paths::{RecordKey, parse_record_filename, record_relative_path};
pub use writer::{RecordWriter, WrittenRecord, group_series_for_writing};
