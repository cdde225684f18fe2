//! Pure manifest rebuild

use super::scanner::IndexScan;
use crate::app::models::Category;
use crate::app::models::manifest::{Manifest, ManifestEntry, ManifestStatistics};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Rebuild `organized` and `statistics` from a scan
///
/// Every other manifest field (including unknown keys) is carried through.
pub fn rebuild_manifest(mut manifest: Manifest, scan: &IndexScan) -> Manifest {
    let mut organized: BTreeMap<u32, ManifestEntry> = BTreeMap::new();
    let mut years = BTreeSet::new();

    for file in &scan.files {
        let entry = organized.entry(file.key.location_id).or_default();

        match (file.category, file.key.year) {
            (Category::Watershed, _) => {
                entry.watershed = Some(file.relative_path.clone());
            }
            (category, Some(year)) => {
                if let Some(year_map) = entry.years_mut(category) {
                    year_map.insert(year, file.relative_path.clone());
                    years.insert(year);
                }
            }
            (_, None) => {}
        }
    }

    manifest.statistics = ManifestStatistics {
        total_files: organized.values().map(|entry| entry.paths().count()).sum(),
        locations_covered: organized.len(),
        years_covered: years.into_iter().collect(),
    };
    manifest.organized = organized;
    manifest
}

/// Summary of one reindex run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub locations_covered: usize,
    pub years_covered: Vec<i32>,
    /// Whether `organized` or `statistics` differ from the previous manifest
    pub changed: bool,
}

impl IndexStats {
    /// Compare a rebuilt manifest against its predecessor
    pub fn from_rebuild(previous: &Manifest, rebuilt: &Manifest, scan: &IndexScan) -> Self {
        Self {
            files_indexed: rebuilt.statistics.total_files,
            files_skipped: scan.skipped.len(),
            locations_covered: rebuilt.statistics.locations_covered,
            years_covered: rebuilt.statistics.years_covered.clone(),
            changed: previous.organized != rebuilt.organized
                || previous.statistics != rebuilt.statistics,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Indexed {} files across {} locations ({} skipped){}",
            self.files_indexed,
            self.locations_covered,
            self.files_skipped,
            if self.changed { "" } else { ", no changes" }
        )
    }
}
