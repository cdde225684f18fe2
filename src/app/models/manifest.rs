//! Manifest index models
//!
//! The manifest maps location → category → year → relative record path and
//! carries aggregate coverage statistics. Top-level keys this crate does not
//! own are kept verbatim so a rebuild never drops them.

use super::Category;
use crate::{Error, Result};
use chrono::{SecondsFormat, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Top-level keys owned by [`Manifest`]
const MANIFEST_KEYS: [&str; 5] = [
    "version",
    "dataset_name",
    "statistics",
    "organized",
    "last_updated",
];

/// Coverage statistics of the indexed files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestStatistics {
    /// Number of indexed record paths
    pub total_files: usize,
    /// Number of distinct locations with at least one file
    pub locations_covered: usize,
    /// Sorted distinct years with at least one time-series file
    pub years_covered: Vec<i32>,
}

/// Paths recorded for one location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watershed: Option<String>,
    #[serde(default)]
    pub temperature: BTreeMap<i32, String>,
    #[serde(default)]
    pub flow: BTreeMap<i32, String>,
    #[serde(default)]
    pub quality: BTreeMap<i32, String>,
    #[serde(default)]
    pub stage: BTreeMap<i32, String>,
}

impl ManifestEntry {
    /// Year map of a yearly category; `None` for the watershed category
    pub fn years(&self, category: Category) -> Option<&BTreeMap<i32, String>> {
        match category {
            Category::Watershed => None,
            Category::Temperature => Some(&self.temperature),
            Category::Flow => Some(&self.flow),
            Category::Quality => Some(&self.quality),
            Category::Stage => Some(&self.stage),
        }
    }

    /// Mutable year map of a yearly category
    pub fn years_mut(&mut self, category: Category) -> Option<&mut BTreeMap<i32, String>> {
        match category {
            Category::Watershed => None,
            Category::Temperature => Some(&mut self.temperature),
            Category::Flow => Some(&mut self.flow),
            Category::Quality => Some(&mut self.quality),
            Category::Stage => Some(&mut self.stage),
        }
    }

    /// Every path in this entry
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.watershed.iter().chain(
            [&self.temperature, &self.flow, &self.quality, &self.stage]
                .into_iter()
                .flat_map(|years| years.values()),
        )
    }
}

/// The manifest document
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub version: String,
    pub dataset_name: String,
    pub statistics: ManifestStatistics,
    pub organized: BTreeMap<u32, ManifestEntry>,
    pub last_updated: String,
    /// Unowned top-level keys, preserved across rebuilds
    pub extra: Map<String, Value>,
}

/// Owned fields as they appear on disk
#[derive(Deserialize)]
struct ManifestFields {
    version: String,
    dataset_name: String,
    #[serde(default)]
    statistics: ManifestStatistics,
    #[serde(default)]
    organized: BTreeMap<u32, ManifestEntry>,
    #[serde(default)]
    last_updated: String,
}

impl Manifest {
    /// Create an empty manifest
    pub fn new(dataset_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            dataset_name: dataset_name.into(),
            statistics: ManifestStatistics::default(),
            organized: BTreeMap::new(),
            last_updated: now_timestamp(),
            extra: Map::new(),
        }
    }

    /// Parse a manifest document
    ///
    /// `source` names the document in error messages.
    pub fn from_json_str(content: &str, source: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| Error::manifest_corrupt(source, format!("invalid JSON: {}", e)))?;

        let Value::Object(mut object) = value else {
            return Err(Error::manifest_corrupt(source, "top level is not an object"));
        };

        let fields: ManifestFields = serde_json::from_str(content)
            .map_err(|e| Error::manifest_corrupt(source, e.to_string()))?;

        for key in MANIFEST_KEYS {
            object.remove(key);
        }

        Ok(Self {
            version: fields.version,
            dataset_name: fields.dataset_name,
            statistics: fields.statistics,
            organized: fields.organized,
            last_updated: fields.last_updated,
            extra: object,
        })
    }

    /// Render as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of paths referenced by `organized`
    pub fn path_count(&self) -> usize {
        self.organized.values().map(|entry| entry.paths().count()).sum()
    }

    /// Stamp `last_updated` with the current time
    pub fn touch(&mut self) {
        self.last_updated = now_timestamp();
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MANIFEST_KEYS.len() + self.extra.len()))?;
        map.serialize_entry("version", &self.version)?;
        map.serialize_entry("dataset_name", &self.dataset_name)?;
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("statistics", &self.statistics)?;
        map.serialize_entry("organized", &self.organized)?;
        map.serialize_entry("last_updated", &self.last_updated)?;
        map.end()
    }
}

/// Current UTC time as an ISO-8601 timestamp
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_MANIFEST: &str = r#"{
        "version": "1.0.0",
        "dataset_name": "AFCA Watershed Dataset",
        "description": "Kenai Peninsula watershed data",
        "statistics": {"total_files": 2, "locations_covered": 1, "years_covered": [2023]},
        "organized": {
            "410": {
                "watershed": "data/02-watersheds/location-410.json",
                "temperature": {"2023": "data/03-temperature/location-410-2023.json"}
            }
        },
        "last_updated": "2024-01-01T00:00:00Z"
    }"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::from_json_str(SAMPLE_MANIFEST, "manifest.json").unwrap();
        assert_eq!(manifest.version, "1.0.0");
        assert_eq!(manifest.statistics.total_files, 2);
        let entry = &manifest.organized[&410];
        assert_eq!(
            entry.temperature[&2023],
            "data/03-temperature/location-410-2023.json"
        );
        assert!(entry.flow.is_empty());
        assert_eq!(manifest.path_count(), 2);
        assert_eq!(
            manifest.extra["description"],
            Value::String("Kenai Peninsula watershed data".to_string())
        );
    }

    #[test]
    fn test_round_trip_keeps_unknown_keys() {
        let manifest = Manifest::from_json_str(SAMPLE_MANIFEST, "manifest.json").unwrap();
        let rendered = manifest.to_json_string().unwrap();
        let reparsed = Manifest::from_json_str(&rendered, "manifest.json").unwrap();
        assert_eq!(reparsed, manifest);
        assert!(rendered.contains("\"description\""));
    }

    #[test]
    fn test_locations_serialize_in_numeric_order() {
        let mut manifest = Manifest::new("Test", "1.0.0");
        for id in [1000, 410, 99] {
            manifest.organized.insert(id, ManifestEntry::default());
        }
        let rendered = manifest.to_json_string().unwrap();
        let p99 = rendered.find("\"99\"").unwrap();
        let p410 = rendered.find("\"410\"").unwrap();
        let p1000 = rendered.find("\"1000\"").unwrap();
        assert!(p99 < p410 && p410 < p1000);
    }

    #[test]
    fn test_watershed_key_omitted_when_absent() {
        let mut manifest = Manifest::new("Test", "1.0.0");
        manifest.organized.insert(411, ManifestEntry::default());
        let rendered = manifest.to_json_string().unwrap();
        assert!(!rendered.contains("watershed"));
    }

    #[test]
    fn test_corrupt_manifest_is_rejected() {
        assert!(matches!(
            Manifest::from_json_str("{ not json", "m.json"),
            Err(Error::ManifestCorrupt { .. })
        ));
        assert!(matches!(
            Manifest::from_json_str("[]", "m.json"),
            Err(Error::ManifestCorrupt { .. })
        ));
        assert!(matches!(
            Manifest::from_json_str(r#"{"version": "1"}"#, "m.json"),
            Err(Error::ManifestCorrupt { .. })
        ));
    }

    #[test]
    fn test_entry_year_maps() {
        let mut entry = ManifestEntry::default();
        assert!(entry.years_mut(Category::Watershed).is_none());
        entry
            .years_mut(Category::Flow)
            .unwrap()
            .insert(2022, "data/05-flow/location-1-2022.json".to_string());
        assert_eq!(entry.years(Category::Flow).unwrap().len(), 1);
        assert_eq!(entry.paths().count(), 1);
    }
}
