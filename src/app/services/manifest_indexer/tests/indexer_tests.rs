//! Tests for the manifest rebuild and its load/persist driver

use super::*;
use crate::Error;
use crate::app::models::manifest::Manifest;
use crate::app::services::manifest_indexer::{
    ManifestIndexer, load_manifest, persist_manifest, rebuild_manifest, scan_records,
};

#[test]
fn test_rebuild_organizes_by_location_category_year() {
    let dataset = create_test_dataset();
    let scan = scan_records(dataset.path()).unwrap();
    let manifest = rebuild_manifest(Manifest::new("Test", "1.0.0"), &scan);

    let kenai = &manifest.organized[&410];
    assert_eq!(
        kenai.watershed.as_deref(),
        Some("data/02-watersheds/location-410.json")
    );
    assert_eq!(kenai.temperature.len(), 2);
    assert_eq!(kenai.flow[&2023], "data/05-flow/location-410-2023.json");

    let russian = &manifest.organized[&411];
    assert!(russian.watershed.is_none());
    assert_eq!(russian.quality[&2021], "data/04-quality/location-411-2021.json");

    assert_eq!(manifest.statistics.total_files, 6);
    assert_eq!(manifest.statistics.locations_covered, 2);
    assert_eq!(manifest.statistics.years_covered, vec![2021, 2022, 2023]);
}

#[test]
fn test_rebuild_discards_stale_entries() {
    let dataset = create_test_dataset();
    let scan = scan_records(dataset.path()).unwrap();

    let mut stale = Manifest::new("Test", "1.0.0");
    stale.organized.entry(999).or_default().flow.insert(
        1990,
        "data/05-flow/location-999-1990.json".to_string(),
    );

    let manifest = rebuild_manifest(stale, &scan);
    assert!(!manifest.organized.contains_key(&999));
    assert_eq!(manifest.path_count(), manifest.statistics.total_files);
}

#[test]
fn test_rebuild_is_idempotent() {
    let dataset = create_test_dataset();
    let scan = scan_records(dataset.path()).unwrap();

    let once = rebuild_manifest(Manifest::new("Test", "1.0.0"), &scan);
    let twice = rebuild_manifest(once.clone(), &scan);

    assert_eq!(
        serde_json::to_string(&once.organized).unwrap(),
        serde_json::to_string(&twice.organized).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&once.statistics).unwrap(),
        serde_json::to_string(&twice.statistics).unwrap()
    );
}

#[test]
fn test_reindex_requires_manifest_unless_initialising() {
    let dataset = create_test_dataset();
    let indexer = ManifestIndexer::from_config(&create_test_config(dataset.path()));

    assert!(matches!(
        indexer.reindex(false),
        Err(Error::ManifestCorrupt { .. })
    ));

    let stats = indexer.reindex(true).unwrap();
    assert_eq!(stats.files_indexed, 6);
    assert!(stats.changed);
    assert!(indexer.manifest_path().exists());

    let again = indexer.reindex(false).unwrap();
    assert!(!again.changed);
}

#[test]
fn test_reindex_preserves_unknown_keys() {
    let dataset = create_test_dataset();
    let config = create_test_config(dataset.path());
    fs::write(
        config.manifest_path(),
        r#"{"version": "1.0.0", "dataset_name": "AFCA", "description": "keep me",
            "statistics": {"total_files": 0, "locations_covered": 0, "years_covered": []},
            "organized": {}, "last_updated": "2024-01-01T00:00:00Z"}"#,
    )
    .unwrap();

    let indexer = ManifestIndexer::from_config(&config);
    indexer.reindex(false).unwrap();

    let reloaded = indexer.load(false).unwrap();
    assert_eq!(reloaded.dataset_name, "AFCA");
    assert_eq!(reloaded.extra["description"], "keep me");
    assert_eq!(reloaded.statistics.total_files, 6);
}

#[test]
fn test_unparsable_manifest_is_corrupt_even_with_init() {
    let dataset = create_test_dataset();
    let config = create_test_config(dataset.path());
    fs::write(config.manifest_path(), "{ broken").unwrap();

    let indexer = ManifestIndexer::from_config(&config);
    assert!(matches!(indexer.load(true), Err(Error::ManifestCorrupt { .. })));
}

#[test]
fn test_persisted_manifest_is_byte_stable_apart_from_timestamp() {
    let dataset = create_test_dataset();
    let indexer = ManifestIndexer::from_config(&create_test_config(dataset.path()));

    indexer.reindex(true).unwrap();
    let first = indexer.load(false).unwrap();
    indexer.reindex(false).unwrap();
    let second = indexer.load(false).unwrap();

    assert_eq!(first.organized, second.organized);
    assert_eq!(first.statistics, second.statistics);
}

#[test]
fn test_persist_replaces_manifest_without_leftover_temp_file() {
    let dataset = create_test_dataset();
    let config = create_test_config(dataset.path());
    let path = config.manifest_path();
    fs::write(&path, "{ broken").unwrap();

    let manifest = Manifest::new("AFCA", "1.0.0");
    persist_manifest(&path, &manifest).unwrap();

    let reloaded = load_manifest(&path, None).unwrap();
    assert_eq!(reloaded.dataset_name, "AFCA");
    assert!(!path.with_extension("json.tmp").exists());
}
