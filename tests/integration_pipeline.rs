//! End-to-end tests over a dataset root on disk
//!
//! Raw payloads are written to `raw-data/`, processed into records, indexed
//! into the manifest, and validated, exercising the same path as the
//! `process`, `index` and `validate` commands.

use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use watershed_processor::Config;
use watershed_processor::app::services::manifest_indexer::ManifestIndexer;
use watershed_processor::app::services::pipeline::{DiagnosticKind, Pipeline};
use watershed_processor::app::services::resolver::Resolver;
use watershed_processor::app::services::sources::RawDataDirectory;
use watershed_processor::app::services::validator::{IssueKind, Validator};
use watershed_processor::{Error, Parameter};

fn usgs_payload(site: &str, variable: &str, points: &[(&str, &str, &[&str])]) -> String {
    let values: Vec<Value> = points
        .iter()
        .map(|(date_time, value, qualifiers)| {
            json!({ "value": value, "qualifiers": qualifiers, "dateTime": date_time })
        })
        .collect();

    json!({
        "value": {
            "timeSeries": [{
                "sourceInfo": { "siteName": "TEST SITE", "siteCode": [{ "value": site }] },
                "variable": { "variableCode": [{ "value": variable }] },
                "values": [{ "value": values }]
            }]
        }
    })
    .to_string()
}

/// Dataset root with a raw-data directory holding a mix of payloads
fn create_dataset() -> (TempDir, Config) {
    let temp_dir = TempDir::new().unwrap();
    let raw = temp_dir.path().join("raw-data");
    fs::create_dir_all(&raw).unwrap();

    fs::write(
        raw.join("kenai_00010.json"),
        usgs_payload(
            "15276000",
            "00010",
            &[
                ("2023-06-01T08:00:00.000-08:00", "12.0", &[]),
                ("2023-06-01T16:00:00.000-08:00", "14.0", &["P"]),
                ("2023-06-02T08:00:00.000-08:00", "-999999", &[]),
            ],
        ),
    )
    .unwrap();
    fs::write(
        raw.join("kenai_00060.json"),
        usgs_payload("15276000", "00060", &[("2023-06-01T00:00:00", "1520.0", &["A"])]),
    )
    .unwrap();
    fs::write(
        raw.join("kenai_99999.json"),
        usgs_payload("15276000", "99999", &[("2023-06-01T00:00:00", "1.0", &[])]),
    )
    .unwrap();
    fs::write(
        raw.join("wq_15290000.csv"),
        "Date,pH,Turbidity,Qualifiers\n2022-08-01,11.0,2.5,\n2022-08-02,7.1,,S\n",
    )
    .unwrap();
    fs::write(raw.join("README.md"), "not a payload").unwrap();

    let config = Config::default().with_base_dir(temp_dir.path());
    (temp_dir, config)
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_process_index_validate() {
    let (temp_dir, config) = create_dataset();
    let base = temp_dir.path();

    let pipeline = Pipeline::from_config(&config).unwrap();
    let provider = RawDataDirectory::new(config.raw_data_dir());
    let summary = pipeline.run(&provider).unwrap();

    assert_eq!(summary.payloads_total(), 4);
    assert_eq!(summary.payloads_processed, 3);
    assert_eq!(summary.payloads_skipped, 1);
    assert_eq!(summary.count(DiagnosticKind::UnknownParameter), 1);
    assert_eq!(summary.records_written, 3);

    // Two sub-daily readings collapse to one fair day; the sentinel day vanishes
    let temperature = read_json(&base.join("data/03-temperature/location-410-2023.json"));
    assert_eq!(
        temperature["data"],
        json!([{ "date": "2023-06-01", "temperature_c": 13.0, "quality": "fair" }])
    );
    assert_eq!(
        temperature["statistics"],
        json!({ "mean": 13.0, "min": 13.0, "max": 13.0, "count": 1 })
    );

    let quality = read_json(&base.join("data/04-quality/location-411-2022.json"));
    assert_eq!(quality["parameter"], "water_quality");
    assert_eq!(quality["data"][1]["quality"], "poor");

    let indexer = ManifestIndexer::from_config(&config);
    assert!(matches!(indexer.reindex(false), Err(Error::ManifestCorrupt { .. })));

    let stats = indexer.reindex(true).unwrap();
    assert_eq!(stats.files_indexed, 3);
    assert_eq!(stats.locations_covered, 2);
    assert_eq!(stats.years_covered, vec![2022, 2023]);

    let manifest = read_json(&config.manifest_path());
    assert_eq!(
        manifest["organized"]["410"]["temperature"]["2023"],
        "data/03-temperature/location-410-2023.json"
    );
    assert_eq!(
        manifest["organized"]["410"]["flow"]["2023"],
        "data/05-flow/location-410-2023.json"
    );
    assert_eq!(
        manifest["organized"]["411"]["quality"]["2022"],
        "data/04-quality/location-411-2022.json"
    );
    assert!(manifest["organized"]["410"].get("watershed").is_none());
    assert_eq!(manifest["statistics"]["total_files"], 3);

    let validator = Validator::from_config(&config).unwrap();
    let report = validator.validate_dataset(base).unwrap();
    assert_eq!(report.files_checked, 3);
    assert_eq!(report.files_invalid, 0);
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.kind == IssueKind::UnusualValue && w.file.ends_with("location-411-2022.json"))
    );
}

#[test]
fn test_manifest_rebuild_is_idempotent() {
    let (_temp_dir, config) = create_dataset();

    let pipeline = Pipeline::from_config(&config).unwrap();
    pipeline
        .run(&RawDataDirectory::new(config.raw_data_dir()))
        .unwrap();

    let indexer = ManifestIndexer::from_config(&config);
    let first = indexer.reindex(true).unwrap();
    let first_manifest = read_json(&config.manifest_path());

    let second = indexer.reindex(false).unwrap();
    let second_manifest = read_json(&config.manifest_path());

    assert!(first.changed);
    assert!(!second.changed);
    assert_eq!(first_manifest["organized"], second_manifest["organized"]);
    assert_eq!(first_manifest["statistics"], second_manifest["statistics"]);
    assert_eq!(
        serde_json::to_string(&first_manifest["organized"]).unwrap(),
        serde_json::to_string(&second_manifest["organized"]).unwrap()
    );
}

#[test]
fn test_record_without_data_is_invalid() {
    let (temp_dir, config) = create_dataset();
    let flow_dir = temp_dir.path().join("data/05-flow");
    fs::create_dir_all(&flow_dir).unwrap();
    fs::write(
        flow_dir.join("location-412-2021.json"),
        json!({
            "location_id": 412,
            "location_name": "Moose River",
            "year": 2021,
            "parameter": "flow",
            "unit": "ft³/s",
            "statistics": { "mean": 1.0, "min": 1.0, "max": 1.0, "count": 1 },
            "source": "USGS Stream Gauge Network",
            "last_updated": "2024-01-01T00:00:00Z"
        })
        .to_string(),
    )
    .unwrap();

    let report = Validator::from_config(&config)
        .unwrap()
        .validate_dataset(temp_dir.path())
        .unwrap();
    assert_eq!(report.files_checked, 1);
    assert_eq!(report.files_invalid, 1);
    assert_eq!(report.errors[0].kind, IssueKind::MissingData);
    assert!(!report.is_successful());
}

#[test]
fn test_resolver_scenarios() {
    let resolver = Resolver::with_default_tables();

    let location = resolver.resolve_location("15276000").unwrap();
    assert_eq!(location.location_id, 410);

    assert_eq!(
        resolver.resolve_parameter("00060").unwrap(),
        (Parameter::Flow, "ft³/s")
    );
    assert!(matches!(
        resolver.resolve_parameter("99999"),
        Err(Error::UnknownParameter { code }) if code == "99999"
    ));
}

#[test]
fn test_config_tables_extend_defaults() {
    let (temp_dir, _) = create_dataset();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[resolver.parameters]\n\"99999\" = \"turbidity\"\n",
    )
    .unwrap();

    let config = Config::load(Some(&config_path))
        .unwrap()
        .with_base_dir(temp_dir.path());
    let summary = Pipeline::from_config(&config)
        .unwrap()
        .run(&RawDataDirectory::new(config.raw_data_dir()))
        .unwrap();

    assert_eq!(summary.count(DiagnosticKind::UnknownParameter), 0);
    assert!(
        temp_dir
            .path()
            .join("data/04-quality/location-410-2023.json")
            .is_file()
    );
}
