//! Tests for the USGS JSON adapter

use super::*;
use crate::constants::source_labels;
use crate::Error;

#[test]
fn test_parse_single_series() {
    let content = usgs_payload(
        "15276000",
        "00010",
        &[
            ("2023-06-15T08:00:00.000-08:00", "12.0", &["A"]),
            ("2023-06-15T14:00:00.000-08:00", "14.0", &["P"]),
        ],
    );

    let parsed = usgs_json::parse_usgs_json("kenai.json", &content).unwrap();
    assert_eq!(parsed.series.len(), 1);
    assert!(parsed.issues.is_empty());

    let series = &parsed.series[0];
    assert_eq!(series.station, StationRef::Code("15276000".to_string()));
    assert_eq!(series.parameter, ParameterRef::Code("00010".to_string()));
    assert_eq!(series.source, source_labels::USGS);
    assert_eq!(series.samples.len(), 2);
    assert_eq!(series.samples[1].raw_value, "14.0");
    assert_eq!(series.samples[1].qualifiers, vec!["P"]);
    assert_eq!(series.samples[0].timestamp, "2023-06-15T08:00:00.000-08:00");
}

#[test]
fn test_numeric_values_and_object_qualifiers() {
    let content = r#"{
        "value": {"timeSeries": [{
            "sourceInfo": {"siteName": "RUSSIAN R", "siteCode": [{"value": "15290000"}]},
            "variable": {"variableCode": [{"value": "00060"}]},
            "values": [{"value": [
                {"value": 152.5, "qualifiers": [{"qualifierCode": "e"}], "dateTime": "2023-07-01T00:00:00"},
                {"value": null, "dateTime": "2023-07-02T00:00:00"}
            ]}]
        }]}
    }"#;

    let parsed = usgs_json::parse_usgs_json("russian.json", content).unwrap();
    let samples = &parsed.series[0].samples;
    assert_eq!(samples[0].raw_value, "152.5");
    assert_eq!(samples[0].qualifiers, vec!["e"]);
    assert_eq!(samples[1].raw_value, "");
    assert!(samples[1].qualifiers.is_empty());
}

#[test]
fn test_only_first_values_block_is_read() {
    let content = r#"{
        "value": {"timeSeries": [{
            "sourceInfo": {"siteCode": [{"value": "15276000"}]},
            "variable": {"variableCode": [{"value": "00065"}]},
            "values": [
                {"value": [{"value": "3.1", "dateTime": "2023-05-01T00:00:00"}]},
                {"value": [{"value": "9.9", "dateTime": "2023-05-01T00:00:00"}]}
            ]
        }]}
    }"#;

    let parsed = usgs_json::parse_usgs_json("stage.json", content).unwrap();
    assert_eq!(parsed.sample_count(), 1);
    assert_eq!(parsed.series[0].samples[0].raw_value, "3.1");
}

#[test]
fn test_series_without_site_code_is_an_issue() {
    let content = r#"{
        "value": {"timeSeries": [{
            "sourceInfo": {"siteCode": []},
            "variable": {"variableCode": [{"value": "00010"}]},
            "values": []
        }]}
    }"#;

    let parsed = usgs_json::parse_usgs_json("broken.json", content).unwrap();
    assert!(parsed.series.is_empty());
    assert_eq!(parsed.issues.len(), 1);
    assert_eq!(parsed.issues[0].kind, PayloadIssueKind::MalformedEntry);
}

#[test]
fn test_invalid_json_is_provider_failure() {
    let result = usgs_json::parse_usgs_json("bad.json", "{ not json");
    assert!(matches!(result, Err(Error::ProviderFailure { payload, .. }) if payload == "bad.json"));
}

#[test]
fn test_empty_time_series() {
    let parsed = usgs_json::parse_usgs_json("empty.json", r#"{"value": {"timeSeries": []}}"#).unwrap();
    assert!(parsed.series.is_empty());
    assert!(parsed.issues.is_empty());
}
