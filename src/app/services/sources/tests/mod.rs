//! Shared fixtures for source adapter tests

use super::*;

pub mod raw_directory_tests;
pub mod usgs_json_tests;

/// Minimal USGS instantaneous-values payload with one time series
pub fn usgs_payload(site: &str, variable: &str, points: &[(&str, &str, &[&str])]) -> String {
    let values: Vec<serde_json::Value> = points
        .iter()
        .map(|(date_time, value, qualifiers)| {
            serde_json::json!({
                "value": value,
                "qualifiers": qualifiers,
                "dateTime": date_time,
            })
        })
        .collect();

    serde_json::json!({
        "value": {
            "timeSeries": [{
                "sourceInfo": {
                    "siteName": "KENAI R AT COOPER LANDING AK",
                    "siteCode": [{ "value": site, "network": "NWIS" }]
                },
                "variable": {
                    "variableCode": [{ "value": variable }]
                },
                "values": [{ "value": values }]
            }]
        }
    })
    .to_string()
}

pub fn create_test_extractor() -> PaperExtractor {
    PaperExtractor::new().unwrap()
}

/// First series for a station and parameter reference
pub fn find_series<'a>(
    parsed: &'a ParsedPayload,
    station: &StationRef,
    parameter: &ParameterRef,
) -> Option<&'a SourceSeries> {
    parsed
        .series
        .iter()
        .find(|s| &s.station == station && &s.parameter == parameter)
}
