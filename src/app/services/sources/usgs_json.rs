//! USGS NWIS JSON adapter
//!
//! Handles the `value.timeSeries[]` layout shared by the instantaneous (`iv`)
//! and daily (`dv`) value services. Only the first `values` block of each
//! time series is read.

use super::{ParameterRef, ParsedPayload, PayloadIssueKind, SourceSeries, StationRef};
use crate::app::models::RawSample;
use crate::constants::source_labels;
use crate::{Error, Result};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct UsgsResponse {
    value: UsgsValue,
}

#[derive(Debug, Deserialize)]
struct UsgsValue {
    #[serde(rename = "timeSeries", default)]
    time_series: Vec<UsgsTimeSeries>,
}

#[derive(Debug, Deserialize)]
struct UsgsTimeSeries {
    #[serde(rename = "sourceInfo")]
    source_info: SourceInfo,
    variable: Variable,
    #[serde(default)]
    values: Vec<ValuesBlock>,
}

#[derive(Debug, Deserialize)]
struct SourceInfo {
    #[serde(rename = "siteName", default)]
    site_name: String,
    #[serde(rename = "siteCode", default)]
    site_code: Vec<CodeEntry>,
}

#[derive(Debug, Deserialize)]
struct Variable {
    #[serde(rename = "variableCode", default)]
    variable_code: Vec<CodeEntry>,
}

#[derive(Debug, Deserialize)]
struct CodeEntry {
    value: String,
}

#[derive(Debug, Deserialize)]
struct ValuesBlock {
    #[serde(default)]
    value: Vec<UsgsPoint>,
}

#[derive(Debug, Deserialize)]
struct UsgsPoint {
    #[serde(default)]
    value: PointValue,
    #[serde(default)]
    qualifiers: Vec<Qualifier>,
    #[serde(rename = "dateTime", default)]
    date_time: String,
}

/// Point values arrive as strings but some exports use bare numbers
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum PointValue {
    Text(String),
    Number(f64),
    #[default]
    Null,
}

impl PointValue {
    fn into_raw(self) -> String {
        match self {
            PointValue::Text(text) => text,
            PointValue::Number(number) => number.to_string(),
            PointValue::Null => String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Qualifier {
    Code(String),
    Object {
        #[serde(rename = "qualifierCode")]
        qualifier_code: String,
    },
}

impl Qualifier {
    fn into_code(self) -> String {
        match self {
            Qualifier::Code(code) => code,
            Qualifier::Object { qualifier_code } => qualifier_code,
        }
    }
}

/// Parse a USGS NWIS JSON payload
pub fn parse_usgs_json(name: &str, content: &str) -> Result<ParsedPayload> {
    let response: UsgsResponse = serde_json::from_str(content)
        .map_err(|e| Error::provider_failure(name, format!("invalid USGS JSON: {}", e)))?;

    let mut parsed = ParsedPayload::default();

    for (index, series) in response.value.time_series.into_iter().enumerate() {
        let Some(site) = series.source_info.site_code.into_iter().next() else {
            parsed.add_issue(
                PayloadIssueKind::MalformedEntry,
                format!("timeSeries[{}] has no site code", index),
            );
            continue;
        };
        let Some(variable) = series.variable.variable_code.into_iter().next() else {
            parsed.add_issue(
                PayloadIssueKind::MalformedEntry,
                format!("timeSeries[{}] has no variable code", index),
            );
            continue;
        };

        let samples: Vec<RawSample> = series
            .values
            .into_iter()
            .next()
            .map(|block| block.value)
            .unwrap_or_default()
            .into_iter()
            .map(|point| RawSample {
                timestamp: point.date_time,
                raw_value: point.value.into_raw(),
                qualifiers: point.qualifiers.into_iter().map(Qualifier::into_code).collect(),
            })
            .collect();

        debug!(
            "{}: site {} ({}) parameter {} with {} samples",
            name,
            site.value,
            series.source_info.site_name,
            variable.value,
            samples.len()
        );

        parsed.series.push(SourceSeries {
            station: StationRef::Code(site.value),
            parameter: ParameterRef::Code(variable.value),
            samples,
            source: source_labels::USGS.to_string(),
        });
    }

    Ok(parsed)
}
