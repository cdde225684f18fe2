//! Schema and plausibility checks for record documents

use super::report::IssueKind;
use crate::app::models::record::WATER_QUALITY_PARAMETER;
use crate::app::models::{Category, Parameter, QualityTier};
use crate::config::RangeConfig;
use crate::constants::RECORD_DATE_FORMAT;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Errors and warnings found in one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileFindings {
    pub errors: Vec<(IssueKind, String)>,
    pub warnings: Vec<(IssueKind, String)>,
}

impl FileFindings {
    /// Findings consisting of one error
    pub fn single_error(kind: IssueKind, message: String) -> Self {
        Self {
            errors: vec![(kind, message)],
            warnings: Vec::new(),
        }
    }

    pub fn error(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.errors.push((kind, message.into()));
    }

    pub fn warning(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.warnings.push((kind, message.into()));
    }

    /// A file is valid when it has no errors
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_error(&self, kind: IssueKind) -> bool {
        self.errors.iter().any(|(k, _)| *k == kind)
    }

    pub fn has_warning(&self, kind: IssueKind) -> bool {
        self.warnings.iter().any(|(k, _)| *k == kind)
    }
}

/// Expected JSON type of a required field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
    Integer,
    Number,
    String,
    Array,
    Any,
}

impl FieldType {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::String => value.is_string(),
            FieldType::Array => value.is_array(),
            FieldType::Any => true,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FieldType::Integer => "an integer",
            FieldType::Number => "a number",
            FieldType::String => "a string",
            FieldType::Array => "an array",
            FieldType::Any => "present",
        }
    }
}

const TIME_SERIES_FIELDS: &[(&str, FieldType)] = &[
    ("location_id", FieldType::Integer),
    ("location_name", FieldType::String),
    ("year", FieldType::Integer),
    ("parameter", FieldType::String),
    ("source", FieldType::String),
    ("last_updated", FieldType::String),
];

const WATERSHED_FIELDS: &[(&str, FieldType)] = &[
    ("location_id", FieldType::Integer),
    ("location_name", FieldType::String),
    ("data_sources", FieldType::Any),
    ("last_updated", FieldType::String),
    ("drainage_area_sq_miles", FieldType::Number),
    ("primary_tributaries", FieldType::Array),
];

/// Check required fields and their types, reporting each problem
fn check_required(object: &Map<String, Value>, fields: &[(&str, FieldType)], findings: &mut FileFindings) {
    for (field, expected) in fields {
        match object.get(*field) {
            None => findings.error(
                IssueKind::MissingField,
                format!("Missing required field: {}", field),
            ),
            Some(value) if !expected.matches(value) => findings.error(
                IssueKind::TypeError,
                format!("{} must be {}", field, expected.describe()),
            ),
            Some(_) => {}
        }
    }
}

/// Parameters a time-series record of `category` carries in its rows
///
/// `None` when the `parameter` label does not belong in the category.
fn row_parameters(category: Category, label: Option<&str>) -> Option<Vec<Parameter>> {
    match category {
        Category::Quality => match label {
            None | Some(WATER_QUALITY_PARAMETER) => Some(category.parameters().to_vec()),
            Some(name) => name
                .parse::<Parameter>()
                .ok()
                .filter(|p| p.category() == Category::Quality)
                .map(|p| vec![p]),
        },
        _ => {
            let expected = category.parameters().to_vec();
            match label {
                None => Some(expected),
                Some(name) if expected.iter().any(|p| p.name() == name) => Some(expected),
                Some(_) => None,
            }
        }
    }
}

/// Validate a temperature, flow, stage or water-quality record
pub fn check_time_series(
    document: &Value,
    category: Category,
    ranges: &BTreeMap<Parameter, RangeConfig>,
    findings: &mut FileFindings,
) {
    let Some(object) = document.as_object() else {
        findings.error(IssueKind::TypeError, "Record must be a JSON object");
        return;
    };

    check_required(object, TIME_SERIES_FIELDS, findings);

    let label = object.get("parameter").and_then(Value::as_str);
    let Some(parameters) = row_parameters(category, label) else {
        findings.error(
            IssueKind::InvalidValue,
            format!(
                "parameter '{}' does not belong in {}",
                label.unwrap_or_default(),
                category.dir_name()
            ),
        );
        return;
    };

    let rows = match object.get("data") {
        None => {
            findings.error(IssueKind::MissingData, "Missing data array");
            return;
        }
        Some(Value::Array(rows)) => rows,
        Some(_) => {
            findings.error(IssueKind::TypeError, "data must be an array");
            return;
        }
    };

    let consolidated = parameters.len() > 1;
    for (i, row) in rows.iter().enumerate() {
        check_row(i, row, &parameters, consolidated, ranges, findings);
    }

    if let Some(statistics) = object.get("statistics") {
        if consolidated {
            check_consolidated_statistics(statistics, findings);
        } else {
            check_statistics(statistics, None, Some(rows.len()), findings);
        }
    }
}

fn check_row(
    index: usize,
    row: &Value,
    parameters: &[Parameter],
    consolidated: bool,
    ranges: &BTreeMap<Parameter, RangeConfig>,
    findings: &mut FileFindings,
) {
    let Some(row) = row.as_object() else {
        findings.error(IssueKind::TypeError, format!("data[{}] must be an object", index));
        return;
    };

    match row.get("date") {
        None => findings.error(IssueKind::MissingField, format!("Missing date in data[{}]", index)),
        Some(date) => {
            let parsed = date
                .as_str()
                .and_then(|text| NaiveDate::parse_from_str(text, RECORD_DATE_FORMAT).ok());
            if parsed.is_none() {
                findings.error(
                    IssueKind::InvalidValue,
                    format!("Invalid date in data[{}]: {}", index, date),
                );
            }
        }
    }

    if let Some(quality) = row.get("quality") {
        let valid = quality
            .as_str()
            .is_some_and(|text| text.parse::<QualityTier>().is_ok());
        if !valid {
            findings.error(
                IssueKind::InvalidValue,
                format!("Invalid quality in data[{}]: {}", index, quality),
            );
        }
    }

    let present: Vec<(Parameter, &Value)> = parameters
        .iter()
        .filter_map(|p| row.get(p.value_field()).map(|value| (*p, value)))
        .collect();

    if present.is_empty() {
        let message = if consolidated {
            format!("No quality parameters found in data[{}]", index)
        } else {
            format!("Missing {} in data[{}]", parameters[0].value_field(), index)
        };
        findings.error(IssueKind::MissingField, message);
        return;
    }

    for (parameter, value) in present {
        let Some(number) = value.as_f64() else {
            findings.error(
                IssueKind::InvalidValue,
                format!("Invalid {} value in data[{}]: {}", parameter, index, value),
            );
            continue;
        };

        if let Some(range) = ranges.get(&parameter) {
            if !range.contains(number) {
                findings.warning(
                    IssueKind::UnusualValue,
                    format!(
                        "Unusual {} value in data[{}]: {} {} (expected {} to {})",
                        parameter,
                        index,
                        number,
                        parameter.unit(),
                        range.min,
                        range.max
                    ),
                );
            }
        }
    }
}

/// Check one `{mean, min, max, count}` block
fn check_statistics(
    statistics: &Value,
    parameter: Option<&str>,
    row_count: Option<usize>,
    findings: &mut FileFindings,
) {
    let prefix = parameter.map(|p| format!("{} ", p)).unwrap_or_default();
    let field = |name: &str| statistics.get(name).and_then(Value::as_f64);

    if let (Some(mean), Some(min), Some(max)) = (field("mean"), field("min"), field("max")) {
        if !(min <= mean && mean <= max) {
            findings.warning(
                IssueKind::StatisticsWarning,
                format!("{}Statistics min/mean/max relationship is inconsistent", prefix),
            );
        }
    }

    if let (Some(count), Some(rows)) = (statistics.get("count").and_then(Value::as_u64), row_count) {
        if count as usize != rows {
            findings.warning(
                IssueKind::StatisticsWarning,
                format!("{}Statistics count {} does not match {} data rows", prefix, count, rows),
            );
        }
    }
}

/// Check the per-parameter statistics of a water-quality record
fn check_consolidated_statistics(statistics: &Value, findings: &mut FileFindings) {
    let Some(blocks) = statistics.as_object() else {
        findings.warning(IssueKind::StatisticsWarning, "statistics must be an object");
        return;
    };
    for (parameter, block) in blocks {
        check_statistics(block, Some(parameter), None, findings);
    }
}

/// Validate a watershed boundary document
pub fn check_watershed(document: &Value, findings: &mut FileFindings) {
    let Some(object) = document.as_object() else {
        findings.error(IssueKind::TypeError, "Record must be a JSON object");
        return;
    };

    check_required(object, WATERSHED_FIELDS, findings);

    if let Some(area) = object.get("drainage_area_sq_miles").and_then(Value::as_f64) {
        if area <= 0.0 {
            findings.warning(
                IssueKind::UnusualValue,
                "drainage_area_sq_miles should be positive",
            );
        }
    }

    if let Some(boundary) = object.get("watershed_boundary") {
        let is_collection = boundary
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|kind| kind == "FeatureCollection");
        if !is_collection {
            findings.error(
                IssueKind::TypeError,
                "watershed_boundary must be a GeoJSON FeatureCollection",
            );
        }
    }
}
