//! Tests for validation report aggregation

use crate::app::models::Category;
use crate::app::services::validator::{FileFindings, IssueKind, ValidationReport};

#[test]
fn test_empty_report() {
    let report = ValidationReport::new();
    assert_eq!(report.files_checked, 0);
    assert_eq!(report.success_rate(), 100.0);
    assert!(report.is_successful());
}

#[test]
fn test_add_file_counts_valid_and_invalid() {
    let mut report = ValidationReport::new();

    let mut warning_only = FileFindings::default();
    warning_only.warning(IssueKind::UnusualValue, "Unusual ph value in data[0]: 11");
    report.add_file(Category::Quality, "data/04-quality/location-411-2023.json", warning_only);

    let broken = FileFindings::single_error(IssueKind::MissingData, "Missing data array".to_string());
    report.add_file(Category::Flow, "data/05-flow/location-410-2023.json", broken);

    assert_eq!(report.files_checked, 2);
    assert_eq!(report.files_valid, 1);
    assert_eq!(report.files_invalid, 1);
    assert_eq!(report.errors[0].file, "data/05-flow/location-410-2023.json");
    assert_eq!(report.warnings[0].kind, IssueKind::UnusualValue);
    assert_eq!(report.statistics.success_rate, 50.0);
    assert_eq!(report.statistics.files_by_category["flow"], 1);
    assert!(!report.is_successful());
}

#[test]
fn test_assessment_thresholds() {
    let mut report = ValidationReport::new();
    report.files_checked = 100;
    report.files_valid = 95;
    assert_eq!(report.assessment(), "Data quality is excellent");
    report.files_valid = 85;
    assert_eq!(report.assessment(), "Data quality is good with minor issues");
    report.files_valid = 84;
    assert_eq!(report.assessment(), "Data quality needs improvement");
}

#[test]
fn test_report_json_shape() {
    let mut report = ValidationReport::new();
    report.add_file(
        Category::Temperature,
        "data/03-temperature/location-410-2023.json",
        FileFindings::single_error(IssueKind::MissingField, "Missing required field: year".to_string()),
    );

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["errors"][0]["type"], "missing_field");
    assert_eq!(value["errors"][0]["error"], "Missing required field: year");
    assert_eq!(value["files_invalid"], 1);
    assert!(value["validation_date"].is_string());
}
