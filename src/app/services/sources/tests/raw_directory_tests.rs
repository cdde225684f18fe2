//! Tests for the raw data directory provider

use super::*;
use crate::Error;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_lists_supported_files_in_name_order() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("b_flow.json"), "{}").unwrap();
    fs::write(temp_dir.path().join("a_paper.txt"), "text").unwrap();
    fs::write(temp_dir.path().join("wq_15276000.csv"), "Date\n").unwrap();
    fs::write(temp_dir.path().join("notes.md"), "ignored").unwrap();
    fs::create_dir(temp_dir.path().join("nested.json")).unwrap();

    let provider = RawDataDirectory::new(temp_dir.path());
    let payloads = provider.list_payloads().unwrap();

    let names: Vec<&str> = payloads.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a_paper.txt", "b_flow.json", "wq_15276000.csv"]);
    assert_eq!(payloads[0].format, PayloadFormat::PaperText);
    assert_eq!(payloads[1].format, PayloadFormat::UsgsJson);
    assert_eq!(payloads[2].format, PayloadFormat::CsvExport);
}

#[test]
fn test_missing_directory_lists_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let provider = RawDataDirectory::new(temp_dir.path().join("absent"));
    assert!(provider.list_payloads().unwrap().is_empty());
}

#[test]
fn test_fetch_reads_content() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("paper.txt"), "Kenai River").unwrap();

    let provider = RawDataDirectory::new(temp_dir.path());
    let payload = provider
        .fetch(&PayloadRef {
            name: "paper.txt".to_string(),
            format: PayloadFormat::PaperText,
        })
        .unwrap();
    assert_eq!(payload.content, "Kenai River");
    assert_eq!(payload.format, PayloadFormat::PaperText);
}

#[test]
fn test_fetch_missing_file_is_provider_failure() {
    let temp_dir = TempDir::new().unwrap();
    let provider = RawDataDirectory::new(temp_dir.path());
    let result = provider.fetch(&PayloadRef {
        name: "gone.json".to_string(),
        format: PayloadFormat::UsgsJson,
    });
    assert!(matches!(result, Err(Error::ProviderFailure { .. })));
}

#[test]
fn test_format_from_extension() {
    assert_eq!(PayloadFormat::from_extension("JSON"), Some(PayloadFormat::UsgsJson));
    assert_eq!(PayloadFormat::from_extension("parquet"), None);
}
