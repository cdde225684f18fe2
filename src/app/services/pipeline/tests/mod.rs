//! Shared fixtures for pipeline tests

use super::*;
use crate::app::services::sources::{PayloadFormat, PayloadRef, RawPayload};
use crate::{Error, Result};
use std::path::Path;


/// Provider serving payloads from memory
#[derive(Debug, Default)]
pub struct MemoryProvider {
    pub payloads: Vec<RawPayload>,
    /// Payload names whose fetch fails
    pub failing: Vec<String>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(mut self, name: &str, content: impl Into<String>) -> Self {
        let extension = name.rsplit('.').next().unwrap_or_default();
        let format = PayloadFormat::from_extension(extension).unwrap();
        self.payloads.push(RawPayload {
            name: name.to_string(),
            format,
            content: content.into(),
        });
        self
    }

    pub fn with_failing(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self.with_payload(name, "")
    }
}

impl SourceProvider for MemoryProvider {
    fn list_payloads(&self) -> Result<Vec<PayloadRef>> {
        Ok(self
            .payloads
            .iter()
            .map(|p| PayloadRef {
                name: p.name.clone(),
                format: p.format,
            })
            .collect())
    }

    fn fetch(&self, payload: &PayloadRef) -> Result<RawPayload> {
        if self.failing.contains(&payload.name) {
            return Err(Error::provider_failure(&payload.name, "connection reset"));
        }
        self.payloads
            .iter()
            .find(|p| p.name == payload.name)
            .cloned()
            .ok_or_else(|| Error::provider_failure(&payload.name, "not found"))
    }
}

/// USGS payload with one time series of `(dateTime, value, qualifiers)`
pub fn usgs_payload(site: &str, variable: &str, points: &[(&str, &str, &[&str])]) -> String {
    crate::app::services::sources::tests::usgs_payload(site, variable, points)
}

/// Pipeline with default tables writing beneath `base_dir`
pub fn create_test_pipeline(base_dir: &Path) -> Pipeline {
    Pipeline::from_config(&Config::default().with_base_dir(base_dir)).unwrap()
}

/// Parse a written record
pub fn read_record(base_dir: &Path, relative_path: &str) -> serde_json::Value {
    let content = std::fs::read_to_string(base_dir.join(relative_path)).unwrap();
    serde_json::from_str(&content).unwrap()
}
