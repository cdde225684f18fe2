//! Per-sample interpretation and year partitioning

use crate::app::models::{CanonicalSample, QualityTier, RawSample};
use crate::app::services::quality_classifier::QualityClassifier;
use crate::constants::{RECORD_DATE_FORMAT, TIMESTAMP_DATE_LEN, is_missing_value};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// What a single raw sample contributes to aggregation
#[derive(Debug, Clone, PartialEq)]
pub enum SampleOutcome {
    /// Usable value for the given date
    Accepted {
        date: NaiveDate,
        value: f64,
        quality: QualityTier,
    },
    /// Sentinel or empty value
    Missing,
    /// Unparsable value or timestamp
    Malformed(String),
}

/// Interpret one raw sample
pub fn interpret_sample(classifier: &QualityClassifier, sample: &RawSample) -> SampleOutcome {
    let value = match parse_sample_value(&sample.raw_value) {
        Ok(Some(value)) => value,
        Ok(None) => return SampleOutcome::Missing,
        Err(e) => return SampleOutcome::Malformed(e.to_string()),
    };

    let date = match parse_sample_date(&sample.timestamp) {
        Ok(date) => date,
        Err(e) => return SampleOutcome::Malformed(e.to_string()),
    };

    SampleOutcome::Accepted {
        date,
        value,
        quality: classifier.classify(&sample.qualifiers),
    }
}

/// Parse a raw value; `None` for the missing-data sentinel or an empty value
pub fn parse_sample_value(raw: &str) -> Result<Option<f64>> {
    if is_missing_value(raw) {
        return Ok(None);
    }

    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::malformed_sample(format!("Unparsable value '{}'", raw.trim())))?;

    if !value.is_finite() {
        return Err(Error::malformed_sample(format!(
            "Non-finite value '{}'",
            raw.trim()
        )));
    }

    Ok(Some(value))
}

/// Calendar date from the leading `YYYY-MM-DD` of a timestamp
pub fn parse_sample_date(timestamp: &str) -> Result<NaiveDate> {
    let timestamp = timestamp.trim();
    let prefix = timestamp
        .get(..TIMESTAMP_DATE_LEN)
        .ok_or_else(|| Error::malformed_sample(format!("Timestamp '{}' has no date", timestamp)))?;

    NaiveDate::parse_from_str(prefix, RECORD_DATE_FORMAT).map_err(|_| {
        Error::malformed_sample(format!("Timestamp '{}' has no valid date", timestamp))
    })
}

/// Split date-ascending samples into per-year runs
pub fn partition_by_year(samples: &[CanonicalSample]) -> BTreeMap<i32, Vec<CanonicalSample>> {
    let mut years: BTreeMap<i32, Vec<CanonicalSample>> = BTreeMap::new();
    for sample in samples {
        years.entry(sample.year()).or_default().push(*sample);
    }
    years
}
