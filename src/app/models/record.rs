//! Canonical record file models
//!
//! Record files are written for a single parameter (temperature, flow, stage)
//! or, for the shared water-quality category, as one consolidated record
//! holding every quality parameter observed at a location in a year.

use super::{Category, Parameter, ParameterSeries, QualityTier, Statistics};
use crate::constants::RECORD_DATE_FORMAT;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Parameter label of consolidated water-quality records
pub const WATER_QUALITY_PARAMETER: &str = "water_quality";

/// One row of a record's `data` array
///
/// Serializes as `{date, <value_field>..., quality}` with one value field per
/// parameter observed that day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub values: BTreeMap<Parameter, f64>,
    pub quality: QualityTier,
}

impl Serialize for DailyRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 2))?;
        map.serialize_entry("date", &self.date.format(RECORD_DATE_FORMAT).to_string())?;
        for (parameter, value) in &self.values {
            map.serialize_entry(parameter.value_field(), value)?;
        }
        map.serialize_entry("quality", &self.quality)?;
        map.end()
    }
}

/// Record file for a single-parameter category
#[derive(Debug, Clone, Serialize)]
pub struct SeriesRecord {
    pub location_id: u32,
    pub location_name: String,
    pub year: i32,
    pub parameter: Parameter,
    pub unit: String,
    pub data: Vec<DailyRow>,
    pub statistics: Statistics,
    pub source: String,
    pub last_updated: String,
}

impl SeriesRecord {
    /// Build the record for one series
    pub fn from_series(series: &ParameterSeries, last_updated: &str) -> Self {
        let data = series
            .samples
            .iter()
            .map(|sample| DailyRow {
                date: sample.date,
                values: BTreeMap::from([(series.parameter, sample.value)]),
                quality: sample.quality,
            })
            .collect();

        Self {
            location_id: series.location_id,
            location_name: series.location_name.clone(),
            year: series.year,
            parameter: series.parameter,
            unit: series.unit().to_string(),
            data,
            statistics: series.statistics,
            source: series.source.clone(),
            last_updated: last_updated.to_string(),
        }
    }
}

/// Consolidated water-quality record for one location and year
#[derive(Debug, Clone, Serialize)]
pub struct QualityRecord {
    pub location_id: u32,
    pub location_name: String,
    pub year: i32,
    pub parameter: &'static str,
    pub units: BTreeMap<Parameter, &'static str>,
    pub data: Vec<DailyRow>,
    pub statistics: BTreeMap<Parameter, Statistics>,
    pub source: String,
    pub last_updated: String,
}

impl QualityRecord {
    /// Merge the quality-category series of one location and year
    ///
    /// Rows are keyed by date; a row's quality is the worst tier among the
    /// parameter samples recorded that day.
    pub fn from_series(series: &[&ParameterSeries], last_updated: &str) -> Result<Self> {
        let first = series.first().ok_or_else(|| {
            Error::malformed_sample("Cannot build a water-quality record from no series")
        })?;

        let mut units = BTreeMap::new();
        let mut statistics = BTreeMap::new();
        let mut sources = BTreeSet::new();
        let mut rows: BTreeMap<NaiveDate, DailyRow> = BTreeMap::new();

        for &item in series {
            if item.category() != Category::Quality {
                return Err(Error::malformed_sample(format!(
                    "{} is not a water-quality parameter",
                    item.parameter
                )));
            }
            if item.location_id != first.location_id || item.year != first.year {
                return Err(Error::malformed_sample(format!(
                    "Cannot merge location {} year {} into location {} year {}",
                    item.location_id, item.year, first.location_id, first.year
                )));
            }

            units.insert(item.parameter, item.unit());
            statistics.insert(item.parameter, item.statistics);
            sources.insert(item.source.as_str());

            for sample in &item.samples {
                let row = rows.entry(sample.date).or_insert_with(|| DailyRow {
                    date: sample.date,
                    values: BTreeMap::new(),
                    quality: QualityTier::Good,
                });
                row.values.insert(item.parameter, sample.value);
                row.quality = row.quality.worst(sample.quality);
            }
        }

        Ok(Self {
            location_id: first.location_id,
            location_name: first.location_name.clone(),
            year: first.year,
            parameter: WATER_QUALITY_PARAMETER,
            units,
            data: rows.into_values().collect(),
            statistics,
            source: sources.into_iter().collect::<Vec<_>>().join("; "),
            last_updated: last_updated.to_string(),
        })
    }
}

/// Any canonical record file
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CanonicalRecord {
    Series(SeriesRecord),
    Quality(QualityRecord),
}

impl CanonicalRecord {
    pub fn location_id(&self) -> u32 {
        match self {
            CanonicalRecord::Series(record) => record.location_id,
            CanonicalRecord::Quality(record) => record.location_id,
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            CanonicalRecord::Series(record) => record.year,
            CanonicalRecord::Quality(record) => record.year,
        }
    }

    /// Storage category of the record
    pub fn category(&self) -> Category {
        match self {
            CanonicalRecord::Series(record) => record.parameter.category(),
            CanonicalRecord::Quality(_) => Category::Quality,
        }
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        match self {
            CanonicalRecord::Series(record) => record.data.len(),
            CanonicalRecord::Quality(record) => record.data.len(),
        }
    }
}
