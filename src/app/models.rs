//! Data models for watershed processing
//!
//! This module contains the core data structures for representing hydrological
//! parameters, quality tiers, raw and canonical samples, and the per-year
//! parameter series that become canonical record files.

use crate::constants::{self, RECORD_DATE_FORMAT};
use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub mod manifest;
pub mod record;

// =============================================================================
// Quality Tier
// =============================================================================

/// Three-tier quality attached to every daily value
///
/// Variants are ordered from best to worst so that `max` yields the worst tier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// No qualifier, or only unrecognized qualifiers
    #[default]
    Good,
    /// Provisional, estimated or approved-with-remarks data
    Fair,
    /// Revised or suspect data
    Poor,
}

impl QualityTier {
    /// Canonical lowercase name used in record files
    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::Good => "good",
            QualityTier::Fair => "fair",
            QualityTier::Poor => "poor",
        }
    }

    /// Worse of two tiers
    pub fn worst(self, other: QualityTier) -> QualityTier {
        self.max(other)
    }

    /// Worst tier in a collection; an empty collection is `Good`
    pub fn worst_of<I>(tiers: I) -> QualityTier
    where
        I: IntoIterator<Item = QualityTier>,
    {
        tiers.into_iter().fold(QualityTier::Good, QualityTier::worst)
    }
}

impl FromStr for QualityTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "good" => Ok(QualityTier::Good),
            "fair" => Ok(QualityTier::Fair),
            "poor" => Ok(QualityTier::Poor),
            other => Err(Error::malformed_sample(format!(
                "Invalid quality tier '{}': must be good, fair or poor",
                other
            ))),
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Parameter and Category
// =============================================================================

/// Canonical hydrological parameter
///
/// Each variant fixes the value-field name, unit, rounding precision and
/// storage category of its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Temperature,
    Flow,
    Stage,
    Conductivity,
    DissolvedOxygen,
    Turbidity,
    Ph,
}

impl Parameter {
    /// Every known parameter
    pub const ALL: [Parameter; 7] = [
        Parameter::Temperature,
        Parameter::Flow,
        Parameter::Stage,
        Parameter::Conductivity,
        Parameter::DissolvedOxygen,
        Parameter::Turbidity,
        Parameter::Ph,
    ];

    /// Canonical parameter name
    pub fn name(self) -> &'static str {
        match self {
            Parameter::Temperature => "temperature",
            Parameter::Flow => "flow",
            Parameter::Stage => "stage",
            Parameter::Conductivity => "conductivity",
            Parameter::DissolvedOxygen => "dissolved_oxygen",
            Parameter::Turbidity => "turbidity",
            Parameter::Ph => "ph",
        }
    }

    /// Name of the per-day value field in record files
    pub fn value_field(self) -> &'static str {
        match self {
            Parameter::Temperature => "temperature_c",
            Parameter::Flow => "flow_cfs",
            Parameter::Stage => "stage_ft",
            Parameter::Conductivity => "conductivity_us_cm",
            Parameter::DissolvedOxygen => "dissolved_oxygen_mg_l",
            Parameter::Turbidity => "turbidity_ntu",
            Parameter::Ph => "ph",
        }
    }

    /// Measurement unit
    pub fn unit(self) -> &'static str {
        match self {
            Parameter::Temperature => "°C",
            Parameter::Flow => "ft³/s",
            Parameter::Stage => "ft",
            Parameter::Conductivity => "µS/cm",
            Parameter::DissolvedOxygen => "mg/L",
            Parameter::Turbidity => "NTU",
            Parameter::Ph => "pH units",
        }
    }

    /// Decimal places kept for daily values and statistics
    pub fn precision(self) -> u32 {
        match self {
            Parameter::Conductivity => 0,
            Parameter::Temperature
            | Parameter::Flow
            | Parameter::Stage
            | Parameter::DissolvedOxygen
            | Parameter::Turbidity
            | Parameter::Ph => 2,
        }
    }

    /// Storage category of this parameter's records
    pub fn category(self) -> Category {
        match self {
            Parameter::Temperature => Category::Temperature,
            Parameter::Flow => Category::Flow,
            Parameter::Stage => Category::Stage,
            Parameter::Conductivity
            | Parameter::DissolvedOxygen
            | Parameter::Turbidity
            | Parameter::Ph => Category::Quality,
        }
    }

    /// Round a value to this parameter's precision
    pub fn round(self, value: f64) -> f64 {
        constants::round_to(value, self.precision())
    }
}

impl FromStr for Parameter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Parameter::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| Error::unknown_parameter(name))
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage category, one directory under `data/` each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Watershed,
    Temperature,
    Quality,
    Flow,
    Stage,
}

impl Category {
    /// Every category in directory order
    pub const ALL: [Category; 5] = [
        Category::Watershed,
        Category::Temperature,
        Category::Quality,
        Category::Flow,
        Category::Stage,
    ];

    /// Directory name under `data/`
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Watershed => "02-watersheds",
            Category::Temperature => "03-temperature",
            Category::Quality => "04-quality",
            Category::Flow => "05-flow",
            Category::Stage => "06-stage",
        }
    }

    /// Key used for this category in manifest entries
    pub fn manifest_key(self) -> &'static str {
        match self {
            Category::Watershed => "watershed",
            Category::Temperature => "temperature",
            Category::Quality => "quality",
            Category::Flow => "flow",
            Category::Stage => "stage",
        }
    }

    /// Whether records in this category are split per year
    pub fn is_yearly(self) -> bool {
        !matches!(self, Category::Watershed)
    }

    /// Parameters stored in this category
    pub fn parameters(self) -> &'static [Parameter] {
        match self {
            Category::Watershed => &[],
            Category::Temperature => &[Parameter::Temperature],
            Category::Quality => &[
                Parameter::Conductivity,
                Parameter::DissolvedOxygen,
                Parameter::Turbidity,
                Parameter::Ph,
            ],
            Category::Flow => &[Parameter::Flow],
            Category::Stage => &[Parameter::Stage],
        }
    }

    /// Look a category up by its directory name
    pub fn from_dir_name(dir_name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.dir_name() == dir_name)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.manifest_key())
    }
}

// =============================================================================
// Samples
// =============================================================================

/// One reading as delivered by a source, before any interpretation
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    /// Source timestamp; the leading `YYYY-MM-DD` is the calendar date
    pub timestamp: String,

    /// Raw value text, possibly the missing-data sentinel or empty
    pub raw_value: String,

    /// Source qualifier codes (e.g. "P", "e", "A")
    pub qualifiers: Vec<String>,
}

impl RawSample {
    /// Create a raw sample from borrowed parts
    pub fn new(timestamp: impl Into<String>, raw_value: impl Into<String>, qualifiers: &[&str]) -> Self {
        Self {
            timestamp: timestamp.into(),
            raw_value: raw_value.into(),
            qualifiers: qualifiers.iter().map(|q| q.to_string()).collect(),
        }
    }
}

/// One aggregated daily value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalSample {
    /// Calendar date
    pub date: NaiveDate,

    /// Daily mean, rounded to the parameter precision
    pub value: f64,

    /// Worst quality tier among the day's constituents
    pub quality: QualityTier,
}

impl CanonicalSample {
    /// Date rendered in record format
    pub fn date_string(&self) -> String {
        self.date.format(RECORD_DATE_FORMAT).to_string()
    }

    /// Calendar year of the sample
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

// =============================================================================
// Statistics and Series
// =============================================================================

/// Summary statistics of one year of daily values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl Statistics {
    /// Whether `min <= mean <= max` holds
    pub fn is_ordered(&self) -> bool {
        self.min <= self.mean && self.mean <= self.max
    }
}

/// Canonical location a station resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub location_id: u32,
    pub location_name: String,
}

/// One year of daily values for one parameter at one location
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSeries {
    pub location_id: u32,
    pub location_name: String,
    pub parameter: Parameter,
    pub year: i32,
    /// Ascending, unique dates all inside `year`
    pub samples: Vec<CanonicalSample>,
    pub statistics: Statistics,
    pub source: String,
}

impl ParameterSeries {
    /// Assemble a series, checking the sample/statistics invariants
    pub fn new(
        location: &Location,
        parameter: Parameter,
        year: i32,
        samples: Vec<CanonicalSample>,
        statistics: Statistics,
        source: impl Into<String>,
    ) -> Result<Self> {
        let series = Self {
            location_id: location.location_id,
            location_name: location.location_name.clone(),
            parameter,
            year,
            samples,
            statistics,
            source: source.into(),
        };

        series.validate()?;
        Ok(series)
    }

    /// Validate the structural invariants of the series
    pub fn validate(&self) -> Result<()> {
        if self.samples.is_empty() {
            return Err(Error::malformed_sample(format!(
                "Series {} {} {} has no samples",
                self.location_id, self.parameter, self.year
            )));
        }

        if self.statistics.count != self.samples.len() {
            return Err(Error::malformed_sample(format!(
                "Statistics count {} does not match {} samples",
                self.statistics.count,
                self.samples.len()
            )));
        }

        if let Some(sample) = self.samples.iter().find(|s| s.year() != self.year) {
            return Err(Error::malformed_sample(format!(
                "Sample dated {} does not belong to year {}",
                sample.date, self.year
            )));
        }

        if self.samples.windows(2).any(|w| w[0].date >= w[1].date) {
            return Err(Error::malformed_sample(
                "Samples must have strictly ascending dates".to_string(),
            ));
        }

        Ok(())
    }

    /// Measurement unit of the series
    pub fn unit(&self) -> &'static str {
        self.parameter.unit()
    }

    /// Storage category of the series
    pub fn category(&self) -> Category {
        self.parameter.category()
    }

    /// Location the series belongs to
    pub fn location(&self) -> Location {
        Location {
            location_id: self.location_id,
            location_name: self.location_name.clone(),
        }
    }
}
