//! Tests for the record writer
//!
//! Shared fixtures for building parameter series and a writer over a
//! temporary dataset root.


use crate::app::models::{CanonicalSample, Location, Parameter, ParameterSeries, QualityTier};
use crate::app::services::statistics::summarize;
use chrono::NaiveDate;

/// Location 410, Kenai River
pub fn kenai() -> Location {
    Location {
        location_id: 410,
        location_name: "Kenai River".to_string(),
    }
}

/// Build a series for `location` from `(month, day, value, quality)` tuples
pub fn create_test_series(
    location: &Location,
    parameter: Parameter,
    year: i32,
    values: &[(u32, u32, f64, QualityTier)],
) -> ParameterSeries {
    let samples: Vec<CanonicalSample> = values
        .iter()
        .map(|&(month, day, value, quality)| CanonicalSample {
            date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            value,
            quality,
        })
        .collect();
    let statistics = summarize(parameter, &samples).unwrap();
    ParameterSeries::new(
        location,
        parameter,
        year,
        samples,
        statistics,
        "USGS Stream Gauge Network",
    )
    .unwrap()
}
