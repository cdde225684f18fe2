//! Daily aggregation of raw samples
//!
//! This module collapses the raw (instantaneous or daily) samples of one
//! resolved series into at most one canonical sample per calendar date.
//!
//! # Aggregation Rules
//!
//! 1. **Discard**: sentinel and empty values are dropped silently; values or
//!    timestamps that fail to parse are dropped as malformed
//! 2. **Group**: samples are grouped by the leading `YYYY-MM-DD` of their
//!    timestamp, without timezone normalization
//! 3. **Reduce**: the daily value is the arithmetic mean rounded to the
//!    parameter precision, and the daily quality is the worst constituent tier
//!
//! A day whose mean overflows to a non-finite number is dropped as malformed.
//! Output is sorted by date with no gap filling.

use crate::app::models::{CanonicalSample, Parameter, QualityTier, RawSample};
use crate::app::services::quality_classifier::QualityClassifier;
use std::collections::BTreeMap;
use tracing::debug;

pub mod aggregation;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use aggregation::{
    SampleOutcome, interpret_sample, parse_sample_date, parse_sample_value, partition_by_year,
};
pub use stats::{AggregationResult, AggregationStats};

/// Aggregator turning raw samples into daily canonical samples
#[derive(Debug, Clone, Default)]
pub struct DailyAggregator {
    classifier: QualityClassifier,
}

impl DailyAggregator {
    /// Create an aggregator using the given quality classifier
    pub fn new(classifier: QualityClassifier) -> Self {
        Self { classifier }
    }

    /// Classifier used to derive sample quality
    pub fn classifier(&self) -> &QualityClassifier {
        &self.classifier
    }

    /// Aggregate the raw samples of one series into daily samples
    ///
    /// # Arguments
    ///
    /// * `parameter` - Canonical parameter, fixing the rounding precision
    /// * `samples` - Raw samples in any order
    ///
    /// # Returns
    ///
    /// Date-ascending daily samples plus counts of what was dropped
    pub fn aggregate(&self, parameter: Parameter, samples: &[RawSample]) -> AggregationResult {
        let mut stats = AggregationStats::new();
        stats.total_input = samples.len();

        let mut days: BTreeMap<_, DayAccumulator> = BTreeMap::new();

        for sample in samples {
            match interpret_sample(&self.classifier, sample) {
                SampleOutcome::Accepted { date, value, quality } => {
                    let day = days.entry(date).or_default();
                    day.sum += value;
                    day.count += 1;
                    day.quality = day.quality.worst(quality);
                }
                SampleOutcome::Missing => stats.sentinel_dropped += 1,
                SampleOutcome::Malformed(message) => stats.add_malformed(message),
            }
        }

        let mut canonical: Vec<CanonicalSample> = Vec::with_capacity(days.len());
        for (date, day) in days {
            let value = parameter.round(day.sum / day.count as f64);
            if !value.is_finite() {
                stats.add_malformed_day(format!(
                    "Daily {} mean for {} is not finite ({} samples)",
                    parameter, date, day.count
                ));
                continue;
            }
            canonical.push(CanonicalSample {
                date,
                value,
                quality: day.quality,
            });
        }

        stats.days_produced = canonical.len();

        debug!(
            "Aggregated {} {} samples into {} days ({} missing, {} malformed)",
            stats.total_input,
            parameter,
            stats.days_produced,
            stats.sentinel_dropped,
            stats.malformed_dropped
        );

        AggregationResult {
            samples: canonical,
            stats,
        }
    }
}

/// Running totals for one calendar date
#[derive(Debug, Default)]
struct DayAccumulator {
    sum: f64,
    count: usize,
    quality: QualityTier,
}
