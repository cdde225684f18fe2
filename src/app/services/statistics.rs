//! Yearly statistics summarizer
//!
//! Computes mean/min/max/count over one year of daily values, rounded to the
//! parameter precision. Empty input has no summary.

use crate::app::models::{CanonicalSample, Parameter, Statistics};

/// Summarize the daily samples of one series year
pub fn summarize(parameter: Parameter, samples: &[CanonicalSample]) -> Option<Statistics> {
    let values: Vec<f64> = samples.iter().map(|sample| sample.value).collect();
    summarize_values(&values, parameter.precision())
}

/// Summarize raw values, rounding every figure to `decimals` places
///
/// # Returns
///
/// `None` for an empty slice; otherwise statistics satisfying
/// `min <= mean <= max` and `count == values.len()`
pub fn summarize_values(values: &[f64], decimals: u32) -> Option<Statistics> {
    let first = *values.first()?;

    let (min, max, sum) = values
        .iter()
        .fold((first, first, 0.0), |(min, max, sum), &value| {
            (min.min(value), max.max(value), sum + value)
        });

    let mean = (sum / values.len() as f64).clamp(min, max);
    let round = |value: f64| crate::constants::round_to(value, decimals);

    Some(Statistics {
        mean: round(mean),
        min: round(min),
        max: round(max),
        count: values.len(),
    })
}
