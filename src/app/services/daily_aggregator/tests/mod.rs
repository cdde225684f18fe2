//! Tests for daily aggregation
//!
//! Shared fixtures for building raw samples and a default aggregator.


use super::DailyAggregator;
use crate::app::models::{CanonicalSample, QualityTier, RawSample};

/// Aggregator with the default qualifier code sets
pub fn create_test_aggregator() -> DailyAggregator {
    DailyAggregator::default()
}

/// Raw sample with an ISO timestamp on the given date
pub fn raw(timestamp: &str, value: &str, qualifiers: &[&str]) -> RawSample {
    RawSample::new(timestamp, value, qualifiers)
}

/// Turn daily samples back into raw samples carrying an equivalent qualifier
pub fn to_raw_samples(samples: &[CanonicalSample]) -> Vec<RawSample> {
    samples
        .iter()
        .map(|sample| {
            let qualifiers: &[&str] = match sample.quality {
                QualityTier::Good => &[],
                QualityTier::Fair => &["P"],
                QualityTier::Poor => &["R"],
            };
            RawSample::new(
                format!("{}T00:00:00.000-09:00", sample.date_string()),
                sample.value.to_string(),
                qualifiers,
            )
        })
        .collect()
}

/// Deterministic pseudo-random sequence for generated inputs
pub struct SampleGenerator {
    state: u64,
}

impl SampleGenerator {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state >> 33
    }

    /// Generate a batch of raw samples mixing valid, sentinel and malformed values
    pub fn raw_batch(&mut self, len: usize) -> Vec<RawSample> {
        const QUALIFIERS: [&[&str]; 5] = [&[], &["P"], &["A", "e"], &["R"], &["Ice"]];

        (0..len)
            .map(|_| {
                let day = 1 + self.next_u64() % 28;
                let month = 1 + self.next_u64() % 12;
                let hour = self.next_u64() % 24;
                let timestamp = format!("2023-{:02}-{:02}T{:02}:15:00.000-09:00", month, day, hour);

                let value = match self.next_u64() % 10 {
                    0 => "-999999".to_string(),
                    1 => String::new(),
                    2 => "n/a".to_string(),
                    _ => format!("{:.2}", (self.next_u64() % 4000) as f64 / 100.0 - 5.0),
                };

                let qualifiers = QUALIFIERS[(self.next_u64() % 5) as usize];
                RawSample::new(timestamp, value, qualifiers)
            })
            .collect()
    }
}
