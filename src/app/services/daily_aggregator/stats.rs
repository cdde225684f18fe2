//! Aggregation statistics and result structures

use crate::app::models::CanonicalSample;

/// Counts describing one aggregation pass
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationStats {
    /// Number of raw samples received
    pub total_input: usize,
    /// Samples dropped for a sentinel or empty value
    pub sentinel_dropped: usize,
    /// Samples dropped for an unparsable value or timestamp
    pub malformed_dropped: usize,
    /// Number of daily samples produced
    pub days_produced: usize,
    /// Days whose mean was not a finite number
    pub days_dropped: usize,
    /// Messages for each malformed sample or day
    pub malformed_messages: Vec<String>,
}

impl AggregationStats {
    /// Create new empty aggregation statistics
    pub fn new() -> Self {
        Self {
            total_input: 0,
            sentinel_dropped: 0,
            malformed_dropped: 0,
            days_produced: 0,
            days_dropped: 0,
            malformed_messages: Vec::new(),
        }
    }

    /// Record a malformed sample
    pub fn add_malformed(&mut self, message: String) {
        self.malformed_dropped += 1;
        self.malformed_messages.push(message);
    }

    /// Record a day dropped for a non-finite mean
    pub fn add_malformed_day(&mut self, message: String) {
        self.days_dropped += 1;
        self.malformed_messages.push(message);
    }

    /// Samples that contributed to a daily value
    pub fn accepted(&self) -> usize {
        self.total_input - self.sentinel_dropped - self.malformed_dropped
    }

    /// Percentage of input samples that were usable
    pub fn acceptance_rate(&self) -> f64 {
        if self.total_input == 0 {
            100.0
        } else {
            (self.accepted() as f64 / self.total_input as f64) * 100.0
        }
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "Aggregation: {} samples -> {} days ({:.1}% usable) | Missing: {} | Malformed: {}",
            self.total_input,
            self.days_produced,
            self.acceptance_rate(),
            self.sentinel_dropped,
            self.malformed_dropped
        )
    }
}

impl Default for AggregationStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Daily samples together with the statistics of the pass that produced them
#[derive(Debug, Clone)]
pub struct AggregationResult {
    /// Date-ascending, one per date
    pub samples: Vec<CanonicalSample>,
    pub stats: AggregationStats,
}

impl AggregationResult {
    /// Whether no daily values were produced
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of daily values
    pub fn day_count(&self) -> usize {
        self.samples.len()
    }
}
