//! Normalization pipeline
//!
//! This module drives one run over every payload a [`SourceProvider`]
//! offers:
//!
//! 1. **Parse**: the payload goes through the adapter for its format
//! 2. **Resolve**: station and parameter codes map to canonical locations and
//!    parameters; unknown codes skip the series with a diagnostic
//! 3. **Aggregate**: raw samples collapse to daily values, split by year
//! 4. **Summarize**: each year gets its statistics
//! 5. **Write**: every (location, parameter, year) series is persisted once,
//!    quality parameters consolidated per (location, year)
//!
//! Payloads are processed one at a time. A payload that cannot be fetched or
//! parsed is counted as failed and the run moves on; only configuration and
//! manifest errors stop a run. Manifest reindexing is a separate step.

use crate::app::models::{Category, Parameter, ParameterSeries};
use crate::app::services::daily_aggregator::DailyAggregator;
use crate::app::services::quality_classifier::QualityClassifier;
use crate::app::services::record_writer::{
    RecordWriter, group_series_for_writing, record_relative_path,
};
use crate::app::services::resolver::Resolver;
use crate::app::services::sources::{PaperExtractor, SourceProvider};
use crate::config::Config;
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub mod runner;
pub mod summary;

#[cfg(test)]
pub mod tests;

pub use summary::{Diagnostic, DiagnosticKind, RunSummary};

/// Series identity across payloads
type SeriesKey = (u32, Parameter, i32);

/// Pipeline wiring the resolver, aggregator and writer together
#[derive(Debug, Clone)]
pub struct Pipeline {
    resolver: Resolver,
    aggregator: DailyAggregator,
    extractor: PaperExtractor,
    writer: RecordWriter,
    show_progress: bool,
}

impl Pipeline {
    /// Create a pipeline from its components
    pub fn new(resolver: Resolver, aggregator: DailyAggregator, writer: RecordWriter) -> Result<Self> {
        Ok(Self {
            resolver,
            aggregator,
            extractor: PaperExtractor::new()?,
            writer,
            show_progress: false,
        })
    }

    /// Create a pipeline writing beneath the configured dataset root
    pub fn from_config(config: &Config) -> Result<Self> {
        let resolver = Resolver::from_config(&config.resolver)?;
        let aggregator = DailyAggregator::new(QualityClassifier::from_config(&config.quality));
        let writer = RecordWriter::new(config.paths.base_dir.clone());

        debug!(
            "Pipeline tables: {} parameter codes, {} stations",
            resolver.parameter_code_count(),
            resolver.station_count()
        );
        Self::new(resolver, aggregator, writer)
    }

    /// Show a per-payload progress bar on stderr
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn writer(&self) -> &RecordWriter {
        &self.writer
    }

    /// Process every payload the provider lists and persist the results
    ///
    /// # Arguments
    ///
    /// * `provider` - Source of raw payloads
    ///
    /// # Returns
    ///
    /// Counts of processed, skipped and failed payloads plus all diagnostics.
    /// Only a failure to list payloads or a critical error is returned as `Err`.
    pub fn run(&self, provider: &dyn SourceProvider) -> Result<RunSummary> {
        let payloads = provider.list_payloads()?;
        info!("Processing {} payloads", payloads.len());

        let mut summary = RunSummary::new();
        let mut built: BTreeMap<SeriesKey, ParameterSeries> = BTreeMap::new();
        let progress = self.create_progress_bar(payloads.len() as u64);

        for payload in &payloads {
            progress.set_message(payload.name.clone());

            match self.process_payload(provider, payload, &mut summary) {
                Ok(series) if series.is_empty() => {
                    debug!("{} yielded no series", payload.name);
                    summary.payloads_skipped += 1;
                }
                Ok(series) => {
                    summary.payloads_processed += 1;
                    for item in series {
                        let key = (item.location_id, item.parameter, item.year);
                        if built.insert(key, item).is_some() {
                            debug!(
                                "{} replaces location {} {} {}",
                                payload.name, key.0, key.1, key.2
                            );
                            summary.series_replaced += 1;
                        }
                    }
                }
                Err(e) if e.is_critical() => {
                    progress.abandon();
                    return Err(e);
                }
                Err(e) => {
                    warn!("Skipping payload {}: {}", payload.name, e);
                    summary.payloads_failed += 1;
                    summary.add_diagnostic(
                        DiagnosticKind::ProviderFailure,
                        payload.name.clone(),
                        e.to_string(),
                    );
                }
            }

            progress.inc(1);
        }
        progress.finish_and_clear();

        let series: Vec<ParameterSeries> = built.into_values().collect();
        self.write_all(&series, &mut summary);

        info!("{}", summary.summary());
        Ok(summary)
    }

    /// Persist series, consolidating quality parameters per location and year
    fn write_all(&self, series: &[ParameterSeries], summary: &mut RunSummary) {
        for unit in group_series_for_writing(series) {
            let Some(first) = unit.first() else {
                continue;
            };

            let result = match first.category() {
                Category::Quality => self.writer.write_quality(&unit),
                _ => self.writer.write_series(first),
            };

            match result {
                Ok(written) => summary.add_written(&written),
                Err(e) => {
                    let path = record_relative_path(first.category(), first.location_id, first.year);
                    warn!("Failed to write {}: {}", path, e);
                    summary.add_diagnostic(DiagnosticKind::WriteFailure, path, e.to_string());
                }
            }
        }
    }

    fn create_progress_bar(&self, total: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }
}
