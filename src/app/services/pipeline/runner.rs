//! Per-payload processing

use super::{DiagnosticKind, Pipeline, RunSummary};
use crate::app::models::{Location, Parameter, ParameterSeries, RawSample};
use crate::app::services::daily_aggregator::partition_by_year;
use crate::app::services::sources::{
    ParameterRef, PayloadRef, SourceProvider, SourceSeries, StationRef, parse_payload,
};
use crate::app::services::statistics;
use crate::Result;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Raw samples of one resolved series, gathered across a payload
struct ResolvedSeries {
    location: Location,
    samples: Vec<RawSample>,
    source: String,
}

impl Pipeline {
    /// Fetch, parse and aggregate one payload into yearly series
    ///
    /// Unknown codes, malformed samples and adapter issues become diagnostics
    /// on `summary`. `Err` means the payload itself could not be read.
    pub fn process_payload(
        &self,
        provider: &dyn SourceProvider,
        payload: &PayloadRef,
        summary: &mut RunSummary,
    ) -> Result<Vec<ParameterSeries>> {
        let raw = provider.fetch(payload)?;
        let parsed = parse_payload(&raw, &self.resolver, &self.extractor)?;

        for issue in &parsed.issues {
            summary.add_diagnostic(issue.kind.into(), payload.name.clone(), issue.message.clone());
        }
        summary.samples_read += parsed.sample_count();

        let mut resolved: BTreeMap<(u32, Parameter), ResolvedSeries> = BTreeMap::new();
        for source_series in parsed.series {
            let Some((location, parameter)) =
                self.resolve_series(&source_series, &payload.name, summary)
            else {
                continue;
            };

            resolved
                .entry((location.location_id, parameter))
                .or_insert_with(|| ResolvedSeries {
                    location,
                    samples: Vec::new(),
                    source: source_series.source.clone(),
                })
                .samples
                .extend(source_series.samples);
        }

        let mut series = Vec::new();
        for ((_, parameter), group) in resolved {
            series.extend(self.build_series(parameter, group, &payload.name, summary));
        }

        debug!("{}: {} yearly series", payload.name, series.len());
        Ok(series)
    }

    /// Resolve the station and parameter of a source series
    ///
    /// Both lookups are attempted so each unknown code gets its own diagnostic.
    fn resolve_series(
        &self,
        series: &SourceSeries,
        subject: &str,
        summary: &mut RunSummary,
    ) -> Option<(Location, Parameter)> {
        let parameter = match &series.parameter {
            ParameterRef::Canonical(parameter) => Some(*parameter),
            ParameterRef::Code(code) => match self.resolver.resolve_parameter(code) {
                Ok((parameter, _unit)) => Some(parameter),
                Err(e) => {
                    warn!("{}: {}", subject, e);
                    summary.add_diagnostic(DiagnosticKind::UnknownParameter, subject, e.to_string());
                    None
                }
            },
        };

        let location = match &series.station {
            StationRef::Resolved(location) => Some(location.clone()),
            StationRef::Code(code) => match self.resolver.resolve_location(code) {
                Ok(location) => Some(location.clone()),
                Err(e) => {
                    warn!("{}: {}", subject, e);
                    summary.add_diagnostic(DiagnosticKind::UnknownLocation, subject, e.to_string());
                    None
                }
            },
        };

        Some((location?, parameter?))
    }

    /// Aggregate one resolved series and split it into yearly series
    fn build_series(
        &self,
        parameter: Parameter,
        group: ResolvedSeries,
        subject: &str,
        summary: &mut RunSummary,
    ) -> Vec<ParameterSeries> {
        let result = self.aggregator.aggregate(parameter, &group.samples);
        for message in &result.stats.malformed_messages {
            summary.add_diagnostic(DiagnosticKind::MalformedSample, subject, message.clone());
        }
        summary.days_produced += result.day_count();

        let mut series = Vec::new();
        for (year, samples) in partition_by_year(&result.samples) {
            let Some(stats) = statistics::summarize(parameter, &samples) else {
                continue;
            };

            match ParameterSeries::new(&group.location, parameter, year, samples, stats, &group.source) {
                Ok(item) => {
                    summary.series_built += 1;
                    series.push(item);
                }
                Err(e) => {
                    summary.add_diagnostic(DiagnosticKind::MalformedSample, subject, e.to_string())
                }
            }
        }

        series
    }
}
