//! Research-paper value extraction
//!
//! Temperature and flow values are pulled from paper text with regular
//! expressions, filtered for plausibility, and attributed to a date and a
//! location. A value is dated only by an ISO `YYYY-MM-DD` date on its own
//! line; undated values are dropped rather than given a synthetic date.
//! Extracted samples carry the `e` (estimated) qualifier.

use super::{ParameterRef, ParsedPayload, PayloadIssueKind, SourceSeries, StationRef};
use crate::app::models::{Location, Parameter, RawSample};
use crate::app::services::resolver::Resolver;
use crate::constants::{
    PAPER_FLOW_RANGE, PAPER_TEMPERATURE_RANGE, RECORD_DATE_FORMAT, qualifier_codes, source_labels,
};
use crate::{Error, Result};
use chrono::NaiveDate;
use regex::{Captures, Regex, RegexBuilder};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

const TEMPERATURE_PATTERNS: &[&str] = &[
    r"temperature[:\s]+([0-9.]+)\s*°?C",
    r"([0-9.]+)\s*°?C.*temperature",
    r"water temperature[:\s]+([0-9.]+)",
    r"stream temperature[:\s]+([0-9.]+)",
    r"([0-9.]+)\s*°C",
];

const FLOW_PATTERNS: &[&str] = &[
    r"flow[:\s]+([0-9,]+)\s*ft³/s",
    r"discharge[:\s]+([0-9,]+)\s*ft³/s",
    r"([0-9,]+)\s*ft³/s.*flow",
    r"streamflow[:\s]+([0-9,]+)",
    r"([0-9,]+)\s*cfs",
];

const DATE_PATTERN: &str = r"\b(\d{4}-\d{2}-\d{2})\b";

/// One value found in the text
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub parameter: Parameter,
    pub value: f64,
    /// 1-based line number
    pub line: usize,
}

/// Compiled extraction patterns
#[derive(Debug, Clone)]
pub struct PaperExtractor {
    temperature: Vec<Regex>,
    flow: Vec<Regex>,
    date: Regex,
}

impl PaperExtractor {
    /// Compile the extraction patterns
    pub fn new() -> Result<Self> {
        Ok(Self {
            temperature: compile_all(TEMPERATURE_PATTERNS)?,
            flow: compile_all(FLOW_PATTERNS)?,
            date: compile(DATE_PATTERN)?,
        })
    }

    /// Plausible candidates on one line, in order of appearance
    ///
    /// Overlapping patterns that capture the same number count once. Digits
    /// belonging to an ISO date are never read as values.
    pub fn candidates_in_line(&self, line: &str, line_number: usize) -> (Vec<Candidate>, Vec<String>) {
        let mut candidates = Vec::new();
        let mut rejected = Vec::new();

        // Blank out dates so their digits cannot match a value pattern
        let masked = self
            .date
            .replace_all(line, |captures: &Captures<'_>| " ".repeat(captures[0].len()));
        let line: &str = &masked;

        for (parameter, patterns, (min, max)) in [
            (Parameter::Temperature, &self.temperature, PAPER_TEMPERATURE_RANGE),
            (Parameter::Flow, &self.flow, PAPER_FLOW_RANGE),
        ] {
            let mut seen = BTreeSet::new();
            for pattern in patterns {
                for captures in pattern.captures_iter(line) {
                    let Some(number) = captures.get(1) else {
                        continue;
                    };
                    if !seen.insert(number.start()) {
                        continue;
                    }
                    let Ok(value) = number.as_str().replace(',', "").parse::<f64>() else {
                        continue;
                    };

                    if value >= min && value <= max {
                        candidates.push((number.start(), Candidate {
                            parameter,
                            value,
                            line: line_number,
                        }));
                    } else {
                        rejected.push(format!(
                            "line {}: {} value {} outside {} to {}",
                            line_number, parameter, value, min, max
                        ));
                    }
                }
            }
        }

        candidates.sort_by_key(|(start, candidate)| (*start, candidate.parameter));
        (candidates.into_iter().map(|(_, c)| c).collect(), rejected)
    }

    /// First valid ISO date on a line
    pub fn date_in_line(&self, line: &str) -> Option<NaiveDate> {
        self.date
            .captures_iter(line)
            .filter_map(|captures| captures.get(1))
            .find_map(|m| NaiveDate::parse_from_str(m.as_str(), RECORD_DATE_FORMAT).ok())
    }

    /// Extract dated, attributed samples from a paper's text
    pub fn extract(&self, text: &str, resolver: &Resolver) -> ParsedPayload {
        let mut parsed = ParsedPayload::default();

        let document_locations = resolver.locations_mentioned_in(text);
        let document_location = match document_locations.as_slice() {
            [only] => Some((*only).clone()),
            _ => None,
        };

        let mut grouped: BTreeMap<(u32, Parameter), (Location, Vec<RawSample>)> = BTreeMap::new();

        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;
            let (candidates, rejected) = self.candidates_in_line(line, line_number);

            for message in rejected {
                parsed.add_issue(PayloadIssueKind::Implausible, message);
            }
            if candidates.is_empty() {
                continue;
            }

            let Some(date) = self.date_in_line(line) else {
                for candidate in &candidates {
                    parsed.add_issue(
                        PayloadIssueKind::Undated,
                        format!(
                            "line {}: {} value {} has no date",
                            line_number, candidate.parameter, candidate.value
                        ),
                    );
                }
                continue;
            };

            let line_locations = resolver.locations_mentioned_in(line);
            let location = match line_locations.as_slice() {
                [only] => Some((*only).clone()),
                [] => document_location.clone(),
                _ => None,
            };
            let Some(location) = location else {
                for candidate in &candidates {
                    parsed.add_issue(
                        PayloadIssueKind::Unattributed,
                        format!(
                            "line {}: {} value {} has no single location",
                            line_number, candidate.parameter, candidate.value
                        ),
                    );
                }
                continue;
            };

            for candidate in candidates {
                grouped
                    .entry((location.location_id, candidate.parameter))
                    .or_insert_with(|| (location.clone(), Vec::new()))
                    .1
                    .push(RawSample {
                        timestamp: date.format(RECORD_DATE_FORMAT).to_string(),
                        raw_value: candidate.value.to_string(),
                        qualifiers: vec![qualifier_codes::ESTIMATED.to_string()],
                    });
            }
        }

        parsed.series = grouped
            .into_iter()
            .map(|((_, parameter), (location, samples))| SourceSeries {
                station: StationRef::Resolved(location),
                parameter: ParameterRef::Canonical(parameter),
                samples,
                source: source_labels::RESEARCH_PAPER.to_string(),
            })
            .collect();

        debug!(
            "Extracted {} paper samples across {} series ({} dropped)",
            parsed.sample_count(),
            parsed.series.len(),
            parsed.issues.len()
        );
        parsed
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::configuration(format!("Invalid extraction pattern '{}': {}", pattern, e)))
}

fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns.iter().map(|pattern| compile(pattern)).collect()
}
