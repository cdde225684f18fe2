//! Water-quality CSV export adapter
//!
//! Exports are named `<prefix>_<station_code>[_...].csv` and carry a `Date`
//! column, optional `Qualifiers` and `Site` columns, and one column per
//! parameter code. A `Site` value overrides the station code from the name.

use super::{ParameterRef, ParsedPayload, PayloadIssueKind, SourceSeries, StationRef};
use crate::app::models::RawSample;
use crate::constants::source_labels;
use crate::{Error, Result};
use std::collections::BTreeMap;

const DATE_COLUMN: &str = "date";
const QUALIFIERS_COLUMN: &str = "qualifiers";
const SITE_COLUMN: &str = "site";

/// Station code embedded in an export filename, if any
pub fn station_from_filename(name: &str) -> Option<String> {
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let stem = file_name.rsplit_once('.').map_or(file_name, |(stem, _)| stem);
    stem.split('_')
        .nth(1)
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
}

/// Split a qualifier cell on spaces, commas or semicolons
pub fn split_qualifiers(cell: &str) -> Vec<String> {
    cell.split([' ', ',', ';'])
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a CSV water-quality export
pub fn parse_csv_export(name: &str, content: &str) -> Result<ParsedPayload> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::provider_failure(name, format!("unreadable CSV header: {}", e)))?
        .clone();

    let find = |wanted: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(wanted));
    let date_index = find(DATE_COLUMN)
        .ok_or_else(|| Error::provider_failure(name, "CSV export has no Date column"))?;
    let qualifiers_index = find(QUALIFIERS_COLUMN);
    let site_index = find(SITE_COLUMN);

    let value_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, header)| {
            Some(*i) != qualifiers_index
                && Some(*i) != site_index
                && *i != date_index
                && !header.is_empty()
        })
        .map(|(i, header)| (i, header.to_string()))
        .collect();

    let default_station = station_from_filename(name);
    if default_station.is_none() && site_index.is_none() {
        return Err(Error::provider_failure(
            name,
            "no station code in filename and no Site column",
        ));
    }

    let mut parsed = ParsedPayload::default();
    let mut grouped: BTreeMap<(String, String), Vec<RawSample>> = BTreeMap::new();

    for (row_number, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                parsed.add_issue(
                    PayloadIssueKind::MalformedEntry,
                    format!("{} row {}: {}", name, row_number + 1, e),
                );
                continue;
            }
        };

        let station = site_index
            .and_then(|i| record.get(i))
            .filter(|site| !site.is_empty())
            .map(str::to_string)
            .or_else(|| default_station.clone());
        let Some(station) = station else {
            parsed.add_issue(
                PayloadIssueKind::MalformedEntry,
                format!("{} row {}: no station code", name, row_number + 1),
            );
            continue;
        };

        let date = record.get(date_index).unwrap_or_default();
        let qualifiers = qualifiers_index
            .and_then(|i| record.get(i))
            .map(split_qualifiers)
            .unwrap_or_default();

        for (index, code) in &value_columns {
            let value = record.get(*index).unwrap_or_default();
            grouped
                .entry((station.clone(), code.clone()))
                .or_default()
                .push(RawSample {
                    timestamp: date.to_string(),
                    raw_value: value.to_string(),
                    qualifiers: qualifiers.clone(),
                });
        }
    }

    parsed.series = grouped
        .into_iter()
        .map(|((station, code), samples)| SourceSeries {
            station: StationRef::Code(station),
            parameter: ParameterRef::Code(code),
            samples,
            source: source_labels::CSV_EXPORT.to_string(),
        })
        .collect();

    Ok(parsed)
}
