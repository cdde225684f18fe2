//! Application constants for the watershed processor
//!
//! This module contains all default values, lookup-table seeds and file
//! layout conventions used throughout the processor.

// =============================================================================
// Dataset Layout
// =============================================================================

/// Default dataset name written into a freshly initialised manifest
pub const DEFAULT_DATASET_NAME: &str = "AFCA Watershed Dataset";

/// Default manifest format version
pub const DEFAULT_MANIFEST_VERSION: &str = "1.0.0";

/// Directory (relative to the dataset root) holding canonical record files
pub const DATA_DIR_NAME: &str = "data";

/// Directory (relative to the dataset root) holding raw provider payloads
pub const RAW_DATA_DIR_NAME: &str = "raw-data";

/// Manifest filename at the dataset root
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Validation report filename at the dataset root
pub const VALIDATION_REPORT_FILENAME: &str = "validation-report.json";

/// Prefix shared by every record filename
pub const RECORD_FILE_PREFIX: &str = "location-";

/// Extension of canonical record files
pub const RECORD_FILE_EXTENSION: &str = "json";

// =============================================================================
// Raw Value Conventions
// =============================================================================

/// Reserved raw value meaning "no data" in USGS payloads
pub const MISSING_VALUE_SENTINEL: f64 = -999_999.0;

/// Date format used in canonical records
pub const RECORD_DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of leading timestamp characters holding the calendar date
pub const TIMESTAMP_DATE_LEN: usize = 10;

// =============================================================================
// Quality Qualifier Codes
// =============================================================================

/// Source qualifier codes used to derive quality tiers
pub mod qualifier_codes {
    /// Provisional data subject to revision
    pub const PROVISIONAL: &str = "P";

    /// Estimated value
    pub const ESTIMATED: &str = "e";

    /// Approved for publication
    pub const APPROVED: &str = "A";

    /// Revised value
    pub const REVISED: &str = "R";

    /// Suspect value
    pub const SUSPECT: &str = "S";

    /// Codes that degrade a sample to `fair`
    pub const FAIR_CODES: &[&str] = &[PROVISIONAL, ESTIMATED, APPROVED];

    /// Codes that degrade a sample to `poor`
    pub const POOR_CODES: &[&str] = &[REVISED, SUSPECT];
}

// =============================================================================
// Source Labels
// =============================================================================

/// Source labels written into canonical records
pub mod source_labels {
    pub const USGS: &str = "USGS Stream Gauge Network";
    pub const CSV_EXPORT: &str = "Water Quality Monitoring Export";
    pub const RESEARCH_PAPER: &str = "Research Paper Extraction";
}

// =============================================================================
// Default Resolver Tables
// =============================================================================

/// Default source parameter codes and the canonical parameter they map to
///
/// USGS NWIS parameter codes first, then the column names used by CSV
/// water-quality exports.
pub const DEFAULT_PARAMETER_CODES: &[(&str, &str)] = &[
    ("00010", "temperature"),
    ("00060", "flow"),
    ("00065", "stage"),
    ("00095", "conductivity"),
    ("00094", "conductivity"),
    ("00300", "dissolved_oxygen"),
    ("00076", "turbidity"),
    ("63680", "turbidity"),
    ("00400", "ph"),
    ("00403", "ph"),
    ("00405", "ph"),
    ("Temperature", "temperature"),
    ("pH", "ph"),
    ("Dissolved_Oxygen", "dissolved_oxygen"),
    ("Turbidity", "turbidity"),
    ("Conductivity", "conductivity"),
];

/// Default USGS station codes with their location id and name
pub const DEFAULT_STATIONS: &[(&str, u32, &str)] = &[
    ("15276000", 410, "Kenai River"),
    ("15290000", 411, "Russian River"),
    ("15284000", 412, "Moose River"),
    ("15292000", 413, "Killey River"),
];

// =============================================================================
// Plausibility Ranges
// =============================================================================

/// Default plausible value ranges (inclusive) per parameter name
pub const DEFAULT_PLAUSIBLE_RANGES: &[(&str, f64, f64)] = &[
    ("temperature", -5.0, 25.0),
    ("flow", 0.0, 50_000.0),
    ("stage", 0.0, 100.0),
    ("conductivity", 0.0, 5_000.0),
    ("dissolved_oxygen", 0.0, 20.0),
    ("turbidity", 0.0, 1_000.0),
    ("ph", 4.0, 10.0),
];

/// Accepted range for temperatures pulled from research-paper text (°C)
pub const PAPER_TEMPERATURE_RANGE: (f64, f64) = (0.0, 30.0);

/// Accepted range for flows pulled from research-paper text (ft³/s)
pub const PAPER_FLOW_RANGE: (f64, f64) = (0.0, 100_000.0);

// =============================================================================
// Helper Functions
// =============================================================================

/// Round a value to the given number of decimal places (half away from zero)
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Check whether a raw value string denotes missing data
pub fn is_missing_value(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return true;
    }
    trimmed
        .parse::<f64>()
        .map(|value| value == MISSING_VALUE_SENTINEL)
        .unwrap_or(false)
}
