//! Watershed Processor Library
//!
//! A Rust library for normalizing hydrological time-series into canonical
//! per-location/per-year JSON records and maintaining the manifest index that
//! downstream consumers use to locate them.
//!
//! This library provides tools for:
//! - Classifying source qualifier codes into good/fair/poor quality tiers
//! - Resolving source parameter codes and station identifiers from configurable tables
//! - Aggregating instantaneous readings into daily means with worst-tier-wins quality
//! - Summarizing yearly statistics and writing canonical record files
//! - Rebuilding the manifest index from the persisted files
//! - Validating persisted records against schema and plausibility rules

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod daily_aggregator;
        pub mod manifest_indexer;
        pub mod pipeline;
        pub mod quality_classifier;
        pub mod record_writer;
        pub mod resolver;
        pub mod sources;
        pub mod statistics;
        pub mod validator;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{CanonicalSample, Category, Parameter, ParameterSeries, QualityTier, Statistics};
pub use config::Config;

/// Result type alias for the watershed processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for watershed processing operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed
    #[error("JSON error in '{file}': {message}")]
    Json {
        file: String,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Source parameter code not present in the parameter table
    #[error("Unknown parameter code: {code}")]
    UnknownParameter { code: String },

    /// Source station identifier not present in the station table
    #[error("Unknown station code: {code}")]
    UnknownLocation { code: String },

    /// Raw sample with an unparsable value or timestamp
    #[error("Malformed sample: {message}")]
    MalformedSample { message: String },

    /// Raw data provider could not deliver a payload
    #[error("Provider failure for '{payload}': {message}")]
    ProviderFailure { payload: String, message: String },

    /// Manifest is missing or unreadable
    #[error("Manifest corrupt at {path}: {message}")]
    ManifestCorrupt { path: String, message: String },

    /// Validation found invalid records and the caller asked to fail on them
    #[error("Validation failed: {invalid} of {checked} files invalid")]
    ValidationFailed { invalid: usize, checked: usize },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a JSON error with context
    pub fn json(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<serde_json::Error>,
    ) -> Self {
        Self::Json {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unknown parameter error
    pub fn unknown_parameter(code: impl Into<String>) -> Self {
        Self::UnknownParameter { code: code.into() }
    }

    /// Create an unknown location error
    pub fn unknown_location(code: impl Into<String>) -> Self {
        Self::UnknownLocation { code: code.into() }
    }

    /// Create a malformed sample error
    pub fn malformed_sample(message: impl Into<String>) -> Self {
        Self::MalformedSample {
            message: message.into(),
        }
    }

    /// Create a provider failure error
    pub fn provider_failure(payload: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderFailure {
            payload: payload.into(),
            message: message.into(),
        }
    }

    /// Create a manifest corrupt error
    pub fn manifest_corrupt(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ManifestCorrupt {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a validation failure error
    pub fn validation_failed(invalid: usize, checked: usize) -> Self {
        Self::ValidationFailed { invalid, checked }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Whether the error must halt the whole run rather than a single item
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::ManifestCorrupt { .. } | Self::Configuration { .. })
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json {
            file: "unknown".to_string(),
            message: "JSON processing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid TOML configuration: {}", error),
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}
