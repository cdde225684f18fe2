//! Lookup table construction
//!
//! Builds resolver tables from the built-in defaults and layers configured
//! entries on top of them.

use super::Resolver;
use crate::app::models::{Location, Parameter};
use crate::config::ResolverConfig;
use crate::constants::{DEFAULT_PARAMETER_CODES, DEFAULT_STATIONS};
use crate::{Error, Result};
use regex::RegexBuilder;
use tracing::{debug, warn};

impl Resolver {
    /// Create a resolver from the built-in tables only
    pub fn with_default_tables() -> Self {
        let mut resolver = Self::empty();

        for (code, name) in DEFAULT_PARAMETER_CODES {
            if let Ok(parameter) = name.parse::<Parameter>() {
                resolver.insert_parameter(*code, parameter);
            }
        }

        for (code, location_id, location_name) in DEFAULT_STATIONS {
            resolver.insert_station(*code, *location_id, *location_name);
        }

        resolver
    }

    /// Create a resolver from the built-in tables extended by configuration
    ///
    /// Configured entries override built-in entries with the same code.
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        let mut resolver = Self::with_default_tables();

        for (code, parameter) in &config.parameters {
            if code.trim().is_empty() {
                return Err(Error::configuration(
                    "Empty parameter code in [resolver.parameters]",
                ));
            }
            resolver.insert_parameter(code, *parameter);
        }

        for (code, station) in &config.stations {
            if code.trim().is_empty() {
                return Err(Error::configuration(
                    "Empty station code in [resolver.stations]",
                ));
            }
            if station.location_name.trim().is_empty() {
                return Err(Error::configuration(format!(
                    "Station {} has an empty location_name",
                    code
                )));
            }
            resolver.insert_station(code, station.location_id, &station.location_name);
        }

        debug!(
            "Resolver tables: {} parameter codes, {} stations",
            resolver.parameter_code_count(),
            resolver.station_count()
        );

        Ok(resolver)
    }

    /// Add or replace a parameter code mapping
    pub fn insert_parameter(&mut self, code: impl Into<String>, parameter: Parameter) {
        self.parameters.insert(code.into().trim().to_string(), parameter);
    }

    /// Add or replace a station mapping
    pub fn insert_station(
        &mut self,
        code: impl Into<String>,
        location_id: u32,
        location_name: impl Into<String>,
    ) {
        let location_name = location_name.into();
        self.compile_name_pattern(&location_name);
        self.stations.insert(
            code.into().trim().to_string(),
            Location {
                location_id,
                location_name,
            },
        );
    }

    /// Compile the mention matcher for a location name once
    fn compile_name_pattern(&mut self, location_name: &str) {
        let key = name_key(location_name);
        if self.name_patterns.contains_key(&key) {
            return;
        }

        let pattern = format!(r"\b{}\b", regex::escape(location_name.trim()));
        match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(regex) => {
                self.name_patterns.insert(key, regex);
            }
            Err(e) => warn!("Location name '{}' cannot be matched in text: {}", location_name, e),
        }
    }
}

/// Lookup key for a location name pattern
pub(crate) fn name_key(location_name: &str) -> String {
    location_name.trim().to_lowercase()
}
