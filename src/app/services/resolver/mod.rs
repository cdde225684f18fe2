//! Parameter and location resolution
//!
//! This module maps source parameter codes (USGS NWIS codes and CSV export
//! column names) onto canonical parameters, and source station identifiers
//! onto canonical locations. The lookup tables are data: built-in defaults
//! extended and overridden by the `[resolver]` config section.

use crate::app::models::{Location, Parameter};
use crate::{Error, Result};
use regex::Regex;
use std::collections::HashMap;

pub mod query;
pub mod tables;

#[cfg(test)]
pub mod tests;

/// Resolver holding the parameter and station lookup tables
#[derive(Debug, Clone)]
pub struct Resolver {
    /// Source parameter code → canonical parameter
    pub(crate) parameters: HashMap<String, Parameter>,

    /// Station code → canonical location
    pub(crate) stations: HashMap<String, Location>,

    /// Lowercased location name → compiled whole-phrase matcher
    pub(crate) name_patterns: HashMap<String, Regex>,
}

impl Resolver {
    /// Create a resolver with empty tables
    pub fn empty() -> Self {
        Self {
            parameters: HashMap::new(),
            stations: HashMap::new(),
            name_patterns: HashMap::new(),
        }
    }

    /// Resolve a source parameter code to `(parameter, unit)`
    ///
    /// # Arguments
    ///
    /// * `code` - Source parameter code such as `00060` or `pH`
    ///
    /// # Returns
    ///
    /// The canonical parameter and its unit, or `UnknownParameter`
    pub fn resolve_parameter(&self, code: &str) -> Result<(Parameter, &'static str)> {
        self.parameters
            .get(code.trim())
            .map(|parameter| (*parameter, parameter.unit()))
            .ok_or_else(|| Error::unknown_parameter(code.trim()))
    }

    /// Resolve a station identifier to its canonical location
    pub fn resolve_location(&self, station_code: &str) -> Result<&Location> {
        self.stations
            .get(station_code.trim())
            .ok_or_else(|| Error::unknown_location(station_code.trim()))
    }

    /// Number of parameter codes known to the resolver
    pub fn parameter_code_count(&self) -> usize {
        self.parameters.len()
    }

    /// Number of stations known to the resolver
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::with_default_tables()
    }
}
