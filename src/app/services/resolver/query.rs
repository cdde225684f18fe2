//! Reverse lookups and table listings

use super::Resolver;
use super::tables::name_key;
use crate::app::models::{Location, Parameter};

impl Resolver {
    /// Distinct locations known to the resolver, ordered by id
    pub fn locations(&self) -> Vec<&Location> {
        let mut locations: Vec<&Location> = self.stations.values().collect();
        locations.sort_by_key(|location| location.location_id);
        locations.dedup_by_key(|location| location.location_id);
        locations
    }

    /// Station codes that resolve to the given location id, sorted
    pub fn station_codes_for(&self, location_id: u32) -> Vec<&str> {
        let mut codes: Vec<&str> = self
            .stations
            .iter()
            .filter(|(_, location)| location.location_id == location_id)
            .map(|(code, _)| code.as_str())
            .collect();
        codes.sort_unstable();
        codes
    }

    /// Source codes that resolve to the given parameter, sorted
    pub fn codes_for_parameter(&self, parameter: Parameter) -> Vec<&str> {
        let mut codes: Vec<&str> = self
            .parameters
            .iter()
            .filter(|(_, p)| **p == parameter)
            .map(|(code, _)| code.as_str())
            .collect();
        codes.sort_unstable();
        codes
    }

    /// Locations whose name appears in the text as a whole phrase
    ///
    /// Matching is case-insensitive and uses the patterns compiled when the
    /// stations were inserted. Results are ordered by location id.
    pub fn locations_mentioned_in(&self, text: &str) -> Vec<&Location> {
        self.locations()
            .into_iter()
            .filter(|location| {
                self.name_patterns
                    .get(&name_key(&location.location_name))
                    .is_some_and(|pattern| pattern.is_match(text))
            })
            .collect()
    }

    /// Find a location by exact name (case-insensitive)
    pub fn find_location_by_name(&self, name: &str) -> Option<&Location> {
        let wanted = name.trim().to_lowercase();
        self.locations()
            .into_iter()
            .find(|location| location.location_name.to_lowercase() == wanted)
    }
}
