//! Shared test utilities and fixtures for resolver tests

use super::Resolver;
use crate::config::{ResolverConfig, StationConfig};
use crate::app::models::Parameter;


/// Resolver config adding one parameter code and one station
pub fn create_test_resolver_config() -> ResolverConfig {
    let mut config = ResolverConfig::default();
    config
        .parameters
        .insert("99988".to_string(), Parameter::Turbidity);
    config.stations.insert(
        "15266300".to_string(),
        StationConfig {
            location_id: 414,
            location_name: "Kenai River at Soldotna".to_string(),
        },
    );
    config
}

/// Resolver with built-in tables only
pub fn create_default_resolver() -> Resolver {
    Resolver::with_default_tables()
}
