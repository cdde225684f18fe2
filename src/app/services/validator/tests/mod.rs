//! Tests for record validation
//!
//! Fixtures provide well-formed record documents that individual tests then
//! break in specific ways.

pub mod report_tests;

use serde_json::{Value, json};

/// Well-formed temperature record with two rows
pub fn valid_temperature_record() -> Value {
    json!({
        "location_id": 410,
        "location_name": "Kenai River",
        "year": 2023,
        "parameter": "temperature",
        "unit": "°C",
        "data": [
            {"date": "2023-06-01", "temperature_c": 12.5, "quality": "good"},
            {"date": "2023-06-02", "temperature_c": 13.5, "quality": "fair"}
        ],
        "statistics": {"mean": 13.0, "min": 12.5, "max": 13.5, "count": 2},
        "source": "USGS Stream Gauge Network",
        "last_updated": "2024-01-01T00:00:00Z"
    })
}

/// Well-formed consolidated water-quality record
pub fn valid_quality_record() -> Value {
    json!({
        "location_id": 411,
        "location_name": "Russian River",
        "year": 2023,
        "parameter": "water_quality",
        "units": {"ph": "pH units", "turbidity": "NTU"},
        "data": [
            {"date": "2023-06-01", "ph": 7.2, "quality": "good"},
            {"date": "2023-06-02", "ph": 7.4, "turbidity_ntu": 2.0, "quality": "fair"}
        ],
        "statistics": {
            "ph": {"mean": 7.3, "min": 7.2, "max": 7.4, "count": 2},
            "turbidity": {"mean": 2.0, "min": 2.0, "max": 2.0, "count": 1}
        },
        "source": "Water Quality Monitoring Export",
        "last_updated": "2024-01-01T00:00:00Z"
    })
}

/// Well-formed watershed boundary document
pub fn valid_watershed_record() -> Value {
    json!({
        "location_id": 410,
        "location_name": "Kenai River",
        "watershed_name": "Kenai River Watershed",
        "drainage_area_sq_miles": 2200.0,
        "drainage_area_sq_km": 5698.0,
        "primary_tributaries": ["Russian River", "Killey River"],
        "watershed_boundary": {"type": "FeatureCollection", "features": []},
        "monitoring_stations": ["15276000"],
        "data_sources": ["USGS"],
        "last_updated": "2024-01-01T00:00:00Z"
    })
}
