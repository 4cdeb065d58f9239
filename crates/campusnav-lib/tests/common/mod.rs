//! Common test utilities and fixture helpers.
//!
//! Provides the bundled two-floor campus fixture plus small builders for
//! hand-made campuses used by geometry-sensitive tests.

use std::path::PathBuf;

use campusnav_lib::{load_campus, CampusData, Level, Point, Polygon, Unit, UnitType};

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Path to the two-floor campus fixture.
#[allow(dead_code)]
pub fn fixture_path() -> PathBuf {
    fixtures_dir().join("two_floor_campus.json")
}

/// Load and validate the two-floor campus fixture.
#[allow(dead_code)]
pub fn two_floor_campus() -> CampusData {
    load_campus(&fixture_path()).expect("fixture loads")
}

/// Axis-aligned rectangle, counter-clockwise from the lower-left corner.
#[allow(dead_code)]
pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
    vec![
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ]
}

#[allow(dead_code)]
pub fn unit(id: &str, unit_type: UnitType, level_id: &str, polygon: Polygon) -> Unit {
    Unit {
        id: id.to_string(),
        name: id.to_string(),
        unit_type,
        level_id: level_id.to_string(),
        polygon,
        accessible: None,
        vertical_connector_id: None,
    }
}

/// A stair or elevator unit attached to `connector`.
#[allow(dead_code)]
pub fn connector(
    id: &str,
    unit_type: UnitType,
    level_id: &str,
    connector: &str,
    polygon: Polygon,
) -> Unit {
    Unit {
        vertical_connector_id: Some(connector.to_string()),
        ..unit(id, unit_type, level_id, polygon)
    }
}

#[allow(dead_code)]
pub fn level(id: &str, z_index: f64) -> Level {
    Level {
        id: id.to_string(),
        name: id.to_string(),
        facility_id: "F1".to_string(),
        polygon: Vec::new(),
        z_index,
    }
}

#[allow(dead_code)]
pub fn campus(levels: Vec<Level>, units: Vec<Unit>) -> CampusData {
    CampusData {
        levels,
        units,
        ..CampusData::default()
    }
}
