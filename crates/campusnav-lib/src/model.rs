use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::geometry::{Point, Polygon};

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Category of an indoor space.
///
/// Unrecognised type strings in the input deserialize to [`UnitType::Other`]
/// so datasets with extra categories still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum UnitType {
    Classroom,
    Corridor,
    Elevator,
    Stairs,
    Office,
    Restricted,
    Entrance,
    Restaurant,
    Restroom,
    Lab,
    Library,
    Storage,
    Other,
}

impl UnitType {
    /// Transit units are primarily passed through rather than visited.
    ///
    /// Paths between two transit units may cut straight between centroids;
    /// any other pairing is routed via a doorway waypoint.
    pub fn is_transit(self) -> bool {
        match self {
            UnitType::Corridor | UnitType::Stairs | UnitType::Elevator | UnitType::Entrance => true,
            UnitType::Classroom
            | UnitType::Office
            | UnitType::Restricted
            | UnitType::Restaurant
            | UnitType::Restroom
            | UnitType::Lab
            | UnitType::Library
            | UnitType::Storage
            | UnitType::Other => false,
        }
    }

    /// Units that can link floors through a shared vertical connector.
    pub fn is_vertical_connector(self) -> bool {
        match self {
            UnitType::Stairs | UnitType::Elevator => true,
            UnitType::Classroom
            | UnitType::Corridor
            | UnitType::Office
            | UnitType::Restricted
            | UnitType::Entrance
            | UnitType::Restaurant
            | UnitType::Restroom
            | UnitType::Lab
            | UnitType::Library
            | UnitType::Storage
            | UnitType::Other => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitType::Classroom => "CLASSROOM",
            UnitType::Corridor => "CORRIDOR",
            UnitType::Elevator => "ELEVATOR",
            UnitType::Stairs => "STAIRS",
            UnitType::Office => "OFFICE",
            UnitType::Restricted => "RESTRICTED",
            UnitType::Entrance => "ENTRANCE",
            UnitType::Restaurant => "RESTAURANT",
            UnitType::Restroom => "RESTROOM",
            UnitType::Lab => "LAB",
            UnitType::Library => "LIBRARY",
            UnitType::Storage => "STORAGE",
            UnitType::Other => "OTHER",
        }
    }
}

impl From<String> for UnitType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(UnitType::Other)
    }
}

impl FromStr for UnitType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let unit_type = match s.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "CLASSROOM" => UnitType::Classroom,
            "CORRIDOR" | "HALLWAY" => UnitType::Corridor,
            "ELEVATOR" | "LIFT" => UnitType::Elevator,
            "STAIRS" | "STAIRWELL" | "STAIRCASE" => UnitType::Stairs,
            "OFFICE" => UnitType::Office,
            "RESTRICTED" => UnitType::Restricted,
            "ENTRANCE" => UnitType::Entrance,
            "RESTAURANT" => UnitType::Restaurant,
            "RESTROOM" => UnitType::Restroom,
            "LAB" | "LABORATORY" => UnitType::Lab,
            "LIBRARY" => UnitType::Library,
            "STORAGE" => UnitType::Storage,
            "OTHER" => UnitType::Other,
            other => {
                return Err(Error::InvalidOption {
                    option: "unit type".to_string(),
                    reason: format!("unrecognised value '{other}'"),
                })
            }
        };
        Ok(unit_type)
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coordinate system used by a dataset's polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSystem {
    #[default]
    Planar,
    /// Longitude/latitude degrees.
    Geographic,
}

/// An indoor space on a single level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    pub level_id: String,
    #[serde(default)]
    pub polygon: Polygon,
    /// Physically walkable; `None` when the data provider did not say.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessible: Option<bool>,
    /// Groups stair/elevator units on different levels that share a shaft.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_connector_id: Option<String>,
}

impl Unit {
    /// Whether the unit participates in routing.
    ///
    /// Restricted units are never traversable. Otherwise only an explicit
    /// `accessible: false` opts a unit out.
    pub fn is_traversable(&self) -> bool {
        match self.unit_type {
            UnitType::Restricted => false,
            _ => self.accessible != Some(false),
        }
    }

    /// Display label, falling back to the identifier for unnamed units.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// One floor of a facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub facility_id: String,
    #[serde(default)]
    pub polygon: Polygon,
    /// Vertical ordering key; larger is higher.
    #[serde(default)]
    pub z_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub site_id: String,
}

/// Kind of a rendering-only line feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailKind {
    Wall,
    Door,
    Window,
    #[default]
    #[serde(other)]
    Other,
}

/// Wall/door line work. Carried through for renderers; routing ignores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    #[serde(default)]
    pub id: String,
    pub level_id: String,
    #[serde(default)]
    pub kind: DetailKind,
    #[serde(default)]
    pub points: Vec<Point>,
}

/// Everything the data provider supplies for one campus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampusData {
    #[serde(default)]
    pub coordinates: CoordinateSystem,
    #[serde(default)]
    pub sites: Vec<Site>,
    #[serde(default)]
    pub facilities: Vec<Facility>,
    #[serde(default)]
    pub levels: Vec<Level>,
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub details: Vec<Detail>,
}

impl CampusData {
    /// Parse a campus from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Lookup a unit by identifier.
    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    /// Lookup a level by identifier.
    pub fn level(&self, id: &str) -> Option<&Level> {
        self.levels.iter().find(|level| level.id == id)
    }

    /// Level identifier → `z_index`, for ordering vertical connectors.
    pub fn level_order(&self) -> HashMap<&str, f64> {
        self.levels
            .iter()
            .map(|level| (level.id.as_str(), level.z_index))
            .collect()
    }

    /// Resolve a user-supplied location to a unit.
    ///
    /// Exact identifiers win, then case-insensitive names. Unknown queries
    /// fail with [`Error::UnknownLocation`] carrying fuzzy suggestions.
    pub fn resolve_unit(&self, query: &str) -> Result<&Unit> {
        if let Some(unit) = self.unit(query) {
            return Ok(unit);
        }
        let needle = query.trim();
        if let Some(unit) = self
            .units
            .iter()
            .find(|unit| unit.name.eq_ignore_ascii_case(needle))
        {
            return Ok(unit);
        }
        Err(Error::UnknownLocation {
            name: query.to_string(),
            suggestions: self.fuzzy_unit_matches(query, 3),
        })
    }

    /// Up to `limit` unit names or identifiers resembling `query`, best first.
    pub fn fuzzy_unit_matches(&self, query: &str, limit: usize) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        let mut scored: Vec<(f64, &str)> = Vec::new();
        for unit in &self.units {
            let label = unit.label();
            let score = strsim::jaro_winkler(&needle, &label.to_lowercase())
                .max(strsim::jaro_winkler(&needle, &unit.id.to_lowercase()));
            if score >= SUGGESTION_THRESHOLD {
                scored.push((score, label));
            }
        }
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));

        let mut seen = HashSet::new();
        scored
            .into_iter()
            .filter(|(_, label)| seen.insert(*label))
            .take(limit)
            .map(|(_, label)| label.to_string())
            .collect()
    }

    /// Check referential integrity.
    ///
    /// Duplicate unit identifiers are rejected because graph nodes are keyed
    /// by unit id. Units on unknown levels, and vertical connectors attached
    /// to non stair/elevator units, are only logged: they still route, just
    /// without vertical ordering information.
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for unit in &self.units {
            if !ids.insert(unit.id.as_str()) {
                return Err(Error::InvalidDataset {
                    message: format!("duplicate unit id '{}'", unit.id),
                });
            }
        }

        let levels: HashSet<&str> = self.levels.iter().map(|level| level.id.as_str()).collect();
        for unit in &self.units {
            if !levels.contains(unit.level_id.as_str()) {
                warn!(unit = %unit.id, level = %unit.level_id, "unit references unknown level");
            }
            if unit.vertical_connector_id.is_some() && !unit.unit_type.is_vertical_connector() {
                warn!(
                    unit = %unit.id,
                    unit_type = %unit.unit_type,
                    "vertical connector set on a unit that is not stairs or an elevator"
                );
            }
        }
        Ok(())
    }
}
