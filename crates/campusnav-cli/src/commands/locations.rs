//! Locations command handler for browsing the units of a campus.

use std::path::Path;

use anyhow::{anyhow, Result};
use clap::Args;

use campusnav_lib::{CampusData, Level, Unit};

use super::load_dataset;
use crate::output::{LocationEntry, OutputFormat};

/// Arguments for the locations command.
#[derive(Debug, Clone, Default, Args)]
pub struct LocationsArgs {
    /// Only list units on this level (id or name).
    #[arg(long)]
    pub level: Option<String>,
    /// Fuzzy search by unit name or id.
    #[arg(long)]
    pub search: Option<String>,
    /// Include units that cannot be routed through.
    #[arg(long)]
    pub all: bool,
}

/// Handle the locations subcommand.
pub fn handle_locations_command(
    dataset: Option<&Path>,
    format: OutputFormat,
    args: &LocationsArgs,
) -> Result<()> {
    let (_, campus) = load_dataset(dataset)?;
    let entries = list_locations(&campus, args)?;
    format.render_locations(&entries)?;
    Ok(())
}

fn find_level<'a>(campus: &'a CampusData, query: &str) -> Option<&'a Level> {
    campus.level(query).or_else(|| {
        campus
            .levels
            .iter()
            .find(|level| level.name.eq_ignore_ascii_case(query.trim()))
    })
}

fn is_routable(unit: &Unit) -> bool {
    unit.is_traversable() && !unit.polygon.is_empty()
}

/// Units matching the filters, ordered by floor and then id.
pub fn list_locations(campus: &CampusData, args: &LocationsArgs) -> Result<Vec<LocationEntry>> {
    let level = match args.level.as_deref() {
        Some(query) => Some(find_level(campus, query).ok_or_else(|| {
            anyhow!(
                "Unknown level '{}'. Known levels: {}.",
                query,
                campus
                    .levels
                    .iter()
                    .map(|level| level.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?),
        None => None,
    };

    let matches: Option<(String, Vec<String>)> = args.search.as_deref().map(|query| {
        (
            query.trim().to_lowercase(),
            campus.fuzzy_unit_matches(query, campus.units.len()),
        )
    });
    let order = campus.level_order();

    let mut units: Vec<&Unit> = campus
        .units
        .iter()
        .filter(|unit| args.all || is_routable(unit))
        .filter(|unit| level.map_or(true, |level| unit.level_id == level.id))
        .filter(|unit| match &matches {
            Some((needle, fuzzy)) => {
                unit.label().to_lowercase().contains(needle.as_str())
                    || unit.id.to_lowercase().contains(needle.as_str())
                    || fuzzy.iter().any(|label| label == unit.label())
            }
            None => true,
        })
        .collect();

    let z = |unit: &Unit| order.get(unit.level_id.as_str()).copied().unwrap_or(0.0);
    units.sort_by(|a, b| z(*a).total_cmp(&z(*b)).then_with(|| a.id.cmp(&b.id)));

    Ok(units
        .into_iter()
        .map(|unit| LocationEntry {
            id: unit.id.clone(),
            name: unit.label().to_string(),
            unit_type: unit.unit_type,
            level_id: unit.level_id.clone(),
            level_name: campus
                .level(&unit.level_id)
                .filter(|level| !level.name.is_empty())
                .map(|level| level.name.clone()),
            routable: is_routable(unit),
        })
        .collect())
}
