// Module exports for CLI subcommands
//
// Each module handles a specific CLI subcommand. main.rs parses arguments and
// dispatches to these handlers, keeping the entry point focused on parsing.

pub mod graph;
pub mod locations;
pub mod route;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use campusnav_lib::{load_campus, resolve_dataset_path, CampusData, GraphBuildOptions};

/// Graph construction flags shared by commands that build a navigation graph.
#[derive(Debug, Clone, Default, Args)]
pub struct GraphArgs {
    /// Extra cost added to every floor change (defaults depend on the dataset's coordinates).
    #[arg(long)]
    pub vertical_penalty: Option<f64>,
    /// Maximum distance for linking otherwise isolated units.
    #[arg(long, conflicts_with = "no_repair")]
    pub repair_threshold: Option<f64>,
    /// Skip the isolated-unit repair pass.
    #[arg(long)]
    pub no_repair: bool,
}

impl GraphArgs {
    /// Dataset defaults overlaid with the flags the user supplied.
    pub fn build_options(&self, campus: &CampusData) -> Result<GraphBuildOptions> {
        let mut options = GraphBuildOptions::for_campus(campus);
        if let Some(penalty) = self.vertical_penalty {
            options.vertical_penalty = penalty;
        }
        if let Some(threshold) = self.repair_threshold {
            options.repair_threshold = Some(threshold);
        }
        if self.no_repair {
            options = options.without_repair();
        }
        options.validate()?;
        Ok(options)
    }
}

/// Resolve and load the campus dataset.
pub fn load_dataset(target: Option<&Path>) -> Result<(PathBuf, CampusData)> {
    let path =
        resolve_dataset_path(target).context("failed to resolve the campus dataset location")?;
    let campus = load_campus(&path)
        .with_context(|| format!("failed to load dataset from {}", path.display()))?;
    Ok((path, campus))
}
