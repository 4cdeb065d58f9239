//! Graph command handler reporting navigation graph diagnostics.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use campusnav_lib::{build_graph, CampusData, NavigationGraph, NodeKind};

use super::{load_dataset, GraphArgs};
use crate::output::{GraphReport, OutputFormat};

/// Arguments for the graph command.
#[derive(Debug, Clone, Default, Args)]
pub struct GraphCommandArgs {
    #[command(flatten)]
    pub graph: GraphArgs,
}

/// Handle the graph subcommand.
pub fn handle_graph_command(
    dataset: Option<&Path>,
    format: OutputFormat,
    args: &GraphCommandArgs,
) -> Result<()> {
    let (path, campus) = load_dataset(dataset)?;
    let options = args.graph.build_options(&campus)?;
    let graph = build_graph(&campus, &options);
    let report = graph_report(&path.display().to_string(), &campus, &graph);
    format.render_graph(&report)?;
    Ok(())
}

/// Summarise a built graph, listing unit nodes that ended up without edges.
pub fn graph_report(dataset: &str, campus: &CampusData, graph: &NavigationGraph) -> GraphReport {
    let isolated = graph
        .nodes()
        .iter()
        .filter(|node| node.kind == NodeKind::Center && graph.neighbours(&node.id).is_empty())
        .map(|node| node.id.clone())
        .collect();

    GraphReport {
        dataset: dataset.to_string(),
        levels: campus.levels.len(),
        units: campus.units.len(),
        stats: graph.stats(),
        isolated,
    }
}
