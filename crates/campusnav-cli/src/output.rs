//! Output formatting for command results.
//!
//! Formatters return strings so they can be tested without capturing stdout;
//! the `print_*` helpers write them out.

use std::fmt::Write as _;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use campusnav_lib::output::{RouteEndpoint, RouteStep};
use campusnav_lib::{GraphStats, NodeKind, RouteRenderMode, RouteSummary, UnitType};

use crate::terminal::{arrow, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-friendly text, colored when the terminal allows it.
    #[default]
    Text,
    /// Markdown suitable for pasting into chat or documents.
    Rich,
    /// Pretty-printed JSON on stdout.
    Json,
}

/// One row of the `locations` listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LocationEntry {
    pub id: String,
    pub name: String,
    pub unit_type: UnitType,
    pub level_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_name: Option<String>,
    pub routable: bool,
}

/// Graph diagnostics reported by the `graph` command.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphReport {
    pub dataset: String,
    pub levels: usize,
    pub units: usize,
    #[serde(flatten)]
    pub stats: GraphStats,
    /// Traversable units left without any edge.
    pub isolated: Vec<String>,
}

impl OutputFormat {
    /// Print a route summary in this format.
    pub fn render_route(self, summary: &RouteSummary) -> io::Result<()> {
        match self {
            OutputFormat::Json => print_json(summary),
            OutputFormat::Rich => print_str(&summary.render(RouteRenderMode::Markdown)),
            OutputFormat::Text => {
                print_str(&format_route_text(summary, &ColorPalette::detect(), arrow()))
            }
        }
    }

    /// Print a location listing in this format.
    pub fn render_locations(self, entries: &[LocationEntry]) -> io::Result<()> {
        match self {
            OutputFormat::Json => print_json(entries),
            OutputFormat::Rich => print_str(&format_locations_markdown(entries)),
            OutputFormat::Text => {
                print_str(&format_locations_text(entries, &ColorPalette::detect()))
            }
        }
    }

    /// Print graph diagnostics in this format.
    pub fn render_graph(self, report: &GraphReport) -> io::Result<()> {
        match self {
            OutputFormat::Json => print_json(report),
            OutputFormat::Rich | OutputFormat::Text => print_str(&format_graph_text(report)),
        }
    }
}

fn print_str(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
}

/// Render a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn endpoint_name(endpoint: &RouteEndpoint) -> &str {
    endpoint.name.as_deref().unwrap_or(&endpoint.id)
}

fn step_name(step: &RouteStep) -> &str {
    match step.kind {
        NodeKind::Waypoint => "doorway",
        NodeKind::Center => step.name.as_deref().unwrap_or(&step.unit_id),
    }
}

fn step_tag<'a>(
    palette: &'a ColorPalette,
    step: &RouteStep,
    previous: Option<&RouteStep>,
    is_last: bool,
) -> (&'a str, &'static str) {
    if previous.is_none() {
        return (palette.tag_start, " STRT ");
    }
    if is_last {
        return (palette.tag_goal, " GOAL ");
    }
    if previous.is_some_and(|prev| prev.level_id != step.level_id) {
        return (palette.tag_floor, " LEVL ");
    }
    match step.kind {
        NodeKind::Waypoint => (palette.tag_door, " DOOR "),
        NodeKind::Center => (palette.tag_walk, " WALK "),
    }
}

/// Human-friendly route view with one tagged line per step.
pub fn format_route_text(summary: &RouteSummary, palette: &ColorPalette, arrow: &str) -> String {
    let p = palette;
    let mut out = String::new();

    let floors = match summary.floor_changes {
        1 => "1 floor change".to_string(),
        n => format!("{n} floor changes"),
    };
    let _ = writeln!(
        out,
        "Route from {}{}{} {} {}{}{} ({} hops, {}; algorithm: {}, filter: {}):",
        p.white_bold,
        endpoint_name(&summary.start),
        p.reset,
        arrow,
        p.white_bold,
        endpoint_name(&summary.goal),
        p.reset,
        summary.hops,
        floors,
        summary.algorithm,
        summary.filter
    );

    let len = summary.steps.len();
    for (i, step) in summary.steps.iter().enumerate() {
        let previous = i.checked_sub(1).and_then(|prev| summary.steps.get(prev));
        let (tag_color, tag_text) = step_tag(p, step, previous, i + 1 == len);
        let level = step.level_name.as_deref().unwrap_or(&step.level_id);
        let _ = writeln!(
            out,
            "{}{}{} {}{}{} {}[{}]{} {}({}){}",
            tag_color,
            tag_text,
            p.reset,
            p.white_bold,
            step_name(step),
            p.reset,
            p.cyan,
            level,
            p.reset,
            p.gray,
            step.node_id,
            p.reset
        );
    }

    let _ = writeln!(
        out,
        "\nWalking distance: {}{:.1}{}",
        p.green, summary.distance, p.reset
    );
    out
}

/// Tabular location listing.
pub fn format_locations_text(entries: &[LocationEntry], palette: &ColorPalette) -> String {
    let p = palette;
    let mut out = String::new();
    if entries.is_empty() {
        out.push_str("No matching locations.\n");
        return out;
    }

    let id_width = entries.iter().map(|e| e.id.len()).max().unwrap_or(0);
    for entry in entries {
        let level = entry.level_name.as_deref().unwrap_or(&entry.level_id);
        let _ = write!(
            out,
            "{}{:<id_width$}{}  {}{}{}  {} {}[{}]{}",
            p.gray,
            entry.id,
            p.reset,
            p.white_bold,
            entry.name,
            p.reset,
            entry.unit_type,
            p.cyan,
            level,
            p.reset
        );
        if !entry.routable {
            let _ = write!(out, " {}(not routable){}", p.red, p.reset);
        }
        out.push('\n');
    }
    out
}

fn format_locations_markdown(entries: &[LocationEntry]) -> String {
    let mut out = String::from("| id | name | type | level | routable |\n|---|---|---|---|---|\n");
    for entry in entries {
        let _ = writeln!(
            out,
            "| `{}` | {} | {} | {} | {} |",
            entry.id,
            entry.name,
            entry.unit_type,
            entry.level_name.as_deref().unwrap_or(&entry.level_id),
            if entry.routable { "yes" } else { "no" }
        );
    }
    out
}

/// Plain summary of graph statistics.
pub fn format_graph_text(report: &GraphReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();
    let _ = writeln!(out, "Dataset: {}", report.dataset);
    let _ = writeln!(out, "Levels: {}", report.levels);
    let _ = writeln!(out, "Units: {}", report.units);
    let _ = writeln!(
        out,
        "Nodes: {} ({} units, {} doorways)",
        stats.nodes, stats.centers, stats.waypoints
    );
    let _ = writeln!(
        out,
        "Edges: {} horizontal, {} vertical",
        stats.horizontal_edges, stats.vertical_edges
    );
    if report.isolated.is_empty() {
        let _ = writeln!(out, "Isolated units: none");
    } else {
        let _ = writeln!(out, "Isolated units: {}", report.isolated.join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_summary;

    #[test]
    fn text_route_tags_each_step() {
        let text = format_route_text(&sample_summary(), &ColorPalette::plain(), "->");
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("Route from Main Entrance -> Room 204 (4 hops"));
        assert!(lines[1].starts_with(" STRT  Main Entrance [Ground Floor] (U100)"));
        assert!(lines[2].starts_with(" WALK  North Stairs [Ground Floor]"));
        assert!(lines[3].starts_with(" LEVL  North Stairs [First Floor]"));
        assert!(lines[4].starts_with(" DOOR  doorway [First Floor]"));
        assert!(lines[5].starts_with(" GOAL  Room 204 [First Floor]"));
        assert!(text.contains("Walking distance: 12.5"));
    }

    #[test]
    fn plain_palette_emits_no_escape_codes() {
        let text = format_route_text(&sample_summary(), &ColorPalette::plain(), "->");
        assert!(!text.contains('\x1b'));
        let colored = format_route_text(&sample_summary(), &ColorPalette::colored(), "->");
        assert!(colored.contains('\x1b'));
    }

    #[test]
    fn locations_mark_unroutable_units() {
        let entries = vec![
            LocationEntry {
                id: "U100".to_string(),
                name: "Main Entrance".to_string(),
                unit_type: UnitType::Entrance,
                level_id: "L1".to_string(),
                level_name: Some("Ground Floor".to_string()),
                routable: true,
            },
            LocationEntry {
                id: "U107".to_string(),
                name: "Server Room".to_string(),
                unit_type: UnitType::Restricted,
                level_id: "L1".to_string(),
                level_name: None,
                routable: false,
            },
        ];
        let text = format_locations_text(&entries, &ColorPalette::plain());
        assert!(text.contains("U100  Main Entrance  ENTRANCE [Ground Floor]\n"));
        assert!(text.contains("U107  Server Room  RESTRICTED [L1] (not routable)"));

        let markdown = format_locations_markdown(&entries);
        assert!(markdown.contains("| `U107` | Server Room | RESTRICTED | L1 | no |"));
    }

    #[test]
    fn empty_location_listing_says_so() {
        let text = format_locations_text(&[], &ColorPalette::plain());
        assert_eq!(text, "No matching locations.\n");
    }

    #[test]
    fn graph_report_lists_isolated_units() {
        let report = GraphReport {
            dataset: "campus.json".to_string(),
            levels: 2,
            units: 3,
            stats: GraphStats {
                nodes: 4,
                centers: 3,
                waypoints: 1,
                horizontal_edges: 2,
                vertical_edges: 0,
            },
            isolated: vec!["U9".to_string()],
        };
        let text = format_graph_text(&report);
        assert!(text.contains("Nodes: 4 (3 units, 1 doorways)"));
        assert!(text.contains("Isolated units: U9"));
    }
}
