use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::graph::{NavigationGraph, NodeKind};
use crate::model::{CampusData, UnitType};
use crate::path::AccessibilityFilter;
use crate::routing::{RouteAlgorithm, RoutePlan};

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    Markdown,
}

/// Endpoint within a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteEndpoint {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl RouteEndpoint {
    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Node visited while following a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub node_id: String,
    pub kind: NodeKind,
    /// Unit the node belongs to; for doorways the lower-id unit of the pair.
    pub unit_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<UnitType>,
    pub level_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_name: Option<String>,
    pub point: Point,
}

impl RouteStep {
    fn display_name(&self) -> &str {
        match self.kind {
            NodeKind::Waypoint => "doorway",
            NodeKind::Center => self.name.as_deref().unwrap_or(&self.unit_id),
        }
    }

    fn level_label(&self) -> &str {
        self.level_name.as_deref().unwrap_or(&self.level_id)
    }
}

/// Structured representation of a planned route that renderers and
/// instruction generators can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub algorithm: RouteAlgorithm,
    pub filter: AccessibilityFilter,
    pub hops: usize,
    pub distance: f64,
    pub floor_changes: usize,
    pub start: RouteEndpoint,
    pub goal: RouteEndpoint,
    pub steps: Vec<RouteStep>,
}

impl RouteSummary {
    /// Convert a [`RoutePlan`] into a summary with resolved unit and level names.
    pub fn from_plan(campus: &CampusData, graph: &NavigationGraph, plan: &RoutePlan) -> Result<Self> {
        if plan.is_empty() {
            return Err(Error::EmptyRoutePlan);
        }

        let steps = plan
            .steps
            .iter()
            .filter_map(|id| graph.node(id))
            .enumerate()
            .map(|(index, node)| {
                let unit = campus.unit(&node.original_unit_id);
                let (name, unit_type) = match node.kind {
                    NodeKind::Center => (
                        unit.map(|unit| unit.label().to_string()),
                        node.unit_type,
                    ),
                    NodeKind::Waypoint => (None, None),
                };
                RouteStep {
                    index,
                    node_id: node.id.clone(),
                    kind: node.kind,
                    unit_id: node.original_unit_id.clone(),
                    name,
                    unit_type,
                    level_id: node.level_id.clone(),
                    level_name: campus
                        .level(&node.level_id)
                        .filter(|level| !level.name.is_empty())
                        .map(|level| level.name.clone()),
                    point: node.point,
                }
            })
            .collect::<Vec<_>>();

        let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
            return Err(Error::EmptyRoutePlan);
        };
        let start = endpoint(first);
        let goal = endpoint(last);

        Ok(Self {
            algorithm: plan.algorithm,
            filter: plan.filter,
            hops: plan.hop_count(),
            distance: plan.distance,
            floor_changes: plan.floor_changes,
            start,
            goal,
            steps,
        })
    }

    /// Units visited in order, without doorway nodes or repeats.
    pub fn unit_ids(&self) -> Vec<&str> {
        let mut units: Vec<&str> = Vec::new();
        for step in &self.steps {
            if step.kind == NodeKind::Center && units.last() != Some(&step.unit_id.as_str()) {
                units.push(&step.unit_id);
            }
        }
        units
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::Markdown => self.render_markdown(),
        }
    }

    fn headline(&self) -> String {
        let floors = match self.floor_changes {
            0 => String::new(),
            1 => ", 1 floor change".to_string(),
            n => format!(", {n} floor changes"),
        };
        format!(
            "{} -> {} ({} hops, {:.1} walking{}, algorithm: {}, filter: {})",
            self.start.display_name(),
            self.goal.display_name(),
            self.hops,
            self.distance,
            floors,
            self.algorithm,
            self.filter
        )
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "Route: {}", self.headline());
        for step in &self.steps {
            let _ = write!(
                buffer,
                "{:>3}: {} [{}]",
                step.index,
                step.display_name(),
                step.level_label()
            );
            if let Some(unit_type) = step.unit_type {
                let _ = write!(buffer, " {unit_type}");
            }
            let _ = writeln!(buffer, " ({})", step.node_id);
        }
        buffer
    }

    fn render_markdown(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "**Route**: {}", self.headline());
        for step in &self.steps {
            let _ = writeln!(
                buffer,
                "* {:>2}. **{}** on _{}_ (`{}`)",
                step.index,
                step.display_name(),
                step.level_label(),
                step.node_id
            );
        }
        buffer
    }
}

fn endpoint(step: &RouteStep) -> RouteEndpoint {
    RouteEndpoint {
        id: step.node_id.clone(),
        name: step.name.clone(),
        level: step.level_name.clone(),
    }
}
