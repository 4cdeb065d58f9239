//! Route planning façade over the navigation graph.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported search algorithms (Dijkstra, A*, BFS)
//! - [`RouteRequest`] - High-level route planning request
//! - [`RoutePlan`] - Planned route result with drawable waypoints
//! - [`plan_route`] - Main entry point for computing routes
//!
//! # Strategy Pattern
//!
//! Each algorithm is wrapped in its own [`RoutePlanner`] implementation, so the
//! orchestration in [`plan_route`] stays the same whichever search runs.
//!
//! # Example
//!
//! ```ignore
//! use campusnav_lib::{build_graph, load_campus, plan_route, GraphBuildOptions, RouteRequest};
//!
//! let campus = load_campus(Path::new("campus.json"))?;
//! let options = GraphBuildOptions::for_campus(&campus);
//! let graph = build_graph(&campus, &options);
//! let request = RouteRequest::new("Main Entrance", "Room 204");
//! let plan = plan_route(&campus, &graph, &request, &options.geometry)?;
//! println!("Route: {} hops, {:.1} m", plan.hop_count(), plan.distance);
//! ```

mod planner;

pub use planner::{select_planner, AStarPlanner, BfsPlanner, DijkstraPlanner, RoutePlanner};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::GeometryConfig;
use crate::graph::NavigationGraph;
use crate::model::CampusData;
use crate::path::{path_weight, AccessibilityFilter};
use crate::route::{floor_changes, path_length, to_waypoints, Waypoint};

/// Supported routing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm (weighted graph).
    #[default]
    Dijkstra,
    /// A* search (heuristic guided).
    #[serde(rename = "a-star")]
    AStar,
    /// Breadth-first search (fewest nodes, weights ignored).
    Bfs,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "a-star",
            RouteAlgorithm::Bfs => "bfs",
        };
        f.write_str(value)
    }
}

impl FromStr for RouteAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dijkstra" => Ok(RouteAlgorithm::Dijkstra),
            "a-star" | "astar" | "a*" => Ok(RouteAlgorithm::AStar),
            "bfs" => Ok(RouteAlgorithm::Bfs),
            other => Err(Error::InvalidOption {
                option: "algorithm".to_string(),
                reason: format!("unrecognised value '{other}'"),
            }),
        }
    }
}

/// High-level route planning request.
///
/// `start` and `goal` may be node ids or unit names; names are matched
/// case-insensitively against the campus.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: String,
    pub goal: String,
    pub algorithm: RouteAlgorithm,
    pub filter: AccessibilityFilter,
}

impl RouteRequest {
    /// Dijkstra route without accessibility restrictions.
    pub fn new(start: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            algorithm: RouteAlgorithm::default(),
            filter: AccessibilityFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: AccessibilityFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub algorithm: RouteAlgorithm,
    pub filter: AccessibilityFilter,
    /// Resolved start node id.
    pub start: String,
    /// Resolved goal node id.
    pub goal: String,
    /// Node ids from start to goal inclusive.
    pub steps: Vec<String>,
    pub waypoints: Vec<Waypoint>,
    /// Horizontal walking distance; floor changes add nothing.
    pub distance: f64,
    /// Sum of edge weights, including vertical penalties.
    pub total_weight: f64,
    pub floor_changes: usize,
}

impl RoutePlan {
    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Map a request endpoint onto a graph node id.
///
/// Node ids win over names. A known unit that was left out of the graph
/// (restricted or inaccessible) has no route by definition.
fn resolve_endpoint(
    campus: &CampusData,
    graph: &NavigationGraph,
    query: &str,
    request: &RouteRequest,
) -> Result<String> {
    if graph.contains(query) {
        return Ok(query.to_string());
    }

    let unit = campus.resolve_unit(query)?;
    if graph.contains(&unit.id) {
        return Ok(unit.id.clone());
    }

    debug!(unit = %unit.id, "endpoint is not part of the navigation graph");
    Err(Error::RouteNotFound {
        start: request.start.clone(),
        goal: request.goal.clone(),
    })
}

/// Compute a route using the requested algorithm and accessibility filter.
///
/// This is the main entry point for route planning. It:
/// 1. Resolves start and goal to graph nodes
/// 2. Selects the planner strategy
/// 3. Executes the search
/// 4. Materialises waypoints and distance for the result
pub fn plan_route(
    campus: &CampusData,
    graph: &NavigationGraph,
    request: &RouteRequest,
    geometry: &GeometryConfig,
) -> Result<RoutePlan> {
    let start = resolve_endpoint(campus, graph, &request.start, request)?;
    let goal = resolve_endpoint(campus, graph, &request.goal, request)?;

    let planner = select_planner(request, geometry);
    debug!(
        algorithm = %planner.algorithm(),
        filter = %request.filter,
        start = %start,
        goal = %goal,
        "planning route"
    );

    let steps = planner
        .find_path(graph, &start, &goal, &request.filter)
        .ok_or_else(|| Error::RouteNotFound {
            start: request.start.clone(),
            goal: request.goal.clone(),
        })?;

    let waypoints = to_waypoints(graph, &steps);
    let distance = path_length(&waypoints, geometry);
    let floor_changes = floor_changes(&waypoints);
    let total_weight = path_weight(graph, &steps).unwrap_or(0.0);

    Ok(RoutePlan {
        algorithm: request.algorithm,
        filter: request.filter,
        start,
        goal,
        steps,
        waypoints,
        distance,
        total_weight,
        floor_changes,
    })
}
