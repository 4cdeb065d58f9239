//! Route planning strategies implementing the Strategy pattern.
//!
//! This module provides the `RoutePlanner` trait and implementations for
//! the supported search algorithms (Dijkstra, A*, BFS). New algorithms plug in
//! here without touching the `plan_route` orchestrator.

use crate::geometry::GeometryConfig;
use crate::graph::NavigationGraph;
use crate::path::{a_star_path, fewest_hops_path, shortest_path, EdgeFilter};

use super::{RouteAlgorithm, RouteRequest};

/// Trait for route planning strategies.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Execute the search on the given graph.
    ///
    /// Returns `Some(path)` if a route is found, `None` otherwise.
    fn find_path(
        &self,
        graph: &NavigationGraph,
        start: &str,
        goal: &str,
        filter: &dyn EdgeFilter,
    ) -> Option<Vec<String>>;
}

/// Dijkstra's algorithm over edge weights.
#[derive(Debug, Clone, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn find_path(
        &self,
        graph: &NavigationGraph,
        start: &str,
        goal: &str,
        filter: &dyn EdgeFilter,
    ) -> Option<Vec<String>> {
        shortest_path(graph, start, goal, filter)
    }
}

/// A* search using straight-line distance under the dataset's metric.
#[derive(Debug, Clone)]
pub struct AStarPlanner {
    geometry: GeometryConfig,
}

impl AStarPlanner {
    pub fn new(geometry: GeometryConfig) -> Self {
        Self { geometry }
    }
}

impl RoutePlanner for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn find_path(
        &self,
        graph: &NavigationGraph,
        start: &str,
        goal: &str,
        filter: &dyn EdgeFilter,
    ) -> Option<Vec<String>> {
        a_star_path(graph, start, goal, filter, &self.geometry)
    }
}

/// Breadth-first search minimising the number of nodes visited.
///
/// Ignores weights, so the result is not necessarily the shortest walk.
#[derive(Debug, Clone, Default)]
pub struct BfsPlanner;

impl RoutePlanner for BfsPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Bfs
    }

    fn find_path(
        &self,
        graph: &NavigationGraph,
        start: &str,
        goal: &str,
        filter: &dyn EdgeFilter,
    ) -> Option<Vec<String>> {
        fewest_hops_path(graph, start, goal, filter)
    }
}

/// Select the appropriate planner for a given request.
pub fn select_planner(request: &RouteRequest, geometry: &GeometryConfig) -> Box<dyn RoutePlanner> {
    match request.algorithm {
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
        RouteAlgorithm::AStar => Box::new(AStarPlanner::new(*geometry)),
        RouteAlgorithm::Bfs => Box::new(BfsPlanner),
    }
}
