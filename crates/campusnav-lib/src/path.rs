use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::GeometryConfig;
use crate::graph::{EdgeKind, NavEdge, NavNode, NavigationGraph, NodeIndex};
use crate::model::UnitType;

/// Per-edge acceptance predicate consulted while relaxing edges.
///
/// Rejected edges are treated as absent, so a filter can only remove routes,
/// never add them. Closures with the matching signature implement this trait.
pub trait EdgeFilter {
    fn allows(&self, edge: &NavEdge, from: &NavNode, to: &NavNode) -> bool;
}

impl<F> EdgeFilter for F
where
    F: Fn(&NavEdge, &NavNode, &NavNode) -> bool,
{
    fn allows(&self, edge: &NavEdge, from: &NavNode, to: &NavNode) -> bool {
        self(edge, from, to)
    }
}

/// Accessibility policies understood by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessibilityFilter {
    /// Accept every edge.
    #[default]
    Unrestricted,
    /// Change floors by elevator only.
    ElevatorOnly,
    /// Never enter a stairwell, on any floor.
    NoStairs,
    /// Never change floors.
    SameLevel,
}

impl AccessibilityFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessibilityFilter::Unrestricted => "none",
            AccessibilityFilter::ElevatorOnly => "elevator-only",
            AccessibilityFilter::NoStairs => "no-stairs",
            AccessibilityFilter::SameLevel => "same-level",
        }
    }
}

impl EdgeFilter for AccessibilityFilter {
    fn allows(&self, edge: &NavEdge, from: &NavNode, to: &NavNode) -> bool {
        match (self, edge.kind) {
            (AccessibilityFilter::Unrestricted, _) => true,
            (AccessibilityFilter::ElevatorOnly, EdgeKind::Horizontal) => true,
            (AccessibilityFilter::ElevatorOnly, EdgeKind::Vertical) => {
                from.unit_type == Some(UnitType::Elevator) && to.unit_type == Some(UnitType::Elevator)
            }
            (AccessibilityFilter::NoStairs, _) => {
                from.unit_type != Some(UnitType::Stairs) && to.unit_type != Some(UnitType::Stairs)
            }
            (AccessibilityFilter::SameLevel, EdgeKind::Horizontal) => true,
            (AccessibilityFilter::SameLevel, EdgeKind::Vertical) => false,
        }
    }
}

impl fmt::Display for AccessibilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessibilityFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "none" | "unrestricted" => Ok(AccessibilityFilter::Unrestricted),
            "elevator-only" | "elevator" => Ok(AccessibilityFilter::ElevatorOnly),
            "no-stairs" => Ok(AccessibilityFilter::NoStairs),
            "same-level" | "no-vertical" => Ok(AccessibilityFilter::SameLevel),
            other => Err(Error::InvalidOption {
                option: "accessibility filter".to_string(),
                reason: format!("unrecognised value '{other}'"),
            }),
        }
    }
}

/// Lowest-weight path from `start` to `goal` using Dijkstra's algorithm.
///
/// Returns `None` when either id is not a graph node or when the filter
/// leaves the goal unreachable. Among equal-cost paths the one returned is
/// unspecified.
pub fn shortest_path<F>(
    graph: &NavigationGraph,
    start: &str,
    goal: &str,
    filter: &F,
) -> Option<Vec<String>>
where
    F: EdgeFilter + ?Sized,
{
    let start_index = graph.index_of(start)?;
    let goal_index = graph.index_of(goal)?;
    if start_index == goal_index {
        return Some(vec![start.to_string()]);
    }

    let mut distances = vec![f64::INFINITY; graph.node_count()];
    let mut parents: Vec<Option<NodeIndex>> = vec![None; graph.node_count()];
    let mut settled = vec![false; graph.node_count()];
    let mut queue = BinaryHeap::new();

    distances[start_index] = 0.0;
    queue.push(QueueEntry::new(start_index, 0.0));

    while let Some(entry) = queue.pop() {
        if settled[entry.node] {
            continue;
        }
        settled[entry.node] = true;

        if entry.node == goal_index {
            break;
        }

        let current = graph.node_at(entry.node);
        for edge in graph.neighbours_at(entry.node) {
            if settled[edge.to] || !filter.allows(edge, current, graph.node_at(edge.to)) {
                continue;
            }

            let next_cost = entry.cost.0 + edge.weight;
            if next_cost < distances[edge.to] {
                distances[edge.to] = next_cost;
                parents[edge.to] = Some(entry.node);
                queue.push(QueueEntry::new(edge.to, next_cost));
            }
        }
    }

    if distances[goal_index].is_infinite() {
        return None;
    }
    reconstruct_path(graph, &parents, start_index, goal_index)
}

/// A* search guided by straight-line distance to the goal.
///
/// On graphs from [`build_graph`](crate::graph::build_graph) every edge weighs
/// at least the distance between its endpoints, so the heuristic never
/// overestimates and the result has the same weight as [`shortest_path`].
/// Graphs assembled by hand with [`NavigationGraph::add_edge`] carry no such
/// guarantee: an edge lighter than its endpoints' separation can make the
/// returned path longer than the optimum.
pub fn a_star_path<F>(
    graph: &NavigationGraph,
    start: &str,
    goal: &str,
    filter: &F,
    geometry: &GeometryConfig,
) -> Option<Vec<String>>
where
    F: EdgeFilter + ?Sized,
{
    let start_index = graph.index_of(start)?;
    let goal_index = graph.index_of(goal)?;
    if start_index == goal_index {
        return Some(vec![start.to_string()]);
    }

    let goal_point = graph.node_at(goal_index).point;
    let heuristic = |index: NodeIndex| geometry.distance(&graph.node_at(index).point, &goal_point);

    let mut g_score = vec![f64::INFINITY; graph.node_count()];
    let mut parents: Vec<Option<NodeIndex>> = vec![None; graph.node_count()];
    let mut queue = BinaryHeap::new();

    g_score[start_index] = 0.0;
    queue.push(AStarEntry::new(start_index, 0.0, heuristic(start_index)));

    while let Some(entry) = queue.pop() {
        if entry.cost.0 > g_score[entry.node] {
            continue;
        }
        if entry.node == goal_index {
            return reconstruct_path(graph, &parents, start_index, goal_index);
        }

        let current = graph.node_at(entry.node);
        for edge in graph.neighbours_at(entry.node) {
            if !filter.allows(edge, current, graph.node_at(edge.to)) {
                continue;
            }

            let tentative = entry.cost.0 + edge.weight;
            if tentative < g_score[edge.to] {
                g_score[edge.to] = tentative;
                parents[edge.to] = Some(entry.node);
                queue.push(AStarEntry::new(edge.to, tentative, heuristic(edge.to)));
            }
        }
    }

    None
}

/// Path with the fewest hops, ignoring edge weights.
pub fn fewest_hops_path<F>(
    graph: &NavigationGraph,
    start: &str,
    goal: &str,
    filter: &F,
) -> Option<Vec<String>>
where
    F: EdgeFilter + ?Sized,
{
    let start_index = graph.index_of(start)?;
    let goal_index = graph.index_of(goal)?;
    if start_index == goal_index {
        return Some(vec![start.to_string()]);
    }

    let mut parents: Vec<Option<NodeIndex>> = vec![None; graph.node_count()];
    let mut seen = vec![false; graph.node_count()];
    let mut queue = VecDeque::new();

    seen[start_index] = true;
    queue.push_back(start_index);

    while let Some(current) = queue.pop_front() {
        let current_node = graph.node_at(current);
        for edge in graph.neighbours_at(current) {
            if seen[edge.to] || !filter.allows(edge, current_node, graph.node_at(edge.to)) {
                continue;
            }

            seen[edge.to] = true;
            parents[edge.to] = Some(current);
            if edge.to == goal_index {
                return reconstruct_path(graph, &parents, start_index, goal_index);
            }
            queue.push_back(edge.to);
        }
    }

    None
}

/// Total weight of a node path, using the cheapest edge between each pair.
///
/// Returns `None` if any consecutive pair is not connected.
pub fn path_weight(graph: &NavigationGraph, path: &[String]) -> Option<f64> {
    path.windows(2).try_fold(0.0, |total, pair| {
        graph
            .edge_between(&pair[0], &pair[1])
            .map(|edge| total + edge.weight)
    })
}

fn reconstruct_path(
    graph: &NavigationGraph,
    parents: &[Option<NodeIndex>],
    start: NodeIndex,
    goal: NodeIndex,
) -> Option<Vec<String>> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start || path.len() > parents.len() {
            break;
        }
        current = parents[node];
    }
    path.reverse();

    if path.first() != Some(&start) {
        return None;
    }
    Some(
        path.into_iter()
            .map(|index| graph.node_at(index).id.clone())
            .collect(),
    )
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeIndex,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: NodeIndex, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct AStarEntry {
    node: NodeIndex,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl AStarEntry {
    fn new(node: NodeIndex, cost: f64, heuristic: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
        }
    }
}

impl Ord for AStarEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for AStarEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
