//! Turn solved node paths into geometry a renderer can draw.

use serde::Serialize;

use crate::geometry::{GeometryConfig, Point};
use crate::graph::{NavigationGraph, NodeKind};

/// A level-tagged point along a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    pub node_id: String,
    pub kind: NodeKind,
    pub point: Point,
    pub level_id: String,
}

/// Map each node id of a path to its stored position.
///
/// Unit nodes resolve to their centroid, doorway nodes to the shared-edge
/// midpoint. Ids that are not in the graph are skipped.
pub fn to_waypoints(graph: &NavigationGraph, path: &[String]) -> Vec<Waypoint> {
    path.iter()
        .filter_map(|id| graph.node(id))
        .map(|node| Waypoint {
            node_id: node.id.clone(),
            kind: node.kind,
            point: node.point,
            level_id: node.level_id.clone(),
        })
        .collect()
}

/// Walking distance along the waypoints.
///
/// Only consecutive waypoints on the same level contribute. Floor changes add
/// nothing: stairwell and elevator travel is not comparable to horizontal
/// distance and is left out of the reported figure.
pub fn path_length(waypoints: &[Waypoint], geometry: &GeometryConfig) -> f64 {
    waypoints
        .windows(2)
        .filter(|pair| pair[0].level_id == pair[1].level_id)
        .map(|pair| geometry.distance(&pair[0].point, &pair[1].point))
        .sum()
}

/// Number of level changes along the waypoints.
pub fn floor_changes(waypoints: &[Waypoint]) -> usize {
    waypoints
        .windows(2)
        .filter(|pair| pair[0].level_id != pair[1].level_id)
        .count()
}
