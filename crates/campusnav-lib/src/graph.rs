//! Navigation graph construction.
//!
//! [`build_graph`] turns a [`CampusData`] snapshot into a [`NavigationGraph`]:
//!
//! 1. every traversable unit becomes a centre node at its centroid;
//! 2. units on the same level that share a wall segment are linked, either
//!    directly (transit ↔ transit) or through a doorway waypoint at the
//!    shared segment's midpoint;
//! 3. stairs/elevators sharing a vertical connector are linked floor to
//!    adjacent floor, with a penalty added to each vertical hop;
//! 4. optionally, units still left without any edge are joined to their
//!    nearest same-level neighbour when it lies within a sanity threshold.
//!
//! The build is deterministic: node insertion follows sorted unit ids and
//! waypoint ids derive from the sorted unit pair, so rebuilding identical
//! data yields identical graphs.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::geometry::{centroid, shared_edge, BoundingBox, GeometryConfig, Point, Segment};
use crate::model::{CampusData, CoordinateSystem, Unit, UnitType};
use crate::spatial::LevelIndex;

/// Position of a node inside the graph's arena.
pub type NodeIndex = usize;

/// Default extra cost of one floor change for planar datasets.
pub const DEFAULT_VERTICAL_PENALTY: f64 = 10.0;

/// Default repair distance for planar datasets.
pub const DEFAULT_REPAIR_THRESHOLD: f64 = 15.0;

/// Vertical penalty for geographic datasets, in metres.
pub const GEOGRAPHIC_VERTICAL_PENALTY: f64 = 15.0;

/// Repair distance for geographic datasets, in metres.
pub const GEOGRAPHIC_REPAIR_THRESHOLD: f64 = 10.0;

/// Index candidates re-measured with the dataset metric during repair.
const REPAIR_CANDIDATES: usize = 4;

/// Prefix for synthetic doorway node identifiers.
const WAYPOINT_PREFIX: &str = "wp:";

/// Separates the two unit ids of a doorway node.
const WAYPOINT_SEPARATOR: char = '|';

/// Options controlling graph construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GraphBuildOptions {
    pub geometry: GeometryConfig,
    /// Added to the weight of every vertical edge. Must be positive.
    pub vertical_penalty: f64,
    /// Maximum distance for the isolated-unit repair pass; `None` disables it.
    pub repair_threshold: Option<f64>,
}

impl Default for GraphBuildOptions {
    fn default() -> Self {
        Self {
            geometry: GeometryConfig::planar(),
            vertical_penalty: DEFAULT_VERTICAL_PENALTY,
            repair_threshold: Some(DEFAULT_REPAIR_THRESHOLD),
        }
    }
}

impl GraphBuildOptions {
    /// Options tuned for longitude/latitude datasets measured in metres.
    pub fn geographic() -> Self {
        Self {
            geometry: GeometryConfig::geographic(),
            vertical_penalty: GEOGRAPHIC_VERTICAL_PENALTY,
            repair_threshold: Some(GEOGRAPHIC_REPAIR_THRESHOLD),
        }
    }

    /// Defaults matching the campus's declared coordinate system.
    pub fn for_campus(campus: &CampusData) -> Self {
        match campus.coordinates {
            CoordinateSystem::Planar => Self::default(),
            CoordinateSystem::Geographic => Self::geographic(),
        }
    }

    /// Disable the isolated-unit repair pass.
    pub fn without_repair(mut self) -> Self {
        self.repair_threshold = None;
        self
    }

    /// Reject values that would make the graph meaningless.
    pub fn validate(&self) -> Result<()> {
        if !(self.geometry.epsilon.is_finite() && self.geometry.epsilon > 0.0) {
            return Err(invalid_option("epsilon", self.geometry.epsilon));
        }
        if !(self.vertical_penalty.is_finite() && self.vertical_penalty > 0.0) {
            return Err(invalid_option("vertical penalty", self.vertical_penalty));
        }
        if let Some(threshold) = self.repair_threshold {
            if !(threshold.is_finite() && threshold > 0.0) {
                return Err(invalid_option("repair threshold", threshold));
            }
        }
        Ok(())
    }
}

fn invalid_option(option: &str, value: f64) -> Error {
    Error::InvalidOption {
        option: option.to_string(),
        reason: format!("must be a positive finite number, got {value}"),
    }
}

/// Whether a node stands for a whole unit or a doorway between two units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Center,
    Waypoint,
}

/// Classification for the edge used in the navigation graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Movement within one level.
    Horizontal,
    /// Stairs or elevator travel between adjacent levels.
    Vertical,
}

/// Node of the navigation graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavNode {
    /// Unit id for centre nodes, derived pair id for waypoints.
    pub id: String,
    pub kind: NodeKind,
    pub point: Point,
    pub level_id: String,
    /// Source unit; for waypoints, the lexicographically smaller of the pair.
    pub original_unit_id: String,
    /// Type of the source unit; `None` for waypoints.
    pub unit_type: Option<UnitType>,
}

impl NavNode {
    fn center(unit: &Unit, point: Point) -> Self {
        Self {
            id: unit.id.clone(),
            kind: NodeKind::Center,
            point,
            level_id: unit.level_id.clone(),
            original_unit_id: unit.id.clone(),
            unit_type: Some(unit.unit_type),
        }
    }

    fn waypoint(first: &Unit, second: &Unit, point: Point) -> Self {
        let lower = if first.id <= second.id { first } else { second };
        Self {
            id: waypoint_id(&first.id, &second.id),
            kind: NodeKind::Waypoint,
            point,
            level_id: lower.level_id.clone(),
            original_unit_id: lower.id.clone(),
            unit_type: None,
        }
    }
}

/// Identifier of the doorway node between two units, independent of order.
///
/// `|` and `\` inside unit ids are backslash-escaped so the unescaped `|`
/// separator is unique and distinct pairs never share an id.
pub fn waypoint_id(a: &str, b: &str) -> String {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let mut id = String::with_capacity(WAYPOINT_PREFIX.len() + low.len() + high.len() + 1);
    id.push_str(WAYPOINT_PREFIX);
    push_escaped(&mut id, low);
    id.push(WAYPOINT_SEPARATOR);
    push_escaped(&mut id, high);
    id
}

fn push_escaped(out: &mut String, part: &str) {
    for ch in part.chars() {
        if ch == WAYPOINT_SEPARATOR || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
}

/// Directed half of an undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NavEdge {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub weight: f64,
    pub kind: EdgeKind,
}

/// Weighted, undirected graph stored as an adjacency list over a node arena.
///
/// Every edge is stored in both directions with the same weight; the only way
/// to add edges is [`NavigationGraph::add_edge`], which maintains that.
#[derive(Debug, Clone, Default)]
pub struct NavigationGraph {
    nodes: Vec<NavNode>,
    index: HashMap<String, NodeIndex>,
    adjacency: Vec<Vec<NavEdge>>,
}

impl NavigationGraph {
    /// Insert a node, or return the existing index when the id is present.
    pub fn add_node(&mut self, node: NavNode) -> NodeIndex {
        if let Some(&existing) = self.index.get(&node.id) {
            return existing;
        }
        let position = self.nodes.len();
        self.index.insert(node.id.clone(), position);
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        position
    }

    /// Connect two nodes in both directions.
    ///
    /// If the pair is already connected by an edge of the same kind, the
    /// lower weight is kept. Self-loops and non-finite weights are ignored.
    /// Returns whether the graph changed.
    pub fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, weight: f64, kind: EdgeKind) -> bool {
        if a == b || a >= self.nodes.len() || b >= self.nodes.len() || !weight.is_finite() {
            return false;
        }

        if let Some(existing) = self.adjacency[a]
            .iter()
            .position(|edge| edge.to == b && edge.kind == kind)
        {
            if weight >= self.adjacency[a][existing].weight {
                return false;
            }
            self.adjacency[a][existing].weight = weight;
            if let Some(reverse) = self.adjacency[b]
                .iter_mut()
                .find(|edge| edge.to == a && edge.kind == kind)
            {
                reverse.weight = weight;
            }
            return true;
        }

        self.adjacency[a].push(NavEdge {
            from: a,
            to: b,
            weight,
            kind,
        });
        self.adjacency[b].push(NavEdge {
            from: b,
            to: a,
            weight,
            kind,
        });
        true
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&NavNode> {
        self.index_of(id).map(|position| &self.nodes[position])
    }

    /// Node at an arena position.
    ///
    /// # Panics
    ///
    /// Panics if `index` did not come from this graph.
    pub fn node_at(&self, index: NodeIndex) -> &NavNode {
        &self.nodes[index]
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[NavNode] {
        &self.nodes
    }

    /// Return the neighbours for a given node identifier.
    pub fn neighbours(&self, id: &str) -> &[NavEdge] {
        self.index_of(id)
            .map(|position| self.neighbours_at(position))
            .unwrap_or(&[])
    }

    pub fn neighbours_at(&self, index: NodeIndex) -> &[NavEdge] {
        self.adjacency
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Cheapest edge between two nodes, if any.
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&NavEdge> {
        let to = self.index_of(b)?;
        self.neighbours(a)
            .iter()
            .filter(|edge| edge.to == to)
            .min_by(|x, y| x.weight.total_cmp(&y.weight))
    }

    /// Every undirected edge once, in the direction where `from < to`.
    pub fn edges(&self) -> impl Iterator<Item = &NavEdge> + '_ {
        self.adjacency
            .iter()
            .flatten()
            .filter(|edge| edge.from < edge.to)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node and edge counts by kind.
    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats::default();
        for node in &self.nodes {
            match node.kind {
                NodeKind::Center => stats.centers += 1,
                NodeKind::Waypoint => stats.waypoints += 1,
            }
        }
        for edge in self.edges() {
            match edge.kind {
                EdgeKind::Horizontal => stats.horizontal_edges += 1,
                EdgeKind::Vertical => stats.vertical_edges += 1,
            }
        }
        stats.nodes = self.nodes.len();
        stats
    }
}

/// Summary counts for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub centers: usize,
    pub waypoints: usize,
    pub horizontal_edges: usize,
    pub vertical_edges: usize,
}

/// Build the navigation graph for a campus.
pub fn build_graph(campus: &CampusData, options: &GraphBuildOptions) -> NavigationGraph {
    let geometry = &options.geometry;
    let mut graph = NavigationGraph::default();

    let units = traversable_units(campus);
    if units.is_empty() {
        info!("campus has no traversable units; navigation graph is empty");
        return graph;
    }

    let centers: Vec<(NodeIndex, Point)> = units
        .iter()
        .map(|unit| {
            let point = centroid(&unit.polygon);
            (graph.add_node(NavNode::center(unit, point)), point)
        })
        .collect();

    connect_adjacent_units(&mut graph, &units, &centers, geometry);
    connect_vertical_units(&mut graph, campus, &units, &centers, options);

    if let Some(threshold) = options.repair_threshold {
        repair_isolated_units(&mut graph, &units, &centers, geometry, threshold);
    }

    let stats = graph.stats();
    info!(
        units = units.len(),
        nodes = stats.nodes,
        waypoints = stats.waypoints,
        horizontal_edges = stats.horizontal_edges,
        vertical_edges = stats.vertical_edges,
        "built navigation graph"
    );
    graph
}

/// Traversable units with usable geometry, sorted by id and deduplicated.
fn traversable_units(campus: &CampusData) -> Vec<&Unit> {
    let mut units: Vec<&Unit> = campus
        .units
        .iter()
        .filter(|unit| unit.is_traversable())
        .filter(|unit| {
            if unit.polygon.is_empty() {
                warn!(unit = %unit.id, "skipping unit with empty polygon");
                return false;
            }
            true
        })
        .collect();

    units.sort_by(|a, b| a.id.cmp(&b.id));
    units.dedup_by(|later, earlier| {
        let duplicate = later.id == earlier.id;
        if duplicate {
            warn!(unit = %later.id, "ignoring duplicate unit id");
        }
        duplicate
    });
    units
}

fn connect_adjacent_units(
    graph: &mut NavigationGraph,
    units: &[&Unit],
    centers: &[(NodeIndex, Point)],
    geometry: &GeometryConfig,
) {
    let mut by_level: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (position, unit) in units.iter().enumerate() {
        by_level.entry(unit.level_id.as_str()).or_default().push(position);
    }

    let bounds: Vec<Option<BoundingBox>> = units
        .iter()
        .map(|unit| BoundingBox::of(&unit.polygon))
        .collect();

    for (level, members) in &by_level {
        let mut links = 0usize;
        for (offset, &i) in members.iter().enumerate() {
            for &j in &members[offset + 1..] {
                let (Some(a_box), Some(b_box)) = (bounds[i], bounds[j]) else {
                    continue;
                };
                if !a_box.touches(&b_box, geometry.epsilon) {
                    continue;
                }
                let Some(segment) =
                    shared_edge(&units[i].polygon, &units[j].polygon, geometry.epsilon)
                else {
                    continue;
                };
                link_neighbours(
                    graph,
                    (units[i], centers[i]),
                    (units[j], centers[j]),
                    &segment,
                    geometry,
                );
                links += 1;
            }
        }
        debug!(level = %level, units = members.len(), links, "connected adjacent units");
    }
}

fn link_neighbours(
    graph: &mut NavigationGraph,
    (a, (a_node, a_point)): (&Unit, (NodeIndex, Point)),
    (b, (b_node, b_point)): (&Unit, (NodeIndex, Point)),
    segment: &Segment,
    geometry: &GeometryConfig,
) {
    match (a.unit_type.is_transit(), b.unit_type.is_transit()) {
        (true, true) => {
            graph.add_edge(
                a_node,
                b_node,
                geometry.distance(&a_point, &b_point),
                EdgeKind::Horizontal,
            );
        }
        (true, false) | (false, true) | (false, false) => {
            let door = segment.midpoint();
            let doorway = NavNode::waypoint(a, b, door);
            let waypoint = graph.add_node(doorway.clone());
            let existing = graph.node_at(waypoint);
            if existing.kind != NodeKind::Waypoint
                || existing.original_unit_id != doorway.original_unit_id
            {
                warn!(
                    doorway = %doorway.id,
                    first = %a.id,
                    second = %b.id,
                    "doorway id already taken by another node; skipping link"
                );
                return;
            }
            graph.add_edge(
                a_node,
                waypoint,
                geometry.distance(&a_point, &door),
                EdgeKind::Horizontal,
            );
            graph.add_edge(
                waypoint,
                b_node,
                geometry.distance(&door, &b_point),
                EdgeKind::Horizontal,
            );
        }
    }
}

fn connect_vertical_units(
    graph: &mut NavigationGraph,
    campus: &CampusData,
    units: &[&Unit],
    centers: &[(NodeIndex, Point)],
    options: &GraphBuildOptions,
) {
    let level_order = campus.level_order();
    let mut shafts: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (position, unit) in units.iter().enumerate() {
        if !unit.unit_type.is_vertical_connector() {
            continue;
        }
        if let Some(connector) = unit.vertical_connector_id.as_deref() {
            shafts.entry(connector).or_default().push(position);
        }
    }

    let z_of = |unit: &Unit| level_order.get(unit.level_id.as_str()).copied().unwrap_or(0.0);

    for (connector, mut members) in shafts {
        members.sort_by(|&i, &j| {
            z_of(units[i])
                .total_cmp(&z_of(units[j]))
                .then_with(|| units[i].level_id.cmp(&units[j].level_id))
        });

        for pair in members.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            if units[lower].level_id == units[upper].level_id {
                warn!(
                    connector = %connector,
                    first = %units[lower].id,
                    second = %units[upper].id,
                    "vertical connector has two units on one level"
                );
                continue;
            }
            let (lower_node, lower_point) = centers[lower];
            let (upper_node, upper_point) = centers[upper];
            let weight =
                options.geometry.distance(&lower_point, &upper_point) + options.vertical_penalty;
            graph.add_edge(lower_node, upper_node, weight, EdgeKind::Vertical);
        }
    }
}

fn repair_isolated_units(
    graph: &mut NavigationGraph,
    units: &[&Unit],
    centers: &[(NodeIndex, Point)],
    geometry: &GeometryConfig,
    threshold: f64,
) {
    let mut by_level: BTreeMap<&str, Vec<(NodeIndex, Point)>> = BTreeMap::new();
    for (unit, center) in units.iter().zip(centers) {
        by_level.entry(unit.level_id.as_str()).or_default().push(*center);
    }
    let indexes: HashMap<&str, LevelIndex> = by_level
        .into_iter()
        .map(|(level, points)| (level, LevelIndex::build(points, geometry.metric)))
        .collect();

    let mut repaired = 0usize;
    for (unit, &(node, point)) in units.iter().zip(centers) {
        if !graph.neighbours_at(node).is_empty() {
            continue;
        }
        let Some(index) = indexes.get(unit.level_id.as_str()) else {
            continue;
        };
        let Some((nearest, distance)) = index
            .nearest(&point, REPAIR_CANDIDATES + 1)
            .into_iter()
            .filter(|&(candidate, _)| candidate != node)
            .map(|(candidate, _)| {
                (candidate, geometry.distance(&point, &graph.node_at(candidate).point))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
        else {
            continue;
        };
        if distance < threshold {
            graph.add_edge(node, nearest, distance, EdgeKind::Horizontal);
            repaired += 1;
        } else {
            debug!(unit = %unit.id, distance, threshold, "isolated unit too far from neighbours");
        }
    }

    if repaired > 0 {
        warn!(repaired, "connected isolated units to nearest neighbours");
    }
}
