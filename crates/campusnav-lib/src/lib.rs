//! Campus wayfinding library entry points.
//!
//! This crate loads indoor campus datasets, derives a navigation graph from
//! unit footprints, and plans accessible routes across floors. Higher-level
//! consumers (the CLI, renderers) should only depend on the functions
//! exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod dataset;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod model;
pub mod output;
pub mod path;
pub mod route;
pub mod routing;
pub mod spatial;

pub use dataset::{default_dataset_path, load_campus, resolve_dataset_path};
pub use error::{Error, Result};
pub use geometry::{DistanceMetric, GeometryConfig, Point, Polygon, Segment};
pub use graph::{
    build_graph, EdgeKind, GraphBuildOptions, GraphStats, NavEdge, NavNode, NavigationGraph,
    NodeKind,
};
pub use model::{CampusData, CoordinateSystem, Level, Unit, UnitType};
pub use output::{RouteRenderMode, RouteSummary};
pub use path::{shortest_path, AccessibilityFilter, EdgeFilter};
pub use route::{path_length, to_waypoints, Waypoint};
pub use routing::{plan_route, RouteAlgorithm, RoutePlan, RouteRequest};
