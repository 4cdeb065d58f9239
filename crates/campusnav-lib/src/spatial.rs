//! KD-tree nearest-neighbour lookup over the centre nodes of one level.
//!
//! The graph builder uses this during the repair pass to find, for a unit the
//! adjacency pass left isolated, the closest other walkable units on the same
//! floor without scanning every unit.
//!
//! Geographic points are projected onto a local equirectangular plane in
//! metres before indexing, so a degree of longitude away from the equator is
//! not mistaken for a degree of latitude. Distances returned here are
//! straight-line distances on that plane; callers re-rank candidates with
//! [`GeometryConfig::distance`](crate::geometry::GeometryConfig::distance).

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::debug;

use crate::geometry::{DistanceMetric, Point, EARTH_RADIUS_M};
use crate::graph::NodeIndex;

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Maps dataset coordinates onto the plane the tree is built over.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Projection {
    Identity,
    /// Longitude scaled by the cosine of the reference latitude, both axes in metres.
    Equirectangular { x_scale: f64, y_scale: f64 },
}

impl Projection {
    fn for_points(metric: DistanceMetric, points: &[(NodeIndex, Point)]) -> Self {
        match metric {
            DistanceMetric::Planar => Projection::Identity,
            DistanceMetric::Haversine => {
                let reference_lat = if points.is_empty() {
                    0.0
                } else {
                    points.iter().map(|(_, point)| point.y).sum::<f64>() / points.len() as f64
                };
                let metres_per_degree = EARTH_RADIUS_M.to_radians();
                Projection::Equirectangular {
                    x_scale: metres_per_degree * reference_lat.to_radians().cos(),
                    y_scale: metres_per_degree,
                }
            }
        }
    }

    fn apply(self, point: &Point) -> [f64; 2] {
        match self {
            Projection::Identity => [point.x, point.y],
            Projection::Equirectangular { x_scale, y_scale } => {
                [point.x * x_scale, point.y * y_scale]
            }
        }
    }
}

/// Nearest-neighbour index for the points of a single level.
pub struct LevelIndex {
    /// Items are positions in `entries`.
    tree: KdTree<f64, usize, 2, BUCKET_SIZE, u32>,
    entries: Vec<(NodeIndex, Point)>,
    projection: Projection,
}

impl LevelIndex {
    /// Index the given `(node, point)` pairs measured with `metric`.
    pub fn build(points: impl IntoIterator<Item = (NodeIndex, Point)>, metric: DistanceMetric) -> Self {
        let entries: Vec<(NodeIndex, Point)> = points.into_iter().collect();
        let projection = Projection::for_points(metric, &entries);

        let mut tree: KdTree<f64, usize, 2, BUCKET_SIZE, u32> = KdTree::new();
        for (position, (_, point)) in entries.iter().enumerate() {
            tree.add(&projection.apply(point), position);
        }

        debug!(points = entries.len(), ?metric, "built level index");
        Self {
            tree,
            entries,
            projection,
        }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `k` nearest nodes to `point`, closest first.
    pub fn nearest(&self, point: &Point, k: usize) -> Vec<(NodeIndex, f64)> {
        if k == 0 || self.entries.is_empty() {
            return Vec::new();
        }

        self.tree
            .nearest_n::<SquaredEuclidean>(&self.projection.apply(point), k)
            .into_iter()
            .map(|neighbour| {
                let (node, _) = self.entries[neighbour.item];
                (node, neighbour.distance.sqrt())
            })
            .collect()
    }
}
