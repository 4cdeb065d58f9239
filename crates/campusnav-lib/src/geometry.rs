//! Planar and geographic geometry primitives used by the graph builder.
//!
//! Every predicate takes its tolerance explicitly. Geographic datasets
//! (longitude/latitude degrees) and planar datasets (metres or schematic
//! units) need tolerances several orders of magnitude apart, so callers carry
//! a [`GeometryConfig`] rather than relying on a shared constant.
//!
//! None of the functions here fail. Degenerate input (empty polygons,
//! zero-length edges) produces neutral results so a single malformed unit
//! cannot abort graph construction for a whole dataset.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres (IUGG).
pub(crate) const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Default tolerance for planar datasets.
pub const PLANAR_EPSILON: f64 = 1e-9;

/// Default tolerance for longitude/latitude datasets.
pub const GEOGRAPHIC_EPSILON: f64 = 1e-6;

/// A 2D coordinate. For geographic datasets `x` is longitude and `y` latitude.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean separation in raw coordinate units.
    pub fn coordinate_distance(&self, other: &Self) -> f64 {
        self.sub(*other).norm()
    }

    /// Whether two points coincide within `epsilon` coordinate units.
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.coordinate_distance(other) <= epsilon
    }
}

/// Closed ring of vertices without a repeated closing point.
pub type Polygon = Vec<Point>;

/// Distance model for a dataset's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Straight-line distance in coordinate units.
    #[default]
    Planar,
    /// Great-circle distance in metres between lon/lat points.
    Haversine,
}

/// Tolerance and distance model shared by all geometry predicates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    pub epsilon: f64,
    pub metric: DistanceMetric,
}

impl GeometryConfig {
    /// Configuration for planar (metre or schematic) coordinates.
    pub const fn planar() -> Self {
        Self {
            epsilon: PLANAR_EPSILON,
            metric: DistanceMetric::Planar,
        }
    }

    /// Configuration for longitude/latitude coordinates.
    pub const fn geographic() -> Self {
        Self {
            epsilon: GEOGRAPHIC_EPSILON,
            metric: DistanceMetric::Haversine,
        }
    }

    /// Distance between two points under this configuration.
    pub fn distance(&self, a: &Point, b: &Point) -> f64 {
        distance(a, b, self.metric, self.epsilon)
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self::planar()
    }
}

/// Overlapping boundary portion shared by two polygons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// Length in raw coordinate units.
    pub fn length(&self) -> f64 {
        self.start.coordinate_distance(&self.end)
    }
}

/// Axis-aligned bounds, used to skip polygon pairs that cannot touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    /// Bounds of a polygon, or `None` when it has no vertices.
    pub fn of(polygon: &[Point]) -> Option<Self> {
        let first = polygon.first()?;
        let mut bounds = Self {
            min: *first,
            max: *first,
        };
        for point in &polygon[1..] {
            bounds.min.x = bounds.min.x.min(point.x);
            bounds.min.y = bounds.min.y.min(point.y);
            bounds.max.x = bounds.max.x.max(point.x);
            bounds.max.y = bounds.max.y.max(point.y);
        }
        Some(bounds)
    }

    /// Whether the boxes overlap or touch, growing both by `epsilon`.
    pub fn touches(&self, other: &Self, epsilon: f64) -> bool {
        self.min.x <= other.max.x + epsilon
            && other.min.x <= self.max.x + epsilon
            && self.min.y <= other.max.y + epsilon
            && other.min.y <= self.max.y + epsilon
    }
}

/// Arithmetic mean of the polygon's vertices; `(0, 0)` for an empty polygon.
pub fn centroid(polygon: &[Point]) -> Point {
    if polygon.is_empty() {
        return Point::default();
    }
    let count = polygon.len() as f64;
    let (sum_x, sum_y) = polygon
        .iter()
        .fold((0.0, 0.0), |(x, y), point| (x + point.x, y + point.y));
    Point::new(sum_x / count, sum_y / count)
}

/// Distance between two points.
///
/// Points closer than `epsilon` in raw coordinate units are reported as
/// exactly `0.0` so floating noise does not accumulate in path-length sums.
pub fn distance(a: &Point, b: &Point, metric: DistanceMetric, epsilon: f64) -> f64 {
    if a.approx_eq(b, epsilon) {
        return 0.0;
    }
    match metric {
        DistanceMetric::Planar => (a.x - b.x).hypot(a.y - b.y),
        DistanceMetric::Haversine => haversine(a, b),
    }
}

fn haversine(a: &Point, b: &Point) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.x - a.x).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Whether `p` lies on segment `a`-`b`, allowing `epsilon` of perpendicular
/// offset and overshoot past either endpoint.
pub fn is_point_on_segment(p: &Point, a: &Point, b: &Point, epsilon: f64) -> bool {
    let direction = b.sub(*a);
    let length = direction.norm();
    if length <= epsilon {
        return p.approx_eq(a, epsilon);
    }

    let offset = p.sub(*a);
    if direction.cross(offset).abs() / length > epsilon {
        return false;
    }

    let projection = direction.dot(offset) / length;
    projection >= -epsilon && projection <= length + epsilon
}

/// Whether segments `a1`-`a2` and `b1`-`b2` lie on the same line.
///
/// Both endpoints of the second segment must sit within `epsilon` of the
/// first segment's supporting line. Dividing the cross product by the segment
/// length turns it into a perpendicular distance, so the test behaves the same
/// for long corridors and short door jambs. Zero-length segments are never
/// collinear with anything.
pub fn are_collinear(a1: &Point, a2: &Point, b1: &Point, b2: &Point, epsilon: f64) -> bool {
    let direction = a2.sub(*a1);
    let length = direction.norm();
    if length <= epsilon || b1.approx_eq(b2, epsilon) {
        return false;
    }

    let offset_start = direction.cross(b1.sub(*a1)).abs() / length;
    let offset_end = direction.cross(b2.sub(*a1)).abs() / length;
    offset_start <= epsilon && offset_end <= epsilon
}

/// Find the boundary segment two polygons have in common.
///
/// Returns `None` when the polygons are disjoint or only touch at a single
/// vertex. Winding order is irrelevant and vertices need not be bit-identical:
/// the general path tolerates the near-duplicate coordinates typical of
/// digitised floor plans. When several collinear overlaps exist, the longest
/// one is returned.
pub fn shared_edge(a: &[Point], b: &[Point], epsilon: f64) -> Option<Segment> {
    let edges_a: Vec<(Point, Point)> = edges(a, epsilon).collect();
    let edges_b: Vec<(Point, Point)> = edges(b, epsilon).collect();
    if edges_a.is_empty() || edges_b.is_empty() {
        return None;
    }

    for &(p1, p2) in &edges_a {
        for &(q1, q2) in &edges_b {
            let reversed = p1.approx_eq(&q2, epsilon) && p2.approx_eq(&q1, epsilon);
            let aligned = p1.approx_eq(&q1, epsilon) && p2.approx_eq(&q2, epsilon);
            if reversed || aligned {
                return Some(Segment { start: p1, end: p2 });
            }
        }
    }

    let mut best: Option<Segment> = None;
    for &(p1, p2) in &edges_a {
        for &(q1, q2) in &edges_b {
            if !are_collinear(&p1, &p2, &q1, &q2, epsilon) {
                continue;
            }
            let Some(overlap) = collinear_overlap((p1, p2), (q1, q2), epsilon) else {
                continue;
            };
            if best.map_or(true, |current| overlap.length() > current.length()) {
                best = Some(overlap);
            }
        }
    }
    best
}

fn edges(polygon: &[Point], epsilon: f64) -> impl Iterator<Item = (Point, Point)> + '_ {
    let count = if polygon.len() < 2 { 0 } else { polygon.len() };
    (0..count)
        .map(move |i| (polygon[i], polygon[(i + 1) % polygon.len()]))
        .filter(move |(start, end)| !start.approx_eq(end, epsilon))
}

fn collinear_overlap(
    (p1, p2): (Point, Point),
    (q1, q2): (Point, Point),
    epsilon: f64,
) -> Option<Segment> {
    let candidates = [
        (p1, is_point_on_segment(&p1, &q1, &q2, epsilon)),
        (p2, is_point_on_segment(&p2, &q1, &q2, epsilon)),
        (q1, is_point_on_segment(&q1, &p1, &p2, epsilon)),
        (q2, is_point_on_segment(&q2, &p1, &p2, epsilon)),
    ];

    let mut unique: Vec<Point> = Vec::with_capacity(4);
    for (point, on_other) in candidates {
        if on_other && !unique.iter().any(|seen| seen.approx_eq(&point, epsilon)) {
            unique.push(point);
        }
    }
    if unique.len() < 2 {
        return None;
    }

    let mut longest: Option<Segment> = None;
    for (i, start) in unique.iter().enumerate() {
        for end in &unique[i + 1..] {
            let candidate = Segment {
                start: *start,
                end: *end,
            };
            if longest.map_or(true, |current| candidate.length() > current.length()) {
                longest = Some(candidate);
            }
        }
    }
    longest.filter(|segment| segment.length() > epsilon)
}
