use campusnav_lib::{
    build_graph, plan_route, AccessibilityFilter, CampusData, GeometryConfig, GraphBuildOptions,
    Level, NavigationGraph, Point, RouteAlgorithm, RouteRequest, Unit, UnitType,
};
use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use std::hint::black_box;

const FLOORS: usize = 4;
const GRID: usize = 12;
const CELL: f64 = 5.0;

/// Square floors of rooms with a corridor on every third row and a stair
/// and elevator shaft in opposite corners.
fn grid_campus() -> CampusData {
    let levels = (0..FLOORS)
        .map(|floor| Level {
            id: format!("L{floor}"),
            name: format!("Floor {floor}"),
            facility_id: "F1".to_string(),
            polygon: Vec::new(),
            z_index: floor as f64,
        })
        .collect();

    let mut units = Vec::new();
    for floor in 0..FLOORS {
        for row in 0..GRID {
            for col in 0..GRID {
                let (x, y) = (col as f64 * CELL, row as f64 * CELL);
                let (unit_type, connector) = match (row, col) {
                    (0, 0) => (UnitType::Stairs, Some("STAIRS")),
                    (r, c) if r == GRID - 1 && c == GRID - 1 => {
                        (UnitType::Elevator, Some("ELEVATOR"))
                    }
                    (r, _) if r % 3 == 0 => (UnitType::Corridor, None),
                    _ => (UnitType::Office, None),
                };
                units.push(Unit {
                    id: format!("F{floor}-R{row:02}-C{col:02}"),
                    name: format!("Room {floor}{row:02}{col:02}"),
                    unit_type,
                    level_id: format!("L{floor}"),
                    polygon: vec![
                        Point::new(x, y),
                        Point::new(x + CELL, y),
                        Point::new(x + CELL, y + CELL),
                        Point::new(x, y + CELL),
                    ],
                    accessible: None,
                    vertical_connector_id: connector.map(str::to_string),
                });
            }
        }
    }

    CampusData {
        levels,
        units,
        ..CampusData::default()
    }
}

static CAMPUS: Lazy<CampusData> = Lazy::new(grid_campus);
static GRAPH: Lazy<NavigationGraph> =
    Lazy::new(|| build_graph(&CAMPUS, &GraphBuildOptions::default()));

fn far_corner_request() -> RouteRequest {
    RouteRequest::new(
        "F0-R06-C05",
        format!("F{}-R{:02}-C{:02}", FLOORS - 1, GRID - 2, GRID - 3),
    )
}

fn benchmark_graph_build(c: &mut Criterion) {
    let campus = &*CAMPUS;
    c.bench_function("build_graph_grid", |b| {
        b.iter(|| {
            let graph = build_graph(campus, &GraphBuildOptions::default());
            black_box(graph.edge_count())
        });
    });
}

fn benchmark_pathfinding(c: &mut Criterion) {
    let campus = &*CAMPUS;
    let graph = &*GRAPH;
    let geometry = GeometryConfig::planar();

    for algorithm in [
        RouteAlgorithm::Dijkstra,
        RouteAlgorithm::AStar,
        RouteAlgorithm::Bfs,
    ] {
        let request = far_corner_request().with_algorithm(algorithm);
        c.bench_function(&format!("{algorithm}_grid_far_corner"), |b| {
            b.iter(|| {
                let plan = plan_route(campus, graph, &request, &geometry).expect("route exists");
                black_box(plan.hop_count())
            });
        });
    }

    let request = far_corner_request().with_filter(AccessibilityFilter::ElevatorOnly);
    c.bench_function("dijkstra_elevator_only_grid", |b| {
        b.iter(|| {
            let plan = plan_route(campus, graph, &request, &geometry).expect("route exists");
            black_box(plan.distance)
        });
    });
}

criterion_group!(benches, benchmark_graph_build, benchmark_pathfinding);
criterion_main!(benches);
