mod common;

use campusnav_lib::path::{a_star_path, fewest_hops_path, path_weight};
use campusnav_lib::{
    build_graph, plan_route, shortest_path, to_waypoints, AccessibilityFilter, CampusData,
    EdgeKind, Error, GeometryConfig, GraphBuildOptions, NavEdge, NavNode, NavigationGraph,
    NodeKind, RouteAlgorithm, RouteRequest,
};

use common::two_floor_campus;

const STAIRS_COST: f64 = 50.168_654;
const ELEVATOR_COST: f64 = 56.280_110;

fn fixture() -> (CampusData, NavigationGraph) {
    let campus = two_floor_campus();
    let graph = build_graph(&campus, &GraphBuildOptions::for_campus(&campus));
    (campus, graph)
}

fn ids(path: &[&str]) -> Vec<String> {
    path.iter().map(|id| id.to_string()).collect()
}

#[test]
fn entrance_to_upper_classroom_takes_the_stairs() {
    let (_, graph) = fixture();
    let path = shortest_path(&graph, "U100", "U204", &AccessibilityFilter::Unrestricted)
        .expect("route exists");

    assert_eq!(
        path,
        ids(&["U100", "U101", "U108", "U208", "U201", "wp:U201|U204", "U204"])
    );
    let weight = path_weight(&graph, &path).expect("consecutive nodes are linked");
    assert!((weight - STAIRS_COST).abs() < 1e-5, "weight was {weight}");
}

#[test]
fn shortest_path_is_symmetric_for_every_unit_pair() {
    let (_, graph) = fixture();
    let filter = AccessibilityFilter::Unrestricted;
    let centers: Vec<&str> = graph
        .nodes()
        .iter()
        .filter(|node| node.kind == NodeKind::Center)
        .map(|node| node.id.as_str())
        .collect();
    assert_eq!(centers.len(), 11);

    for (offset, &from) in centers.iter().enumerate() {
        for &to in &centers[offset + 1..] {
            let there = shortest_path(&graph, from, to, &filter)
                .unwrap_or_else(|| panic!("no route {from} -> {to}"));
            let back = shortest_path(&graph, to, from, &filter)
                .unwrap_or_else(|| panic!("no route {to} -> {from}"));

            let there_weight = path_weight(&graph, &there).expect("linked path");
            let back_weight = path_weight(&graph, &back).expect("linked path");
            assert!(
                (there_weight - back_weight).abs() < 1e-9,
                "{from} <-> {to}: {there_weight} vs {back_weight}"
            );
        }
    }
}

#[test]
fn a_star_matches_dijkstra_cost() {
    let (_, graph) = fixture();
    let geometry = GeometryConfig::planar();
    let filter = AccessibilityFilter::Unrestricted;

    for (start, goal) in [("U100", "U204"), ("U104", "U209"), ("U205", "U105")] {
        let dijkstra = shortest_path(&graph, start, goal, &filter).expect("route exists");
        let a_star = a_star_path(&graph, start, goal, &filter, &geometry).expect("route exists");
        let expected = path_weight(&graph, &dijkstra).unwrap();
        let actual = path_weight(&graph, &a_star).unwrap();
        assert!(
            (expected - actual).abs() < 1e-9,
            "{start} -> {goal}: {expected} vs {actual}"
        );
    }
}

#[test]
fn elevator_only_never_uses_stairs_between_floors() {
    let (_, graph) = fixture();
    let path = shortest_path(&graph, "U100", "U204", &AccessibilityFilter::ElevatorOnly)
        .expect("elevator route exists");

    assert_eq!(
        path,
        ids(&["U100", "U101", "U109", "U209", "U201", "wp:U201|U204", "U204"])
    );
    for pair in path.windows(2) {
        let edge = graph.edge_between(&pair[0], &pair[1]).expect("linked");
        if edge.kind == EdgeKind::Vertical {
            assert_eq!(pair[0], "U109");
            assert_eq!(pair[1], "U209");
        }
    }
    let weight = path_weight(&graph, &path).unwrap();
    assert!((weight - ELEVATOR_COST).abs() < 1e-5, "weight was {weight}");
}

#[test]
fn no_stairs_avoids_every_stair_unit() {
    let (_, graph) = fixture();
    let path = shortest_path(&graph, "U100", "U204", &AccessibilityFilter::NoStairs)
        .expect("route exists");
    assert!(!path.iter().any(|id| id == "U108" || id == "U208"));
}

#[test]
fn same_level_filter_blocks_floor_changes() {
    let (_, graph) = fixture();
    assert!(shortest_path(&graph, "U100", "U204", &AccessibilityFilter::SameLevel).is_none());
    assert!(shortest_path(&graph, "U100", "U105", &AccessibilityFilter::SameLevel).is_some());
}

#[test]
fn restricted_goal_has_no_path() {
    let (_, graph) = fixture();
    assert!(shortest_path(&graph, "U100", "U107", &AccessibilityFilter::Unrestricted).is_none());
}

#[test]
fn closures_work_as_filters() {
    let (_, graph) = fixture();
    let avoid_corridor =
        |_: &NavEdge, from: &NavNode, to: &NavNode| from.id != "U101" && to.id != "U101";
    assert!(shortest_path(&graph, "U100", "U104", &avoid_corridor).is_none());
}

#[test]
fn fewest_hops_reaches_goal() {
    let (_, graph) = fixture();
    let path = fewest_hops_path(&graph, "U100", "U204", &AccessibilityFilter::Unrestricted)
        .expect("route exists");
    assert_eq!(path.first().map(String::as_str), Some("U100"));
    assert_eq!(path.last().map(String::as_str), Some("U204"));
    assert_eq!(path.len(), 7);
}

#[test]
fn waypoints_follow_node_positions() {
    let (_, graph) = fixture();
    let path = shortest_path(&graph, "U100", "U104", &AccessibilityFilter::Unrestricted)
        .expect("route exists");
    let waypoints = to_waypoints(&graph, &path);

    assert_eq!(waypoints.len(), path.len());
    assert_eq!(waypoints[0].point, campusnav_lib::Point::new(2.0, 2.0));
    assert!(waypoints.iter().all(|waypoint| waypoint.level_id == "L1"));
}

#[test]
fn plan_excludes_vertical_travel_from_distance() {
    let (campus, graph) = fixture();
    let request = RouteRequest::new("Main Entrance", "Room 204");
    let plan = plan_route(&campus, &graph, &request, &GeometryConfig::planar()).expect("plan");

    assert_eq!(plan.start, "U100");
    assert_eq!(plan.goal, "U204");
    assert_eq!(plan.floor_changes, 1);
    assert_eq!(plan.hop_count(), 6);
    assert!((plan.total_weight - STAIRS_COST).abs() < 1e-5);
    assert!((plan.distance - (STAIRS_COST - 10.0)).abs() < 1e-5);
}

#[test]
fn plan_honours_filter_and_algorithm() {
    let (campus, graph) = fixture();
    let request = RouteRequest::new("U100", "U204")
        .with_filter(AccessibilityFilter::ElevatorOnly)
        .with_algorithm(RouteAlgorithm::AStar);
    let plan = plan_route(&campus, &graph, &request, &GeometryConfig::planar()).expect("plan");

    assert_eq!(plan.algorithm, RouteAlgorithm::AStar);
    assert_eq!(plan.filter, AccessibilityFilter::ElevatorOnly);
    assert!(plan.steps.contains(&"U109".to_string()));
    assert!((plan.total_weight - ELEVATOR_COST).abs() < 1e-5);
}

#[test]
fn plan_reports_unreachable_routes() {
    let (campus, graph) = fixture();
    let geometry = GeometryConfig::planar();

    let restricted = RouteRequest::new("Main Entrance", "Server Room");
    assert!(matches!(
        plan_route(&campus, &graph, &restricted, &geometry),
        Err(Error::RouteNotFound { .. })
    ));

    let flat = RouteRequest::new("U100", "U204").with_filter(AccessibilityFilter::SameLevel);
    let err = plan_route(&campus, &graph, &flat, &geometry).unwrap_err();
    assert_eq!(err.to_string(), "no route found between U100 and U204");
}

#[test]
fn plan_suggests_similar_locations() {
    let (campus, graph) = fixture();
    let request = RouteRequest::new("Room 2O4", "U100");
    let err = plan_route(&campus, &graph, &request, &GeometryConfig::planar()).unwrap_err();

    match &err {
        Error::UnknownLocation { suggestions, .. } => {
            assert!(suggestions.iter().any(|name| name == "Room 204"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("Did you mean"));
}
