// Test utilities used across `campusnav-cli` tests.
// Kept under `#[cfg(test)]` so it is not part of the public crate API.
use campusnav_lib::output::{RouteEndpoint, RouteStep};
use campusnav_lib::{
    AccessibilityFilter, NodeKind, Point, RouteAlgorithm, RouteSummary, UnitType,
};

/// Builder for tests that constructs `RouteStep` with sensible defaults.
pub struct RouteStepBuilder {
    step: RouteStep,
}

impl RouteStepBuilder {
    /// A unit centre step on the ground floor.
    pub fn new(node_id: &str) -> Self {
        Self {
            step: RouteStep {
                index: 0,
                node_id: node_id.to_string(),
                kind: NodeKind::Center,
                unit_id: node_id.to_string(),
                name: None,
                unit_type: Some(UnitType::Corridor),
                level_id: "L1".to_string(),
                level_name: Some("Ground Floor".to_string()),
                point: Point::default(),
            },
        }
    }

    pub fn index(mut self, idx: usize) -> Self {
        self.step.index = idx;
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.step.name = Some(name.to_string());
        self
    }

    pub fn unit_type(mut self, unit_type: UnitType) -> Self {
        self.step.unit_type = Some(unit_type);
        self
    }

    /// Turn the step into a doorway belonging to `unit_id`.
    pub fn doorway(mut self, unit_id: &str) -> Self {
        self.step.kind = NodeKind::Waypoint;
        self.step.unit_id = unit_id.to_string();
        self.step.name = None;
        self.step.unit_type = None;
        self
    }

    pub fn level(mut self, id: &str, name: &str) -> Self {
        self.step.level_id = id.to_string();
        self.step.level_name = Some(name.to_string());
        self
    }

    pub fn build(self) -> RouteStep {
        self.step
    }
}

/// Entrance to an upstairs classroom by the stairs.
pub fn sample_summary() -> RouteSummary {
    let steps = vec![
        RouteStepBuilder::new("U100")
            .index(0)
            .name("Main Entrance")
            .unit_type(UnitType::Entrance)
            .build(),
        RouteStepBuilder::new("U108")
            .index(1)
            .name("North Stairs")
            .unit_type(UnitType::Stairs)
            .build(),
        RouteStepBuilder::new("U208")
            .index(2)
            .name("North Stairs")
            .unit_type(UnitType::Stairs)
            .level("L2", "First Floor")
            .build(),
        RouteStepBuilder::new("wp:U204|U208")
            .index(3)
            .doorway("U204")
            .level("L2", "First Floor")
            .build(),
        RouteStepBuilder::new("U204")
            .index(4)
            .name("Room 204")
            .unit_type(UnitType::Classroom)
            .level("L2", "First Floor")
            .build(),
    ];

    RouteSummary {
        algorithm: RouteAlgorithm::Dijkstra,
        filter: AccessibilityFilter::Unrestricted,
        hops: 4,
        distance: 12.5,
        floor_changes: 1,
        start: RouteEndpoint {
            id: "U100".to_string(),
            name: Some("Main Entrance".to_string()),
            level: Some("Ground Floor".to_string()),
        },
        goal: RouteEndpoint {
            id: "U204".to_string(),
            name: Some("Room 204".to_string()),
            level: Some("First Floor".to_string()),
        },
        steps,
    }
}
