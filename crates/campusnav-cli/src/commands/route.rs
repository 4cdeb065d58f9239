//! Route command handler for computing paths between campus locations.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use campusnav_lib::{
    build_graph, plan_route, AccessibilityFilter, Error as RouteError, RouteAlgorithm,
    RouteRequest, RouteSummary,
};

use super::{load_dataset, GraphArgs};
use crate::output::OutputFormat;

/// Arguments for the route command.
#[derive(Debug, Clone, Args)]
pub struct RouteArgs {
    /// Starting unit id or name.
    #[arg(long = "from")]
    pub from: String,
    /// Destination unit id or name.
    #[arg(long = "to")]
    pub to: String,
    /// Search algorithm: dijkstra, a-star or bfs.
    #[arg(long, default_value_t = RouteAlgorithm::Dijkstra)]
    pub algorithm: RouteAlgorithm,
    /// Accessibility filter: none, elevator-only, no-stairs or same-level.
    #[arg(long, default_value_t = AccessibilityFilter::Unrestricted)]
    pub filter: AccessibilityFilter,
    #[command(flatten)]
    pub graph: GraphArgs,
}

impl RouteArgs {
    /// Convert CLI args to a library RouteRequest.
    pub fn to_request(&self) -> RouteRequest {
        RouteRequest::new(self.from.clone(), self.to.clone())
            .with_algorithm(self.algorithm)
            .with_filter(self.filter)
    }
}

/// Handle the route subcommand.
pub fn handle_route_command(
    dataset: Option<&Path>,
    format: OutputFormat,
    args: &RouteArgs,
) -> Result<()> {
    let (_, campus) = load_dataset(dataset)?;
    let options = args.graph.build_options(&campus)?;
    let graph = build_graph(&campus, &options);

    let request = args.to_request();
    let plan = match plan_route(&campus, &graph, &request, &options.geometry) {
        Ok(plan) => plan,
        Err(err) => return Err(handle_route_failure(args, err)),
    };

    let summary = RouteSummary::from_plan(&campus, &graph, &plan)
        .context("failed to build route summary for display")?;
    format.render_route(&summary)?;
    Ok(())
}

fn handle_route_failure(args: &RouteArgs, err: RouteError) -> anyhow::Error {
    match err {
        RouteError::UnknownLocation { name, suggestions } => {
            anyhow::anyhow!(format_unknown_location_message(&name, &suggestions))
        }
        RouteError::RouteNotFound { start, goal } => {
            anyhow::anyhow!(format_route_not_found_message(&start, &goal, args))
        }
        other => anyhow::Error::new(other),
    }
}

fn format_unknown_location_message(name: &str, suggestions: &[String]) -> String {
    let mut message = format!("Unknown location '{}'.", name);
    match suggestions {
        [] => {}
        [only] => message.push_str(&format!(" Did you mean '{only}'?")),
        many => {
            let joined = many
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ");
            message.push_str(&format!(" Did you mean one of: {}?", joined));
        }
    }
    message
}

fn format_route_not_found_message(start: &str, goal: &str, args: &RouteArgs) -> String {
    let mut message = format!("No route found between {} and {}.", start, goal);
    let mut tips = Vec::new();
    match args.filter {
        AccessibilityFilter::Unrestricted => {}
        AccessibilityFilter::SameLevel => tips.push("allow floor changes (omit --filter same-level)"),
        AccessibilityFilter::ElevatorOnly | AccessibilityFilter::NoStairs => {
            tips.push("relax --filter")
        }
    }
    if args.graph.no_repair {
        tips.push("allow the repair pass (omit --no-repair)");
    }
    if tips.is_empty() {
        message.push_str(
            " The locations may be restricted, closed, or on disconnected parts of the campus.",
        );
    } else {
        message.push(' ');
        message.push_str(&format!("Try {}.", tips.join(", ")));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(filter: AccessibilityFilter, no_repair: bool) -> RouteArgs {
        RouteArgs {
            from: "U100".to_string(),
            to: "U204".to_string(),
            algorithm: RouteAlgorithm::Dijkstra,
            filter,
            graph: GraphArgs {
                no_repair,
                ..GraphArgs::default()
            },
        }
    }

    #[test]
    fn request_carries_algorithm_and_filter() {
        let mut route_args = args(AccessibilityFilter::NoStairs, false);
        route_args.algorithm = RouteAlgorithm::Bfs;
        let request = route_args.to_request();
        assert_eq!(request.start, "U100");
        assert_eq!(request.algorithm, RouteAlgorithm::Bfs);
        assert_eq!(request.filter, AccessibilityFilter::NoStairs);
    }

    #[test]
    fn unknown_location_lists_suggestions() {
        let message =
            format_unknown_location_message("Rom 204", &["Room 204".to_string(), "Room 104".to_string()]);
        assert_eq!(
            message,
            "Unknown location 'Rom 204'. Did you mean one of: 'Room 204', 'Room 104'?"
        );
        assert_eq!(
            format_unknown_location_message("Gym", &[]),
            "Unknown location 'Gym'."
        );
    }

    #[test]
    fn route_not_found_suggests_relaxing_filters() {
        let message = format_route_not_found_message(
            "U100",
            "U204",
            &args(AccessibilityFilter::SameLevel, true),
        );
        assert!(message.starts_with("No route found between U100 and U204."));
        assert!(message.contains("omit --filter same-level"));
        assert!(message.contains("omit --no-repair"));

        let plain =
            format_route_not_found_message("U100", "U107", &args(AccessibilityFilter::Unrestricted, false));
        assert!(plain.contains("restricted"));
    }
}
