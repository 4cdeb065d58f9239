use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the campusnav library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// The shortest-path solver never produces these: an absent path is a plain
/// `None`. Errors are reserved for dataset handling and for the higher-level
/// planning façade, which turns a missing path into [`Error::RouteNotFound`].
#[derive(Debug, Error)]
pub enum Error {
    /// Dataset could not be located at the resolved path.
    #[error("campus dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the default dataset location")]
    ProjectDirsUnavailable,

    /// The dataset was parsed but is structurally unusable.
    #[error("invalid campus dataset: {message}")]
    InvalidDataset { message: String },

    /// Raised when a location could not be found in the dataset.
    #[error("unknown location: {name}{}", format_suggestions(.suggestions))]
    UnknownLocation {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when no route could be found between two locations.
    #[error("no route found between {start} and {goal}")]
    RouteNotFound { start: String, goal: String },

    /// Raised when a computed route plan lacks any steps.
    #[error("route plan was empty")]
    EmptyRoutePlan,

    /// Raised when a build or routing option is out of range.
    #[error("invalid option {option}: {reason}")]
    InvalidOption { option: String, reason: String },

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
