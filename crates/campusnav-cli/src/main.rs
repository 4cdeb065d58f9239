use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use campusnav_cli::commands::graph::{handle_graph_command, GraphCommandArgs};
use campusnav_cli::commands::locations::{handle_locations_command, LocationsArgs};
use campusnav_cli::commands::route::{handle_route_command, RouteArgs};
use campusnav_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Indoor campus wayfinding")]
struct Cli {
    /// Campus dataset file or directory (defaults to CAMPUSNAV_DATASET, then the data directory).
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a walking route between two units.
    Route(RouteArgs),
    /// List the units of the campus.
    Locations(LocationsArgs),
    /// Build the navigation graph and report its shape.
    Graph(GraphCommandArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let dataset = cli.dataset.as_deref();

    match &cli.command {
        Command::Route(args) => handle_route_command(dataset, cli.format, args),
        Command::Locations(args) => handle_locations_command(dataset, cli.format, args),
        Command::Graph(args) => handle_graph_command(dataset, cli.format, args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
