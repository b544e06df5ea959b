use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use campusnav_cli::commands::inspect::handle_inspect_command;
use campusnav_cli::commands::resolve_snapshot_path;
use campusnav_cli::commands::route::{handle_route_command, RouteCommandArgs};
use campusnav_cli::output::OutputFormat;
use campusnav_lib::{Error as LibError, RouteAlgorithm};

#[derive(Parser, Debug)]
#[command(author, version, about = "Indoor and outdoor campus route planning")]
struct Cli {
    /// Snapshot JSON file; falls back to CAMPUSNAV_SNAPSHOT.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a route between two vertices (room ids or vertex keys).
    Route {
        /// Starting room id or vertex key.
        #[arg(long = "from")]
        from: String,
        /// Destination room id or vertex key.
        #[arg(long = "to")]
        to: String,
        /// Search algorithm: a-star or dijkstra.
        #[arg(long, default_value = "a-star")]
        algorithm: RouteAlgorithm,
    },
    /// Print entity and graph counts for the snapshot.
    Inspect,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            match err.downcast_ref::<LibError>() {
                Some(LibError::NoPathFound { .. }) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let snapshot_path = resolve_snapshot_path(cli.snapshot.as_deref())?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Route {
            from,
            to,
            algorithm,
        } => {
            let args = RouteCommandArgs {
                from,
                to,
                algorithm,
            };
            handle_route_command(&snapshot_path, cli.format, &args, &mut stdout)
        }
        Command::Inspect => handle_inspect_command(&snapshot_path, cli.format, &mut stdout),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
