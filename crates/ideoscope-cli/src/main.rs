//! Ideoscope CLI - explore the two-space article/profile corpus.
//!
//! # Usage
//!
//! ```bash
//! # Search, ranked against a reference profile
//! ideo search "housing policy" --reference profile:abc123
//!
//! # Unranked search, JSON output
//! ideo search "press freedom" --json
//!
//! # Dump the spatial graph with resolved labels and colors
//! ideo graph --positions ./positions.json
//! ```

mod config;
mod output;
mod search;
mod snapshot;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ideoscope_core::graph::{GraphBuilder, PositionArtifact};
use ideoscope_core::session::SearchPhase;

/// Explore a corpus of articles and profiles embedded in contextual and
/// ideological space.
#[derive(Parser)]
#[command(name = "ideo", version, about)]
struct Cli {
    /// Corpus snapshot file (default: platform data directory)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the corpus, optionally ranked against a reference profile
    Search {
        /// Search query
        query: String,

        /// Reference profile key (e.g. profile:abc123) to rank against
        #[arg(short, long)]
        reference: Option<String>,

        /// Maximum number of results to print
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,

        /// Skip the highlight hold and print the ranking immediately
        #[arg(long)]
        no_hold: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the spatial graph: labels, scaled positions, base colors
    Graph {
        /// Position artifact file (default: platform data directory)
        #[arg(long)]
        positions: Option<PathBuf>,

        /// Reference profile key, rendered in its own color
        #[arg(short, long)]
        reference: Option<String>,

        /// Output nodes as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match &cli.command {
        Command::Search {
            query,
            reference,
            limit,
            no_hold,
            json,
        } => {
            let session = search::execute_search(
                query,
                reference.as_deref(),
                cli.snapshot.as_ref(),
                *no_hold,
            )
            .await?;

            if session.phase() == SearchPhase::Idle {
                // No results or an engine-reported failure; the session
                // carries the user-facing message either way.
                if let Some(message) = session.message() {
                    eprintln!("{}", message);
                }
                std::process::exit(1);
            }

            let shown = &session.results()[..session.results().len().min(*limit)];
            let formatted = if *json {
                output::format_search_json(query, reference.as_deref(), shown)
            } else {
                output::format_search_human(query, shown)
            };
            println!("{}", formatted);
        }
        Command::Graph {
            positions,
            reference,
            json,
        } => {
            let store = snapshot::load_snapshot(&config::snapshot_path(cli.snapshot.as_ref())?)?;
            let raw = std::fs::read_to_string(config::positions_path(positions.as_ref())?)?;
            let artifact = PositionArtifact::from_json(&raw)?;
            let nodes = GraphBuilder::new(&store).build(&artifact).await?;

            let formatted = if *json {
                output::format_graph_json(&nodes, reference.as_deref())
            } else {
                output::format_graph_human(&nodes, reference.as_deref())
            };
            println!("{}", formatted);
        }
    }

    Ok(())
}
