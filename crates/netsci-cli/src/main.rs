#![forbid(unsafe_code)]

mod cmd;
mod input;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use netsci_core::config;
use netsci_core::error::ErrorCode;
use output::{CliError, OutputMode};
use std::env;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "netsci: step through shortest paths, betweenness and clustering",
    long_about = None
)]
struct Cli {
    /// Log engine steps at debug level (overridden by `NETSCI_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format; overrides `--json`, `FORMAT` and config files.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Traversal",
        about = "Step through a shortest-path BFS",
        long_about = "Run breadth-first search from a source, recording distances, path \
                      multiplicities and predecessors one step at a time.",
        after_help = "EXAMPLES:\n    # Trace the course graph node by node\n    netsci bfs --fixture shortest-paths\n\n    # One neighbor per step from node 3\n    netsci bfs --fixture betweenness --source 3 --granularity neighbor\n\n    # Final state only, machine-readable\n    netsci bfs -f graph.toml --final-only --json"
    )]
    Bfs(cmd::bfs::BfsArgs),

    #[command(
        next_help_heading = "Traversal",
        about = "List all shortest paths from a source",
        long_about = "Reconstruct every shortest path from the source to each reachable \
                      node, or to a single target.",
        after_help = "EXAMPLES:\n    # All shortest paths from 0 to 5\n    netsci paths --fixture shortest-paths --target 5\n\n    # Every target, as JSON\n    netsci paths -f graph.toml --source a --json"
    )]
    Paths(cmd::paths::PathsArgs),

    #[command(
        next_help_heading = "Centrality",
        about = "Accumulate dependency scores or betweenness",
        long_about = "Walk the BFS visit order backwards to accumulate per-source \
                      dependency scores, or sum them over all sources for betweenness \
                      centrality.",
        after_help = "EXAMPLES:\n    # Reverse accumulation from node 0\n    netsci betweenness --fixture betweenness\n\n    # Betweenness centrality of every node\n    netsci betweenness --fixture betweenness --all-sources"
    )]
    Betweenness(cmd::betweenness::BetweennessArgs),

    #[command(
        next_help_heading = "Centrality",
        about = "Local or global clustering coefficient",
        long_about = "Check every neighbor pair of a node for a local coefficient, or \
                      count closed paths of length two for the global coefficient.",
        after_help = "EXAMPLES:\n    # Local coefficient of node 2\n    netsci clustering --fixture clustering-local --node 2\n\n    # Global coefficient and every node's local value\n    netsci clustering --fixture clustering-demo --global"
    )]
    Clustering(cmd::clustering::ClusteringArgs),

    #[command(
        next_help_heading = "Walks",
        about = "Classify a node sequence as a path or a walk",
        long_about = "Verify that each consecutive pair is adjacent and report whether \
                      any node repeats.",
        after_help = "EXAMPLES:\n    # A walk that revisits B\n    netsci walk --fixture walk-path A,B,D,E,B,C\n\n    # A simple path\n    netsci walk --fixture walk-path A B D E C"
    )]
    Walk(cmd::walk::WalkArgs),

    #[command(
        next_help_heading = "Walks",
        about = "Adjacency matrix powers",
        long_about = "Compute A^k, whose entries count walks of length k, and optionally \
                      list the walks between two nodes.",
        after_help = "EXAMPLES:\n    # Square of the adjacency matrix\n    netsci power --fixture matrix-powers -k 2\n\n    # Walks of length 3 from 0 back to 0\n    netsci power --fixture matrix-powers -k 3 --from 0 --to 0"
    )]
    Power(cmd::power::PowerArgs),

    #[command(
        next_help_heading = "Reference",
        about = "List built-in course graphs",
        after_help = "EXAMPLES:\n    # Names and sizes\n    netsci fixtures\n\n    # With edge lists\n    netsci fixtures --edges"
    )]
    Fixtures(cmd::fixtures::FixturesArgs),

    #[command(
        next_help_heading = "Reference",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Bash\n    netsci completions bash > ~/.local/share/bash-completion/completions/netsci"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

/// Filter used when `NETSCI_LOG` is unset. `--verbose` and `DEBUG` both
/// raise the crate's own spans and events to debug.
const fn default_filter(verbose: bool, debug_env: bool) -> &'static str {
    if verbose || debug_env {
        "netsci=debug,netsci_core=debug,info"
    } else {
        "netsci=info,warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("NETSCI_LOG").unwrap_or_else(|_| {
        EnvFilter::new(default_filter(verbose, env::var("DEBUG").is_ok()))
    });

    let format = env::var("NETSCI_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_root = env::current_dir()?;
    let flag = output::flag_override(cli.format, cli.json);
    let effective = match config::resolve_config(&project_root, flag) {
        Ok(effective) => effective,
        Err(err) => {
            let mode = flag.map_or(OutputMode::Text, OutputMode::from_resolved);
            output::render_error(
                mode,
                &CliError::from_code(ErrorCode::ConfigParseError, format!("{err:#}")),
            )?;
            return Err(err);
        }
    };
    let output = OutputMode::from_resolved(&effective.resolved_output);
    debug!(output = output.name(), "output mode resolved");

    match cli.command {
        Commands::Bfs(ref args) => cmd::bfs::run_bfs(args, output, &effective.project),
        Commands::Paths(ref args) => cmd::paths::run_paths(args, output),
        Commands::Betweenness(ref args) => cmd::betweenness::run_betweenness(args, output),
        Commands::Clustering(ref args) => cmd::clustering::run_clustering(args, output),
        Commands::Walk(ref args) => cmd::walk::run_walk(args, output),
        Commands::Power(ref args) => cmd::power::run_power(args, output, &effective.project),
        Commands::Fixtures(ref args) => cmd::fixtures::run_fixtures(args, output),
        Commands::Completions(args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    }
}
