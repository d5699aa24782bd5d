#![forbid(unsafe_code)]

mod cmd;
mod output;

use agtron_core::ErrorCode;
use agtron_core::config;
use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error};
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "agtron: service dependency and availability checks",
    long_about = None
)]
struct Cli {
    /// Log at debug level unless AGTRON_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Manifest to load instead of the configured one.
    #[arg(long, global = true, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Output mode from flags alone, used before config has been resolved.
    fn flag_output_mode(&self) -> OutputMode {
        match self.format {
            Some(mode) => mode,
            None if self.json => OutputMode::Json,
            None => OutputMode::Text,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Validation",
        about = "Validate the manifest",
        long_about = "Load the manifest and check that the dependency graph is acyclic and availability consistent.",
        after_help = "EXAMPLES:\n    # Check agtron.yml in the current directory\n    agt check\n\n    # Check another manifest\n    agt --manifest deploy/services.yml check\n\n    # Emit machine-readable output\n    agt check --json"
    )]
    Check(cmd::check::CheckArgs),

    #[command(
        next_help_heading = "Queries",
        about = "Show how one service depends on another",
        long_about = "Report whether FROM depends on TO, directly or transitively, and list every path of at most 10 services.",
        after_help = "EXAMPLES:\n    # Paths from the frontend to the database\n    agt path web_frontend postgres\n\n    # Emit machine-readable output\n    agt path web_frontend postgres --json"
    )]
    Path(cmd::path::PathArgs),

    #[command(
        next_help_heading = "Queries",
        about = "Recommend availability ranges",
        long_about = "Recommend an availability range for each service from its direct dependencies and dependents.",
        after_help = "EXAMPLES:\n    # Every service in the manifest\n    agt recommend\n\n    # Selected services\n    agt recommend api_gateway user_service\n\n    # Emit machine-readable output\n    agt recommend --json"
    )]
    Recommend(cmd::recommend::RecommendArgs),

    #[command(
        next_help_heading = "Queries",
        about = "Show the dependency graph",
        long_about = "Print a deployment order (dependencies first) or the graph as Graphviz DOT.",
        after_help = "EXAMPLES:\n    # Deployment order\n    agt graph\n\n    # Render with graphviz\n    agt graph --dot | dot -Tsvg > services.svg"
    )]
    Graph(cmd::graph::GraphArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("AGTRON_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "agtron=debug,info"
        } else {
            "agtron=info,warn"
        })
    });

    let format = env::var("AGTRON_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

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

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let effective = match config::resolve_config(
        &project_root,
        cli.manifest.as_deref(),
        cli.format.map(OutputMode::as_str),
        cli.json,
    ) {
        Ok(effective) => effective,
        Err(err) => {
            render_error(
                cli.flag_output_mode(),
                &CliError::coded(ErrorCode::ConfigParseError, format!("{err:#}")),
            )?;
            return Err(err);
        }
    };

    let output = OutputMode::from_resolved(&effective.resolved_output);
    debug!(
        manifest = %effective.manifest_path.display(),
        output = output.as_str(),
        "configuration resolved"
    );

    match cli.command {
        Commands::Check(ref args) => cmd::check::run_check(args, &effective, output),
        Commands::Path(ref args) => cmd::path::run_path(args, &effective, output),
        Commands::Recommend(ref args) => cmd::recommend::run_recommend(args, &effective, output),
        Commands::Graph(ref args) => cmd::graph::run_graph(args, &effective, output),
    }
}
