//! rackmap CLI - device-tree addressing and rack macro mapping from the command line.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rackmap_config::EngineConfig;
use tracing_subscriber::EnvFilter;

use commands::common::Context;

#[derive(Parser)]
#[command(name = "rackmap")]
#[command(author, version, about = "Rack macro mapping engine CLI", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/rackmap/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Set to load: factory name, user set name or path
    #[arg(long, global = true)]
    set: Option<String>,

    /// Pretty-print JSON responses
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one tool call and print the response
    Call(commands::call::CallArgs),

    /// Answer JSON-line requests on stdin
    Serve(commands::serve::ServeArgs),

    /// Print the device tree of the loaded set
    Tree(commands::tree::TreeArgs),

    /// List, show and export sets
    Sets(commands::sets::SetsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = EngineConfig::discover(cli.config.as_deref());
    let level = config
        .as_ref()
        .map_or("info", |c| c.logging.level.as_str())
        .to_string();

    // Logs go to stderr; stdout carries responses.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
    tracing_log::LogTracer::init().ok();

    let ctx = Context::new(config?, cli.set, cli.pretty);

    match cli.command {
        Commands::Call(args) => commands::call::run(args, &ctx),
        Commands::Serve(args) => commands::serve::run(args, &ctx),
        Commands::Tree(args) => commands::tree::run(args, &ctx),
        Commands::Sets(args) => commands::sets::run(args),
    }
}
