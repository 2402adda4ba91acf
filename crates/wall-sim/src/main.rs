use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    graph::{self, GraphArgs},
    plan::{self, PlanArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;

#[derive(Parser, Debug)]
#[command(name = "wall-sim", about = "Brick wall placement planner")]
struct Cli {
    /// Log filter such as `debug` or `wall_plan=trace`. Falls back to RUST_LOG, then `info`.
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a wall, schedule its strides and render the placement.
    Plan(PlanArgs),
    /// Report the support and reachability relations of a wall as JSON.
    Graph(GraphArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;
    match cli.command {
        Command::Plan(args) => plan::run(&args),
        Command::Graph(args) => graph::run(&args),
    }
}

fn init_tracing(level: Option<&str>) -> Result<(), Box<dyn Error>> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
