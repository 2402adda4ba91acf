use std::error::Error;
use std::io::{self, Write};

use clap::Args;
use serde_json::json;
use wall_core::canonical_layout_hash;

use crate::commands::WallArgs;
use crate::config::PlanConfig;

#[derive(Args, Debug)]
pub struct GraphArgs {
    #[command(flatten)]
    pub wall: WallArgs,
    /// Include every brick's supports and reachable neighbours.
    #[arg(long)]
    pub edges: bool,
}

pub fn run(args: &GraphArgs) -> Result<(), Box<dyn Error>> {
    let config = PlanConfig::resolve(&args.wall)?;
    let stdout = io::stdout();
    write_report(&config, args.edges, &mut stdout.lock())
}

fn write_report(config: &PlanConfig, edges: bool, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    let graph = config.graph()?;
    let mut report = json!({
        "bond": config.bond,
        "courses": config.courses,
        "width": config.wall_width(),
        "envelope": config.envelope,
        "layout_hash": canonical_layout_hash(graph.layout()),
        "stats": graph.stats(),
    });
    if edges {
        let bricks: Vec<_> = graph
            .layout()
            .ids()
            .map(|id| {
                json!({
                    "id": id.as_raw(),
                    "course": graph.layout()[id].course_no,
                    "dependencies": graph.dependencies(id).iter().map(|dep| dep.as_raw()).collect::<Vec<_>>(),
                    "reachable_with": graph.reachable_with(id).map(|other| other.as_raw()).collect::<Vec<_>>(),
                })
            })
            .collect();
        report["bricks"] = json!(bricks);
    }
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}
