use std::error::Error;
use std::io::{self, BufRead, Write};

use clap::{Args, ValueEnum};
use serde_json::json;
use tracing::info;
use wall_core::{canonical_layout_hash, BrickLayout};
use wall_graph::PlacementGraph;
use wall_plan::{
    canonical_order_hash, schedule, unstrided_order, PlacementState, Schedule, ScheduleStatus,
    SolveStats,
};

use crate::commands::WallArgs;
use crate::config::PlanConfig;
use crate::render::{render_summary, render_wall};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub wall: WallArgs,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Place one brick per line read from stdin, re-rendering after each.
    #[arg(long)]
    pub interactive: bool,
    /// Ignore the stride envelope and place everything from one position.
    #[arg(long)]
    pub unstrided: bool,
    /// Disable ANSI colours in text output.
    #[arg(long)]
    pub plain: bool,
}

pub fn run(args: &PlanArgs) -> Result<(), Box<dyn Error>> {
    let config = PlanConfig::resolve(&args.wall)?;
    let graph = config.graph()?;
    let planned = plan(&config, &graph, args.unstrided)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Json => write_json_report(&config, &graph, &planned, &mut out),
        OutputFormat::Text if args.interactive => {
            let stdin = io::stdin();
            step_through(graph.layout(), &planned, !args.plain, &mut stdin.lock(), &mut out)
        }
        OutputFormat::Text => write_text(graph.layout(), &planned, !args.plain, &mut out),
    }
}

fn plan(config: &PlanConfig, graph: &PlacementGraph, unstrided: bool) -> Result<Schedule, Box<dyn Error>> {
    if unstrided {
        let order = unstrided_order(graph, &config.sequencer())?;
        info!(bricks = order.len(), "unstrided order ready");
        return Ok(Schedule {
            order,
            status: ScheduleStatus::Feasible,
            stats: SolveStats::default(),
            solver: String::from("unstrided"),
        });
    }
    let solver = config.solver.build();
    Ok(schedule(
        graph,
        solver.as_ref(),
        &config.sequencer(),
        config.time_limit(),
    )?)
}

fn write_text(
    layout: &BrickLayout,
    planned: &Schedule,
    color: bool,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    let mut state = PlacementState::new(layout.len());
    for event in state.apply(&planned.order) {
        event?;
    }
    write!(out, "{}", render_wall(layout, &state, color))?;
    writeln!(
        out,
        "{} strides ({}), {} bricks, solver {}",
        planned.order.stride_count(),
        planned.status,
        planned.order.len(),
        planned.solver
    )?;
    write!(out, "{}", render_summary(planned.order.strides(), color))?;
    Ok(())
}

/// Renders the empty wall, then places one brick per input line until the order is
/// exhausted. End of input stops early.
fn step_through(
    layout: &BrickLayout,
    planned: &Schedule,
    color: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    let mut state = PlacementState::new(layout.len());
    write!(out, "{}", render_wall(layout, &state, color))?;
    let mut line = String::new();
    let mut placed = Vec::new();
    let mut cursor = state.apply(&planned.order);
    while cursor.placed() < planned.order.len() {
        write!(out, "press enter to place the next brick")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        let Some(event) = cursor.place_next()? else {
            break;
        };
        placed.push(event);
        writeln!(
            out,
            "placed {} in stride {} ({}/{})",
            event.brick,
            event.stride,
            event.sequence + 1,
            planned.order.len()
        )?;
        write!(out, "{}", render_wall(layout, cursor.state(), color))?;
    }
    writeln!(out, "{} of {} bricks placed", placed.len(), planned.order.len())?;
    Ok(())
}

fn write_json_report(
    config: &PlanConfig,
    graph: &PlacementGraph,
    planned: &Schedule,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    let layout = graph.layout();
    let strides: Vec<_> = planned
        .order
        .strides()
        .iter()
        .map(|bricks| {
            bricks
                .iter()
                .map(|id| {
                    let brick = &layout[*id];
                    json!({
                        "id": id.as_raw(),
                        "course": brick.course_no,
                        "relative_left_x": brick.relative_left_x,
                        "relative_right_x": brick.relative_right_x,
                        "real_left_x": brick.real_left_x,
                        "real_right_x": brick.real_right_x,
                        "real_bottom_y": brick.real_bottom_y,
                        "real_top_y": brick.real_top_y,
                    })
                })
                .collect::<Vec<_>>()
        })
        .collect();
    let report = json!({
        "bond": config.bond,
        "courses": config.courses,
        "width": config.wall_width(),
        "envelope": config.envelope,
        "layout_hash": canonical_layout_hash(layout),
        "order_hash": canonical_order_hash(&planned.order),
        "solver": planned.solver,
        "status": planned.status,
        "stride_count": planned.order.stride_count(),
        "stats": planned.stats,
        "strides": strides,
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}
