pub mod graph;
pub mod plan;

use std::path::PathBuf;

use clap::Args;
use wall_bond::Bond;
use wall_plan::SolverKind;

/// Wall and scheduling parameters shared by every subcommand. Flags override `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct WallArgs {
    /// YAML file with a full or partial plan configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Bond pattern: stretcher, flemish or cross.
    #[arg(long)]
    pub bond: Option<Bond>,
    /// Number of courses.
    #[arg(long)]
    pub courses: Option<usize>,
    /// Wall width in relative units. Defaults to a width valid for the bond.
    #[arg(long)]
    pub width: Option<f64>,
    /// Stride envelope height in real units.
    #[arg(long)]
    pub stride_height: Option<f64>,
    /// Stride envelope width in real units.
    #[arg(long)]
    pub stride_width: Option<f64>,
    /// Wall-clock budget for the stride solver, in milliseconds.
    #[arg(long)]
    pub time_limit_ms: Option<u64>,
    /// Solver strategy: branch-and-bound or greedy.
    #[arg(long)]
    pub solver: Option<SolverKind>,
    /// Randomized greedy restarts.
    #[arg(long)]
    pub restarts: Option<usize>,
    /// Master seed for greedy restarts.
    #[arg(long)]
    pub seed: Option<u64>,
}
