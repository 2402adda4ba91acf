//! Stride assignment solvers.
//!
//! Every solver maps a [`PlacementGraph`] to a [`StrideAssignment`] within a wall-clock
//! budget. [`SolverOptions`] selects and configures one from plain data, which is how
//! the CLI and YAML configs pick a solver.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wall_core::{ErrorInfo, WallError};
use wall_graph::PlacementGraph;

use crate::assignment::StrideAssignment;

mod bnb;
pub(crate) mod frontier;
mod greedy;

pub use bnb::BranchAndBoundSolver;
pub use greedy::GreedyStrideSolver;

/// Assigns every brick of a graph to a stride.
pub trait StrideSolver: Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &str;

    /// Produces an assignment satisfying the precedence and reachability constraints.
    ///
    /// Returns [`WallError::Infeasible`] when no assignment was found before `budget`
    /// ran out and [`WallError::Cycle`] when the dependencies cannot be ordered.
    fn solve(&self, graph: &PlacementGraph, budget: Duration) -> Result<StrideAssignment, WallError>;
}

/// Available solver strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolverKind {
    /// Exact search warm started by the greedy solver.
    #[default]
    BranchAndBound,
    /// Greedy stride growing with randomized restarts.
    Greedy,
}

impl SolverKind {
    /// Identifier as used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            SolverKind::BranchAndBound => "branch-and-bound",
            SolverKind::Greedy => "greedy",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolverKind {
    type Err = WallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [SolverKind::BranchAndBound, SolverKind::Greedy]
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                WallError::Config(
                    ErrorInfo::new("unknown-solver", "solver name is not recognised")
                        .with_context("solver", s)
                        .with_hint("expected branch-and-bound or greedy"),
                )
            })
    }
}

fn default_restarts() -> usize {
    8
}

fn default_branch_limit() -> usize {
    64
}

/// Plain-data solver selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Strategy to run.
    #[serde(default)]
    pub kind: SolverKind,
    /// Randomized greedy passes after the first.
    #[serde(default = "default_restarts")]
    pub restarts: usize,
    /// Master seed for restart permutations.
    #[serde(default)]
    pub seed: u64,
    /// Maximal strides explored per branch-and-bound node.
    #[serde(default = "default_branch_limit")]
    pub branch_limit: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            kind: SolverKind::default(),
            restarts: default_restarts(),
            seed: 0,
            branch_limit: default_branch_limit(),
        }
    }
}

impl SolverOptions {
    /// Instantiates the configured solver.
    pub fn build(&self) -> Box<dyn StrideSolver> {
        let greedy = GreedyStrideSolver::new(self.restarts, self.seed);
        match self.kind {
            SolverKind::BranchAndBound => {
                Box::new(BranchAndBoundSolver::new(greedy, self.branch_limit))
            }
            SolverKind::Greedy => Box::new(greedy),
        }
    }
}
