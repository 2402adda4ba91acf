use std::time::Duration;

use fixedbitset::FixedBitSet;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;
use wall_core::{BrickId, ErrorInfo, WallError};
use wall_graph::PlacementGraph;

use crate::assignment::{ScheduleStatus, SolveStats, StrideAssignment};
use crate::budget::SearchClock;
use crate::seed::derive_restart_seed;
use crate::solver::frontier::{addable, best_candidate, everything, stride_lower_bound};
use crate::solver::StrideSolver;

/// Greedy stride growing with optional randomized restarts.
///
/// Each pass builds strides one after another. A stride starts empty and keeps taking
/// the addable brick that is compatible with the most other addable bricks until
/// nothing fits any more. The first pass breaks ties by brick id; restarts break them
/// by a seeded random permutation. The pass with the fewest strides wins.
#[derive(Debug, Clone)]
pub struct GreedyStrideSolver {
    restarts: usize,
    seed: u64,
}

impl Default for GreedyStrideSolver {
    fn default() -> Self {
        Self {
            restarts: 8,
            seed: 0,
        }
    }
}

/// Best greedy result plus the counters needed for reporting.
#[derive(Debug, Clone)]
pub(crate) struct GreedyOutcome {
    pub strides: Vec<usize>,
    pub stride_count: usize,
    pub passes: usize,
    pub nodes: u64,
    pub interrupted: bool,
}

impl GreedyStrideSolver {
    /// Creates a solver running `restarts` randomized passes after the first one.
    pub fn new(restarts: usize, seed: u64) -> Self {
        Self { restarts, seed }
    }

    /// Number of randomized passes after the first.
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    /// Runs the passes against an already started clock.
    ///
    /// Stops early when a pass meets `lower_bound`. Fails only when the first pass
    /// cannot finish before the clock expires.
    pub(crate) fn run(
        &self,
        graph: &PlacementGraph,
        lower_bound: usize,
        clock: &mut SearchClock,
    ) -> Result<GreedyOutcome, WallError> {
        let identity: Vec<u32> = (0..graph.len() as u32).collect();
        let mut nodes = 0u64;
        let Some((strides, stride_count)) = greedy_pass(graph, &identity, clock, &mut nodes)?
        else {
            return Err(budget_exhausted(clock));
        };
        debug!(strides = stride_count, "greedy first pass");
        let mut best = GreedyOutcome {
            strides,
            stride_count,
            passes: 1,
            nodes,
            interrupted: false,
        };

        for restart in 1..=self.restarts {
            if best.stride_count <= lower_bound {
                break;
            }
            let mut rng = StdRng::seed_from_u64(derive_restart_seed(self.seed, restart as u64));
            let mut order: Vec<usize> = (0..graph.len()).collect();
            order.shuffle(&mut rng);
            let mut rank = vec![0u32; graph.len()];
            for (position, index) in order.into_iter().enumerate() {
                rank[index] = position as u32;
            }

            let pass = greedy_pass(graph, &rank, clock, &mut best.nodes)?;
            best.passes += 1;
            match pass {
                Some((strides, stride_count)) if stride_count < best.stride_count => {
                    debug!(restart, strides = stride_count, "greedy restart improved");
                    best.strides = strides;
                    best.stride_count = stride_count;
                }
                Some(_) => {}
                None => {
                    best.interrupted = true;
                    break;
                }
            }
        }
        Ok(best)
    }
}

impl StrideSolver for GreedyStrideSolver {
    fn name(&self) -> &str {
        "greedy"
    }

    fn solve(&self, graph: &PlacementGraph, budget: Duration) -> Result<StrideAssignment, WallError> {
        let mut clock = SearchClock::start(budget);
        if graph.is_empty() {
            return Ok(StrideAssignment {
                strides: Vec::new(),
                stride_count: 0,
                status: ScheduleStatus::Optimal,
                stats: SolveStats {
                    complete: true,
                    ..SolveStats::default()
                },
            });
        }
        let lower_bound = stride_lower_bound(graph, &FixedBitSet::with_capacity(graph.len()));
        let outcome = self.run(graph, lower_bound, &mut clock)?;
        let status = if outcome.stride_count <= lower_bound {
            ScheduleStatus::Optimal
        } else {
            ScheduleStatus::Feasible
        };
        Ok(StrideAssignment {
            strides: outcome.strides,
            stride_count: outcome.stride_count,
            status,
            stats: SolveStats {
                nodes: outcome.nodes,
                restarts: outcome.passes,
                lower_bound,
                complete: !outcome.interrupted,
                elapsed_ms: clock.elapsed().as_millis() as u64,
            },
        })
    }
}

/// One greedy pass. Returns `None` when the clock expires before the pass completes.
fn greedy_pass(
    graph: &PlacementGraph,
    rank: &[u32],
    clock: &mut SearchClock,
    nodes: &mut u64,
) -> Result<Option<(Vec<usize>, usize)>, WallError> {
    let len = graph.len();
    let mut placed = FixedBitSet::with_capacity(len);
    let mut placed_count = 0;
    let mut strides = vec![usize::MAX; len];
    let mut stride_count = 0;

    while placed_count < len {
        if clock.expired_now() {
            return Ok(None);
        }
        *nodes += 1;
        let stride = grow_stride(graph, &placed, rank);
        let size = stride.count_ones(..);
        if size == 0 {
            return Err(stuck(placed_count, len));
        }
        for index in stride.ones() {
            strides[index] = stride_count;
        }
        placed.union_with(&stride);
        placed_count += size;
        stride_count += 1;
    }
    Ok(Some((strides, stride_count)))
}

/// Grows one stride from the frontier of `placed` until no brick can join.
pub(crate) fn grow_stride(graph: &PlacementGraph, placed: &FixedBitSet, rank: &[u32]) -> FixedBitSet {
    let mut stride = FixedBitSet::with_capacity(graph.len());
    let mut common = everything(graph.len());
    loop {
        let candidates = addable(graph, placed, &stride, &common);
        let Some(pick) = best_candidate(graph, &candidates, rank) else {
            return stride;
        };
        stride.insert(pick);
        common.intersect_with(graph.reachable_set(BrickId::from_index(pick)));
    }
}

/// Error for a frontier with unplaced bricks but none ready.
pub(crate) fn stuck(placed: usize, len: usize) -> WallError {
    WallError::Cycle(
        ErrorInfo::new(
            "cyclic-dependency",
            "no unplaced brick has all of its supports placed",
        )
        .with_context("placed", placed)
        .with_context("remaining", len - placed),
    )
}

pub(crate) fn budget_exhausted(clock: &SearchClock) -> WallError {
    WallError::Infeasible(
        ErrorInfo::new(
            "time-budget-exhausted",
            "no feasible stride assignment found within the time budget",
        )
        .with_context("budget_ms", clock.limit().as_millis())
        .with_hint("retry with a larger budget or a larger stride envelope"),
    )
}
