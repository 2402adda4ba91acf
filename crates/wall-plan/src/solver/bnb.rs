use std::collections::HashMap;
use std::time::Duration;

use fixedbitset::FixedBitSet;
use tracing::{debug, info};
use wall_core::{BrickId, WallError};
use wall_graph::PlacementGraph;

use crate::assignment::{ScheduleStatus, SolveStats, StrideAssignment};
use crate::budget::SearchClock;
use crate::solver::frontier::{addable, compatibility, everything, stride_lower_bound};
use crate::solver::greedy::{grow_stride, stuck, GreedyStrideSolver};
use crate::solver::StrideSolver;

/// Exact depth-first search over maximal strides, warm started by the greedy solver.
///
/// Strides are built in placement order. Some optimal assignment uses only strides that
/// no further brick can join, so each node branches over those maximal strides only.
/// A node is pruned when the strides used so far plus a lower bound for the rest cannot
/// beat the incumbent, or when the same set of placed bricks was already reached with
/// no more strides. Running out of time returns the incumbent as a best-found result.
#[derive(Debug, Clone)]
pub struct BranchAndBoundSolver {
    warm_start: GreedyStrideSolver,
    branch_limit: usize,
}

impl Default for BranchAndBoundSolver {
    fn default() -> Self {
        Self {
            warm_start: GreedyStrideSolver::default(),
            branch_limit: 64,
        }
    }
}

impl BranchAndBoundSolver {
    /// Creates a solver. `branch_limit` caps the maximal strides explored per node; a
    /// search that hits the cap can no longer prove optimality.
    pub fn new(warm_start: GreedyStrideSolver, branch_limit: usize) -> Self {
        Self {
            warm_start,
            branch_limit: branch_limit.max(1),
        }
    }
}

impl StrideSolver for BranchAndBoundSolver {
    fn name(&self) -> &str {
        "branch-and-bound"
    }

    fn solve(&self, graph: &PlacementGraph, budget: Duration) -> Result<StrideAssignment, WallError> {
        let mut clock = SearchClock::start(budget);
        let len = graph.len();
        if len == 0 {
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

        let root_bound = stride_lower_bound(graph, &FixedBitSet::with_capacity(len));
        let greedy = self.warm_start.run(graph, root_bound, &mut clock)?;
        debug!(
            incumbent = greedy.stride_count,
            lower_bound = root_bound,
            "branch and bound warm start"
        );

        let mut search = Search {
            graph,
            clock: &mut clock,
            branch_limit: self.branch_limit,
            best_count: greedy.stride_count,
            best: greedy.strides,
            lower_bound: root_bound,
            path: Vec::new(),
            seen: HashMap::new(),
            rank: (0..len as u32).collect(),
            nodes: greedy.nodes,
            truncated: false,
            aborted: false,
        };
        if search.best_count > root_bound {
            let placed = FixedBitSet::with_capacity(len);
            search.descend(&placed, 0)?;
        }

        let Search {
            best,
            best_count,
            nodes,
            truncated,
            aborted,
            ..
        } = search;
        let proven = best_count <= root_bound || (!aborted && !truncated);
        let status = if proven {
            ScheduleStatus::Optimal
        } else {
            ScheduleStatus::Feasible
        };
        let assignment = StrideAssignment {
            strides: best,
            stride_count: best_count,
            status,
            stats: SolveStats {
                nodes,
                restarts: greedy.passes,
                lower_bound: if proven { best_count } else { root_bound },
                complete: !aborted,
                elapsed_ms: clock.elapsed().as_millis() as u64,
            },
        };
        info!(
            strides = assignment.stride_count,
            status = %assignment.status,
            nodes = assignment.stats.nodes,
            "branch and bound finished"
        );
        Ok(assignment)
    }
}

struct Search<'a> {
    graph: &'a PlacementGraph,
    clock: &'a mut SearchClock,
    branch_limit: usize,
    best_count: usize,
    best: Vec<usize>,
    lower_bound: usize,
    path: Vec<FixedBitSet>,
    seen: HashMap<FixedBitSet, usize>,
    rank: Vec<u32>,
    nodes: u64,
    truncated: bool,
    aborted: bool,
}

impl Search<'_> {
    fn descend(&mut self, placed: &FixedBitSet, depth: usize) -> Result<(), WallError> {
        if self.aborted || self.clock.expired() {
            self.aborted = true;
            return Ok(());
        }
        self.nodes += 1;

        let placed_count = placed.count_ones(..);
        if placed_count == self.graph.len() {
            if depth < self.best_count {
                self.install(depth);
            }
            return Ok(());
        }
        if depth + stride_lower_bound(self.graph, placed) >= self.best_count {
            return Ok(());
        }
        match self.seen.get(placed) {
            Some(&seen_depth) if seen_depth <= depth => return Ok(()),
            _ => {
                self.seen.insert(placed.clone(), depth);
            }
        }

        let mut children = Vec::new();
        let mut enumerator = Enumerator {
            graph: self.graph,
            placed,
            limit: self.branch_limit,
            steps: self.branch_limit.saturating_mul(EXPANSIONS_PER_BRANCH),
            out: &mut children,
            truncated: false,
        };
        enumerator.expand(
            FixedBitSet::with_capacity(self.graph.len()),
            everything(self.graph.len()),
            FixedBitSet::with_capacity(self.graph.len()),
        );
        self.truncated |= enumerator.truncated;
        if children.is_empty() {
            let empty = FixedBitSet::with_capacity(self.graph.len());
            let ready = addable(self.graph, placed, &empty, &everything(self.graph.len()));
            if ready.ones().next().is_none() {
                return Err(stuck(placed_count, self.graph.len()));
            }
            // enumeration ran out of steps before reaching a maximal stride
            self.truncated = true;
            children.push(grow_stride(self.graph, placed, &self.rank));
        }
        children.sort_by(|a, b| {
            b.count_ones(..)
                .cmp(&a.count_ones(..))
                .then_with(|| a.ones().cmp(b.ones()))
        });

        for stride in children {
            let mut next = placed.clone();
            next.union_with(&stride);
            self.path.push(stride);
            self.descend(&next, depth + 1)?;
            self.path.pop();
            if self.aborted || self.best_count <= self.lower_bound {
                break;
            }
        }
        Ok(())
    }

    fn install(&mut self, depth: usize) {
        for (stride_index, stride) in self.path.iter().enumerate() {
            for index in stride.ones() {
                self.best[index] = stride_index;
            }
        }
        self.best_count = depth;
        debug!(strides = depth, nodes = self.nodes, "branch and bound improved incumbent");
    }
}

/// Include/exclude expansions allowed per requested branch before enumeration gives up.
const EXPANSIONS_PER_BRANCH: usize = 256;

/// Enumerates maximal strides on top of a placed set by include/exclude branching.
struct Enumerator<'a> {
    graph: &'a PlacementGraph,
    placed: &'a FixedBitSet,
    limit: usize,
    steps: usize,
    out: &'a mut Vec<FixedBitSet>,
    truncated: bool,
}

impl Enumerator<'_> {
    fn expand(&mut self, stride: FixedBitSet, common: FixedBitSet, excluded: FixedBitSet) {
        if self.out.len() >= self.limit || self.steps == 0 {
            self.truncated = true;
            return;
        }
        self.steps -= 1;
        let candidates = addable(self.graph, self.placed, &stride, &common);
        let mut free = candidates.clone();
        free.difference_with(&excluded);

        let pivot = free
            .ones()
            .max_by_key(|&index| (compatibility(self.graph, index, &candidates), usize::MAX - index));
        let Some(pivot) = pivot else {
            // maximal only if no excluded brick could still join
            if candidates.ones().next().is_none() && stride.ones().next().is_some() {
                self.out.push(stride);
            }
            return;
        };

        let mut with = stride.clone();
        with.insert(pivot);
        let mut narrowed = common.clone();
        narrowed.intersect_with(self.graph.reachable_set(BrickId::from_index(pivot)));
        self.expand(with, narrowed, excluded.clone());

        let mut without = excluded;
        without.insert(pivot);
        self.expand(stride, common, without);
    }
}
