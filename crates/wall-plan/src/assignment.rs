use std::fmt;

use serde::{Deserialize, Serialize};
use wall_core::{BrickId, ErrorInfo, WallError};
use wall_graph::PlacementGraph;

/// Whether a stride assignment is proven minimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleStatus {
    /// No assignment with fewer strides exists.
    Optimal,
    /// Best assignment found before the search stopped; fewer strides may exist.
    Feasible,
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleStatus::Optimal => write!(f, "optimal"),
            ScheduleStatus::Feasible => write!(f, "best found"),
        }
    }
}

/// Counters reported by a solver run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveStats {
    /// Search nodes visited (strides grown for greedy runs).
    pub nodes: u64,
    /// Greedy passes performed, including the first.
    pub restarts: usize,
    /// Proven lower bound on the stride count.
    pub lower_bound: usize,
    /// Whether the search ran to completion rather than hitting a limit.
    pub complete: bool,
    /// Wall-clock time spent, in milliseconds.
    pub elapsed_ms: u64,
}

/// Stride index per brick, as produced by a solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrideAssignment {
    /// `strides[i]` is the stride of the brick with index `i`.
    pub strides: Vec<usize>,
    /// Number of strides used.
    pub stride_count: usize,
    /// Optimality status.
    pub status: ScheduleStatus,
    /// Search counters.
    pub stats: SolveStats,
}

impl StrideAssignment {
    /// Stride of one brick.
    pub fn stride_of(&self, id: BrickId) -> Option<usize> {
        self.strides.get(id.index()).copied()
    }

    /// Members of every stride in ascending id order.
    pub fn members(&self) -> Vec<Vec<BrickId>> {
        let mut members = vec![Vec::new(); self.stride_count];
        for (index, &stride) in self.strides.iter().enumerate() {
            if let Some(slot) = members.get_mut(stride) {
                slot.push(BrickId::from_index(index));
            }
        }
        members
    }
}

/// Checks that an assignment covers every brick and satisfies both scheduling
/// constraints: supports never land in a later stride than what they carry, and bricks
/// sharing a stride are pairwise reachable.
pub fn validate_assignment(
    graph: &PlacementGraph,
    assignment: &StrideAssignment,
) -> Result<(), WallError> {
    if assignment.strides.len() != graph.len() {
        let info = invalid("assignment does not cover every brick")
            .with_context("bricks", graph.len())
            .with_context("assigned", assignment.strides.len());
        return Err(WallError::Infeasible(info));
    }
    let mut used = vec![false; assignment.stride_count];
    for (index, &stride) in assignment.strides.iter().enumerate() {
        let Some(flag) = used.get_mut(stride) else {
            let info = invalid("stride index out of range")
                .with_context("brick", index)
                .with_context("stride", stride)
                .with_context("stride_count", assignment.stride_count);
            return Err(WallError::Infeasible(info));
        };
        *flag = true;
    }
    if let Some(empty) = used.iter().position(|flag| !flag) {
        let info = invalid("stride has no bricks").with_context("stride", empty);
        return Err(WallError::Infeasible(info));
    }

    for id in graph.layout().ids() {
        let stride = assignment.strides[id.index()];
        for dep in graph.dependencies(id) {
            let dep_stride = assignment.strides[dep.index()];
            if dep_stride > stride {
                let info = invalid("support is placed after the brick it carries")
                    .with_context("brick", id)
                    .with_context("stride", stride)
                    .with_context("support", dep)
                    .with_context("support_stride", dep_stride);
                return Err(WallError::Infeasible(info));
            }
        }
    }

    for members in assignment.members() {
        for (offset, a) in members.iter().enumerate() {
            for b in &members[offset + 1..] {
                if !graph.is_reachable(*a, *b) {
                    let info = invalid("bricks sharing a stride do not fit one envelope")
                        .with_context("brick", a)
                        .with_context("other", b)
                        .with_context("stride", assignment.strides[a.index()]);
                    return Err(WallError::Infeasible(info));
                }
            }
        }
    }
    Ok(())
}

fn invalid(message: &str) -> ErrorInfo {
    ErrorInfo::new("invalid-assignment", message)
}
