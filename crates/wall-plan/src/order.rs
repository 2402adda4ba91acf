//! Ordered partition of bricks into strides and the scheduling pipeline producing it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;
use wall_core::{unknown_brick, BrickId, ErrorInfo, WallError};
use wall_graph::{PlacementGraph, Sequencer};

use crate::assignment::{validate_assignment, ScheduleStatus, SolveStats};
use crate::solver::StrideSolver;

/// Strides in placement order, each holding its bricks in placement order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementOrder {
    strides: Vec<Vec<BrickId>>,
}

impl PlacementOrder {
    /// Wraps strides, rejecting empty strides and bricks listed more than once.
    ///
    /// Coverage of a particular layout is not checked here; see [`PlacementOrder::check_covers`].
    pub fn new(strides: Vec<Vec<BrickId>>) -> Result<Self, WallError> {
        let mut seen = std::collections::HashSet::new();
        for (stride, bricks) in strides.iter().enumerate() {
            if bricks.is_empty() {
                return Err(WallError::Layout(
                    ErrorInfo::new("empty-stride", "placement order contains an empty stride")
                        .with_context("stride", stride),
                ));
            }
            for brick in bricks {
                if !seen.insert(*brick) {
                    return Err(WallError::Layout(
                        ErrorInfo::new("duplicate-brick", "brick appears twice in placement order")
                            .with_context("brick", brick)
                            .with_context("stride", stride),
                    ));
                }
            }
        }
        Ok(Self { strides })
    }

    /// Strides in placement order.
    pub fn strides(&self) -> &[Vec<BrickId>] {
        &self.strides
    }

    /// Number of strides.
    pub fn stride_count(&self) -> usize {
        self.strides.len()
    }

    /// Total number of bricks.
    pub fn len(&self) -> usize {
        self.strides.iter().map(Vec::len).sum()
    }

    /// Whether the order places nothing.
    pub fn is_empty(&self) -> bool {
        self.strides.is_empty()
    }

    /// Every brick with its stride index, in placement order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, BrickId)> + '_ {
        self.strides
            .iter()
            .enumerate()
            .flat_map(|(stride, bricks)| bricks.iter().map(move |brick| (stride, *brick)))
    }

    /// Checks that the order places each of `len` bricks exactly once.
    pub fn check_covers(&self, len: usize) -> Result<(), WallError> {
        let mut covered = vec![false; len];
        for (_, brick) in self.iter() {
            match covered.get_mut(brick.index()) {
                Some(flag) => *flag = true,
                None => return Err(unknown_brick(brick, len)),
            }
        }
        if let Some(missing) = covered.iter().position(|flag| !flag) {
            return Err(WallError::Layout(
                ErrorInfo::new("missing-brick", "placement order leaves a brick out")
                    .with_context("brick", BrickId::from_index(missing)),
            ));
        }
        Ok(())
    }
}

/// Computes a stable hash of the order: stride boundaries and brick ids.
pub fn canonical_order_hash(order: &PlacementOrder) -> String {
    let mut hasher = Sha256::new();
    hasher.update((order.stride_count() as u64).to_le_bytes());
    for stride in order.strides() {
        hasher.update((stride.len() as u64).to_le_bytes());
        for brick in stride {
            hasher.update(brick.as_raw().to_le_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}

/// Result of scheduling a wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Linearized strides.
    pub order: PlacementOrder,
    /// Whether the stride count is proven minimal.
    pub status: ScheduleStatus,
    /// Solver counters.
    pub stats: SolveStats,
    /// Name of the solver that produced the assignment.
    pub solver: String,
}

/// Assigns strides with `solver`, re-validates the assignment and linearizes every
/// stride with `sequencer`.
pub fn schedule(
    graph: &PlacementGraph,
    solver: &dyn StrideSolver,
    sequencer: &Sequencer,
    budget: Duration,
) -> Result<Schedule, WallError> {
    let assignment = solver.solve(graph, budget)?;
    validate_assignment(graph, &assignment)?;

    let strides = assignment
        .members()
        .iter()
        .map(|members| sequencer.sequence(graph, members))
        .collect::<Result<Vec<_>, _>>()?;
    let order = PlacementOrder::new(strides)?;
    info!(
        solver = solver.name(),
        bricks = order.len(),
        strides = order.stride_count(),
        status = %assignment.status,
        lower_bound = assignment.stats.lower_bound,
        "schedule ready"
    );
    Ok(Schedule {
        order,
        status: assignment.status,
        stats: assignment.stats,
        solver: solver.name().to_string(),
    })
}

/// Places every brick in one stride, ignoring the envelope.
pub fn unstrided_order(
    graph: &PlacementGraph,
    sequencer: &Sequencer,
) -> Result<PlacementOrder, WallError> {
    if graph.is_empty() {
        return Ok(PlacementOrder::default());
    }
    let all = sequencer.sequence_all(graph)?;
    PlacementOrder::new(vec![all])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<BrickId> {
        raw.iter().copied().map(BrickId::from_raw).collect()
    }

    #[test]
    fn duplicates_and_empty_strides_are_rejected() {
        let err = PlacementOrder::new(vec![ids(&[0, 1]), ids(&[1])]).unwrap_err();
        assert_eq!(err.code(), "duplicate-brick");
        let err = PlacementOrder::new(vec![ids(&[0]), Vec::new()]).unwrap_err();
        assert_eq!(err.code(), "empty-stride");
    }

    #[test]
    fn coverage_reports_missing_and_foreign_bricks() {
        let order = PlacementOrder::new(vec![ids(&[0, 2])]).unwrap();
        assert_eq!(order.check_covers(3).unwrap_err().code(), "missing-brick");
        assert_eq!(order.check_covers(2).unwrap_err().code(), "unknown-brick");
        let full = PlacementOrder::new(vec![ids(&[1]), ids(&[0, 2])]).unwrap();
        full.check_covers(3).unwrap();
        assert_eq!(
            full.iter().collect::<Vec<_>>(),
            vec![
                (0, BrickId::from_raw(1)),
                (1, BrickId::from_raw(0)),
                (1, BrickId::from_raw(2))
            ]
        );
    }

    #[test]
    fn hash_distinguishes_stride_boundaries() {
        let one = PlacementOrder::new(vec![ids(&[0, 1])]).unwrap();
        let two = PlacementOrder::new(vec![ids(&[0]), ids(&[1])]).unwrap();
        assert_ne!(canonical_order_hash(&one), canonical_order_hash(&two));
        assert_eq!(canonical_order_hash(&one), canonical_order_hash(&one.clone()));
    }
}
