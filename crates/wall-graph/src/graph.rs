use fixedbitset::FixedBitSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wall_core::{unknown_brick, BrickId, BrickLayout, ErrorInfo, WallError};

use crate::envelope::{supports, StrideEnvelope};

/// Support and reachability relations over the bricks of one layout.
///
/// Nodes are the layout's [`BrickId`]s; adjacency lives in per-brick tables indexed by
/// id. `dependencies[b]` lists the bricks that must be placed no later than `b`;
/// `reachable[b]` marks every other brick that fits in one stride together with `b`.
#[derive(Debug, Clone)]
pub struct PlacementGraph {
    layout: BrickLayout,
    envelope: Option<StrideEnvelope>,
    dependencies: Vec<Vec<BrickId>>,
    dependents: Vec<Vec<BrickId>>,
    reachable: Vec<FixedBitSet>,
}

impl PlacementGraph {
    /// Derives both relations from the layout geometry.
    ///
    /// This is a pairwise scan, quadratic in the number of bricks. Rows are computed in
    /// parallel and collected in id order.
    pub fn build(layout: BrickLayout, envelope: StrideEnvelope) -> Result<Self, WallError> {
        envelope.validate()?;
        let len = layout.len();
        let rows: Vec<(Vec<BrickId>, FixedBitSet)> = (0..len)
            .into_par_iter()
            .map(|index| {
                let id = BrickId::from_index(index);
                let brick = &layout[id];
                let dependencies = match brick.course_no.checked_sub(1) {
                    Some(below) => layout
                        .course_ids(below as usize)
                        .filter(|other| supports(&layout[*other], brick))
                        .collect(),
                    None => Vec::new(),
                };
                let mut reachable = FixedBitSet::with_capacity(len);
                for (other_index, other) in layout.bricks().iter().enumerate() {
                    if other_index != index && envelope.fits(brick, other) {
                        reachable.insert(other_index);
                    }
                }
                (dependencies, reachable)
            })
            .collect();

        let (dependencies, reachable): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        let graph = Self::assemble(layout, Some(envelope), dependencies, reachable);
        debug!(
            bricks = graph.len(),
            dependency_edges = graph.dependency_edge_count(),
            reachable_pairs = graph.reachable_pair_count(),
            "built placement graph"
        );
        Ok(graph)
    }

    /// Wraps externally computed relations.
    ///
    /// `dependencies` must hold one entry per brick. Reachability pairs are symmetric;
    /// self pairs are dropped. No acyclicity check is made here: consumers detect cycles.
    pub fn from_relations(
        layout: BrickLayout,
        dependencies: Vec<Vec<BrickId>>,
        reachable_pairs: &[(BrickId, BrickId)],
    ) -> Result<Self, WallError> {
        let len = layout.len();
        if dependencies.len() != len {
            return Err(WallError::Layout(
                ErrorInfo::new(
                    "relation-size-mismatch",
                    "dependency table must have one entry per brick",
                )
                .with_context("bricks", len)
                .with_context("entries", dependencies.len()),
            ));
        }
        let mut cleaned = Vec::with_capacity(len);
        for deps in dependencies {
            let mut deps = deps;
            for dep in &deps {
                check_id(*dep, len)?;
            }
            deps.sort();
            deps.dedup();
            cleaned.push(deps);
        }
        let mut reachable = vec![FixedBitSet::with_capacity(len); len];
        for &(a, b) in reachable_pairs {
            check_id(a, len)?;
            check_id(b, len)?;
            if a != b {
                reachable[a.index()].insert(b.index());
                reachable[b.index()].insert(a.index());
            }
        }
        Ok(Self::assemble(layout, None, cleaned, reachable))
    }

    fn assemble(
        layout: BrickLayout,
        envelope: Option<StrideEnvelope>,
        dependencies: Vec<Vec<BrickId>>,
        reachable: Vec<FixedBitSet>,
    ) -> Self {
        let mut dependents = vec![Vec::new(); layout.len()];
        for (index, deps) in dependencies.iter().enumerate() {
            for dep in deps {
                dependents[dep.index()].push(BrickId::from_index(index));
            }
        }
        Self {
            layout,
            envelope,
            dependencies,
            dependents,
            reachable,
        }
    }

    /// Layout the relations were built over.
    pub fn layout(&self) -> &BrickLayout {
        &self.layout
    }

    /// Envelope used to derive reachability, if the graph was built from geometry.
    pub fn envelope(&self) -> Option<&StrideEnvelope> {
        self.envelope.as_ref()
    }

    /// Number of bricks.
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    /// Returns whether the graph has no bricks.
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Bricks that must be placed no later than `id`.
    pub fn dependencies(&self, id: BrickId) -> &[BrickId] {
        &self.dependencies[id.index()]
    }

    /// Bricks that list `id` among their dependencies.
    pub fn dependents(&self, id: BrickId) -> &[BrickId] {
        &self.dependents[id.index()]
    }

    /// Bitset over brick indices of everything reachable together with `id`.
    pub fn reachable_set(&self, id: BrickId) -> &FixedBitSet {
        &self.reachable[id.index()]
    }

    /// Bricks that fit into one stride together with `id`, excluding `id` itself.
    pub fn reachable_with(&self, id: BrickId) -> impl Iterator<Item = BrickId> + '_ {
        self.reachable[id.index()].ones().map(BrickId::from_index)
    }

    /// Returns whether `a` and `b` may share a stride.
    pub fn is_reachable(&self, a: BrickId, b: BrickId) -> bool {
        self.reachable[a.index()].contains(b.index())
    }

    /// Total number of directed support edges.
    pub fn dependency_edge_count(&self) -> usize {
        self.dependencies.iter().map(Vec::len).sum()
    }

    /// Number of unordered reachable pairs.
    pub fn reachable_pair_count(&self) -> usize {
        self.reachable
            .iter()
            .map(|set| set.count_ones(..))
            .sum::<usize>()
            / 2
    }

    /// Summary counts for reporting.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            bricks: self.len(),
            courses: self.layout.course_count(),
            dependency_edges: self.dependency_edge_count(),
            reachable_pairs: self.reachable_pair_count(),
            max_dependencies: self.dependencies.iter().map(Vec::len).max().unwrap_or(0),
            unsupported: self.dependencies.iter().filter(|deps| deps.is_empty()).count(),
        }
    }
}

/// Summary of a [`PlacementGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of bricks.
    pub bricks: usize,
    /// Number of courses.
    pub courses: usize,
    /// Number of directed support edges.
    pub dependency_edges: usize,
    /// Number of unordered reachable pairs.
    pub reachable_pairs: usize,
    /// Largest dependency count of any brick.
    pub max_dependencies: usize,
    /// Bricks with no dependency at all.
    pub unsupported: usize,
}

fn check_id(id: BrickId, len: usize) -> Result<(), WallError> {
    if id.index() < len {
        Ok(())
    } else {
        Err(unknown_brick(id, len))
    }
}
