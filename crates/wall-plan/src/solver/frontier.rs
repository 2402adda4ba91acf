//! Stride-growing primitives shared by the solvers.

use fixedbitset::FixedBitSet;
use wall_core::BrickId;
use wall_graph::PlacementGraph;

/// Bricks that may join `stride` next.
///
/// A brick is addable when it is neither placed nor in the stride, every dependency is
/// placed or in the stride, and it is reachable with every stride member (`common` is
/// the intersection of the members' reachability rows, all ones for an empty stride).
pub(crate) fn addable(
    graph: &PlacementGraph,
    placed: &FixedBitSet,
    stride: &FixedBitSet,
    common: &FixedBitSet,
) -> FixedBitSet {
    let mut out = FixedBitSet::with_capacity(graph.len());
    for index in common.ones() {
        if placed.contains(index) || stride.contains(index) {
            continue;
        }
        let ready = graph
            .dependencies(BrickId::from_index(index))
            .iter()
            .all(|dep| placed.contains(dep.index()) || stride.contains(dep.index()));
        if ready {
            out.insert(index);
        }
    }
    out
}

/// Row with every brick set, the `common` set of an empty stride.
pub(crate) fn everything(len: usize) -> FixedBitSet {
    let mut all = FixedBitSet::with_capacity(len);
    all.insert_range(..);
    all
}

/// Number of candidates in `candidates` that are reachable with `index`.
pub(crate) fn compatibility(graph: &PlacementGraph, index: usize, candidates: &FixedBitSet) -> usize {
    graph
        .reachable_set(BrickId::from_index(index))
        .intersection(candidates)
        .count()
}

/// Picks the candidate compatible with the most other candidates; ties go to the lowest
/// rank.
pub(crate) fn best_candidate(
    graph: &PlacementGraph,
    candidates: &FixedBitSet,
    rank: &[u32],
) -> Option<usize> {
    candidates.ones().max_by(|&a, &b| {
        compatibility(graph, a, candidates)
            .cmp(&compatibility(graph, b, candidates))
            .then_with(|| rank[b].cmp(&rank[a]))
    })
}

/// Lower bound on the strides needed for the unplaced bricks.
///
/// Bricks that are pairwise unreachable can never share a stride, so the size of any
/// such set bounds the stride count from below. The set is grown greedily, least
/// connected bricks first.
pub(crate) fn stride_lower_bound(graph: &PlacementGraph, placed: &FixedBitSet) -> usize {
    let mut remaining: Vec<(usize, usize)> = (0..graph.len())
        .filter(|index| !placed.contains(*index))
        .map(|index| {
            let degree = graph
                .reachable_set(BrickId::from_index(index))
                .ones()
                .filter(|other| !placed.contains(*other))
                .count();
            (degree, index)
        })
        .collect();
    remaining.sort_unstable();

    let mut chosen = FixedBitSet::with_capacity(graph.len());
    let mut count = 0;
    for (_, index) in remaining {
        let row = graph.reachable_set(BrickId::from_index(index));
        if row.is_disjoint(&chosen) {
            chosen.insert(index);
            count += 1;
        }
    }
    count
}
