use serde::{Deserialize, Serialize};
use wall_core::{unknown_brick, BrickId, ErrorInfo, WallError};

use crate::graph::PlacementGraph;

/// Fixed home position of the placement head, in real-world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HomePosition {
    /// Horizontal coordinate.
    #[serde(default)]
    pub x: f64,
    /// Vertical coordinate.
    #[serde(default)]
    pub y: f64,
}

impl HomePosition {
    /// Creates a home position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Topological sequencer producing a single placement order.
///
/// Among all bricks whose in-set dependencies are already sequenced, the one whose
/// midpoint is closest to the home position goes next; ties keep input order. The home
/// position stays fixed while sequencing, it does not follow the virtual head.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequencer {
    home: HomePosition,
}

impl Sequencer {
    /// Creates a sequencer preferring bricks close to `home`.
    pub fn new(home: HomePosition) -> Self {
        Self { home }
    }

    /// Home position used for tie breaking.
    pub fn home(&self) -> HomePosition {
        self.home
    }

    /// Orders every brick of the graph.
    pub fn sequence_all(&self, graph: &PlacementGraph) -> Result<Vec<BrickId>, WallError> {
        let all: Vec<BrickId> = graph.layout().ids().collect();
        self.sequence(graph, &all)
    }

    /// Orders `subset` so every brick follows its dependencies inside the subset.
    ///
    /// Dependencies outside the subset are ignored. Fails with [`WallError::Cycle`] when
    /// bricks remain but none of them is ready.
    pub fn sequence(
        &self,
        graph: &PlacementGraph,
        subset: &[BrickId],
    ) -> Result<Vec<BrickId>, WallError> {
        let len = graph.len();
        let mut slot: Vec<Option<usize>> = vec![None; len];
        for (position, id) in subset.iter().enumerate() {
            if id.index() >= len {
                return Err(unknown_brick(*id, len));
            }
            if slot[id.index()].replace(position).is_some() {
                return Err(WallError::Layout(
                    ErrorInfo::new("duplicate-brick", "brick listed twice in sequencer input")
                        .with_context("brick", id),
                ));
            }
        }

        let mut pending: Vec<usize> = subset
            .iter()
            .map(|id| {
                graph
                    .dependencies(*id)
                    .iter()
                    .filter(|dep| slot[dep.index()].is_some())
                    .count()
            })
            .collect();
        let mut done = vec![false; subset.len()];
        let mut order = Vec::with_capacity(subset.len());

        while order.len() < subset.len() {
            let mut best: Option<(f64, usize)> = None;
            for (position, id) in subset.iter().enumerate() {
                if done[position] || pending[position] > 0 {
                    continue;
                }
                let distance = self.sq_distance(graph, *id);
                let closer = match best {
                    None => true,
                    Some((best_distance, _)) => distance < best_distance,
                };
                if closer {
                    best = Some((distance, position));
                }
            }

            let Some((_, position)) = best else {
                return Err(WallError::Cycle(
                    ErrorInfo::new(
                        "cyclic-dependency",
                        "no brick is ready but some remain unsequenced",
                    )
                    .with_context("sequenced", order.len())
                    .with_context("remaining", subset.len() - order.len())
                    .with_hint("dependency data is malformed; support edges must point to a lower course"),
                ));
            };

            let id = subset[position];
            done[position] = true;
            order.push(id);
            for dependent in graph.dependents(id) {
                if let Some(dependent_position) = slot[dependent.index()] {
                    pending[dependent_position] -= 1;
                }
            }
        }

        Ok(order)
    }

    fn sq_distance(&self, graph: &PlacementGraph, id: BrickId) -> f64 {
        let (mid_x, mid_y) = graph.layout()[id].midpoint();
        (mid_x - self.home.x).powi(2) + (mid_y - self.home.y).powi(2)
    }
}
