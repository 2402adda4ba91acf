use wall_core::BrickId;
use wall_graph::PlacementGraph;
use wall_plan::PlacementOrder;

/// Asserts coverage, cross-stride precedence, in-stride order and envelope fit.
pub fn assert_valid_order(graph: &PlacementGraph, order: &PlacementOrder) {
    order.check_covers(graph.len()).unwrap();
    let mut slot = vec![(usize::MAX, usize::MAX); graph.len()];
    for (stride, bricks) in order.strides().iter().enumerate() {
        for (position, brick) in bricks.iter().enumerate() {
            slot[brick.index()] = (stride, position);
        }
    }
    for id in graph.layout().ids() {
        let (stride, position) = slot[id.index()];
        for dep in graph.dependencies(id) {
            let (dep_stride, dep_position) = slot[dep.index()];
            assert!(dep_stride <= stride, "{dep} is placed after {id}");
            if dep_stride == stride {
                assert!(dep_position < position, "{dep} follows {id} inside stride {stride}");
            }
        }
    }
    for bricks in order.strides() {
        for (offset, a) in bricks.iter().enumerate() {
            for b in &bricks[offset + 1..] {
                assert!(graph.is_reachable(*a, *b), "{a} and {b} share a stride");
            }
        }
    }
}

#[allow(dead_code)]
pub fn sorted(bricks: &[BrickId]) -> Vec<BrickId> {
    let mut bricks = bricks.to_vec();
    bricks.sort();
    bricks
}
