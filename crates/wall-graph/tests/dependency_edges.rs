use wall_bond::stretcher_bond;
use wall_core::{BrickDimensions, BrickId};
use wall_graph::{PlacementGraph, StrideEnvelope};

fn stretcher_graph(envelope: StrideEnvelope) -> PlacementGraph {
    let layout = stretcher_bond(3, 4.5)
        .unwrap()
        .to_layout(BrickDimensions::default())
        .unwrap();
    PlacementGraph::build(layout, envelope).unwrap()
}

fn raw(ids: &[BrickId]) -> Vec<u32> {
    ids.iter().map(|id| id.as_raw()).collect()
}

#[test]
fn bottom_course_has_no_dependencies() {
    let graph = stretcher_graph(StrideEnvelope::default());
    for id in graph.layout().course_ids(0) {
        assert!(graph.dependencies(id).is_empty());
    }
}

#[test]
fn stretcher_over_joint_depends_on_both_neighbours() {
    let graph = stretcher_graph(StrideEnvelope::default());
    let upper = BrickId::from_raw(6);
    let brick = graph.layout()[upper];
    assert_eq!((brick.real_left_x, brick.real_right_x), (220, 430));

    let expected: Vec<u32> = graph
        .layout()
        .course_ids(0)
        .filter(|id| {
            let lower = graph.layout()[*id];
            lower.real_left_x.max(220) <= lower.real_right_x.min(430)
        })
        .map(|id| id.as_raw())
        .collect();
    assert_eq!(expected, vec![1, 2]);
    assert_eq!(raw(graph.dependencies(upper)), expected);
}

#[test]
fn end_bricks_rest_on_their_neighbours() {
    let graph = stretcher_graph(StrideEnvelope::default());
    // course 1 opens with a stretcher spanning the course-0 half bat and first stretcher
    assert_eq!(raw(graph.dependencies(BrickId::from_raw(5))), vec![0, 1]);
    // course 1 closes with a half bat sitting on the last course-0 stretcher
    assert_eq!(raw(graph.dependencies(BrickId::from_raw(9))), vec![4]);
    // course 2 half bat rests on the first course-1 stretcher only
    assert_eq!(raw(graph.dependencies(BrickId::from_raw(10))), vec![5]);
}

#[test]
fn dependents_invert_dependencies() {
    let graph = stretcher_graph(StrideEnvelope::default());
    for id in graph.layout().ids() {
        for dep in graph.dependencies(id) {
            assert!(graph.dependents(*dep).contains(&id));
        }
    }
    assert_eq!(graph.stats().dependency_edges, graph.dependency_edge_count());
    assert_eq!(graph.stats().unsupported, 5);
}
