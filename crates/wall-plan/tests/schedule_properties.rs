mod common;

use std::time::Duration;

use common::assert_valid_order;
use proptest::prelude::*;
use wall_bond::Bond;
use wall_core::{BrickDimensions, WallError};
use wall_graph::{HomePosition, PlacementGraph, Sequencer, StrideEnvelope};
use wall_plan::{
    canonical_order_hash, schedule, BranchAndBoundSolver, GreedyStrideSolver, PlacementState,
};

fn width_for(bond: Bond, steps: u32) -> f64 {
    match bond {
        Bond::Stretcher => 0.5 * f64::from(steps + 2),
        Bond::Flemish => 1.25 + 1.5 * f64::from(steps / 2),
        Bond::Cross => 1.5 + f64::from(steps / 2),
    }
}

fn graph_strategy() -> impl Strategy<Value = PlacementGraph> {
    (
        prop::sample::select(Bond::ALL.to_vec()),
        1usize..5,
        0u32..6,
        60.0f64..700.0,
        200.0f64..1100.0,
    )
        .prop_map(|(bond, courses, steps, height, width)| {
            let layout = bond
                .pattern(courses, width_for(bond, steps))
                .unwrap()
                .to_layout(BrickDimensions::default())
                .unwrap();
            PlacementGraph::build(layout, StrideEnvelope::new(height, width).unwrap()).unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn greedy_orders_satisfy_constraints(graph in graph_strategy(), seed in any::<u64>()) {
        let solver = GreedyStrideSolver::new(4, seed);
        let schedule = schedule(&graph, &solver, &Sequencer::default(), Duration::from_secs(5)).unwrap();
        assert_valid_order(&graph, &schedule.order);
        prop_assert_eq!(schedule.order.len(), graph.len());
    }

    #[test]
    fn branch_and_bound_orders_satisfy_constraints(graph in graph_strategy()) {
        let solver = BranchAndBoundSolver::default();
        match schedule(&graph, &solver, &Sequencer::default(), Duration::from_millis(200)) {
            Ok(schedule) => {
                assert_valid_order(&graph, &schedule.order);
                prop_assert!(schedule.order.stride_count() >= schedule.stats.lower_bound);
            }
            Err(WallError::Infeasible(info)) => prop_assert_eq!(info.code, "time-budget-exhausted"),
            Err(other) => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn execution_records_every_stride(graph in graph_strategy()) {
        let solver = GreedyStrideSolver::default();
        let schedule = schedule(&graph, &solver, &Sequencer::default(), Duration::from_secs(5)).unwrap();
        let mut state = PlacementState::new(graph.len());
        let events = state.apply(&schedule.order).collect::<Result<Vec<_>, _>>().unwrap();
        prop_assert_eq!(events.len(), graph.len());
        for event in &events {
            prop_assert_eq!(state.placed_in_stride(event.brick), Some(event.stride));
        }
        prop_assert!(state.is_complete());
    }
}

#[test]
fn replaying_an_order_fails() {
    let layout = Bond::Stretcher
        .pattern(3, 4.5)
        .unwrap()
        .to_layout(BrickDimensions::default())
        .unwrap();
    let graph = PlacementGraph::build(layout, StrideEnvelope::new(130.0, 450.0).unwrap()).unwrap();
    let schedule = schedule(
        &graph,
        &GreedyStrideSolver::default(),
        &Sequencer::default(),
        Duration::from_secs(5),
    )
    .unwrap();

    let mut state = PlacementState::new(graph.len());
    for event in state.apply(&schedule.order) {
        event.unwrap();
    }
    for (stride, bricks) in schedule.order.strides().iter().enumerate() {
        for brick in bricks {
            assert_eq!(state.placed_in_stride(*brick), Some(stride));
        }
    }

    let err = state.apply(&schedule.order).next().unwrap().unwrap_err();
    assert!(matches!(err, WallError::Replay(_)));
    assert_eq!(err.code(), "already-placed");
}

#[test]
fn schedules_are_deterministic() {
    let build = || {
        let layout = Bond::Flemish
            .pattern(4, 5.75)
            .unwrap()
            .to_layout(BrickDimensions::default())
            .unwrap();
        PlacementGraph::build(layout, StrideEnvelope::default()).unwrap()
    };
    let sequencer = Sequencer::new(HomePosition::new(500.0, 0.0));
    let solver = GreedyStrideSolver::new(8, 9);
    let a = schedule(&build(), &solver, &sequencer, Duration::from_secs(5)).unwrap();
    let b = schedule(&build(), &solver, &sequencer, Duration::from_secs(5)).unwrap();
    assert_eq!(canonical_order_hash(&a.order), canonical_order_hash(&b.order));

    let json = serde_json::to_string(&a).unwrap();
    let back: wall_plan::Schedule = serde_json::from_str(&json).unwrap();
    assert_eq!(back.order, a.order);
}
