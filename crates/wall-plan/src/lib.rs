#![deny(missing_docs)]

//! Stride scheduling and placement execution.
//!
//! A [`StrideSolver`] partitions the bricks of a [`wall_graph::PlacementGraph`] into
//! strides so that supports never come later than what they carry and all bricks of a
//! stride fit one envelope. [`schedule`] validates the assignment and linearizes each
//! stride; [`PlacementState::apply`] then walks the resulting [`PlacementOrder`] one
//! brick at a time.

mod assignment;
pub mod budget;
mod execute;
mod order;
pub mod seed;
pub mod solver;

pub use assignment::{validate_assignment, ScheduleStatus, SolveStats, StrideAssignment};
pub use budget::SearchClock;
pub use execute::{PlacementCursor, PlacementEvent, PlacementState};
pub use order::{canonical_order_hash, schedule, unstrided_order, PlacementOrder, Schedule};
pub use seed::derive_restart_seed;
pub use solver::{
    BranchAndBoundSolver, GreedyStrideSolver, SolverKind, SolverOptions, StrideSolver,
};
