#![deny(missing_docs)]

//! Support/reachability graph over a brick layout and the topological sequencer.
//!
//! [`PlacementGraph::build`] derives, for every brick, the bricks directly beneath it
//! that carry its load and the bricks that fit into one stride envelope with it.
//! [`Sequencer`] linearizes any subset of bricks so supports come first.

mod envelope;
mod graph;
mod sequence;

pub use envelope::{real_x_overlap, supports, StrideEnvelope};
pub use graph::{GraphStats, PlacementGraph};
pub use sequence::{HomePosition, Sequencer};

/// Re-export of the bitset type used for reachability rows.
pub use fixedbitset::FixedBitSet;
