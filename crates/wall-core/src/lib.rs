#![deny(missing_docs)]

//! Brick layout model for the wall planner.
//!
//! A [`BrickLayout`] is the immutable geometric input to dependency analysis and
//! stride scheduling: courses bottom to top, each a contiguous run of [`Brick`]s with
//! relative edges and derived real-world coordinates. All crates of the workspace
//! report failures through [`WallError`].

mod brick;
/// Physical brick and joint measurements.
pub mod dims;
/// Structured error surface shared by every crate.
pub mod errors;
mod hash;
mod layout;
mod serialization;

pub use brick::{Brick, BrickId};
pub use dims::{float_eq, BrickDimensions, POSITION_EPSILON};
pub use errors::{ErrorInfo, WallError};
pub use hash::canonical_layout_hash;
pub use layout::{unknown_brick, BrickLayout, CourseSpan};
pub use serialization::{layout_from_bytes, layout_from_json, layout_to_bytes, layout_to_json};
