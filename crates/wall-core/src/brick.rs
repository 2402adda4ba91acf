use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::dims::BrickDimensions;

/// Identifier for a brick within a [`BrickLayout`](crate::BrickLayout).
///
/// Ids are dense indices into the layout's flat brick array, bottom course first and
/// left to right within a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BrickId(u32);

impl BrickId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }

    /// Returns the identifier as an index into per-brick tables.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Creates an identifier from a per-brick table index.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl std::fmt::Display for BrickId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable geometric description of a single brick.
///
/// Equality and hashing use the geometric identity only (course and relative edges), so
/// bricks can key sets and maps independently of any scheduling state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Brick {
    /// Course index, 0 being the bottom course.
    pub course_no: u32,
    /// Left edge in course-relative units.
    pub relative_left_x: f64,
    /// Right edge in course-relative units.
    pub relative_right_x: f64,
    /// Left edge in real length units.
    pub real_left_x: i64,
    /// Right edge in real length units.
    pub real_right_x: i64,
    /// Bottom edge in real height units.
    pub real_bottom_y: f64,
    /// Top edge in real height units.
    pub real_top_y: f64,
}

impl Brick {
    /// Creates a brick and derives its real-world coordinates from `dims`.
    pub fn new(
        course_no: u32,
        relative_left_x: f64,
        relative_right_x: f64,
        dims: &BrickDimensions,
    ) -> Self {
        Self {
            course_no,
            relative_left_x,
            relative_right_x,
            real_left_x: dims.real_left_x(relative_left_x),
            real_right_x: dims.real_right_x(relative_right_x),
            real_bottom_y: dims.real_bottom_y(course_no),
            real_top_y: dims.real_top_y(course_no),
        }
    }

    /// Relative length of the brick (1.0 is a stretcher plus one head joint).
    pub fn relative_length(&self) -> f64 {
        self.relative_right_x - self.relative_left_x
    }

    /// Real-world midpoint of the brick's bounding box.
    pub fn midpoint(&self) -> (f64, f64) {
        (
            (self.real_left_x + self.real_right_x) as f64 / 2.0,
            (self.real_bottom_y + self.real_top_y) / 2.0,
        )
    }

    fn identity(&self) -> (u32, u64, u64) {
        (
            self.course_no,
            self.relative_left_x.to_bits(),
            self.relative_right_x.to_bits(),
        )
    }
}

impl PartialEq for Brick {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Brick {}

impl Hash for Brick {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn identity_ignores_derived_fields() {
        let dims = BrickDimensions::default();
        let a = Brick::new(1, 1.0, 2.0, &dims);
        let mut b = a;
        b.real_top_y += 1.0;
        assert_eq!(a, b);
        let set: HashSet<Brick> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn midpoint_is_box_centre() {
        let brick = Brick::new(0, 1.0, 2.0, &BrickDimensions::default());
        assert_eq!(brick.midpoint(), (325.0, 25.0));
    }
}
