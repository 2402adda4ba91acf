use std::ops::{Index, Range};

use crate::brick::{Brick, BrickId};
use crate::dims::{float_eq, BrickDimensions, POSITION_EPSILON};
use crate::errors::{ErrorInfo, WallError};

/// A relative `(left, right)` span of one brick within its course.
pub type CourseSpan = (f64, f64);

/// Immutable brick layout of a wall: courses bottom to top, bricks left to right.
///
/// Bricks are stored in one flat array addressed by [`BrickId`]. Construction validates
/// that every course is a contiguous, non-overlapping, left-to-right run of bricks.
#[derive(Debug, Clone, PartialEq)]
pub struct BrickLayout {
    dims: BrickDimensions,
    width: f64,
    bricks: Vec<Brick>,
    courses: Vec<Range<usize>>,
}

impl BrickLayout {
    /// Builds a layout from explicit brick spans per course.
    pub fn from_courses(courses: &[Vec<CourseSpan>], dims: BrickDimensions) -> Result<Self, WallError> {
        dims.validate()?;
        let mut bricks = Vec::new();
        let mut ranges = Vec::with_capacity(courses.len());
        let mut width: f64 = 0.0;

        for (course_no, spans) in courses.iter().enumerate() {
            let course_no = course_no as u32;
            if spans.is_empty() {
                return Err(WallError::Layout(
                    ErrorInfo::new("empty-course", "course contains no bricks")
                        .with_context("course", course_no),
                ));
            }
            let start = bricks.len();
            let mut previous: Option<CourseSpan> = None;
            for (position, &(left, right)) in spans.iter().enumerate() {
                validate_span(course_no, position, left, right)?;
                if let Some((_, prev_right)) = previous {
                    check_contiguous(course_no, position, prev_right, left)?;
                }
                let brick = Brick::new(course_no, left, right, &dims);
                check_real_span(&brick, position)?;
                bricks.push(brick);
                previous = Some((left, right));
            }
            if let Some((_, right)) = previous {
                width = width.max(right);
            }
            ranges.push(start..bricks.len());
        }

        if bricks.len() > u32::MAX as usize {
            return Err(WallError::Layout(
                ErrorInfo::new("too-many-bricks", "layout exceeds the brick id space")
                    .with_context("bricks", bricks.len()),
            ));
        }

        Ok(Self {
            dims,
            width,
            bricks,
            courses: ranges,
        })
    }

    /// Builds a layout from head-joint positions per course and the overall wall width.
    ///
    /// Each course runs from `0.0` to `width`; the joints split it into bricks. Joints
    /// must be strictly increasing and lie strictly inside `(0, width)`.
    pub fn from_head_joints(
        joints: &[Vec<f64>],
        width: f64,
        dims: BrickDimensions,
    ) -> Result<Self, WallError> {
        if !width.is_finite() || width <= POSITION_EPSILON {
            return Err(WallError::Layout(
                ErrorInfo::new("invalid-width", "wall width must be positive")
                    .with_context("width", width),
            ));
        }
        let mut courses = Vec::with_capacity(joints.len());
        for (course_no, course_joints) in joints.iter().enumerate() {
            let mut spans = Vec::with_capacity(course_joints.len() + 1);
            let mut left = 0.0;
            for (position, &joint) in course_joints.iter().enumerate() {
                if !joint.is_finite()
                    || joint <= POSITION_EPSILON
                    || joint >= width - POSITION_EPSILON
                {
                    return Err(WallError::Layout(
                        ErrorInfo::new("joint-out-of-range", "head joint lies outside the wall")
                            .with_context("course", course_no)
                            .with_context("position", position)
                            .with_context("joint", joint)
                            .with_context("width", width),
                    ));
                }
                spans.push((left, joint));
                left = joint;
            }
            spans.push((left, width));
            courses.push(spans);
        }
        Self::from_courses(&courses, dims)
    }

    /// Dimensions used to derive real-world coordinates.
    pub fn dims(&self) -> &BrickDimensions {
        &self.dims
    }

    /// Widest course end in relative units.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Number of bricks in the layout.
    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    /// Returns whether the layout has no bricks.
    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// Number of courses.
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// All bricks, bottom course first.
    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    /// Iterates over all brick ids in storage order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = BrickId> + '_ {
        (0..self.bricks.len()).map(BrickId::from_index)
    }

    /// Returns the brick with the given id, if it belongs to this layout.
    pub fn get(&self, id: BrickId) -> Option<&Brick> {
        self.bricks.get(id.index())
    }

    /// Returns the brick with the given id or a layout error.
    pub fn brick(&self, id: BrickId) -> Result<&Brick, WallError> {
        self.get(id).ok_or_else(|| unknown_brick(id, self.bricks.len()))
    }

    /// Bricks of one course, left to right.
    pub fn course(&self, course_no: usize) -> Option<&[Brick]> {
        self.courses
            .get(course_no)
            .map(|range| &self.bricks[range.clone()])
    }

    /// Ids of one course, left to right.
    pub fn course_ids(&self, course_no: usize) -> impl Iterator<Item = BrickId> + '_ {
        self.courses
            .get(course_no)
            .cloned()
            .unwrap_or(0..0)
            .map(BrickId::from_index)
    }

    /// Relative spans of every course, the inverse of [`BrickLayout::from_courses`].
    pub fn course_spans(&self) -> Vec<Vec<CourseSpan>> {
        self.courses
            .iter()
            .map(|range| {
                self.bricks[range.clone()]
                    .iter()
                    .map(|brick| (brick.relative_left_x, brick.relative_right_x))
                    .collect()
            })
            .collect()
    }
}

impl Index<BrickId> for BrickLayout {
    type Output = Brick;

    fn index(&self, id: BrickId) -> &Brick {
        &self.bricks[id.index()]
    }
}

/// Error returned when an id does not address a brick of the layout.
pub fn unknown_brick(id: BrickId, len: usize) -> WallError {
    WallError::Layout(
        ErrorInfo::new("unknown-brick", "brick id is not part of the layout")
            .with_context("brick", id.as_raw())
            .with_context("bricks", len),
    )
}

/// A brick shorter than its head joint has no real extent left.
fn check_real_span(brick: &Brick, position: usize) -> Result<(), WallError> {
    if brick.real_right_x >= brick.real_left_x {
        return Ok(());
    }
    Err(WallError::Layout(
        ErrorInfo::new("degenerate-brick", "brick is shorter than a head joint")
            .with_context("course", brick.course_no)
            .with_context("position", position)
            .with_context("real_left_x", brick.real_left_x)
            .with_context("real_right_x", brick.real_right_x)
            .with_hint("relative lengths must exceed head_joint_width / unit length"),
    ))
}

fn validate_span(course_no: u32, position: usize, left: f64, right: f64) -> Result<(), WallError> {
    if !left.is_finite() || !right.is_finite() || right - left <= POSITION_EPSILON {
        return Err(WallError::Layout(
            ErrorInfo::new("degenerate-brick", "brick must have left < right")
                .with_context("course", course_no)
                .with_context("position", position)
                .with_context("left", left)
                .with_context("right", right),
        ));
    }
    Ok(())
}

fn check_contiguous(
    course_no: u32,
    position: usize,
    prev_right: f64,
    left: f64,
) -> Result<(), WallError> {
    if float_eq(prev_right, left) {
        return Ok(());
    }
    let (code, message) = if left < prev_right {
        ("misordered-course", "brick overlaps or precedes its left neighbour")
    } else {
        ("non-contiguous", "gap between neighbouring bricks")
    };
    Err(WallError::Layout(
        ErrorInfo::new(code, message)
            .with_context("course", course_no)
            .with_context("position", position)
            .with_context("previous_right", prev_right)
            .with_context("left", left),
    ))
}
