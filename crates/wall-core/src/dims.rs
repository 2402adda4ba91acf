//! Physical brick and joint dimensions used to derive real-world coordinates.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, WallError};

/// Absolute tolerance used when comparing relative positions.
pub const POSITION_EPSILON: f64 = 1e-6;

/// Returns whether two relative positions are equal within [`POSITION_EPSILON`].
pub fn float_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < POSITION_EPSILON
}

/// Brick and mortar measurements in real length/height units (millimetres by default).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrickDimensions {
    /// Length of a full stretcher.
    #[serde(default = "default_stretcher_length")]
    pub stretcher_length: i64,
    /// Length of a header.
    #[serde(default = "default_header_length")]
    pub header_length: i64,
    /// Width of the vertical mortar joint between neighbouring bricks of a course.
    #[serde(default = "default_head_joint")]
    pub head_joint_width: i64,
    /// Height of a single brick.
    #[serde(default = "default_brick_height")]
    pub brick_height: f64,
    /// Height of the horizontal mortar joint between courses.
    #[serde(default = "default_bed_joint")]
    pub bed_joint_height: f64,
}

fn default_stretcher_length() -> i64 {
    210
}

fn default_header_length() -> i64 {
    100
}

fn default_head_joint() -> i64 {
    10
}

fn default_brick_height() -> f64 {
    50.0
}

fn default_bed_joint() -> f64 {
    12.5
}

impl Default for BrickDimensions {
    fn default() -> Self {
        Self {
            stretcher_length: default_stretcher_length(),
            header_length: default_header_length(),
            head_joint_width: default_head_joint(),
            brick_height: default_brick_height(),
            bed_joint_height: default_bed_joint(),
        }
    }
}

impl BrickDimensions {
    /// Real length of one relative unit: a stretcher plus its trailing head joint.
    pub fn unit_length(&self) -> i64 {
        self.stretcher_length + self.head_joint_width
    }

    /// Vertical pitch between two courses.
    pub fn course_height(&self) -> f64 {
        self.brick_height + self.bed_joint_height
    }

    /// Converts a relative left edge into real units.
    pub fn real_left_x(&self, relative: f64) -> i64 {
        (relative * self.unit_length() as f64).round() as i64
    }

    /// Converts a relative right edge into real units, excluding the trailing head joint.
    pub fn real_right_x(&self, relative: f64) -> i64 {
        self.real_left_x(relative) - self.head_joint_width
    }

    /// Bottom edge of the given course.
    pub fn real_bottom_y(&self, course_no: u32) -> f64 {
        f64::from(course_no) * self.course_height()
    }

    /// Top edge of the given course.
    pub fn real_top_y(&self, course_no: u32) -> f64 {
        self.real_bottom_y(course_no) + self.brick_height
    }

    /// Rejects dimensions that cannot describe a wall.
    pub fn validate(&self) -> Result<(), WallError> {
        let lengths_ok = self.stretcher_length > 0
            && self.header_length > 0
            && self.head_joint_width >= 0
            && self.header_length < self.stretcher_length;
        let heights_ok = self.brick_height.is_finite()
            && self.brick_height > 0.0
            && self.bed_joint_height.is_finite()
            && self.bed_joint_height >= 0.0;
        if lengths_ok && heights_ok {
            Ok(())
        } else {
            Err(WallError::Config(
                ErrorInfo::new("invalid-dimensions", "brick dimensions are not physical")
                    .with_context("stretcher_length", self.stretcher_length)
                    .with_context("header_length", self.header_length)
                    .with_context("head_joint_width", self.head_joint_width)
                    .with_context("brick_height", self.brick_height)
                    .with_context("bed_joint_height", self.bed_joint_height),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_x_excludes_trailing_head_joint() {
        let dims = BrickDimensions::default();
        assert_eq!(dims.real_left_x(1.0), 220);
        assert_eq!(dims.real_right_x(2.0), 430);
        assert_eq!(dims.real_right_x(1.5), 320);
        assert_eq!(dims.real_right_x(1.25), 265);
        assert_eq!(dims.real_left_x(0.0), 0);
        assert_eq!(dims.real_right_x(1.0), 210);
    }

    #[test]
    fn courses_stack_with_bed_joints() {
        let dims = BrickDimensions::default();
        assert_eq!(dims.real_bottom_y(0), 0.0);
        assert_eq!(dims.real_top_y(0), 50.0);
        assert_eq!(dims.real_bottom_y(2), 125.0);
        assert_eq!(dims.real_top_y(2), 175.0);
    }

    #[test]
    fn rejects_zero_height() {
        let dims = BrickDimensions {
            brick_height: 0.0,
            ..BrickDimensions::default()
        };
        let err = dims.validate().unwrap_err();
        assert_eq!(err.code(), "invalid-dimensions");
    }
}
