use serde::{Deserialize, Serialize};
use wall_core::{Brick, ErrorInfo, WallError};

/// Work envelope reachable from one base position of the placement machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrideEnvelope {
    /// Maximum vertical extent of a stride in real height units.
    #[serde(default = "default_height")]
    pub height: f64,
    /// Maximum horizontal extent of a stride in real length units.
    #[serde(default = "default_width")]
    pub width: f64,
}

fn default_height() -> f64 {
    1300.0
}

fn default_width() -> f64 {
    800.0
}

impl Default for StrideEnvelope {
    fn default() -> Self {
        Self {
            height: default_height(),
            width: default_width(),
        }
    }
}

impl StrideEnvelope {
    /// Creates an envelope, rejecting non-positive or NaN extents.
    pub fn new(height: f64, width: f64) -> Result<Self, WallError> {
        let envelope = Self { height, width };
        envelope.validate()?;
        Ok(envelope)
    }

    /// An envelope large enough to hold any wall.
    pub fn unbounded() -> Self {
        Self {
            height: f64::INFINITY,
            width: f64::INFINITY,
        }
    }

    /// Rejects non-positive or NaN extents.
    pub fn validate(&self) -> Result<(), WallError> {
        if self.height > 0.0 && self.width > 0.0 {
            return Ok(());
        }
        Err(WallError::Config(
            ErrorInfo::new("invalid-envelope", "stride envelope must be positive")
                .with_context("height", self.height)
                .with_context("width", self.width),
        ))
    }

    /// Returns whether the tightest box around both bricks fits within the envelope.
    pub fn fits(&self, brick: &Brick, other: &Brick) -> bool {
        let vertical = brick.real_top_y.max(other.real_top_y)
            - brick.real_bottom_y.min(other.real_bottom_y);
        let horizontal = brick.real_right_x.max(other.real_right_x)
            - brick.real_left_x.min(other.real_left_x);
        vertical <= self.height && horizontal as f64 <= self.width
    }
}

/// Returns whether the real x ranges of the two bricks intersect (closed intervals).
pub fn real_x_overlap(brick: &Brick, other: &Brick) -> bool {
    brick.real_left_x.max(other.real_left_x) <= brick.real_right_x.min(other.real_right_x)
}

/// Returns whether `lower` sits in the course directly beneath `upper` and bears part of
/// its load.
pub fn supports(lower: &Brick, upper: &Brick) -> bool {
    lower.course_no + 1 == upper.course_no && real_x_overlap(upper, lower)
}
