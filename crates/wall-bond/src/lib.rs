#![deny(missing_docs)]

//! Masonry bond patterns.
//!
//! A bond is described by the centre of every head joint on every course, in relative
//! units where `1.0` is one stretcher plus one head joint. Courses are listed bottom
//! first. [`BondPattern::to_layout`] turns the joints into a validated
//! [`BrickLayout`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wall_core::{float_eq, BrickDimensions, BrickLayout, ErrorInfo, WallError};

/// Supported bond patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bond {
    /// Running bond: stretchers offset by half a brick, half bats at the ends.
    Stretcher,
    /// Alternating stretchers and headers on every course.
    Flemish,
    /// Header courses alternating with stretcher courses.
    Cross,
}

impl Bond {
    /// All bonds, in a stable order.
    pub const ALL: [Bond; 3] = [Bond::Stretcher, Bond::Flemish, Bond::Cross];

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Bond::Stretcher => "stretcher",
            Bond::Flemish => "flemish",
            Bond::Cross => "cross",
        }
    }

    /// A wall width that satisfies this bond's width rule.
    pub fn default_width(&self) -> f64 {
        match self {
            Bond::Stretcher => 3.5,
            Bond::Flemish => 1.5 * 3.0 + 1.25,
            Bond::Cross => 1.5 + 2.0,
        }
    }

    /// Generates the head joints of `courses` courses for a wall `width` wide.
    pub fn pattern(&self, courses: usize, width: f64) -> Result<BondPattern, WallError> {
        match self {
            Bond::Stretcher => stretcher_bond(courses, width),
            Bond::Flemish => flemish_bond(courses, width),
            Bond::Cross => cross_bond(courses, width),
        }
    }
}

impl fmt::Display for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bond {
    type Err = WallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bond::ALL
            .into_iter()
            .find(|bond| bond.as_str() == s)
            .ok_or_else(|| {
                WallError::Config(
                    ErrorInfo::new("unknown-bond", "bond name is not recognised")
                        .with_context("bond", s)
                        .with_hint("expected one of stretcher, flemish, cross"),
                )
            })
    }
}

/// Head-joint positions of every course of a wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondPattern {
    /// Bond that produced the pattern.
    pub bond: Bond,
    /// Wall width in relative units.
    pub width: f64,
    /// Strictly increasing joint positions per course, bottom course first.
    pub courses: Vec<Vec<f64>>,
}

impl BondPattern {
    /// Converts the joints into a validated brick layout.
    pub fn to_layout(&self, dims: BrickDimensions) -> Result<BrickLayout, WallError> {
        BrickLayout::from_head_joints(&self.courses, self.width, dims)
    }
}

/// Stretcher bond: even courses start with a half brick, odd courses with a full one.
///
/// The width must be a positive multiple of `0.5`.
pub fn stretcher_bond(courses: usize, width: f64) -> Result<BondPattern, WallError> {
    check_courses(Bond::Stretcher, courses)?;
    if !(width > 0.0 && is_multiple(width, 0.5)) {
        return Err(bad_width(Bond::Stretcher, width, "width must be a multiple of 0.5"));
    }
    let rows = (0..courses)
        .map(|row| {
            let start = if row % 2 == 0 { 0.5 } else { 1.0 };
            fixed_step_joints(start, 1.0, width)
        })
        .collect();
    Ok(BondPattern {
        bond: Bond::Stretcher,
        width,
        courses: rows,
    })
}

/// Flemish bond with three-quarter bats opening the even courses.
///
/// Even courses alternate stretcher and header after the bat; odd courses open with a
/// stretcher and alternate header and stretcher. The width must be `1.25` plus a
/// multiple of `1.5`.
pub fn flemish_bond(courses: usize, width: f64) -> Result<BondPattern, WallError> {
    check_courses(Bond::Flemish, courses)?;
    if !(width >= 1.25 - wall_core::POSITION_EPSILON && is_multiple(width - 1.25, 1.5)) {
        return Err(bad_width(
            Bond::Flemish,
            width,
            "width must be 1.25 plus a multiple of 1.5",
        ));
    }
    let rows = (0..courses)
        .map(|row| {
            let (mut joint, mut next_is_stretcher) =
                if row % 2 == 0 { (0.75, true) } else { (1.0, false) };
            let mut joints = Vec::new();
            while joint < width && !float_eq(joint, width) {
                joints.push(joint);
                joint += if next_is_stretcher { 1.0 } else { 0.5 };
                next_is_stretcher = !next_is_stretcher;
            }
            joints
        })
        .collect();
    Ok(BondPattern {
        bond: Bond::Flemish,
        width,
        courses: rows,
    })
}

/// Cross bond: header courses alternating with stretcher courses opened by a
/// three-quarter bat.
///
/// The width must be `1.5` plus a non-negative whole number.
pub fn cross_bond(courses: usize, width: f64) -> Result<BondPattern, WallError> {
    check_courses(Bond::Cross, courses)?;
    if !(width >= 1.5 - wall_core::POSITION_EPSILON && is_multiple(width - 1.5, 1.0)) {
        return Err(bad_width(
            Bond::Cross,
            width,
            "width must be 1.5 plus a whole number",
        ));
    }
    let rows = (0..courses)
        .map(|row| {
            if row % 2 == 0 {
                fixed_step_joints(0.5, 0.5, width)
            } else {
                fixed_step_joints(0.75, 1.0, width)
            }
        })
        .collect();
    Ok(BondPattern {
        bond: Bond::Cross,
        width,
        courses: rows,
    })
}

fn fixed_step_joints(start: f64, step: f64, width: f64) -> Vec<f64> {
    let mut joints = Vec::new();
    let mut index = 0u32;
    loop {
        let joint = start + step * f64::from(index);
        if joint >= width || float_eq(joint, width) {
            return joints;
        }
        joints.push(joint);
        index += 1;
    }
}

fn is_multiple(value: f64, step: f64) -> bool {
    if !value.is_finite() {
        return false;
    }
    let ratio = value / step;
    float_eq(ratio, ratio.round())
}

fn check_courses(bond: Bond, courses: usize) -> Result<(), WallError> {
    if courses == 0 {
        return Err(WallError::Config(
            ErrorInfo::new("no-courses", "a wall needs at least one course")
                .with_context("bond", bond),
        ));
    }
    Ok(())
}

fn bad_width(bond: Bond, width: f64, hint: &str) -> WallError {
    WallError::Config(
        ErrorInfo::new("invalid-width", "wall width does not fit the bond")
            .with_context("bond", bond)
            .with_context("width", width)
            .with_context("default_width", bond.default_width())
            .with_hint(hint),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for bond in Bond::ALL {
            assert_eq!(bond.as_str().parse::<Bond>().unwrap(), bond);
        }
        assert_eq!("english".parse::<Bond>().unwrap_err().code(), "unknown-bond");
    }

    #[test]
    fn default_widths_are_accepted() {
        for bond in Bond::ALL {
            let pattern = bond.pattern(4, bond.default_width()).unwrap();
            assert_eq!(pattern.courses.len(), 4);
            pattern.to_layout(BrickDimensions::default()).unwrap();
        }
    }
}
