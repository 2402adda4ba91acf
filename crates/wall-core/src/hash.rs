use sha2::{Digest, Sha256};

use crate::dims::BrickDimensions;
use crate::layout::BrickLayout;

/// Computes the canonical structural hash for the provided layout.
///
/// The hash covers the dimensions and every brick's course and relative edges, so two
/// layouts hash equal exactly when they describe the same wall.
pub fn canonical_layout_hash(layout: &BrickLayout) -> String {
    let mut hasher = Sha256::new();
    encode_dims(layout.dims(), &mut hasher);
    hasher.update((layout.course_count() as u64).to_le_bytes());
    for course_no in 0..layout.course_count() {
        let course = layout.course(course_no).unwrap_or_default();
        hasher.update((course.len() as u64).to_le_bytes());
        for brick in course {
            hasher.update(brick.relative_left_x.to_bits().to_le_bytes());
            hasher.update(brick.relative_right_x.to_bits().to_le_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}

fn encode_dims(dims: &BrickDimensions, hasher: &mut Sha256) {
    hasher.update(b"dims");
    hasher.update(dims.stretcher_length.to_le_bytes());
    hasher.update(dims.header_length.to_le_bytes());
    hasher.update(dims.head_joint_width.to_le_bytes());
    hasher.update(dims.brick_height.to_bits().to_le_bytes());
    hasher.update(dims.bed_joint_height.to_bits().to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_tracks_geometry() {
        let dims = BrickDimensions::default();
        let a = BrickLayout::from_head_joints(&[vec![1.0]], 2.0, dims).unwrap();
        let b = BrickLayout::from_head_joints(&[vec![1.0]], 2.0, dims).unwrap();
        let c = BrickLayout::from_head_joints(&[vec![0.5]], 2.0, dims).unwrap();
        assert_eq!(canonical_layout_hash(&a), canonical_layout_hash(&b));
        assert_ne!(canonical_layout_hash(&a), canonical_layout_hash(&c));
    }
}
