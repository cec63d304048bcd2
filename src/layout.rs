//! Feature vector layout.
//!
//! The capture side concatenates flattened holistic landmarks in a fixed
//! segment order: left hand, right hand, pose, face, three coordinates per
//! landmark. Missing segments are zero-filled at capture time, so every frame
//! carries the full width.

/// Coordinates per landmark (x, y, z).
pub const COORDS_PER_LANDMARK: usize = 3;

/// Segment widths of one feature vector, in concatenation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureLayout {
    pub left_hand: usize,
    pub right_hand: usize,
    pub pose: usize,
    pub face: usize,
}

impl FeatureLayout {
    /// Layout produced by the holistic capture pipeline:
    /// 21 landmarks per hand, 33 pose, 468 face.
    pub fn holistic() -> Self {
        Self {
            left_hand: 21 * COORDS_PER_LANDMARK,
            right_hand: 21 * COORDS_PER_LANDMARK,
            pose: 33 * COORDS_PER_LANDMARK,
            face: 468 * COORDS_PER_LANDMARK,
        }
    }

    /// Total feature dimensionality D.
    pub fn total_dim(&self) -> usize {
        self.left_hand + self.right_hand + self.pose + self.face
    }
}

impl Default for FeatureLayout {
    fn default() -> Self {
        Self::holistic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holistic_dim() {
        assert_eq!(FeatureLayout::holistic().total_dim(), 1629);
    }
}
