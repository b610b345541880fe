//! Corridor branch descriptor.

use serde::{Deserialize, Serialize};

use crate::core::Point2D;

/// An opening between two wall corners leading into another corridor or room.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntersectionBranch {
    /// Midpoint of the opening.
    pub entry: Point2D,
    /// `min(1, measured_depth / min_depth)`.
    pub confidence: f64,
    /// Free space observed beyond the entry (meters).
    pub measured_depth: f64,
    /// The two corners bounding the opening.
    pub corners: [Point2D; 2],
    /// Cleared by trackers when the branch stops being observed.
    pub visible: bool,
}

impl IntersectionBranch {
    /// Width of the opening (distance between the corners).
    #[inline]
    pub fn width(&self) -> f64 {
        self.corners[0].distance(self.corners[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width() {
        let branch = IntersectionBranch {
            entry: Point2D::new(0.6, 2.5),
            confidence: 1.0,
            measured_depth: 0.6,
            corners: [Point2D::new(0.6, 2.0), Point2D::new(0.6, 3.0)],
            visible: true,
        };
        assert_eq!(branch.width(), 1.0);
    }
}
