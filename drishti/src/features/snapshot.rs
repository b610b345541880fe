//! All features extracted from a single scan.

use serde::{Deserialize, Serialize};

use super::{Door, IntersectionBranch, Line};
use crate::core::Point2D;

/// A consistent set of features computed from one scan.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    /// Denoised scan points, one per beam.
    pub points: Vec<Point2D>,
    /// Wall segments ordered by start beam.
    pub lines: Vec<Line>,
    /// Candidate doorways.
    pub doors: Vec<Door>,
    /// Corridor branches.
    pub intersections: Vec<IntersectionBranch>,
    /// Right-angle corners.
    pub right_angles: Vec<Point2D>,
    /// Hallway classification.
    pub in_hallway: bool,
}

impl FeatureSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
            && self.lines.is_empty()
            && self.doors.is_empty()
            && self.intersections.is_empty()
            && self.right_angles.is_empty()
            && !self.in_hallway
    }
}
