//! Wall segment extracted from a contiguous run of beams.

use serde::{Deserialize, Serialize};

use crate::core::Point2D;
use crate::core::math::{
    distance_to_line, is_parallel_angle, project_onto_line, relative_angle, segments_intersect,
};

/// A line segment spanning beams `start_beam..=end_beam`.
///
/// Endpoints are the scan points of the two boundary beams. Consecutive
/// lines from one extraction share their boundary beam.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Index of the first beam.
    pub start_beam: usize,
    /// Index of the last beam (always greater than `start_beam`).
    pub end_beam: usize,
    /// Point of the first beam.
    pub start: Point2D,
    /// Point of the last beam.
    pub end: Point2D,
    /// Fraction of covered beams that are not saturated, in [0, 1].
    pub confidence: f64,
}

impl Line {
    /// Create a fully confident line.
    #[inline]
    pub fn new(start_beam: usize, end_beam: usize, start: Point2D, end: Point2D) -> Self {
        Self {
            start_beam,
            end_beam,
            start,
            end,
            confidence: 1.0,
        }
    }

    /// Builder-style setter for the confidence, clamped to [0, 1].
    #[inline]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Direction vector from start to end (not normalized).
    #[inline]
    pub fn direction(&self) -> Point2D {
        self.end - self.start
    }

    /// Length of the segment.
    #[inline]
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    /// Angle of the direction from the X-axis (radians, [-π, π]).
    #[inline]
    pub fn angle(&self) -> f64 {
        let dir = self.direction();
        dir.y.atan2(dir.x)
    }

    /// Number of beams covered, boundaries included.
    #[inline]
    pub fn beam_count(&self) -> usize {
        self.end_beam - self.start_beam + 1
    }

    /// Midpoint of the segment.
    #[inline]
    pub fn midpoint(&self) -> Point2D {
        self.start.midpoint(self.end)
    }

    /// Unsigned angle between this line and another, in [0, π].
    #[inline]
    pub fn relative_angle(&self, other: &Line) -> f64 {
        relative_angle(self.angle(), other.angle())
    }

    /// Check whether two lines are parallel (or anti-parallel) within `tolerance`.
    #[inline]
    pub fn is_parallel_to(&self, other: &Line, tolerance: f64) -> bool {
        is_parallel_angle(self.relative_angle(other), tolerance)
    }

    /// Perpendicular distance from a point to this line's infinite extension.
    #[inline]
    pub fn distance_to_point(&self, point: Point2D) -> f64 {
        distance_to_line(point, self.start, self.end)
    }

    /// Orthogonal projection of a point onto this line's infinite extension.
    #[inline]
    pub fn project(&self, point: Point2D) -> Point2D {
        project_onto_line(point, self.start, self.end)
    }

    /// Check whether the two segments intersect or touch.
    #[inline]
    pub fn intersects(&self, other: &Line) -> bool {
        segments_intersect(self.start, self.end, other.start, other.end)
    }
}
