//! Angle and planar geometry helpers shared by the extractors.
//!
//! All angles are in radians.

use std::f64::consts::PI;

use super::Point2D;
use crate::error::{Error, Result};

/// Two times PI (full circle in radians).
pub const TWO_PI: f64 = 2.0 * PI;

/// Tolerance on segment parameters when testing segment intersection.
///
/// Adjacent lines share an endpoint, so touching segments must count.
const SEGMENT_EPSILON: f64 = 1e-9;

/// Normalize angle to [-π, π).
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = (angle + PI).rem_euclid(TWO_PI);
    a - PI
}

/// Unsigned angle between two directions, in [0, π].
///
/// # Example
/// ```
/// use drishti::core::math::relative_angle;
/// use std::f64::consts::{FRAC_PI_2, PI};
///
/// assert!((relative_angle(0.0, FRAC_PI_2) - FRAC_PI_2).abs() < 1e-12);
/// assert!((relative_angle(0.1, 0.1 + PI) - PI).abs() < 1e-9);
/// ```
#[inline]
pub fn relative_angle(from: f64, to: f64) -> f64 {
    normalize_angle(to - from).abs()
}

/// Check whether a relative angle (in [0, π]) is within `tolerance` of 0 or π.
#[inline]
pub fn is_parallel_angle(relative: f64, tolerance: f64) -> bool {
    relative < tolerance || relative > PI - tolerance
}

/// Intersection point of the two infinite lines through `(a1, a2)` and `(b1, b2)`.
///
/// Fails with [`Error::GeometryDegeneracy`] when the lines are parallel or
/// either one has zero length (zero cross-product denominator).
pub fn infinite_line_intersection(
    a1: Point2D,
    a2: Point2D,
    b1: Point2D,
    b2: Point2D,
) -> Result<Point2D> {
    let da = a2 - a1;
    let db = b2 - b1;
    let denom = da.cross(db);
    if denom.abs() < f64::EPSILON {
        return Err(Error::GeometryDegeneracy("parallel or zero-length lines"));
    }
    let t = (b1 - a1).cross(db) / denom;
    Ok(a1 + da * t)
}

/// Check whether segments `(a1, a2)` and `(b1, b2)` intersect (touching counts).
pub fn segments_intersect(a1: Point2D, a2: Point2D, b1: Point2D, b2: Point2D) -> bool {
    let da = a2 - a1;
    let db = b2 - b1;
    let denom = da.cross(db);
    let offset = b1 - a1;

    if denom.abs() < f64::EPSILON {
        // Parallel: only collinear overlapping segments touch.
        if offset.cross(da).abs() > SEGMENT_EPSILON {
            return false;
        }
        let len_sq = da.dot(da);
        if len_sq < f64::EPSILON {
            return a1.approx_eq(b1, SEGMENT_EPSILON) || a1.approx_eq(b2, SEGMENT_EPSILON);
        }
        let t0 = offset.dot(da) / len_sq;
        let t1 = (b2 - a1).dot(da) / len_sq;
        let (lo, hi) = if t0 < t1 { (t0, t1) } else { (t1, t0) };
        return hi >= -SEGMENT_EPSILON && lo <= 1.0 + SEGMENT_EPSILON;
    }

    let t = offset.cross(db) / denom;
    let u = offset.cross(da) / denom;
    let range = -SEGMENT_EPSILON..=1.0 + SEGMENT_EPSILON;
    range.contains(&t) && range.contains(&u)
}

/// Perpendicular distance from `point` to the infinite line through `a` and `b`.
#[inline]
pub fn distance_to_line(point: Point2D, a: Point2D, b: Point2D) -> f64 {
    let dir = b - a;
    let len = dir.norm();
    if len < f64::EPSILON {
        return point.distance(a);
    }
    (point - a).cross(dir).abs() / len
}

/// Orthogonal projection of `point` onto the infinite line through `a` and `b`.
#[inline]
pub fn project_onto_line(point: Point2D, a: Point2D, b: Point2D) -> Point2D {
    let dir = b - a;
    let len_sq = dir.dot(dir);
    if len_sq < f64::EPSILON {
        return a;
    }
    a + dir * ((point - a).dot(dir) / len_sq)
}

/// Even-odd point-in-polygon test.
///
/// The polygon is closed implicitly (last vertex connects to the first).
/// Vertex order is used as given, so self-intersecting chains follow the
/// even-odd rule rather than any hull.
pub fn point_in_polygon(point: Point2D, polygon: &[Point2D]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
