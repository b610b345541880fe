//! Cartesian point type in the sensor frame.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A 2D point (or vector) in meters, sensor frame.
///
/// The sensor sweeps counter-clockwise starting on the robot's right side,
/// so with `angle_min = 0` the first beam lies along +X and +Y points
/// straight ahead.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate in meters
    pub x: f64,
    /// Y coordinate in meters
    pub y: f64,
}

impl Point2D {
    /// Create a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin (sensor position).
    #[inline]
    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Point at `range` meters along `bearing` radians from the origin.
    #[inline]
    pub fn from_polar(range: f64, bearing: f64) -> Self {
        Self::new(range * bearing.cos(), range * bearing.sin())
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Point2D) -> f64 {
        (self - other).norm()
    }

    /// Length of this point as a vector from the origin.
    ///
    /// For a scan point this is the measured range.
    #[inline]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Bearing of this point from the origin (radians, CCW from +X).
    #[inline]
    pub fn bearing(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Point2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z-component of the 3D cross product.
    #[inline]
    pub fn cross(self, other: Point2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Rotate by +90° (counter-clockwise).
    #[inline]
    pub fn perpendicular(self) -> Point2D {
        Point2D::new(-self.y, self.x)
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    #[inline]
    pub fn normalized(self) -> Point2D {
        let len = self.norm();
        if len > f64::EPSILON {
            Point2D::new(self.x / len, self.y / len)
        } else {
            Point2D::zero()
        }
    }

    /// Midpoint between two points.
    #[inline]
    pub fn midpoint(self, other: Point2D) -> Point2D {
        Point2D::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Check approximate equality within `epsilon` on each axis.
    #[inline]
    pub fn approx_eq(self, other: Point2D, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl Add for Point2D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Point2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Point2D::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Point2D::new(self.x * scalar, self.y * scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_from_polar() {
        let p = Point2D::from_polar(2.0, FRAC_PI_2);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.norm(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.bearing(), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_vector_ops() {
        let a = Point2D::new(3.0, 4.0);
        let b = Point2D::new(1.0, 0.0);

        assert_eq!(a + b, Point2D::new(4.0, 4.0));
        assert_eq!(a - b, Point2D::new(2.0, 4.0));
        assert_eq!(a * 2.0, Point2D::new(6.0, 8.0));
        assert_eq!(a.dot(b), 3.0);
        assert_eq!(b.cross(a), 4.0);
        assert_eq!(a.distance(Point2D::zero()), 5.0);
        assert_eq!(b.perpendicular(), Point2D::new(0.0, 1.0));
    }

    #[test]
    fn test_normalized_zero() {
        assert_eq!(Point2D::zero().normalized(), Point2D::zero());
        let unit = Point2D::new(0.0, 5.0).normalized();
        assert_relative_eq!(unit.y, 1.0);
    }
}
