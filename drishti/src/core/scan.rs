//! Raw laser scan in polar form.

use serde::{Deserialize, Serialize};

use super::math::TWO_PI;
use crate::error::{Error, Result};

/// A single 2D laser sweep.
///
/// Beam `i` has bearing `angle_min + i * angle_increment`. The first beam
/// points to the robot's right and the sweep runs counter-clockwise.
///
/// A scan is immutable once handed to the extractors; the point extractor
/// denoises a private copy of `ranges`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserScan {
    /// Bearing of the first beam (radians)
    pub angle_min: f64,
    /// Bearing of the last beam (radians)
    pub angle_max: f64,
    /// Angular step between consecutive beams (radians)
    pub angle_increment: f64,
    /// Minimum valid range (meters)
    pub range_min: f64,
    /// Maximum range; readings at this value are saturated (meters)
    pub range_max: f64,
    /// Range per beam (meters)
    pub ranges: Vec<f64>,
}

impl LaserScan {
    /// Create a new laser scan.
    pub fn new(
        angle_min: f64,
        angle_max: f64,
        angle_increment: f64,
        range_min: f64,
        range_max: f64,
        ranges: Vec<f64>,
    ) -> Self {
        Self {
            angle_min,
            angle_max,
            angle_increment,
            range_min,
            range_max,
            ranges,
        }
    }

    /// Create a scan of `ranges.len()` beams evenly spread over `[angle_min, angle_max]`.
    pub fn evenly_spaced(angle_min: f64, angle_max: f64, range_max: f64, ranges: Vec<f64>) -> Self {
        let angle_increment = if ranges.len() > 1 {
            (angle_max - angle_min) / (ranges.len() - 1) as f64
        } else {
            0.0
        };
        Self::new(angle_min, angle_max, angle_increment, 0.0, range_max, ranges)
    }

    /// Number of beams.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if the scan has no beams.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Bearing of beam `index`.
    #[inline]
    pub fn bearing(&self, index: usize) -> f64 {
        self.angle_min + index as f64 * self.angle_increment
    }

    /// Fractional beam index for a bearing.
    ///
    /// Bearings are unwrapped relative to `angle_min`; a bearing outside the
    /// field of view maps below 0 or above the last beam, whichever end of
    /// the sweep is angularly closer.
    pub fn beam_at(&self, bearing: f64) -> f64 {
        if self.angle_increment.abs() < f64::EPSILON {
            return 0.0;
        }
        let span = (self.angle_max - self.angle_min).abs();
        let mut offset = (bearing - self.angle_min).rem_euclid(TWO_PI);
        if offset > span + (TWO_PI - span) * 0.5 {
            offset -= TWO_PI;
        }
        offset / self.angle_increment
    }

    /// Ranges with non-finite and negative readings replaced by zero.
    pub fn sanitized_ranges(&self) -> Vec<f64> {
        self.ranges
            .iter()
            .map(|&r| if r.is_finite() && r >= 0.0 { r } else { 0.0 })
            .collect()
    }

    /// Check that the beam count matches the angular span and that all
    /// ranges are finite.
    ///
    /// Both `span / increment` and `span / increment + 1` beams are accepted.
    pub fn validate(&self) -> Result<()> {
        if !self.angle_increment.is_finite() || self.angle_increment <= 0.0 {
            return Err(Error::MalformedScan(format!(
                "angle increment {} is not positive",
                self.angle_increment
            )));
        }

        let span = (self.angle_max - self.angle_min) / self.angle_increment;
        if !span.is_finite() || span < 0.0 {
            return Err(Error::MalformedScan(format!(
                "angular span [{}, {}] is invalid",
                self.angle_min, self.angle_max
            )));
        }
        let steps = span.round() as usize;
        let n = self.ranges.len();
        if n != steps && n != steps + 1 {
            return Err(Error::MalformedScan(format!(
                "{} ranges for a span of {} increments",
                n, steps
            )));
        }

        if let Some(i) = self.ranges.iter().position(|r| !r.is_finite()) {
            return Err(Error::MalformedScan(format!("non-finite range at beam {}", i)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_bearing_and_beam() {
        let scan = LaserScan::new(0.0, PI, FRAC_PI_2, 0.0, 10.0, vec![1.0, 1.0, 1.0]);
        assert_eq!(scan.len(), 3);
        assert_relative_eq!(scan.bearing(2), PI, epsilon = 1e-12);
        assert_relative_eq!(scan.beam_at(FRAC_PI_2), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_beam_at_outside_field_of_view() {
        let scan = LaserScan::new(0.0, PI, FRAC_PI_2, 0.0, 10.0, vec![1.0, 1.0, 1.0]);
        // Just right of the first beam maps below zero, not past the end.
        assert!(scan.beam_at(-0.1) < 0.0);
        assert!(scan.beam_at(PI + 0.1) > 2.0);
    }

    #[test]
    fn test_evenly_spaced() {
        let scan = LaserScan::evenly_spaced(0.0, PI, 5.0, vec![1.0; 181]);
        assert_relative_eq!(scan.angle_increment, PI / 180.0, epsilon = 1e-12);
        assert!(scan.validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_both_conventions() {
        let inclusive = LaserScan::new(0.0, PI, FRAC_PI_2, 0.0, 10.0, vec![1.0; 3]);
        let exclusive = LaserScan::new(0.0, PI, FRAC_PI_2, 0.0, 10.0, vec![1.0; 2]);
        assert!(inclusive.validate().is_ok());
        assert!(exclusive.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_mismatch() {
        let scan = LaserScan::new(0.0, PI, FRAC_PI_2, 0.0, 10.0, vec![1.0; 7]);
        assert!(matches!(scan.validate(), Err(Error::MalformedScan(_))));
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let scan = LaserScan::new(0.0, PI, FRAC_PI_2, 0.0, 10.0, vec![1.0, f64::NAN, 1.0]);
        assert!(matches!(scan.validate(), Err(Error::MalformedScan(_))));
        assert_eq!(scan.sanitized_ranges(), vec![1.0, 0.0, 1.0]);
    }
}
