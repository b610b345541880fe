//! Range denoising and polar-to-Cartesian conversion.

use log::warn;

use super::{FeatureExtractor, FeatureKind};
use crate::core::{LaserScan, Point2D};
use crate::error::Result;
use crate::model::FeatureModel;

/// Converts a scan into one denoised Cartesian point per beam.
///
/// A beam is a spike when its range differs from both neighbours by more
/// than `point.max_offset` (as a ratio of the larger to the smaller range).
/// Spikes are replaced by the mean of their neighbours. The first and last
/// beams are never replaced.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointExtractor;

impl PointExtractor {
    /// Create a point extractor.
    pub fn new() -> Self {
        Self
    }
}

impl FeatureExtractor for PointExtractor {
    type Feature = Point2D;
    const KIND: FeatureKind = FeatureKind::Points;

    fn extract(&self, scan: &LaserScan, model: &FeatureModel) -> Result<Vec<Point2D>> {
        let max_offset = model.point().max_offset()?;

        if let Err(e) = scan.validate() {
            warn!("Processing malformed scan best-effort: {}", e);
        }

        let ranges = denoise(&scan.sanitized_ranges(), max_offset);
        Ok(ranges
            .iter()
            .enumerate()
            .map(|(i, &r)| Point2D::from_polar(r, scan.bearing(i)))
            .collect())
    }
}

/// Replace isolated spikes by the mean of their two neighbours.
///
/// Comparisons always use the input values, so a replacement never
/// influences the decision for the next beam.
pub fn denoise(ranges: &[f64], max_offset: f64) -> Vec<f64> {
    let mut out = ranges.to_vec();
    if ranges.len() < 3 {
        return out;
    }

    for i in 1..ranges.len() - 1 {
        let (prev, curr, next) = (ranges[i - 1], ranges[i], ranges[i + 1]);
        if range_ratio(curr, prev) > max_offset && range_ratio(curr, next) > max_offset {
            out[i] = (prev + next) * 0.5;
        }
    }
    out
}

/// Ratio of the larger to the smaller range; infinite when the smaller is zero.
#[inline]
fn range_ratio(a: f64, b: f64) -> f64 {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    if lo <= 0.0 { f64::INFINITY } else { hi / lo }
}
