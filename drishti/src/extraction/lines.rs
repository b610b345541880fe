//! Recursive split line segmentation.
//!
//! The scan is treated as one ordered polyline. A range `[s, e]` of beams
//! is emitted as a single line when every interior point lies within
//! `line.split_threshold` of the chord `points[s] → points[e]`; otherwise
//! it is split at the farthest point and both halves are processed in turn.
//! Adjacent lines therefore share their split beam.

use log::debug;

use super::{FeatureExtractor, FeatureKind, PointExtractor};
use crate::core::math::distance_to_line;
use crate::core::{LaserScan, Point2D};
use crate::error::Result;
use crate::features::Line;
use crate::model::FeatureModel;

/// Segments the denoised points of a scan into confidence-scored lines.
#[derive(Clone, Debug)]
pub struct LineExtractor<P = PointExtractor> {
    points: P,
}

impl LineExtractor {
    /// Create a line extractor using the stock point extractor.
    pub fn new() -> Self {
        Self::with_point_extractor(PointExtractor)
    }
}

impl Default for LineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> LineExtractor<P>
where
    P: FeatureExtractor<Feature = Point2D>,
{
    /// Create a line extractor on top of a custom point extractor.
    pub fn with_point_extractor(points: P) -> Self {
        Self { points }
    }

    /// The upstream point extractor.
    pub fn point_extractor(&self) -> &P {
        &self.points
    }

    /// Segment already extracted points and score each line against the
    /// raw ranges of `scan`.
    ///
    /// Beams past the end of `scan.ranges` count as unsaturated.
    pub fn extract_from_points(
        &self,
        scan: &LaserScan,
        points: &[Point2D],
        model: &FeatureModel,
    ) -> Result<Vec<Line>> {
        let split_threshold = model.line().split_threshold()?;
        let saturation_ratio = model.line().saturation_ratio()?;

        let ranges = scan.sanitized_ranges();
        let saturated = saturation_ratio * scan.range_max;

        let lines: Vec<Line> = split_lines(points, split_threshold)
            .into_iter()
            .map(|line| {
                let maxed = (line.start_beam..=line.end_beam)
                    .filter(|&i| ranges.get(i).is_some_and(|&r| r >= saturated))
                    .count();
                line.with_confidence(1.0 - maxed as f64 / line.beam_count() as f64)
            })
            .collect();

        debug!("Extracted {} lines from {} points", lines.len(), points.len());
        Ok(lines)
    }
}

impl<P> FeatureExtractor for LineExtractor<P>
where
    P: FeatureExtractor<Feature = Point2D>,
{
    type Feature = Line;
    const KIND: FeatureKind = FeatureKind::Lines;

    fn extract(&self, scan: &LaserScan, model: &FeatureModel) -> Result<Vec<Line>> {
        let points = self.points.extract(scan, model)?;
        self.extract_from_points(scan, &points, model)
    }
}

/// Split an ordered point sequence into lines.
///
/// Returns lines ordered by `start_beam`, the first starting at beam 0 and
/// the last ending at beam `n - 1`. Fewer than two points yield no lines.
/// Every line has full confidence.
pub fn split_lines(points: &[Point2D], split_threshold: f64) -> Vec<Line> {
    let mut lines = Vec::new();
    if points.len() >= 2 {
        split_range(points, 0, points.len() - 1, split_threshold, &mut lines);
    }
    lines
}

fn split_range(points: &[Point2D], s: usize, e: usize, threshold: f64, out: &mut Vec<Line>) {
    if e - s > 1 {
        if let Some((k, dist)) = farthest_from_chord(points, s, e) {
            if dist > threshold {
                split_range(points, s, k, threshold, out);
                split_range(points, k, e, threshold, out);
                return;
            }
        }
    }
    out.push(Line::new(s, e, points[s], points[e]));
}

/// Interior index with the largest distance to the chord `s → e`.
///
/// Ties keep the first index.
fn farthest_from_chord(points: &[Point2D], s: usize, e: usize) -> Option<(usize, f64)> {
    let (a, b) = (points[s], points[e]);
    let mut best: Option<(usize, f64)> = None;
    for (k, &p) in points.iter().enumerate().take(e).skip(s + 1) {
        let dist = distance_to_line(p, a, b);
        if best.is_none_or(|(_, d)| dist > d) {
            best = Some((k, dist));
        }
    }
    best
}
