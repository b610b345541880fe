//! Corridor branch detection.
//!
//! For every sufficiently long line, later lines are tried as the far side
//! of an opening: perpendicular ones first (a side corridor leaving the
//! current wall), then parallel ones (a gap in a straight wall). The two
//! corners of the opening give its width and entry point; the free space
//! visible through the opening gives its depth and confidence.

use std::cmp::Ordering;

use log::debug;

use super::{FeatureExtractor, FeatureKind, LineExtractor, PointExtractor};
use crate::core::math::{infinite_line_intersection, point_in_polygon};
use crate::core::{LaserScan, Point2D};
use crate::error::Result;
use crate::features::{IntersectionBranch, Line};
use crate::model::FeatureModel;

/// Detects corridor branches in a scan.
#[derive(Clone, Debug)]
pub struct IntersectionExtractor<P = PointExtractor, L = LineExtractor> {
    points: P,
    lines: L,
}

impl IntersectionExtractor {
    /// Create an intersection extractor using the stock point and line extractors.
    pub fn new() -> Self {
        Self::with_extractors(PointExtractor, LineExtractor::new())
    }
}

impl Default for IntersectionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, L> IntersectionExtractor<P, L>
where
    P: FeatureExtractor<Feature = Point2D>,
    L: FeatureExtractor<Feature = Line>,
{
    /// Create an intersection extractor on top of custom point and line extractors.
    pub fn with_extractors(points: P, lines: L) -> Self {
        Self { points, lines }
    }

    /// Find branches in points and lines already extracted from `scan`.
    pub fn extract_from_lines(
        &self,
        scan: &LaserScan,
        points: &[Point2D],
        lines: &[Line],
        model: &FeatureModel,
    ) -> Result<Vec<IntersectionBranch>> {
        find_intersections(scan, points, lines, model)
    }
}

impl<P, L> FeatureExtractor for IntersectionExtractor<P, L>
where
    P: FeatureExtractor<Feature = Point2D>,
    L: FeatureExtractor<Feature = Line>,
{
    type Feature = IntersectionBranch;
    const KIND: FeatureKind = FeatureKind::Intersections;

    fn extract(&self, scan: &LaserScan, model: &FeatureModel) -> Result<Vec<IntersectionBranch>> {
        let points = self.points.extract(scan, model)?;
        let lines = self.lines.extract(scan, model)?;
        self.extract_from_lines(scan, &points, &lines, model)
    }
}

#[derive(Clone, Copy, Debug)]
struct BranchThresholds {
    min_length: f64,
    min_width: f64,
    max_width: f64,
    min_depth: f64,
    detection: f64,
    tracking: f64,
    parallel: f64,
    right_angle: (f64, f64),
}

impl BranchThresholds {
    fn from_model(model: &FeatureModel) -> Result<Self> {
        let params = model.intersection();
        let right_angle = model.right_angle();
        Ok(Self {
            min_length: params.min_length()?,
            min_width: params.min_width()?,
            max_width: params.max_width()?,
            min_depth: params.min_depth()?,
            detection: params.detection_threshold()?,
            tracking: params.tracking_threshold()?,
            parallel: model.parallel().threshold()?,
            right_angle: (right_angle.lower_bound()?, right_angle.upper_bound()?),
        })
    }
}

/// Find corridor branches given the scan's denoised points and lines.
///
/// `points` must hold one point per beam of `scan`.
pub fn find_intersections(
    scan: &LaserScan,
    points: &[Point2D],
    lines: &[Line],
    model: &FeatureModel,
) -> Result<Vec<IntersectionBranch>> {
    let t = BranchThresholds::from_model(model)?;

    let polygon: Vec<Point2D> = lines.iter().flat_map(|l| [l.start, l.end]).collect();
    let mut branches: Vec<IntersectionBranch> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if line.length() < t.min_length {
            continue;
        }

        let (orthogonal, parallel) = candidates(lines, i, &t);
        let corner_pairs = orthogonal
            .iter()
            .flat_map(|&m| orthogonal_corners(line, &lines[m]))
            .chain(
                parallel
                    .iter()
                    .flat_map(|&m| parallel_corners(line, &lines[m])),
            );

        for (a, b) in corner_pairs {
            let width = a.distance(b);
            if width < t.min_width || width > t.max_width {
                continue;
            }

            let entry = a.midpoint(b);
            let measured_depth = depth_through(scan, points, a, b, entry);
            let confidence = (measured_depth / t.min_depth).min(1.0);

            let accepted = confidence > t.detection
                && point_in_polygon(entry, &polygon)
                && lines
                    .iter()
                    .enumerate()
                    .any(|(j, other)| j != i && line.intersects(other))
                && branches
                    .iter()
                    .all(|known| known.entry.distance(entry) > t.tracking);

            if accepted {
                debug!(
                    "Branch from line {} at ({:.2}, {:.2}), {:.2} m wide",
                    i, entry.x, entry.y, width
                );
                branches.push(IntersectionBranch {
                    entry,
                    confidence,
                    measured_depth,
                    corners: [a, b],
                    visible: true,
                });
                break;
            }
        }
    }
    Ok(branches)
}

/// Later lines perpendicular and parallel to `lines[i]`, each ordered by
/// distance from `lines[i].end` to their nearer endpoint.
fn candidates(lines: &[Line], i: usize, t: &BranchThresholds) -> (Vec<usize>, Vec<usize>) {
    let line = &lines[i];
    let reach = |m: &usize| {
        let other = &lines[*m];
        line.end
            .distance(other.start)
            .min(line.end.distance(other.end))
    };
    let by_reach = |a: &usize, b: &usize| -> Ordering { reach(a).total_cmp(&reach(b)) };

    let (lower, upper) = t.right_angle;
    let mut orthogonal: Vec<usize> = (i + 1..lines.len())
        .filter(|&m| (lower..=upper).contains(&line.relative_angle(&lines[m])))
        .collect();
    let mut parallel: Vec<usize> = (i + 1..lines.len())
        .filter(|&m| line.is_parallel_to(&lines[m], t.parallel))
        .collect();

    orthogonal.sort_by(by_reach);
    parallel.sort_by(by_reach);
    (orthogonal, parallel)
}

/// Corner where the two walls would meet, and the end of `line` nearer to it.
fn orthogonal_corners(line: &Line, other: &Line) -> Option<(Point2D, Point2D)> {
    match infinite_line_intersection(line.start, line.end, other.start, other.end) {
        Ok(a) => {
            let b = if line.start.distance(a) <= line.end.distance(a) {
                line.start
            } else {
                line.end
            };
            Some((a, b))
        }
        Err(e) => {
            debug!("Skipping branch candidate: {}", e);
            None
        }
    }
}

/// Facing ends of two parallel walls, the shorter wall's end projected onto
/// the longer wall. Tries `line.end`/`other.start` first, then
/// `line.start`/`other.end`.
fn parallel_corners(line: &Line, other: &Line) -> [(Point2D, Point2D); 2] {
    let line_is_shorter = line.length() <= other.length();
    let pair = |own: Point2D, theirs: Point2D| {
        if line_is_shorter {
            (other.project(own), theirs)
        } else {
            (line.project(theirs), own)
        }
    };
    [pair(line.end, other.start), pair(line.start, other.end)]
}

/// Largest range beyond the entry among beams between the two corners' bearings.
fn depth_through(
    scan: &LaserScan,
    points: &[Point2D],
    a: Point2D,
    b: Point2D,
    entry: Point2D,
) -> f64 {
    if points.is_empty() {
        return 0.0;
    }

    let (ba, bb) = (scan.beam_at(a.bearing()), scan.beam_at(b.bearing()));
    let (from, to) = if ba <= bb { (ba, bb) } else { (bb, ba) };
    let lo = from.ceil().max(0.0);
    let hi = to.floor().min((points.len() - 1) as f64);
    if hi < lo {
        return 0.0;
    }

    let entry_range = entry.norm();
    points[lo as usize..=hi as usize]
        .iter()
        .map(|p| p.norm() - entry_range)
        .fold(0.0, f64::max)
}
