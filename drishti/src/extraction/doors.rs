//! Doorway detection from wall discontinuities.
//!
//! A doorway is an opening between the end of one wall line and the start
//! of a later one that:
//!
//! - spans between `door.min_width` and `door.max_width`;
//! - has bounding lines that are aligned (parallel and collinear within
//!   `door.off_line_tolerance`) or meet at a right angle;
//! - covers at least `door.min_num_beams` beams;
//! - reads deeper than both bounding endpoints on every beam in between,
//!   by more than `door.min_depth` on average.
//!
//! Waypoints are placed along the opening's normal: `exit_point` half a
//! door width past the opening, `entry_point` in front of it, and
//! `approach_point` further back. Doors in the outer `door.side_fraction`
//! of the sweep get a longer entry offset and an approach point pulled
//! toward the sweep's centre line.

use log::debug;

use super::{FeatureExtractor, FeatureKind, LineExtractor, PointExtractor};
use crate::core::{LaserScan, Point2D};
use crate::error::Result;
use crate::features::{Door, DoorState, Line};
use crate::model::FeatureModel;

/// Confidence reported for every detected doorway.
const DOOR_CONFIDENCE: f64 = 0.9;

/// Detects open doorways in a scan.
#[derive(Clone, Debug)]
pub struct DoorExtractor<P = PointExtractor, L = LineExtractor> {
    points: P,
    lines: L,
}

impl DoorExtractor {
    /// Create a door extractor using the stock point and line extractors.
    pub fn new() -> Self {
        Self::with_extractors(PointExtractor, LineExtractor::new())
    }
}

impl Default for DoorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, L> DoorExtractor<P, L>
where
    P: FeatureExtractor<Feature = Point2D>,
    L: FeatureExtractor<Feature = Line>,
{
    /// Create a door extractor on top of custom point and line extractors.
    pub fn with_extractors(points: P, lines: L) -> Self {
        Self { points, lines }
    }

    /// Find doorways in points and lines already extracted from `scan`.
    pub fn extract_from_lines(
        &self,
        scan: &LaserScan,
        points: &[Point2D],
        lines: &[Line],
        model: &FeatureModel,
    ) -> Result<Vec<Door>> {
        find_doors(scan, points, lines, model)
    }
}

impl<P, L> FeatureExtractor for DoorExtractor<P, L>
where
    P: FeatureExtractor<Feature = Point2D>,
    L: FeatureExtractor<Feature = Line>,
{
    type Feature = Door;
    const KIND: FeatureKind = FeatureKind::Doors;

    fn extract(&self, scan: &LaserScan, model: &FeatureModel) -> Result<Vec<Door>> {
        let points = self.points.extract(scan, model)?;
        let lines = self.lines.extract(scan, model)?;
        self.extract_from_lines(scan, &points, &lines, model)
    }
}

/// Door thresholds read once per scan.
#[derive(Clone, Copy, Debug)]
struct DoorThresholds {
    min_width: f64,
    max_width: f64,
    min_num_beams: usize,
    off_line_tolerance: f64,
    min_depth: f64,
    side_fraction: f64,
    entry_offset_center: f64,
    entry_offset_side: f64,
    approach_offset: f64,
    parallel: f64,
    right_angle: (f64, f64),
}

impl DoorThresholds {
    fn from_model(model: &FeatureModel) -> Result<Self> {
        let door = model.door();
        let right_angle = model.right_angle();
        Ok(Self {
            min_width: door.min_width()?,
            max_width: door.max_width()?,
            min_num_beams: door.min_num_beams()?,
            off_line_tolerance: door.off_line_tolerance()?,
            min_depth: door.min_depth()?,
            side_fraction: door.side_fraction()?,
            entry_offset_center: door.entry_offset_center()?,
            entry_offset_side: door.entry_offset_side()?,
            approach_offset: door.approach_offset()?,
            parallel: model.parallel().threshold()?,
            right_angle: (right_angle.lower_bound()?, right_angle.upper_bound()?),
        })
    }

    fn is_right_angle(&self, a: &Line, b: &Line) -> bool {
        (self.right_angle.0..=self.right_angle.1).contains(&a.relative_angle(b))
    }
}

/// Find doorways given the scan's denoised points and lines.
///
/// `points` must hold one point per beam of `scan`.
pub fn find_doors(
    scan: &LaserScan,
    points: &[Point2D],
    lines: &[Line],
    model: &FeatureModel,
) -> Result<Vec<Door>> {
    let t = DoorThresholds::from_model(model)?;
    let mut doors = Vec::new();

    let mut l = 0;
    while l + 1 < lines.len() {
        let prev = &lines[l];
        let curr = &lines[l + 1];

        let continuous = prev.is_parallel_to(curr, t.parallel)
            && prev.end.distance(curr.start) <= t.off_line_tolerance;
        if continuous {
            l += 1;
            continue;
        }

        match find_closing_line(points, lines, l, &t) {
            Some((m, depth)) => {
                let door = place_door(scan, points.len(), prev, &lines[m], depth, &t);
                debug!(
                    "Door between beams {} and {} ({:.2} m wide)",
                    door.lower_index, door.upper_index, door.width
                );
                doors.push(door);
                l = m + 1;
            }
            None => l += 1,
        }
    }
    Ok(doors)
}

/// Search lines after `l + 1` for one closing a doorway opened at the end
/// of `lines[l]`. Returns its index and the mean range across the gap.
fn find_closing_line(
    points: &[Point2D],
    lines: &[Line],
    l: usize,
    t: &DoorThresholds,
) -> Option<(usize, f64)> {
    let prev = &lines[l];

    for (m, closing) in lines.iter().enumerate().skip(l + 2) {
        let opening = prev.end.distance(closing.start);
        if opening < t.min_width || opening > t.max_width {
            continue;
        }

        let aligned = if prev.is_parallel_to(closing, t.parallel) {
            prev.distance_to_point(closing.start) < t.off_line_tolerance
        } else if t.is_right_angle(prev, closing) {
            prev.distance_to_point(closing.start) < t.off_line_tolerance
                || closing.distance_to_point(prev.end) < t.off_line_tolerance
        } else {
            false
        };
        if !aligned {
            continue;
        }

        let (lower, upper) = (prev.end_beam, closing.start_beam);
        if upper.saturating_sub(lower) < t.min_num_beams.max(2) || upper > points.len() {
            continue;
        }

        if let Some(depth) = recess_depth(points, lower, upper, prev.end, closing.start, t) {
            return Some((m, depth));
        }
    }
    None
}

/// Mean range across the beams strictly between `lower` and `upper`, when
/// every one of them reads beyond both bounding endpoints on average and
/// the mean excess exceeds `min_depth`.
fn recess_depth(
    points: &[Point2D],
    lower: usize,
    upper: usize,
    left: Point2D,
    right: Point2D,
    t: &DoorThresholds,
) -> Option<f64> {
    let gap = &points[lower + 1..upper];
    if gap.is_empty() {
        return None;
    }

    let bound = (left.norm() + right.norm()) * 0.5;
    let mut total = 0.0;
    for p in gap {
        let range = p.norm();
        if range <= bound {
            return None;
        }
        total += range;
    }

    let mean = total / gap.len() as f64;
    (mean - bound > t.min_depth).then_some(mean)
}

fn place_door(
    scan: &LaserScan,
    beams: usize,
    prev: &Line,
    closing: &Line,
    depth: f64,
    t: &DoorThresholds,
) -> Door {
    let (left, right) = (prev.end, closing.start);
    let (lower, upper) = (prev.end_beam, closing.start_beam);
    let center_index = (lower + upper) / 2;

    let center = left.midpoint(right);
    let half = (right - left) * 0.5;
    let half_len = half.norm();

    let mut inward = half.perpendicular().normalized();
    if inward.dot(center) < 0.0 {
        inward = inward * -1.0;
    }

    let last = beams.saturating_sub(1) as f64;
    let side_span = t.side_fraction * last;
    let c = center_index as f64;
    let on_side = c <= side_span || c >= last - side_span;

    let entry_offset = if on_side {
        t.entry_offset_side
    } else {
        t.entry_offset_center
    };

    let exit_point = center + inward * half_len;
    let entry_point = center - inward * (half_len * entry_offset);
    let mut approach_point = entry_point - inward * (half_len * t.approach_offset);

    if on_side {
        // Pull toward the sweep's centre line.
        let axis = Point2D::from_polar(1.0, (scan.angle_min + scan.angle_max) * 0.5);
        let lateral = axis * axis.dot(center) - center;
        approach_point = approach_point + lateral.normalized() * half_len;
    }

    Door {
        lower_index: lower,
        center_index,
        upper_index: upper,
        width: half_len * 2.0,
        depth,
        center_distance: center.norm(),
        center_point: center,
        entry_point,
        exit_point,
        approach_point,
        confidence: DOOR_CONFIDENCE,
        state: DoorState::Open,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::WallScene;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn doorway_scan() -> LaserScan {
        WallScene::doorway().scan(0.0, PI, 181, 10.0)
    }

    #[test]
    fn test_doorway_detected() {
        let model = FeatureModel::indoor();
        let doors = DoorExtractor::new().extract(&doorway_scan(), &model).unwrap();

        assert_eq!(doors.len(), 1);
        let door = &doors[0];
        assert_eq!(door.lower_index, 77);
        assert_eq!(door.upper_index, 103);
        assert_eq!(door.center_index, 90);
        assert_relative_eq!(door.width, 0.9235, epsilon = 1e-3);
        assert_relative_eq!(door.depth, 3.4378, epsilon = 1e-3);
        assert_eq!(door.state, DoorState::Open);
        assert_eq!(door.confidence, 0.9);
    }

    #[test]
    fn test_doorway_waypoints() {
        let model = FeatureModel::indoor();
        let door = DoorExtractor::new().extract(&doorway_scan(), &model).unwrap()[0];

        assert!(door.center_point.approx_eq(Point2D::new(0.0, 2.0), 1e-6));
        assert_relative_eq!(door.center_distance, 2.0, epsilon = 1e-6);
        assert!(door.exit_point.approx_eq(Point2D::new(0.0, 2.4617), 1e-3));
        assert!(door.entry_point.approx_eq(Point2D::new(0.0, 1.5383), 1e-3));
        assert!(door.approach_point.approx_eq(Point2D::new(0.0, 0.6148), 1e-3));
    }

    #[test]
    fn test_width_within_bounds() {
        let model = FeatureModel::indoor();
        for door in DoorExtractor::new().extract(&doorway_scan(), &model).unwrap() {
            assert!(door.width >= 0.75 && door.width <= 1.1);
            assert!(door.lower_index < door.center_index);
            assert!(door.center_index < door.upper_index);
        }
    }

    #[test]
    fn test_narrow_opening_rejected() {
        let model = FeatureModel::indoor()
            .with_door(FeatureModel::indoor().door().clone().with_width(1.0, 1.1));
        assert!(DoorExtractor::new().extract(&doorway_scan(), &model).unwrap().is_empty());
    }

    #[test]
    fn test_shallow_recess_rejected() {
        let model = FeatureModel::indoor()
            .with_door(FeatureModel::indoor().door().clone().with_min_depth(5.0));
        assert!(DoorExtractor::new().extract(&doorway_scan(), &model).unwrap().is_empty());
    }

    #[test]
    fn test_plain_wall_has_no_door() {
        let scan = WallScene::new()
            .with_wall(Point2D::new(3.0, 0.0), Point2D::new(3.0, 2.0))
            .with_wall(Point2D::new(3.0, 2.0), Point2D::new(-3.0, 2.0))
            .with_wall(Point2D::new(-3.0, 2.0), Point2D::new(-3.0, 0.0))
            .scan(0.0, PI, 181, 10.0);
        let doors = DoorExtractor::new()
            .extract(&scan, &FeatureModel::indoor())
            .unwrap();
        assert!(doors.is_empty());
    }

    /// Room with an opening between its right wall and its front wall (y = 3).
    fn corner_doorway(right_wall_top: f64, front_wall_end: f64) -> LaserScan {
        WallScene::new()
            .with_wall(Point2D::new(1.5, -1.0), Point2D::new(1.5, right_wall_top))
            .with_wall(Point2D::new(front_wall_end, 3.0), Point2D::new(-1.5, 3.0))
            .with_wall(Point2D::new(-1.5, 3.0), Point2D::new(-1.5, -1.0))
            .scan(0.0, PI, 181, 10.0)
    }

    #[test]
    fn test_doorway_beside_corner() {
        // The closing wall is perpendicular to the right wall and starts
        // about 1 m off it. The right wall's end lies on the closing wall.
        let doors = DoorExtractor::new()
            .extract(&corner_doorway(3.0, 0.5), &FeatureModel::indoor())
            .unwrap();

        assert_eq!(doors.len(), 1);
        let door = &doors[0];
        assert_eq!(door.lower_index, 63);
        assert_eq!(door.upper_index, 81);
        assert_relative_eq!(door.width, 1.0264, epsilon = 1e-3);
        assert_relative_eq!(door.depth, 10.0, epsilon = 1e-9);
        assert!(door.exit_point.y > door.center_point.y);
    }

    #[test]
    fn test_perpendicular_walls_offset_on_both_sides() {
        // Right wall ends 0.4 m below the front wall, whose start is 0.9 m
        // off the right wall: neither end lies on the other wall.
        let scan = corner_doorway(2.7, 0.6);
        let model = FeatureModel::indoor();
        assert!(DoorExtractor::new().extract(&scan, &model).unwrap().is_empty());

        let loose = model.clone().with_door(model.door().clone().with_off_line_tolerance(0.45));
        let doors = DoorExtractor::new().extract(&scan, &loose).unwrap();
        assert_eq!(doors.len(), 1);
        assert_eq!((doors[0].lower_index, doors[0].upper_index), (60, 79));
        assert_relative_eq!(doors[0].width, 1.0011, epsilon = 1e-3);
    }

    #[test]
    fn test_side_door_uses_side_offsets() {
        let t = DoorThresholds::from_model(&FeatureModel::indoor()).unwrap();
        let scan = LaserScan::evenly_spaced(0.0, PI, 10.0, vec![1.0; 181]);
        // Opening in a wall x = 2 on the robot's right.
        let prev = Line::new(0, 20, Point2D::new(2.0, -1.0), Point2D::new(2.0, 0.05));
        let closing = Line::new(40, 60, Point2D::new(2.0, 0.95), Point2D::new(2.0, 3.0));
        let door = place_door(&scan, 181, &prev, &closing, 3.0, &t);

        assert_eq!(door.center_index, 30);
        assert!(door.center_point.approx_eq(Point2D::new(2.0, 0.5), 1e-9));
        assert!(door.exit_point.approx_eq(Point2D::new(2.45, 0.5), 1e-9));
        // Side zone: entry 1.5 half-widths in front of the opening.
        assert!(door.entry_point.approx_eq(Point2D::new(1.325, 0.5), 1e-9));
        // Approach 2 half-widths further back, then one half-width toward
        // the forward axis.
        assert!(door.approach_point.approx_eq(Point2D::new(-0.025, 0.5), 1e-9));
    }

    #[test]
    fn test_unset_door_parameter() {
        let mut model = FeatureModel::indoor();
        model.door.min_width = None;
        assert!(matches!(
            DoorExtractor::new().extract(&doorway_scan(), &model),
            Err(crate::Error::Configuration("door.min_width"))
        ));
    }
}
