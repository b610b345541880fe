//! Right-angle corners between consecutive wall segments.

use super::{FeatureExtractor, FeatureKind, LineExtractor};
use crate::core::{LaserScan, Point2D};
use crate::error::Result;
use crate::features::Line;
use crate::model::FeatureModel;

/// Emits the junction point of every adjacent line pair meeting at roughly 90°.
#[derive(Clone, Debug)]
pub struct RightAngleExtractor<L = LineExtractor> {
    lines: L,
}

impl RightAngleExtractor {
    /// Create a right-angle extractor using the stock line extractor.
    pub fn new() -> Self {
        Self::with_line_extractor(LineExtractor::new())
    }
}

impl Default for RightAngleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> RightAngleExtractor<L>
where
    L: FeatureExtractor<Feature = Line>,
{
    /// Create a right-angle extractor on top of a custom line extractor.
    pub fn with_line_extractor(lines: L) -> Self {
        Self { lines }
    }

    /// Corners between already extracted lines.
    pub fn extract_from_lines(&self, lines: &[Line], model: &FeatureModel) -> Result<Vec<Point2D>> {
        find_right_angles(lines, model)
    }
}

impl<L> FeatureExtractor for RightAngleExtractor<L>
where
    L: FeatureExtractor<Feature = Line>,
{
    type Feature = Point2D;
    const KIND: FeatureKind = FeatureKind::RightAngles;

    fn extract(&self, scan: &LaserScan, model: &FeatureModel) -> Result<Vec<Point2D>> {
        let lines = self.lines.extract(scan, model)?;
        self.extract_from_lines(&lines, model)
    }
}

/// Start point of every line whose angle to its predecessor lies in the
/// model's right-angle window.
pub fn find_right_angles(lines: &[Line], model: &FeatureModel) -> Result<Vec<Point2D>> {
    let window = model.right_angle();
    let (lower, upper) = (window.lower_bound()?, window.upper_bound()?);

    Ok(lines
        .windows(2)
        .filter(|pair| (lower..=upper).contains(&pair[0].relative_angle(&pair[1])))
        .map(|pair| pair[1].start)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RightAngleParams;
    use approx::assert_relative_eq;

    fn model() -> FeatureModel {
        FeatureModel::new().with_right_angle(
            RightAngleParams::new().with_bounds(80f64.to_radians(), 100f64.to_radians()),
        )
    }

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
        Line::new(0, 1, Point2D::new(x1, y1), Point2D::new(x2, y2))
    }

    #[test]
    fn test_single_corner() {
        let lines = [line(0.0, 0.0, 1.0, 0.0), line(1.0, 0.0, 1.0, 1.0)];
        let corners = find_right_angles(&lines, &model()).unwrap();
        assert_eq!(corners.len(), 1);
        assert_relative_eq!(corners[0].x, 1.0);
        assert_relative_eq!(corners[0].y, 0.0);
    }

    #[test]
    fn test_diagonal_rejected() {
        let lines = [line(0.0, 0.0, 1.0, 0.0), line(0.0, 0.0, 1.0, 1.0)];
        assert!(find_right_angles(&lines, &model()).unwrap().is_empty());
    }

    #[test]
    fn test_reversed_direction_still_right_angle() {
        // 270° turn folds to 90° relative angle.
        let lines = [line(0.0, 0.0, 1.0, 0.0), line(1.0, 0.0, 1.0, -1.0)];
        assert_eq!(find_right_angles(&lines, &model()).unwrap().len(), 1);
    }

    #[test]
    fn test_too_few_lines() {
        assert!(find_right_angles(&[], &model()).unwrap().is_empty());
        assert!(
            find_right_angles(&[line(0.0, 0.0, 1.0, 0.0)], &model())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_unset_bounds() {
        let lines = [line(0.0, 0.0, 1.0, 0.0), line(1.0, 0.0, 1.0, 1.0)];
        assert!(find_right_angles(&lines, &FeatureModel::new()).is_err());
        assert!(find_right_angles(&[], &FeatureModel::new()).is_err());
    }
}
