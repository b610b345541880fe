//! Feature model: the threshold table every extractor reads.
//!
//! The model is a tree of per-feature parameter groups. Nothing has an
//! implicit default: a getter fails with [`Error::Configuration`] the first
//! time an unset parameter is read. [`FeatureModel::indoor`] builds the
//! canonical fully populated model, and [`FeatureModel::validate`] checks
//! completeness up front for callers that prefer to fail at load time.
//!
//! # YAML
//!
//! ```yaml
//! point:
//!   max_offset: 1.2
//! line:
//!   split_threshold: 0.06
//!   saturation_ratio: 0.95
//! ```
//!
//! Groups or fields missing from the file stay unset.

mod params;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use params::{
    DoorParams, IntersectionParams, LineParams, ParallelParams, PointParams, RightAngleParams,
};

/// Per-feature parameter groups shared by all extractors.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureModel {
    /// Point denoising
    pub point: PointParams,
    /// Line segmentation
    pub line: LineParams,
    /// Doorway detection
    pub door: DoorParams,
    /// Right-angle window
    pub right_angle: RightAngleParams,
    /// Parallelism and hallway classification
    pub parallel: ParallelParams,
    /// Branch detection
    pub intersection: IntersectionParams,
}

impl FeatureModel {
    /// Create a model with every parameter unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical indoor model for a 180° sweep at roughly 1° resolution.
    pub fn indoor() -> Self {
        Self::new()
            .with_point(PointParams::new().with_max_offset(1.2))
            .with_line(
                LineParams::new()
                    .with_split_threshold(0.06)
                    .with_saturation_ratio(0.95),
            )
            .with_door(
                DoorParams::new()
                    .with_width(0.75, 1.1)
                    .with_min_num_beams(4)
                    .with_off_line_tolerance(0.15)
                    .with_min_depth(0.3)
                    .with_side_fraction(1.0 / 3.0)
                    .with_entry_offsets(1.0, 1.5)
                    .with_approach_offset(2.0),
            )
            .with_right_angle(
                RightAngleParams::new().with_bounds(80f64.to_radians(), 100f64.to_radians()),
            )
            .with_parallel(
                ParallelParams::new()
                    .with_threshold(0.175)
                    .with_min_line_length(0.3)
                    .with_hallway_length(3.0),
            )
            .with_intersection(
                IntersectionParams::new()
                    .with_min_length(0.5)
                    .with_width(0.75, 1.5)
                    .with_min_depth(0.5)
                    .with_detection_threshold(0.5)
                    .with_tracking_threshold(0.5),
            )
    }

    /// Replace the point group.
    pub fn with_point(mut self, point: PointParams) -> Self {
        self.point = point;
        self
    }

    /// Replace the line group.
    pub fn with_line(mut self, line: LineParams) -> Self {
        self.line = line;
        self
    }

    /// Replace the door group.
    pub fn with_door(mut self, door: DoorParams) -> Self {
        self.door = door;
        self
    }

    /// Replace the right-angle group.
    pub fn with_right_angle(mut self, right_angle: RightAngleParams) -> Self {
        self.right_angle = right_angle;
        self
    }

    /// Replace the parallel group.
    pub fn with_parallel(mut self, parallel: ParallelParams) -> Self {
        self.parallel = parallel;
        self
    }

    /// Replace the intersection group.
    pub fn with_intersection(mut self, intersection: IntersectionParams) -> Self {
        self.intersection = intersection;
        self
    }

    /// Point group.
    pub fn point(&self) -> &PointParams {
        &self.point
    }

    /// Line group.
    pub fn line(&self) -> &LineParams {
        &self.line
    }

    /// Door group.
    pub fn door(&self) -> &DoorParams {
        &self.door
    }

    /// Right-angle group.
    pub fn right_angle(&self) -> &RightAngleParams {
        &self.right_angle
    }

    /// Parallel group.
    pub fn parallel(&self) -> &ParallelParams {
        &self.parallel
    }

    /// Intersection group.
    pub fn intersection(&self) -> &IntersectionParams {
        &self.intersection
    }

    /// Read every parameter once, failing on the first unset one.
    pub fn validate(&self) -> Result<()> {
        self.point.max_offset()?;

        self.line.split_threshold()?;
        self.line.saturation_ratio()?;

        self.door.min_width()?;
        self.door.max_width()?;
        self.door.min_num_beams()?;
        self.door.off_line_tolerance()?;
        self.door.min_depth()?;
        self.door.side_fraction()?;
        self.door.entry_offset_center()?;
        self.door.entry_offset_side()?;
        self.door.approach_offset()?;

        self.right_angle.lower_bound()?;
        self.right_angle.upper_bound()?;

        self.parallel.threshold()?;
        self.parallel.min_line_length()?;
        self.parallel.hallway_length()?;

        self.intersection.min_length()?;
        self.intersection.min_width()?;
        self.intersection.max_width()?;
        self.intersection.min_depth()?;
        self.intersection.detection_threshold()?;
        self.intersection.tracking_threshold()?;
        Ok(())
    }

    /// Load a model from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::ModelLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&contents)
    }

    /// Load from the default path (`configs/feature_model.yaml`), falling
    /// back to [`FeatureModel::indoor`] when the file does not exist.
    pub fn load_default() -> Result<Self> {
        let path = Path::new("configs/feature_model.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::indoor())
        }
    }

    /// Parse from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serialize to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
