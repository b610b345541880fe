//! Parameter groups of the feature model.
//!
//! Every parameter is optional until set. Getters fail with
//! [`Error::Configuration`] naming the parameter when it is missing; setters
//! are builder-style and perform no range validation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[inline]
fn required<T: Copy>(value: Option<T>, name: &'static str) -> Result<T> {
    value.ok_or(Error::Configuration(name))
}

// ─────────────────────────────────────────────────────────────────────────────
// Point
// ─────────────────────────────────────────────────────────────────────────────

/// Point denoising parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointParams {
    /// Neighbour range ratio above which a beam is treated as a spike.
    pub max_offset: Option<f64>,
}

impl PointParams {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the spike ratio.
    pub fn with_max_offset(mut self, ratio: f64) -> Self {
        self.max_offset = Some(ratio);
        self
    }

    /// Neighbour range ratio above which a beam is a spike.
    pub fn max_offset(&self) -> Result<f64> {
        required(self.max_offset, "point.max_offset")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line
// ─────────────────────────────────────────────────────────────────────────────

/// Line segmentation parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineParams {
    /// Maximum perpendicular deviation before a range is split (meters).
    pub split_threshold: Option<f64>,
    /// Fraction of `range_max` at which a beam counts as maxed out.
    pub saturation_ratio: Option<f64>,
}

impl LineParams {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the split threshold.
    pub fn with_split_threshold(mut self, meters: f64) -> Self {
        self.split_threshold = Some(meters);
        self
    }

    /// Builder-style setter for the saturation ratio.
    pub fn with_saturation_ratio(mut self, ratio: f64) -> Self {
        self.saturation_ratio = Some(ratio);
        self
    }

    /// Maximum perpendicular deviation before splitting (meters).
    pub fn split_threshold(&self) -> Result<f64> {
        required(self.split_threshold, "line.split_threshold")
    }

    /// Fraction of `range_max` at which a beam is maxed out.
    pub fn saturation_ratio(&self) -> Result<f64> {
        required(self.saturation_ratio, "line.saturation_ratio")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Door
// ─────────────────────────────────────────────────────────────────────────────

/// Doorway detection parameters.
///
/// The side/entry/approach values are sensor calibration, not geometry:
/// re-derive them when the beam count or field of view changes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorParams {
    /// Minimum opening width (meters).
    pub min_width: Option<f64>,
    /// Maximum opening width (meters).
    pub max_width: Option<f64>,
    /// Minimum number of beams between the bounding endpoints.
    pub min_num_beams: Option<usize>,
    /// Maximum perpendicular offset between the bounding lines (meters).
    pub off_line_tolerance: Option<f64>,
    /// Minimum mean recess depth of an open door (meters).
    pub min_depth: Option<f64>,
    /// Fraction of the beam range forming each side zone (0..0.5).
    pub side_fraction: Option<f64>,
    /// Entry distance for doors in the center zone, in half-gap lengths.
    pub entry_offset_center: Option<f64>,
    /// Entry distance for doors in a side zone, in half-gap lengths.
    pub entry_offset_side: Option<f64>,
    /// Approach distance beyond the entry point, in half-gap lengths.
    pub approach_offset: Option<f64>,
}

impl DoorParams {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for both width bounds.
    pub fn with_width(mut self, min: f64, max: f64) -> Self {
        self.min_width = Some(min);
        self.max_width = Some(max);
        self
    }

    /// Builder-style setter for the minimum beam count.
    pub fn with_min_num_beams(mut self, beams: usize) -> Self {
        self.min_num_beams = Some(beams);
        self
    }

    /// Builder-style setter for the off-line tolerance.
    pub fn with_off_line_tolerance(mut self, meters: f64) -> Self {
        self.off_line_tolerance = Some(meters);
        self
    }

    /// Builder-style setter for the minimum open-door depth.
    pub fn with_min_depth(mut self, meters: f64) -> Self {
        self.min_depth = Some(meters);
        self
    }

    /// Builder-style setter for the side zone fraction.
    pub fn with_side_fraction(mut self, fraction: f64) -> Self {
        self.side_fraction = Some(fraction);
        self
    }

    /// Builder-style setter for the entry offsets (center zone, side zones).
    pub fn with_entry_offsets(mut self, center: f64, side: f64) -> Self {
        self.entry_offset_center = Some(center);
        self.entry_offset_side = Some(side);
        self
    }

    /// Builder-style setter for the approach offset.
    pub fn with_approach_offset(mut self, half_gaps: f64) -> Self {
        self.approach_offset = Some(half_gaps);
        self
    }

    /// Minimum opening width (meters).
    pub fn min_width(&self) -> Result<f64> {
        required(self.min_width, "door.min_width")
    }

    /// Maximum opening width (meters).
    pub fn max_width(&self) -> Result<f64> {
        required(self.max_width, "door.max_width")
    }

    /// Minimum number of beams between the bounding endpoints.
    pub fn min_num_beams(&self) -> Result<usize> {
        required(self.min_num_beams, "door.min_num_beams")
    }

    /// Maximum perpendicular offset between bounding lines (meters).
    pub fn off_line_tolerance(&self) -> Result<f64> {
        required(self.off_line_tolerance, "door.off_line_tolerance")
    }

    /// Minimum mean recess depth (meters).
    pub fn min_depth(&self) -> Result<f64> {
        required(self.min_depth, "door.min_depth")
    }

    /// Fraction of the beam range forming each side zone.
    pub fn side_fraction(&self) -> Result<f64> {
        required(self.side_fraction, "door.side_fraction")
    }

    /// Entry distance for center-zone doors (half-gap lengths).
    pub fn entry_offset_center(&self) -> Result<f64> {
        required(self.entry_offset_center, "door.entry_offset_center")
    }

    /// Entry distance for side-zone doors (half-gap lengths).
    pub fn entry_offset_side(&self) -> Result<f64> {
        required(self.entry_offset_side, "door.entry_offset_side")
    }

    /// Approach distance beyond entry (half-gap lengths).
    pub fn approach_offset(&self) -> Result<f64> {
        required(self.approach_offset, "door.approach_offset")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Right angle
// ─────────────────────────────────────────────────────────────────────────────

/// Right-angle window, in radians.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RightAngleParams {
    /// Smallest relative angle counted as a right angle.
    pub lower_bound: Option<f64>,
    /// Largest relative angle counted as a right angle.
    pub upper_bound: Option<f64>,
}

impl RightAngleParams {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for both bounds (radians).
    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lower_bound = Some(lower);
        self.upper_bound = Some(upper);
        self
    }

    /// Smallest relative angle counted as a right angle.
    pub fn lower_bound(&self) -> Result<f64> {
        required(self.lower_bound, "right_angle.lower_bound")
    }

    /// Largest relative angle counted as a right angle.
    pub fn upper_bound(&self) -> Result<f64> {
        required(self.upper_bound, "right_angle.upper_bound")
    }

    /// Check a relative angle (in [0, π]) against the window.
    pub fn contains(&self, relative: f64) -> Result<bool> {
        Ok(relative >= self.lower_bound()? && relative <= self.upper_bound()?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parallel / hallway
// ─────────────────────────────────────────────────────────────────────────────

/// Parallelism and hallway parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelParams {
    /// Tolerance around 0 and π for two lines to be parallel (radians).
    pub threshold: Option<f64>,
    /// Lines shorter than this add no length to a cluster (meters).
    pub min_line_length: Option<f64>,
    /// Accumulated cluster length declaring a hallway (meters).
    pub hallway_length: Option<f64>,
}

impl ParallelParams {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the parallel tolerance.
    pub fn with_threshold(mut self, radians: f64) -> Self {
        self.threshold = Some(radians);
        self
    }

    /// Builder-style setter for the minimum contributing line length.
    pub fn with_min_line_length(mut self, meters: f64) -> Self {
        self.min_line_length = Some(meters);
        self
    }

    /// Builder-style setter for the hallway length.
    pub fn with_hallway_length(mut self, meters: f64) -> Self {
        self.hallway_length = Some(meters);
        self
    }

    /// Parallel tolerance (radians).
    pub fn threshold(&self) -> Result<f64> {
        required(self.threshold, "parallel.threshold")
    }

    /// Minimum contributing line length (meters).
    pub fn min_line_length(&self) -> Result<f64> {
        required(self.min_line_length, "parallel.min_line_length")
    }

    /// Accumulated length declaring a hallway (meters).
    pub fn hallway_length(&self) -> Result<f64> {
        required(self.hallway_length, "parallel.hallway_length")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Intersection
// ─────────────────────────────────────────────────────────────────────────────

/// Intersection (branch) detection parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntersectionParams {
    /// Minimum length of a line that can originate a branch (meters).
    pub min_length: Option<f64>,
    /// Minimum branch width (meters).
    pub min_width: Option<f64>,
    /// Maximum branch width (meters).
    pub max_width: Option<f64>,
    /// Measured depth giving full confidence (meters).
    pub min_depth: Option<f64>,
    /// Confidence a branch must exceed to be reported.
    pub detection_threshold: Option<f64>,
    /// Minimum distance between reported branch entries (meters).
    pub tracking_threshold: Option<f64>,
}

impl IntersectionParams {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the minimum originating line length.
    pub fn with_min_length(mut self, meters: f64) -> Self {
        self.min_length = Some(meters);
        self
    }

    /// Builder-style setter for both width bounds.
    pub fn with_width(mut self, min: f64, max: f64) -> Self {
        self.min_width = Some(min);
        self.max_width = Some(max);
        self
    }

    /// Builder-style setter for the full-confidence depth.
    pub fn with_min_depth(mut self, meters: f64) -> Self {
        self.min_depth = Some(meters);
        self
    }

    /// Builder-style setter for the detection threshold.
    pub fn with_detection_threshold(mut self, confidence: f64) -> Self {
        self.detection_threshold = Some(confidence);
        self
    }

    /// Builder-style setter for the tracking threshold.
    pub fn with_tracking_threshold(mut self, meters: f64) -> Self {
        self.tracking_threshold = Some(meters);
        self
    }

    /// Minimum originating line length (meters).
    pub fn min_length(&self) -> Result<f64> {
        required(self.min_length, "intersection.min_length")
    }

    /// Minimum branch width (meters).
    pub fn min_width(&self) -> Result<f64> {
        required(self.min_width, "intersection.min_width")
    }

    /// Maximum branch width (meters).
    pub fn max_width(&self) -> Result<f64> {
        required(self.max_width, "intersection.max_width")
    }

    /// Depth giving full confidence (meters).
    pub fn min_depth(&self) -> Result<f64> {
        required(self.min_depth, "intersection.min_depth")
    }

    /// Confidence a branch must exceed.
    pub fn detection_threshold(&self) -> Result<f64> {
        required(self.detection_threshold, "intersection.detection_threshold")
    }

    /// Minimum distance between entries (meters).
    pub fn tracking_threshold(&self) -> Result<f64> {
        required(self.tracking_threshold, "intersection.tracking_threshold")
    }
}
