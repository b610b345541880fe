//! Synchronous feature detector.
//!
//! Runs the whole pipeline on the caller's thread and caches the resulting
//! [`FeatureSnapshot`]. The detector owns one instance of each extractor.
//! Points and lines are computed once per scan and handed to the downstream
//! extractors through their `extract_from_lines` methods, so every feature
//! in a snapshot comes from the same scan and model.
//!
//! Use [`crate::Orchestrator`] when extraction must not block the producer.

use std::sync::Arc;

use log::debug;

use crate::core::{LaserScan, Point2D};
use crate::error::Result;
use crate::extraction::{
    DoorExtractor, FeatureExtractor, HallwayDetector, IntersectionExtractor, LineExtractor,
    PointExtractor, RightAngleExtractor,
};
use crate::features::{Door, FeatureSnapshot, IntersectionBranch, Line};
use crate::model::FeatureModel;

/// Sequential pipeline with a cached latest result.
#[derive(Clone, Debug)]
pub struct SyncDetector {
    points: PointExtractor,
    lines: LineExtractor,
    doors: DoorExtractor,
    intersections: IntersectionExtractor,
    right_angles: RightAngleExtractor,
    hallway: HallwayDetector,
    model: Arc<FeatureModel>,
    snapshot: FeatureSnapshot,
    scans: u64,
}

impl SyncDetector {
    /// Create a detector for the given model.
    pub fn new(model: FeatureModel) -> Self {
        Self::with_shared_model(Arc::new(model))
    }

    /// Create a detector sharing an existing model.
    pub fn with_shared_model(model: Arc<FeatureModel>) -> Self {
        Self {
            points: PointExtractor::new(),
            lines: LineExtractor::new(),
            doors: DoorExtractor::new(),
            intersections: IntersectionExtractor::new(),
            right_angles: RightAngleExtractor::new(),
            hallway: HallwayDetector::new(),
            model,
            snapshot: FeatureSnapshot::new(),
            scans: 0,
        }
    }

    /// Replace the model used for subsequent scans.
    pub fn set_model(&mut self, model: FeatureModel) {
        self.model = Arc::new(model);
    }

    /// Current model.
    pub fn model(&self) -> &Arc<FeatureModel> {
        &self.model
    }

    /// Extract every feature from `scan` and cache the result.
    ///
    /// Order: points, lines, doors, intersections, right angles, hallway.
    /// The first error is returned and the previous snapshot is kept.
    pub fn update_features(&mut self, scan: &LaserScan) -> Result<()> {
        let model = self.model.as_ref();

        let points = self.points.extract(scan, model)?;
        let lines = self.lines.extract_from_points(scan, &points, model)?;
        let doors = self.doors.extract_from_lines(scan, &points, &lines, model)?;
        let intersections = self
            .intersections
            .extract_from_lines(scan, &points, &lines, model)?;
        let right_angles = self.right_angles.extract_from_lines(&lines, model)?;
        let in_hallway = self.hallway.extract_from_lines(&lines, model)?;

        self.scans += 1;
        debug!(
            "Scan {}: {} lines, {} doors, {} branches, {} corners, hallway={}",
            self.scans,
            lines.len(),
            doors.len(),
            intersections.len(),
            right_angles.len(),
            in_hallway
        );

        self.snapshot = FeatureSnapshot {
            points,
            lines,
            doors,
            intersections,
            right_angles,
            in_hallway,
        };
        Ok(())
    }

    /// Number of scans processed successfully.
    pub fn scan_count(&self) -> u64 {
        self.scans
    }

    /// All features of the latest scan.
    pub fn snapshot(&self) -> &FeatureSnapshot {
        &self.snapshot
    }

    /// Denoised points of the latest scan.
    pub fn points(&self) -> &[Point2D] {
        &self.snapshot.points
    }

    /// Lines of the latest scan.
    pub fn lines(&self) -> &[Line] {
        &self.snapshot.lines
    }

    /// Doorways of the latest scan.
    pub fn doors(&self) -> &[Door] {
        &self.snapshot.doors
    }

    /// Corridor branches of the latest scan.
    pub fn intersections(&self) -> &[IntersectionBranch] {
        &self.snapshot.intersections
    }

    /// Right-angle corners of the latest scan.
    pub fn right_angles(&self) -> &[Point2D] {
        &self.snapshot.right_angles
    }

    /// Whether the latest scan was classified as a hallway.
    pub fn in_hallway(&self) -> bool {
        self.snapshot.in_hallway
    }
}

impl Default for SyncDetector {
    fn default() -> Self {
        Self::new(FeatureModel::indoor())
    }
}
