//! Concurrent feature orchestration.
//!
//! The [`Orchestrator`] runs every extractor on a fixed-size worker pool
//! each time a scan is pushed, and serves the latest result per feature
//! kind without ever extracting on the producer's thread.
//!
//! ## Architecture
//!
//! ```text
//!  producer                         worker pool (N threads)
//! ┌──────────────────────┐  jobs   ┌───────────────────────────────┐
//! │ update_laser_scan()  │────────▶│ extract(scan, model snapshot) │
//! │  seq += 1            │ channel │  catch panics                 │
//! │  snapshot model Arc  │         │  complete handle, record slot │
//! └──────────┬───────────┘         └───────────────┬───────────────┘
//!            │ replace latest handle               │
//!            ▼                                     ▼
//!     ┌─────────────────────────────────────────────────────┐
//!     │ FeatureSlot per kind: latest handle + newest result │
//!     └──────────────────────────┬──────────────────────────┘
//!                                │ points(), lines(), ...
//!                                ▼
//!                             consumer
//! ```
//!
//! Results of different kinds may come from different scans. Each task
//! keeps the model snapshot taken when its scan was submitted, so
//! [`Orchestrator::set_model`] never affects work in flight.
//!
//! A worker picking up a task whose scan is no longer the latest of its
//! kind completes it as failed without extracting, so a backlog drains at
//! queue speed rather than extraction speed.

mod config;
mod pool;
mod slot;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, error, info};
use parking_lot::RwLock;

use crate::core::{LaserScan, Point2D};
use crate::error::{Error, Result};
use crate::extraction::{
    DoorExtractor, FeatureExtractor, FeatureKind, HallwayDetector, IntersectionExtractor,
    LineExtractor, PointExtractor, RightAngleExtractor,
};
use crate::features::{Door, FeatureSnapshot, IntersectionBranch, Line};
use crate::model::FeatureModel;

pub use config::{Freshness, OrchestratorConfig};
use pool::WorkerPool;
use slot::{FeatureSlot, TaskHandle};

/// One extractor and the slot its results land in.
struct Channel<E: FeatureExtractor> {
    extractor: Arc<E>,
    slot: Arc<FeatureSlot<E::Feature>>,
}

impl<E: FeatureExtractor> Channel<E> {
    fn new(extractor: E) -> Self {
        Self {
            extractor: Arc::new(extractor),
            slot: Arc::new(FeatureSlot::new()),
        }
    }
}

/// Runs all extractors concurrently on every submitted scan.
pub struct Orchestrator {
    config: OrchestratorConfig,
    model: RwLock<Arc<FeatureModel>>,
    scan: RwLock<Option<Arc<LaserScan>>>,
    sequence: AtomicU64,
    points: Channel<PointExtractor>,
    lines: Channel<LineExtractor>,
    doors: Channel<DoorExtractor>,
    intersections: Channel<IntersectionExtractor>,
    right_angles: Channel<RightAngleExtractor>,
    hallway: Channel<HallwayDetector>,
    pool: WorkerPool,
}

impl Orchestrator {
    /// Create an orchestrator with the default configuration.
    pub fn new(model: FeatureModel) -> Result<Self> {
        Self::with_config(model, OrchestratorConfig::default())
    }

    /// Create an orchestrator with an explicit configuration.
    pub fn with_config(model: FeatureModel, config: OrchestratorConfig) -> Result<Self> {
        config.validate()?;
        let pool = WorkerPool::new(config.workers)?;
        info!(
            "Orchestrator ready ({} workers, {:?} freshness)",
            pool.size(),
            config.freshness
        );

        Ok(Self {
            config,
            model: RwLock::new(Arc::new(model)),
            scan: RwLock::new(None),
            sequence: AtomicU64::new(0),
            points: Channel::new(PointExtractor::new()),
            lines: Channel::new(LineExtractor::new()),
            doors: Channel::new(DoorExtractor::new()),
            intersections: Channel::new(IntersectionExtractor::new()),
            right_angles: Channel::new(RightAngleExtractor::new()),
            hallway: Channel::new(HallwayDetector::new()),
            pool,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Replace the model for scans submitted from now on.
    pub fn set_model(&self, model: FeatureModel) {
        *self.model.write() = Arc::new(model);
        info!("Feature model replaced");
    }

    /// Current model.
    pub fn model(&self) -> Arc<FeatureModel> {
        self.model.read().clone()
    }

    /// Most recently submitted scan.
    pub fn latest_scan(&self) -> Option<Arc<LaserScan>> {
        self.scan.read().clone()
    }

    /// Sequence number of the most recently submitted scan (0 before the first).
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Submit a scan to every extractor. Returns its sequence number.
    ///
    /// Never blocks on extraction.
    pub fn update_laser_scan(&self, scan: LaserScan) -> u64 {
        let scan = Arc::new(scan);
        *self.scan.write() = Some(Arc::clone(&scan));
        let model = self.model();
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        self.submit(&self.points, sequence, &scan, &model);
        self.submit(&self.lines, sequence, &scan, &model);
        self.submit(&self.doors, sequence, &scan, &model);
        self.submit(&self.intersections, sequence, &scan, &model);
        self.submit(&self.right_angles, sequence, &scan, &model);
        self.submit(&self.hallway, sequence, &scan, &model);

        debug!("Submitted scan {} ({} beams)", sequence, scan.len());
        sequence
    }

    fn submit<E>(
        &self,
        channel: &Channel<E>,
        sequence: u64,
        scan: &Arc<LaserScan>,
        model: &Arc<FeatureModel>,
    ) where
        E: FeatureExtractor + 'static,
    {
        let handle = Arc::new(TaskHandle::new(sequence));
        channel.slot.submit(Arc::clone(&handle));

        let extractor = Arc::clone(&channel.extractor);
        let slot = Arc::clone(&channel.slot);
        let scan = Arc::clone(scan);
        let model = Arc::clone(model);
        let task_handle = Arc::clone(&handle);

        let queued = self.pool.execute(move || {
            run_task(extractor.as_ref(), &slot, &task_handle, &scan, &model);
        });

        if !queued {
            handle.complete(Err(Error::ExtractionFailure {
                kind: E::KIND,
                reason: "worker pool is shut down".into(),
            }));
        }
    }

    /// Denoised points.
    pub fn points(&self) -> Arc<Vec<Point2D>> {
        self.points.slot.get(self.config.freshness)
    }

    /// Wall segments.
    pub fn lines(&self) -> Arc<Vec<Line>> {
        self.lines.slot.get(self.config.freshness)
    }

    /// Doorways.
    pub fn doors(&self) -> Arc<Vec<Door>> {
        self.doors.slot.get(self.config.freshness)
    }

    /// Corridor branches.
    pub fn intersections(&self) -> Arc<Vec<IntersectionBranch>> {
        self.intersections.slot.get(self.config.freshness)
    }

    /// Right-angle corners.
    pub fn right_angles(&self) -> Arc<Vec<Point2D>> {
        self.right_angles.slot.get(self.config.freshness)
    }

    /// Hallway classification; `false` when unavailable.
    pub fn in_hallway(&self) -> bool {
        self.hallway
            .slot
            .get(self.config.freshness)
            .first()
            .copied()
            .unwrap_or(false)
    }

    /// Every feature kind gathered into one snapshot.
    ///
    /// Kinds are fetched one after another and may come from different
    /// scans under [`Freshness::Available`].
    pub fn snapshot(&self) -> FeatureSnapshot {
        FeatureSnapshot {
            points: self.points().as_ref().clone(),
            lines: self.lines().as_ref().clone(),
            doors: self.doors().as_ref().clone(),
            intersections: self.intersections().as_ref().clone(),
            right_angles: self.right_angles().as_ref().clone(),
            in_hallway: self.in_hallway(),
        }
    }

    /// Wait for the latest task of `kind` and return its error, if it failed.
    pub fn failure(&self, kind: FeatureKind) -> Option<Error> {
        match kind {
            FeatureKind::Points => latest_failure(&self.points.slot),
            FeatureKind::Lines => latest_failure(&self.lines.slot),
            FeatureKind::Doors => latest_failure(&self.doors.slot),
            FeatureKind::Intersections => latest_failure(&self.intersections.slot),
            FeatureKind::RightAngles => latest_failure(&self.right_angles.slot),
            FeatureKind::Hallway => latest_failure(&self.hallway.slot),
        }
    }

    /// Sequence number of the newest successful result of `kind`.
    pub fn completed_sequence(&self, kind: FeatureKind) -> Option<u64> {
        match kind {
            FeatureKind::Points => self.points.slot.completed_sequence(),
            FeatureKind::Lines => self.lines.slot.completed_sequence(),
            FeatureKind::Doors => self.doors.slot.completed_sequence(),
            FeatureKind::Intersections => self.intersections.slot.completed_sequence(),
            FeatureKind::RightAngles => self.right_angles.slot.completed_sequence(),
            FeatureKind::Hallway => self.hallway.slot.completed_sequence(),
        }
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        info!(
            "Orchestrator shutting down after {} scans",
            self.sequence.load(Ordering::SeqCst)
        );
    }
}

fn latest_failure<T>(slot: &FeatureSlot<T>) -> Option<Error> {
    slot.wait_latest().and_then(|result| result.err())
}

/// Worker side of one submission. A task whose scan has been superseded by
/// the time it runs completes with [`Error::ExtractionFailure`] unextracted.
fn run_task<E: FeatureExtractor>(
    extractor: &E,
    slot: &FeatureSlot<E::Feature>,
    handle: &TaskHandle<E::Feature>,
    scan: &LaserScan,
    model: &FeatureModel,
) {
    let sequence = handle.sequence();
    if let Some(newer) = slot.superseded_by(sequence) {
        debug!("Scan {}: {} skipped for scan {}", sequence, E::KIND, newer);
        handle.complete(Err(Error::ExtractionFailure {
            kind: E::KIND,
            reason: format!("superseded by scan {newer}"),
        }));
        return;
    }

    let result = run_extractor(extractor, scan, model);
    match &result {
        Ok(features) => {
            debug!(
                "Scan {}: {} extraction produced {} features",
                sequence,
                E::KIND,
                features.len()
            );
            slot.record(sequence, Arc::clone(features));
        }
        Err(e) => error!("Scan {}: {} extraction failed: {}", sequence, E::KIND, e),
    }
    handle.complete(result);
}

/// Run one extractor, turning a panic into [`Error::ExtractionFailure`].
fn run_extractor<E: FeatureExtractor>(
    extractor: &E,
    scan: &LaserScan,
    model: &FeatureModel,
) -> Result<Arc<Vec<E::Feature>>> {
    match panic::catch_unwind(AssertUnwindSafe(|| extractor.extract(scan, model))) {
        Ok(result) => result.map(Arc::new),
        Err(payload) => Err(Error::ExtractionFailure {
            kind: E::KIND,
            reason: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "extractor panicked".to_string()
    }
}
