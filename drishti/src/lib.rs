//! # Drishti: Navigational Features from 2D Laser Scans
//!
//! Extracts the features a mobile robot needs to navigate indoor corridors
//! from a single planar laser sweep: denoised points, wall segments,
//! doorways, corridor branches, right-angle corners and whether the robot
//! stands in a hallway.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use drishti::{FeatureModel, LaserScan, SyncDetector};
//! use std::f64::consts::PI;
//!
//! let mut detector = SyncDetector::new(FeatureModel::indoor());
//! let scan = LaserScan::evenly_spaced(0.0, PI, 10.0, vec![2.0; 181]);
//! detector.update_features(&scan)?;
//! println!("{} lines, hallway={}", detector.lines().len(), detector.in_hallway());
//! # Ok::<(), drishti::Error>(())
//! ```
//!
//! ## Coordinate Frame
//!
//! Points are in the robot frame: X forward, Y left, counter-clockwise
//! bearings. Beam `i` of a scan has bearing `angle_min + i * angle_increment`.
//!
//! ## Architecture
//!
//! - [`core`]: scan, point and angle helpers
//! - [`model`]: the [`FeatureModel`] threshold table
//! - [`features`]: feature value types
//! - [`extraction`]: the six extractors and the [`FeatureExtractor`] trait
//! - [`detector`]: [`SyncDetector`], the whole pipeline on the caller's thread
//! - [`orchestrator`]: [`Orchestrator`], the pipeline on a worker pool
//! - [`sim`]: ray-cast wall scenes for tests, benches and demos
//!
//! ## Data Flow
//!
//! ```text
//!        ┌─────────────┐
//!        │  LaserScan  │
//!        └──────┬──────┘
//!               │ denoise
//!               ▼
//!        ┌─────────────┐
//!        │   Points    │
//!        └──────┬──────┘
//!               │ split
//!               ▼
//!        ┌─────────────┐
//!        │    Lines    │
//!        └──────┬──────┘
//!               │
//!    ┌──────────┼───────────┬──────────────┐
//!    ▼          ▼           ▼              ▼
//!  Doors  Intersections  Right angles   Hallway
//! ```

pub mod core;
pub mod detector;
pub mod error;
pub mod extraction;
pub mod features;
pub mod model;
pub mod orchestrator;
pub mod sim;

// Re-export main types at crate root
pub use core::{LaserScan, Point2D};
pub use detector::SyncDetector;
pub use error::{Error, Result};
pub use extraction::{FeatureExtractor, FeatureKind};
pub use features::{Door, DoorState, FeatureSnapshot, IntersectionBranch, Line};
pub use model::FeatureModel;
pub use orchestrator::{Freshness, Orchestrator, OrchestratorConfig};
