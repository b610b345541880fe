//! Feature extraction from a single laser scan.
//!
//! Every extractor implements [`FeatureExtractor`]: a stateless, pure
//! function of `(scan, model)`. Extractors that build on other features
//! (doors on lines, lines on points) hold the upstream extractors as
//! generic parameters and call them on the same scan. The line-based
//! extractors also take precomputed points and lines through
//! `extract_from_lines`, which is how [`crate::SyncDetector`] shares one
//! segmentation between them.
//!
//! # Pipeline
//!
//! ```text
//! LaserScan ──► PointExtractor ──► LineExtractor ──┬──► RightAngleExtractor
//!                     │                            ├──► HallwayDetector
//!                     └────────────────────────────┼──► DoorExtractor
//!                                                  └──► IntersectionExtractor
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use drishti::extraction::{FeatureExtractor, LineExtractor};
//! use drishti::FeatureModel;
//!
//! let model = FeatureModel::indoor();
//! let lines = LineExtractor::new().extract(&scan, &model)?;
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::LaserScan;
use crate::error::Result;
use crate::model::FeatureModel;

mod doors;
mod hallway;
mod intersections;
mod lines;
mod points;
mod right_angles;

pub use doors::{DoorExtractor, find_doors};
pub use hallway::{HallwayDetector, detect_hallway};
pub use intersections::{IntersectionExtractor, find_intersections};
pub use lines::{LineExtractor, split_lines};
pub use points::{PointExtractor, denoise};
pub use right_angles::{RightAngleExtractor, find_right_angles};

/// The six kinds of feature the pipeline produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Denoised scan points
    Points,
    /// Wall segments
    Lines,
    /// Doorways
    Doors,
    /// Corridor branches
    Intersections,
    /// Right-angle corners
    RightAngles,
    /// Hallway classification
    Hallway,
}

impl FeatureKind {
    /// All kinds in pipeline order.
    pub const ALL: [FeatureKind; 6] = [
        FeatureKind::Points,
        FeatureKind::Lines,
        FeatureKind::Doors,
        FeatureKind::Intersections,
        FeatureKind::RightAngles,
        FeatureKind::Hallway,
    ];

    /// Lowercase name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Points => "points",
            FeatureKind::Lines => "lines",
            FeatureKind::Doors => "doors",
            FeatureKind::Intersections => "intersections",
            FeatureKind::RightAngles => "right angles",
            FeatureKind::Hallway => "hallway",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stateless extractor producing one kind of feature from a scan.
///
/// Implementations must not keep per-scan state so that a single instance
/// can be shared across worker threads without locking.
pub trait FeatureExtractor: Send + Sync {
    /// Feature type produced.
    type Feature: Clone + Send + Sync + 'static;

    /// Kind tag used for logging and error attribution.
    const KIND: FeatureKind;

    /// Extract all features of this kind from `scan`.
    ///
    /// Fails with [`crate::Error::Configuration`] when a parameter the
    /// extractor needs is unset in `model`.
    fn extract(&self, scan: &LaserScan, model: &FeatureModel) -> Result<Vec<Self::Feature>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(FeatureKind::RightAngles.to_string(), "right angles");
        assert_eq!(FeatureKind::Points.to_string(), "points");
        assert_eq!(FeatureKind::ALL.len(), 6);
    }
}
