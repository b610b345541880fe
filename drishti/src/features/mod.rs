//! Feature types produced by the extractors.
//!
//! - [`Line`]: wall segment over a run of beams
//! - [`Door`]: candidate doorway
//! - [`IntersectionBranch`]: opening into another corridor
//! - [`FeatureSnapshot`]: every feature of one scan

mod door;
mod intersection;
mod line;
mod snapshot;

pub use door::{Door, DoorState};
pub use intersection::IntersectionBranch;
pub use line::Line;
pub use snapshot::FeatureSnapshot;
