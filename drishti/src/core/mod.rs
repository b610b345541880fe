//! Core types shared by every extractor.
//!
//! - [`Point2D`]: Cartesian point in the sensor frame
//! - [`LaserScan`]: raw polar sweep
//! - [`math`]: angle and planar geometry helpers

pub mod math;
mod point;
mod scan;

pub use point::Point2D;
pub use scan::LaserScan;
