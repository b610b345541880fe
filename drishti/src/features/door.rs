//! Doorway descriptor.

use serde::{Deserialize, Serialize};

use crate::core::Point2D;

/// Whether a doorway is passable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorState {
    /// Opening with free space behind it.
    Open,
    /// Door leaf present in the opening.
    Closed,
}

/// A candidate doorway between two wall endpoints.
///
/// Beam indices satisfy `lower_index < center_index < upper_index`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Door {
    /// Beam of the first bounding endpoint.
    pub lower_index: usize,
    /// Beam halfway across the opening.
    pub center_index: usize,
    /// Beam of the second bounding endpoint.
    pub upper_index: usize,
    /// Distance between the two bounding endpoints (meters).
    pub width: f64,
    /// Mean range across the opening's beams (meters).
    pub depth: f64,
    /// Distance from the sensor to `center_point` (meters).
    pub center_distance: f64,
    /// Midpoint between the bounding endpoints.
    pub center_point: Point2D,
    /// Point in front of the opening, on the sensor side.
    pub entry_point: Point2D,
    /// Point beyond the opening, on the far side.
    pub exit_point: Point2D,
    /// Staging point before `entry_point`.
    pub approach_point: Point2D,
    /// Detection confidence in [0, 1].
    pub confidence: f64,
    /// Open or closed.
    pub state: DoorState,
}
