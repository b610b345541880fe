//! Ray-cast scan simulation over wall segments.
//!
//! Generates noise-free scans from the sensor origin for fixtures, demos
//! and benchmarks. Beams that hit nothing read `range_max`.
//!
//! ```rust,ignore
//! use drishti::sim::WallScene;
//!
//! let scan = WallScene::doorway().scan(0.0, std::f64::consts::PI, 181, 10.0);
//! ```

use crate::core::{LaserScan, Point2D};

/// Tolerance for parallel rays and for hits on wall endpoints.
const PARALLEL_EPSILON: f64 = 1e-12;

/// Minimum hit distance along a ray.
const MIN_HIT_DISTANCE: f64 = 1e-9;

/// A set of wall segments around the sensor at the origin.
#[derive(Clone, Debug, Default)]
pub struct WallScene {
    walls: Vec<(Point2D, Point2D)>,
}

impl WallScene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style wall insertion.
    pub fn with_wall(mut self, a: Point2D, b: Point2D) -> Self {
        self.add_wall(a, b);
        self
    }

    /// Add a wall segment.
    pub fn add_wall(&mut self, a: Point2D, b: Point2D) {
        self.walls.push((a, b));
    }

    /// Wall segments in insertion order.
    pub fn walls(&self) -> &[(Point2D, Point2D)] {
        &self.walls
    }

    /// Room wall ahead with a 0.9 m doorway opening onto a recess.
    ///
    /// The front wall runs along y = 2 with the opening between x = ±0.45;
    /// the recess behind it is 2 m deep.
    pub fn doorway() -> Self {
        Self::new()
            .with_wall(Point2D::new(3.0, 0.0), Point2D::new(3.0, 2.0))
            .with_wall(Point2D::new(3.0, 2.0), Point2D::new(0.45, 2.0))
            .with_wall(Point2D::new(-0.45, 2.0), Point2D::new(-3.0, 2.0))
            .with_wall(Point2D::new(-3.0, 2.0), Point2D::new(-3.0, 0.0))
            .with_wall(Point2D::new(-2.0, 4.0), Point2D::new(2.0, 4.0))
            .with_wall(Point2D::new(0.45, 2.0), Point2D::new(0.45, 4.0))
            .with_wall(Point2D::new(-0.45, 2.0), Point2D::new(-0.45, 4.0))
    }

    /// Corridor 1.2 m wide running ahead, with a 1 m side branch to the
    /// right between y = 2 and y = 3 and a dead end at y = 6.
    pub fn t_junction() -> Self {
        Self::new()
            .with_wall(Point2D::new(0.6, -1.0), Point2D::new(0.6, 2.0))
            .with_wall(Point2D::new(0.6, 2.0), Point2D::new(4.0, 2.0))
            .with_wall(Point2D::new(0.6, 3.0), Point2D::new(4.0, 3.0))
            .with_wall(Point2D::new(0.6, 3.0), Point2D::new(0.6, 6.0))
            .with_wall(Point2D::new(0.6, 6.0), Point2D::new(-0.6, 6.0))
            .with_wall(Point2D::new(-0.6, 6.0), Point2D::new(-0.6, -1.0))
    }

    /// Distance from the origin to the nearest wall along `bearing`,
    /// capped at `max_range`.
    pub fn ray_cast(&self, bearing: f64, max_range: f64) -> f64 {
        let dir = Point2D::from_polar(1.0, bearing);
        let mut best = max_range;

        for &(a, b) in &self.walls {
            let seg = b - a;
            let denom = dir.cross(seg);
            if denom.abs() < PARALLEL_EPSILON {
                continue;
            }
            // Origin is the ray start, so `a` is also the offset to the wall.
            let t = a.cross(seg) / denom;
            let u = a.cross(dir) / denom;
            let on_wall = (-PARALLEL_EPSILON..=1.0 + PARALLEL_EPSILON).contains(&u);
            if t > MIN_HIT_DISTANCE && on_wall && t < best {
                best = t;
            }
        }
        best
    }

    /// Simulate a scan of `beams` rays evenly spread over `[angle_min, angle_max]`.
    pub fn scan(&self, angle_min: f64, angle_max: f64, beams: usize, range_max: f64) -> LaserScan {
        let increment = if beams > 1 {
            (angle_max - angle_min) / (beams - 1) as f64
        } else {
            0.0
        };
        let ranges = (0..beams)
            .map(|i| self.ray_cast(angle_min + i as f64 * increment, range_max))
            .collect();
        LaserScan::new(angle_min, angle_max, increment, 0.0, range_max, ranges)
    }
}
