//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::f64::consts::PI;

use drishti::LaserScan;
use drishti::sim::WallScene;

/// Beams in a 180° fixture sweep (1° resolution).
pub const BEAMS: usize = 181;

/// Range limit of fixture scans.
pub const RANGE_MAX: f64 = 10.0;

/// Route log output through the test harness; safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Front half-sweep of `scene` from the origin.
pub fn sweep(scene: &WallScene) -> LaserScan {
    scene.scan(0.0, PI, BEAMS, RANGE_MAX)
}

pub fn doorway_scan() -> LaserScan {
    sweep(&WallScene::doorway())
}

pub fn t_junction_scan() -> LaserScan {
    sweep(&WallScene::t_junction())
}
