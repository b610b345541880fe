//! End-to-end pipeline tests on simulated scenes.
//!
//! Each scene is ray-cast from the origin over a 180° sweep at 1°
//! resolution and run through [`SyncDetector`] with the indoor model.
//!
//! Run with: `cargo test --test pipeline`

mod common;

use approx::assert_relative_eq;
use drishti::sim::WallScene;
use drishti::{DoorState, FeatureModel, LaserScan, Point2D, SyncDetector};

use common::{doorway_scan, init_logging, sweep, t_junction_scan};

fn detect(scan: &LaserScan) -> SyncDetector {
    let mut detector = SyncDetector::new(FeatureModel::indoor());
    detector.update_features(scan).unwrap();
    detector
}

/// Structural properties every extraction must satisfy.
fn assert_well_formed(detector: &SyncDetector, model: &FeatureModel) {
    let lines = detector.lines();
    for line in lines {
        assert!(line.start_beam < line.end_beam);
        assert!((0.0..=1.0).contains(&line.confidence));
    }
    for pair in lines.windows(2) {
        assert_eq!(pair[0].end_beam, pair[1].start_beam);
    }
    if let (Some(first), Some(last)) = (lines.first(), lines.last()) {
        assert_eq!(first.start_beam, 0);
        assert_eq!(last.end_beam, detector.points().len() - 1);
    }

    let door = model.door();
    for d in detector.doors() {
        assert!(d.width >= door.min_width().unwrap());
        assert!(d.width <= door.max_width().unwrap());
        assert!(d.lower_index < d.center_index && d.center_index < d.upper_index);
    }

    let branch = model.intersection();
    let entries: Vec<Point2D> = detector.intersections().iter().map(|b| b.entry).collect();
    for b in detector.intersections() {
        assert!(b.width() >= branch.min_width().unwrap());
        assert!(b.width() <= branch.max_width().unwrap());
        assert!(b.confidence > branch.detection_threshold().unwrap());
        assert!(b.confidence <= 1.0);
    }
    for (i, a) in entries.iter().enumerate() {
        for b in &entries[i + 1..] {
            assert!(a.distance(*b) > branch.tracking_threshold().unwrap());
        }
    }

    for corner in detector.right_angles() {
        assert!(lines.iter().any(|l| l.start == *corner));
    }
}

// ============================================================================
// Scenes
// ============================================================================

#[test]
fn test_doorway_scene() {
    init_logging();
    let detector = detect(&doorway_scan());

    assert_eq!(detector.points().len(), 181);
    assert_eq!(detector.lines().len(), 7);
    assert_eq!(detector.doors().len(), 1);

    let door = detector.doors()[0];
    assert_eq!(door.state, DoorState::Open);
    assert_relative_eq!(door.width, 0.9235, epsilon = 1e-3);
    assert!(door.center_point.approx_eq(Point2D::new(0.0, 2.0), 1e-6));
    assert!(door.entry_point.y < door.center_point.y);
    assert!(door.exit_point.y > door.center_point.y);
    assert!(door.approach_point.y < door.entry_point.y);

    assert_well_formed(&detector, &FeatureModel::indoor());
}

#[test]
fn test_t_junction_scene() {
    init_logging();
    let detector = detect(&t_junction_scan());

    assert_eq!(detector.intersections().len(), 1);
    let branch = detector.intersections()[0];
    assert!(branch.entry.approx_eq(Point2D::new(0.6, 2.4813), 1e-3));
    assert_relative_eq!(branch.confidence, 1.0);
    assert!(detector.in_hallway());

    assert_well_formed(&detector, &FeatureModel::indoor());
}

#[test]
fn test_gap_in_straight_wall() {
    // Corridor whose right wall has a 1 m gap; the far side of the gap is
    // the same wall, so the branch comes from a parallel pair.
    init_logging();
    let scene = WallScene::new()
        .with_wall(Point2D::new(0.6, -1.0), Point2D::new(0.6, 2.0))
        .with_wall(Point2D::new(0.6, 3.0), Point2D::new(0.6, 6.0))
        .with_wall(Point2D::new(0.6, 6.0), Point2D::new(-0.6, 6.0))
        .with_wall(Point2D::new(-0.6, 6.0), Point2D::new(-0.6, -1.0));
    let detector = detect(&sweep(&scene));

    assert_eq!(detector.lines().len(), 9);
    assert_eq!(detector.intersections().len(), 1);
    let branch = detector.intersections()[0];
    assert!(branch.corners[0].approx_eq(Point2D::new(0.6, 1.9625), 1e-3));
    assert!(branch.corners[1].approx_eq(Point2D::new(0.6, 3.0867), 1e-3));
    assert!(branch.entry.approx_eq(Point2D::new(0.6, 2.5246), 1e-3));
    assert_relative_eq!(branch.measured_depth, 7.4051, epsilon = 1e-3);
    assert_relative_eq!(branch.confidence, 1.0);
    assert!(detector.doors().is_empty());
    assert!(detector.in_hallway());

    assert_well_formed(&detector, &FeatureModel::indoor());
}

#[test]
fn test_l_shaped_room() {
    // Concave room: the right wall steps out at y = 1.5 and the inner corner
    // hides part of the wider wing. Branch containment follows extraction
    // order, which is not a simple polygon here.
    init_logging();
    let scene = WallScene::new()
        .with_wall(Point2D::new(1.0, -0.5), Point2D::new(1.0, 1.5))
        .with_wall(Point2D::new(1.0, 1.5), Point2D::new(3.0, 1.5))
        .with_wall(Point2D::new(3.0, 1.5), Point2D::new(3.0, 4.0))
        .with_wall(Point2D::new(3.0, 4.0), Point2D::new(-1.0, 4.0))
        .with_wall(Point2D::new(-1.0, 4.0), Point2D::new(-1.0, -0.5));
    let detector = detect(&sweep(&scene));

    assert!(detector.lines().len() >= 4);
    assert!(detector.doors().is_empty());
    assert!(!detector.right_angles().is_empty());
    assert!(detector.intersections().is_empty());
    assert_well_formed(&detector, &FeatureModel::indoor());
}

#[test]
fn test_open_space_has_no_features() {
    init_logging();
    let detector = detect(&sweep(&WallScene::new()));

    assert_eq!(detector.points().len(), 181);
    for line in detector.lines() {
        assert_eq!(line.confidence, 0.0);
    }
    assert!(detector.doors().is_empty());
    assert!(detector.intersections().is_empty());
    assert!(!detector.in_hallway());
}

// ============================================================================
// Robustness
// ============================================================================

#[test]
fn test_malformed_scan_processed_best_effort() {
    init_logging();
    let mut scan = doorway_scan();
    scan.ranges[10] = f64::NAN;
    scan.ranges[11] = f64::INFINITY;
    assert!(scan.validate().is_err());

    let detector = detect(&scan);
    assert_eq!(detector.points().len(), 181);
    assert!(detector.points().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    assert_well_formed(&detector, &FeatureModel::indoor());
}

#[test]
fn test_beam_count_mismatch_processed_best_effort() {
    init_logging();
    let mut scan = doorway_scan();
    scan.ranges.truncate(150);
    assert!(scan.validate().is_err());

    let detector = detect(&scan);
    assert_eq!(detector.points().len(), 150);
}

#[test]
fn test_repeated_scan_is_deterministic() {
    let scan = t_junction_scan();
    let mut detector = SyncDetector::new(FeatureModel::indoor());
    detector.update_features(&scan).unwrap();
    let first = detector.snapshot().clone();
    detector.update_features(&scan).unwrap();

    assert_eq!(detector.snapshot(), &first);
    assert_eq!(detector.scan_count(), 2);
}

#[test]
fn test_snapshot_serializes_to_json() {
    let detector = detect(&doorway_scan());
    let value = serde_json::to_value(detector.snapshot()).unwrap();

    assert_eq!(value["lines"].as_array().map(Vec::len), Some(7));
    assert_eq!(value["doors"][0]["state"], "Open");
    assert_eq!(value["in_hallway"], detector.in_hallway());
}
