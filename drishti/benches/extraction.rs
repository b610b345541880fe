//! Benchmark feature extraction on simulated scans.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::f64::consts::PI;
use std::hint::black_box;

use drishti::extraction::{
    DoorExtractor, FeatureExtractor, IntersectionExtractor, LineExtractor, PointExtractor,
};
use drishti::sim::WallScene;
use drishti::{FeatureModel, LaserScan, SyncDetector};

fn scenes(beams: usize) -> Vec<(&'static str, LaserScan)> {
    vec![
        ("doorway", WallScene::doorway().scan(0.0, PI, beams, 10.0)),
        ("t_junction", WallScene::t_junction().scan(0.0, PI, beams, 10.0)),
    ]
}

fn bench_extractors(c: &mut Criterion) {
    let model = FeatureModel::indoor();
    let mut group = c.benchmark_group("extractors");

    for (name, scan) in scenes(181) {
        group.bench_with_input(BenchmarkId::new("points", name), &scan, |b, scan| {
            let extractor = PointExtractor::new();
            b.iter(|| extractor.extract(black_box(scan), &model))
        });
        group.bench_with_input(BenchmarkId::new("lines", name), &scan, |b, scan| {
            let extractor = LineExtractor::new();
            b.iter(|| extractor.extract(black_box(scan), &model))
        });
        group.bench_with_input(BenchmarkId::new("doors", name), &scan, |b, scan| {
            let extractor = DoorExtractor::new();
            b.iter(|| extractor.extract(black_box(scan), &model))
        });
        group.bench_with_input(BenchmarkId::new("intersections", name), &scan, |b, scan| {
            let extractor = IntersectionExtractor::new();
            b.iter(|| extractor.extract(black_box(scan), &model))
        });
    }

    group.finish();
}

fn bench_sync_detector(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_detector");

    for beams in [181, 361, 721] {
        let scan = WallScene::t_junction().scan(0.0, PI, beams, 10.0);
        group.bench_with_input(BenchmarkId::from_parameter(beams), &scan, |b, scan| {
            let mut detector = SyncDetector::default();
            b.iter(|| detector.update_features(black_box(scan)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extractors, bench_sync_detector);
criterion_main!(benches);
