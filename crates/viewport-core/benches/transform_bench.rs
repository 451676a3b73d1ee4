//! Criterion benchmarks for the coordinate transform hot path.
//!
//! Every pointer sample on a mapped display goes through
//! [`CoordinateTransform::physical_to_logical`], so both the precomputed
//! path and the one-shot [`transform`] (which validates on each call) are
//! measured for all four orientations.
//!
//! Run with:
//! ```bash
//! cargo bench --package viewport-core --bench transform_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use viewport_core::{
    transform, CoordinateTransform, Direction, Orientation, PointF, Rect, ViewportModel,
};

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// A 1080x2400 panel presenting a 540x1200 logical display in `orientation`.
fn build_viewport(orientation: Orientation) -> ViewportModel {
    let (dw, dh) = orientation.natural_size(1080, 2400);
    ViewportModel::builder()
        .orientation(orientation)
        .logical_frame(Rect::from_size(540, 1200))
        .physical_frame(Rect::from_size(dw, dh))
        .device_size(dw, dh)
        .unique_id("bench")
        .build()
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_physical_to_logical(c: &mut Criterion) {
    let mut group = c.benchmark_group("physical_to_logical");

    for orientation in Orientation::ALL {
        let t = CoordinateTransform::new(&build_viewport(orientation)).expect("valid viewport");
        group.bench_with_input(
            BenchmarkId::new("precomputed", orientation.degrees()),
            &t,
            |b, t| b.iter(|| t.physical_to_logical(black_box(PointF::new(512.5, 1024.25)))),
        );
    }

    group.finish();
}

fn bench_one_shot_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("one_shot_transform");

    for orientation in Orientation::ALL {
        let v = build_viewport(orientation);
        group.bench_with_input(
            BenchmarkId::new("validate_and_map", orientation.degrees()),
            &v,
            |b, v| {
                b.iter(|| {
                    transform(
                        black_box(PointF::new(512.5, 1024.25)),
                        black_box(v),
                        Direction::PhysicalToLogical,
                    )
                })
            },
        );
    }

    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let t = CoordinateTransform::new(&build_viewport(Orientation::Rotation270))
        .expect("valid viewport");

    c.bench_function("round_trip_270", |b| {
        b.iter(|| t.logical_to_physical(t.physical_to_logical(black_box(PointF::new(10.0, 20.0)))))
    });
}

criterion_group!(
    benches,
    bench_physical_to_logical,
    bench_one_shot_transform,
    bench_round_trip,
);
criterion_main!(benches);
