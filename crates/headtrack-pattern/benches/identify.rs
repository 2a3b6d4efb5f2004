use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use headtrack_core::{FrameView, Point3D};
use headtrack_pattern::{PatternIdentifier, PatternParams, ReferencePattern};

/// Two heads plus `clutter` body markers on a loose lattice.
fn synthetic_frame(clutter: usize) -> Vec<Point3D> {
    let mut pts = vec![
        Point3D::new(0.0, 0.0, 1600.0),
        Point3D::new(100.0, 0.0, 1600.0),
        Point3D::new(0.0, 100.0, 1600.0),
        Point3D::new(800.0, 0.0, 1550.0),
        Point3D::new(830.0, 0.0, 1550.0),
        Point3D::new(800.0, 40.0, 1550.0),
    ];
    for k in 0..clutter {
        let f = k as f32;
        pts.push(Point3D::new(
            -500.0 + 173.0 * (f * 0.37).sin() + 61.0 * f % 900.0,
            300.0 + 97.0 * (f * 1.3).cos(),
            900.0 + 11.0 * f % 700.0,
        ));
    }
    pts
}

fn bench_identify(c: &mut Criterion) {
    let params = PatternParams::two_heads(
        ReferencePattern::from_lengths([100.0, 100.0, 141.42]).expect("pattern"),
        ReferencePattern::from_lengths([30.0, 40.0, 50.0]).expect("pattern"),
    );
    let identifier = PatternIdentifier::new(params).expect("identifier");

    let mut group = c.benchmark_group("identify");
    for clutter in [10usize, 40, 120] {
        let frame = synthetic_frame(clutter);
        group.bench_with_input(BenchmarkId::from_parameter(clutter), &frame, |b, frame| {
            b.iter(|| identifier.identify(black_box(&FrameView::new(frame))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_identify);
criterion_main!(benches);
