use approx::assert_relative_eq;
use headtrack::core::Point3D;
use headtrack::pattern::{PatternParams, ReferencePattern};
use headtrack::{HeadTracker, TrackerConfig};

fn two_head_config() -> TrackerConfig {
    let head_a = ReferencePattern::from_lengths([100.0, 100.0, 141.42]).expect("head a");
    let head_b = ReferencePattern::from_lengths([30.0, 40.0, 50.0]).expect("head b");
    let mut cfg = TrackerConfig::new(PatternParams::two_heads(head_a, head_b).with_epsilon(3.0));
    cfg.covariance.window = 5;
    cfg
}

fn head_a(o: [f32; 3]) -> [Point3D; 3] {
    [
        Point3D::new(o[0], o[1], o[2]),
        Point3D::new(o[0] + 100.0, o[1], o[2]),
        Point3D::new(o[0], o[1] + 100.0, o[2]),
    ]
}

fn head_b(o: [f32; 3]) -> [Point3D; 3] {
    [
        Point3D::new(o[0], o[1], o[2]),
        Point3D::new(o[0] + 30.0, o[1], o[2]),
        Point3D::new(o[0], o[1] + 40.0, o[2]),
    ]
}

/// Frame with both heads, markers interleaved in a frame-dependent order.
fn frame(k: usize) -> Vec<Point3D> {
    let t = k as f32;
    let a = head_a([t, 0.5 * t, 1500.0]);
    let b = head_b([700.0, -t, 1450.0]);
    let mut pts: Vec<Point3D> = a.into_iter().chain(b).collect();
    pts.push(Point3D::new(-900.0, 400.0, 1000.0));
    let n = pts.len();
    pts.rotate_left(k % n);
    if k % 2 == 1 {
        pts.reverse();
    }
    pts
}

#[test]
fn tracks_both_heads_through_reordering() {
    let mut tracker = HeadTracker::new(&two_head_config()).expect("tracker");
    for k in 0..8 {
        let pts = frame(k);
        let report = tracker.process(&pts).expect("process");
        assert_eq!(report.frame, k);
        assert_eq!(report.num_points, 7);

        let a = &report.heads[0];
        assert_eq!(a.triples.len(), 1, "frame {k}");
        let c = a.centroid.expect("head a centroid");
        let t = k as f32;
        assert_relative_eq!(c.x, t + 100.0 / 3.0, epsilon = 1e-3);
        assert_relative_eq!(c.y, 0.5 * t + 100.0 / 3.0, epsilon = 1e-3);

        let b = &report.heads[1];
        assert_eq!(b.triples.len(), 1, "frame {k}");
        let cb = b.centroid.expect("head b centroid");
        assert_relative_eq!(cb.x, 710.0, epsilon = 1e-3);

        if k > 0 {
            assert_relative_eq!(
                a.displacement.expect("displacement"),
                (1.0_f32 + 0.25).sqrt(),
                epsilon = 1e-3
            );
        }
    }

    // Head B only drifts along y: x and z spread stay zero.
    let cov_b = tracker.covariance(1).expect("covariance");
    assert_relative_eq!(cov_b.sx, 0.0, epsilon = 1e-3);
    assert_relative_eq!(cov_b.sz, 0.0, epsilon = 1e-3);
    // Last 5 y samples are an arithmetic progression with step 1.
    assert_relative_eq!(cov_b.sy, 2.5, epsilon = 1e-2);
}

#[test]
fn ambiguous_matches_resolve_to_previous_position() {
    let head = ReferencePattern::from_lengths([100.0, 100.0, 141.42]).expect("head");
    let mut tracker = HeadTracker::new(&TrackerConfig::new(PatternParams::new(vec![head])))
        .expect("tracker");

    let first = head_a([0.0, 0.0, 0.0]);
    tracker.process(&first).expect("first frame");

    // Decoy copy of the head far away, listed first.
    let mut pts: Vec<Point3D> = head_a([1000.0, 1000.0, 0.0]).to_vec();
    pts.extend(head_a([2.0, 1.0, 0.0]));
    let report = tracker.process(&pts).expect("second frame");

    let head = &report.heads[0];
    assert_eq!(head.triples.len(), 2);
    let selected = head.selected.expect("selected");
    assert!(head.triples[selected].indices().iter().all(|&i| i >= 3));
    assert!(head.displacement.expect("displacement") < 3.0);
}

#[test]
fn frames_without_heads_keep_covariance() {
    let mut tracker = HeadTracker::new(&two_head_config()).expect("tracker");
    tracker.process(&frame(0)).expect("frame 0");
    tracker.process(&frame(1)).expect("frame 1");
    let before = tracker.covariance(0).expect("covariance");

    let report = tracker
        .process(&[Point3D::new(0.0, 0.0, 0.0)])
        .expect("sparse frame");
    assert!(report.heads.iter().all(|h| h.selected.is_none()));
    assert_eq!(tracker.covariance(0).expect("covariance"), before);
}
