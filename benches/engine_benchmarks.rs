//! Benchmarks for the per-frame pipeline and its hot spots

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pose_piano::{
    audio::NullAudio,
    clock::ManualClock,
    config::{Config, KeyLayoutConfig},
    engine::{GestureEngine, Telemetry},
    geometry::{Point, Size},
    keys::Keyboard,
    pose::{BodyPart, KeyPoint, Person},
    remap::CoordinateRemapper,
    session::synthesize_performance,
    smoothing::create_smoother,
    stroke::{classify, horizontal_score},
};

fn full_body(offset: f32) -> Person {
    Person {
        id: 0,
        keypoints: BodyPart::ALL
            .iter()
            .enumerate()
            .map(|(i, &part)| KeyPoint::new(part, Point::new(300.0 + i as f32 * 40.0 + offset, 100.0 + i as f32 * 30.0), 0.9))
            .collect(),
        bounding_box: None,
        score: 0.9,
    }
}

fn benchmark_process_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_frame");

    let mut plain = Config::default();
    plain.display.flip = true;
    let mut everything = plain.clone();
    everything.gestures.stroke_detection = true;
    everything.gestures.wrist_smoothing = "average:3".to_string();
    everything.head_rotation.enabled = true;

    for (name, config) in [("keys_only", plain), ("strokes_smoothing_head", everything)] {
        let session = synthesize_performance(&config, 42).unwrap();
        let clock = ManualClock::new(0);
        let mut engine = GestureEngine::new(&config, Box::new(NullAudio), Box::new(clock.clone())).unwrap();

        group.bench_with_input(BenchmarkId::new("demo_session", name), &session, |b, session| {
            b.iter(|| {
                engine.restart();
                for recorded in &session.frames {
                    clock.set(recorded.timestamp_ms);
                    black_box(engine.process_frame(&recorded.frame(), Telemetry { fps: recorded.fps }));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_remap(c: &mut Criterion) {
    let remapper = CoordinateRemapper::new(Size::new(1280.0, 720.0), Size::new(1080.0, 2340.0), false, 90.0).unwrap();
    let person = full_body(0.0);

    c.bench_function("remap_person", |b| {
        b.iter(|| black_box(remapper.remap(black_box(&person))));
    });
}

fn benchmark_strokes(c: &mut Criterion) {
    let mut group = c.benchmark_group("strokes");

    for len in [2usize, 3, 5] {
        let points: Vec<Point> = (0..len).map(|i| Point::new(i as f32 * 60.0, 200.0 + (i % 2) as f32 * 5.0)).collect();

        group.bench_with_input(BenchmarkId::new("horizontal_score", len), &points, |b, points| {
            b.iter(|| black_box(horizontal_score(black_box(points), 100.0)));
        });

        // Vertical drift makes every direction get tested
        let wobble: Vec<Point> = (0..len).map(|i| Point::new(i as f32 * 3.0, (i % 2) as f32 * 7.0)).collect();
        group.bench_with_input(BenchmarkId::new("classify_no_match", len), &wobble, |b, points| {
            b.iter(|| black_box(classify(black_box(points), 100.0, 0.7)));
        });
    }

    group.finish();
}

fn benchmark_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrist_smoothing");

    // A wrist sweeping across the display with detector jitter
    let path: Vec<Point> = (0..100)
        .map(|i| {
            let t = i as f32 * 0.1;
            Point::new(
                960.0 + 600.0 * t.sin() + 4.0 * (t * 37.0).sin(),
                540.0 + 200.0 * t.cos() + 4.0 * (t * 53.0).cos(),
            )
        })
        .collect();

    for name in ["none", "average:3", "average:9"] {
        let mut smoother = create_smoother(name).unwrap();
        group.bench_with_input(BenchmarkId::new("path_100", name), &path, |b, path| {
            b.iter(|| {
                smoother.reset();
                for &p in path {
                    black_box(smoother.smooth(black_box(p)));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_key_strikes(c: &mut Criterion) {
    let mut keys = Keyboard::new(Size::new(1920.0, 1080.0), &KeyLayoutConfig::default(), 200).unwrap();
    let miss = (Point::new(100.0, 100.0), Point::new(1800.0, 150.0));

    c.bench_function("keyboard_miss_all_keys", |b| {
        b.iter(|| black_box(keys.strike(black_box(miss.0), black_box(miss.1), 0)));
    });
}

criterion_group!(
    benches,
    benchmark_process_frame,
    benchmark_remap,
    benchmark_strokes,
    benchmark_smoothing,
    benchmark_key_strikes
);
criterion_main!(benches);
