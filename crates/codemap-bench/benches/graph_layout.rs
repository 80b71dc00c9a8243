use codemap_bench::util;
use codemap_core::Document;
use codemap_graph::{LayoutEngine, PositionOverrides, Vec2};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn bench_full_layout(c: &mut Criterion) {
    let engine = LayoutEngine::default();
    let mut group = c.benchmark_group("full_layout");

    for file_count in [50usize, 250, 1000] {
        let document = util::generate_synthetic_document(file_count, 7);
        group.bench_with_input(
            BenchmarkId::from_parameter(file_count),
            &document,
            |b, document| {
                b.iter(|| {
                    let output = engine.layout(black_box(document), &PositionOverrides::new());
                    black_box(output);
                })
            },
        );
    }
    group.finish();
}

fn bench_apply_overrides(c: &mut Criterion) {
    let engine = LayoutEngine::default();
    let document = util::generate_synthetic_document(500, 7);
    let mut output = engine.layout(&document, &PositionOverrides::new());

    let mut overrides = PositionOverrides::new();
    for i in (0..500).step_by(10) {
        overrides.set(format!("pkg/mod_{i}.py"), Vec2::new(i as f32 * 3.0, 40.0));
    }

    c.bench_function("apply_overrides_500_files", |b| {
        b.iter(|| {
            engine.apply_overrides(&mut output, black_box(&overrides));
        })
    });
}

fn bench_decode(c: &mut Criterion) {
    let json = util::generate_synthetic_json(1000, 7);
    c.bench_function("decode_1000_files", |b| {
        b.iter(|| {
            let document = Document::from_json_str(black_box(&json));
            black_box(document)
        })
    });
}

criterion_group!(benches, bench_full_layout, bench_apply_overrides, bench_decode);
criterion_main!(benches);
