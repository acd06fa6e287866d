//! Exploded-view placement benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec3;
use urchin::explode::{
    explode, CosmosGroup, CosmosGrouping, ExplodedView, HemispherePose,
    COSMOS_IDS,
};
use urchin::options::ExplodeOptions;

fn grouping(name: &str, scale: f32) -> CosmosGrouping {
    CosmosGrouping::new(
        name,
        COSMOS_IDS
            .iter()
            .enumerate()
            .map(|(i, &id)| CosmosGroup {
                id,
                vector: Vec3::new(i as f32, 1.0, -(i as f32)) * scale,
                mesh_center: Vec3::splat(i as f32),
            })
            .collect(),
    )
}

fn populated_view(count: i32) -> (ExplodedView, Vec<i32>) {
    let mut view = ExplodedView::new(
        vec![grouping("default", 1.0), grouping("wide", 2.0)],
        &ExplodeOptions::default(),
    );
    let ids: Vec<i32> = (0..count).collect();
    for &id in &ids {
        let group = COSMOS_IDS[id as usize % COSMOS_IDS.len()];
        let rest = HemispherePose {
            left: Vec3::new(id as f32, 0.0, 0.0),
            right: Vec3::new(id as f32, 0.0, 11.4),
        };
        let _ = view.register(id, group, rest, Vec3::ZERO);
    }
    (view, ids)
}

fn explode_benchmark(c: &mut Criterion) {
    let _ = c.bench_function("explode_single", |b| {
        b.iter(|| {
            black_box(explode(
                black_box(Vec3::ONE),
                black_box(Vec3::new(1.0, 2.0, 3.0)),
                black_box(0.5),
            ))
        });
    });
}

fn placement_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_percentage");
    for count in [100, 1_000, 10_000] {
        let (mut view, ids) = populated_view(count);
        let _ = group.bench_function(format!("{count}_structures"), |b| {
            b.iter(|| black_box(view.set_percentage(black_box(0.5), &ids)));
        });
    }
    group.finish();
}

fn grouping_switch_benchmark(c: &mut Criterion) {
    let (mut view, ids) = populated_view(1_000);
    let mut next = 0;
    let _ = c.bench_function("set_grouping_1000", |b| {
        b.iter(|| {
            next = (next + 1) % 2;
            black_box(view.set_grouping(next, &ids))
        });
    });
}

criterion_group!(
    benches,
    explode_benchmark,
    placement_benchmark,
    grouping_switch_benchmark
);
criterion_main!(benches);
