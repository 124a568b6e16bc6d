//! Criterion benchmarks for world graph operations: place churn, search
//! and clipboard moves.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mudmap_bench::{reference_world, sprawl_world, BENCH_LAYER};
use mudmap_core::Location;
use mudmap_world::{Clipboard, WorldGraph};

/// Benchmark: Create and then remove 1000 places on a 10K-place world.
fn bench_place_churn(c: &mut Criterion) {
    let (mut world, _) = sprawl_world(10_000, 2_000, 42).unwrap();

    c.bench_function("place_churn_1k", |b| {
        b.iter(|| {
            let ids: Vec<_> = (0..1_000)
                .map(|i| {
                    world
                        .create_place("churn", BENCH_LAYER, 5_000 + i, 5_000)
                        .unwrap()
                })
                .collect();
            for id in ids {
                black_box(world.remove_place(id).unwrap());
            }
        });
    });
}

/// Benchmark: Corner-to-corner BFS and route on a 100x100 linked block.
fn bench_search_100x100(c: &mut Criterion) {
    let (world, ids) = reference_world(100).unwrap();
    let (first, last) = (ids[0], ids[ids.len() - 1]);

    c.bench_function("breadth_search_100x100", |b| {
        b.iter(|| black_box(world.breadth_search(first, last)));
    });
    c.bench_function("shortest_route_100x100", |b| {
        b.iter(|| black_box(world.shortest_route(first, last)));
    });
}

/// Benchmark: Cut a 30x30 linked block and slide it one step east.
fn bench_cut_paste_block(c: &mut Criterion) {
    let (world, ids) = reference_world(30).unwrap();
    let anchor = Location::new(BENCH_LAYER, 0, 0);

    c.bench_function("cut_paste_block_30x30", |b| {
        b.iter_batched(
            || world.clone(),
            |mut w: WorldGraph| {
                let mut clip = Clipboard::cut(&w, &ids, anchor).unwrap();
                black_box(clip.paste(&mut w, BENCH_LAYER, 1, 0).unwrap());
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

/// Benchmark: Window neighbour queries across a sparse layer.
fn bench_layer_neighbors(c: &mut Criterion) {
    let (world, _) = sprawl_world(10_000, 500, 9).unwrap();
    let layer = world.layer(BENCH_LAYER).unwrap();

    c.bench_function("layer_neighbors_sparse", |b| {
        b.iter(|| {
            for y in (-500..500).step_by(50) {
                for x in (-500..500).step_by(50) {
                    black_box(layer.neighbors(x, y, 3));
                }
            }
        });
    });
}

criterion_group!(
    benches,
    bench_place_churn,
    bench_search_100x100,
    bench_cut_paste_block,
    bench_layer_neighbors
);
criterion_main!(benches);
