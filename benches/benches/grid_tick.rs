// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use understory_broadphase::{Body, GridConfig, PairCounting, SpatialGrid};

const CELLS: u32 = 512;
const CELL: f32 = 16.0;

fn gen_random_bodies(count: usize, half: f32, seed: u64) -> Vec<Body> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let world = CELLS as f32 * CELL;
    (0..count)
        .map(|_| Body::new(rng.gen_range(0.0..world), rng.gen_range(0.0..world), half, half))
        .collect()
}

fn gen_clustered_bodies(n_clusters: usize, per_cluster: usize, spread: f32) -> Vec<Body> {
    let mut rng = ChaCha8Rng::seed_from_u64(0xC1A5_7E55_9999_ABCD);
    let world = CELLS as f32 * CELL;
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for _ in 0..n_clusters {
        let (cx, cy) = (rng.gen_range(0.0..world), rng.gen_range(0.0..world));
        for _ in 0..per_cluster {
            let dx = rng.gen_range(-0.5..0.5) * spread;
            let dy = rng.gen_range(-0.5..0.5) * spread;
            out.push(Body::new(cx + dx, cy + dy, 6.0, 6.0));
        }
    }
    out
}

fn filled(bodies: &[Body], counting: PairCounting) -> SpatialGrid<Body> {
    let config = GridConfig::new(CELLS, CELLS, CELL, CELL).with_pair_counting(counting);
    let mut grid = SpatialGrid::new(config).unwrap();
    grid.insert_many(bodies.iter().copied()).unwrap();
    grid
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[10_000usize, 50_000, 100_000] {
        let bodies = gen_random_bodies(n, 7.0, 0xCAFE_F00D_DEAD_BEEF);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("random_half7_n{}", n), |b| {
            b.iter_batched(
                || SpatialGrid::<Body>::with_cells(CELLS, CELLS, CELL, CELL).unwrap(),
                |mut grid| {
                    grid.insert_many(bodies.iter().copied()).unwrap();
                    black_box(grid.link_count());
                },
                BatchSize::LargeInput,
            )
        });
    }
    let bodies = gen_random_bodies(50_000, 7.0, 0xFACE_FEED_CAFE_BABE);
    group.bench_function("random_half7_presized", |b| {
        b.iter_batched(
            || {
                let config = GridConfig::new(CELLS, CELLS, CELL, CELL).with_capacity(50_001, 200_001);
                SpatialGrid::<Body>::new(config).unwrap()
            },
            |mut grid| {
                grid.insert_many(bodies.iter().copied()).unwrap();
                black_box(grid.link_count());
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    for counting in [PairCounting::Watermark, PairCounting::Exact] {
        for &n in &[10_000usize, 100_000] {
            let bodies = gen_random_bodies(n, 7.0, 0xBADC_F00D_1234_5678);
            group.throughput(Throughput::Elements(n as u64));
            group.bench_function(format!("{:?}_random_n{}", counting, n), |b| {
                b.iter_batched(
                    || filled(&bodies, counting),
                    |mut grid| black_box(grid.tick().pairs),
                    BatchSize::LargeInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_tick_clustered(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_clustered");
    let bodies = gen_clustered_bodies(64, 256, 96.0);
    group.bench_function("watermark", |b| {
        b.iter_batched(
            || filled(&bodies, PairCounting::Watermark),
            |mut grid| black_box(grid.tick().pairs),
            BatchSize::LargeInput,
        )
    });
    group.bench_function("visit_pairs", |b| {
        b.iter_batched(
            || filled(&bodies, PairCounting::Watermark),
            |mut grid| {
                let mut close = 0_u64;
                let report = grid.tick_with(|p| {
                    let dx = (p.first_entity.pos.x - p.second_entity.pos.x).abs();
                    let dy = (p.first_entity.pos.y - p.second_entity.pos.y).abs();
                    if dx <= 12.0 && dy <= 12.0 {
                        close += 1;
                    }
                });
                black_box((report.pairs, close))
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn bench_retick(c: &mut Criterion) {
    let mut group = c.benchmark_group("retick");
    let bodies = gen_random_bodies(100_000, 7.0, 0x0123_4567_89AB_CDEF);
    let mut grid = filled(&bodies, PairCounting::Watermark);
    let _ = grid.tick();
    group.bench_function("compacted_n100000", |b| {
        b.iter(|| black_box(grid.tick().pairs))
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_tick, bench_tick_clustered, bench_retick);
criterion_main!(benches);
