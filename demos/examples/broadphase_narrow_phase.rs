// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Feeding a narrow phase.
//!
//! Buckets Kurbo rectangles, visits every co-located pair from the broad phase, and
//! keeps the ones whose rectangles really intersect.
//!
//! Run:
//! - `cargo run -p understory_demos --example broadphase_narrow_phase`

use kurbo::{Rect, Size};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use understory_broadphase::{GridConfig, PairCounting, SpatialGrid};

fn main() {
    let world = Size::new(1024.0, 768.0);
    let config = GridConfig::covering(world, 32, 24).with_pair_counting(PairCounting::Exact);
    let mut grid: SpatialGrid<Rect> = SpatialGrid::new(config).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..2_000 {
        let x = rng.gen_range(0.0..world.width);
        let y = rng.gen_range(0.0..world.height);
        let w = rng.gen_range(4.0..40.0);
        let h = rng.gen_range(4.0..40.0);
        grid.insert(Rect::from_origin_size((x, y), (w, h))).unwrap();
    }

    let mut hits = 0_u64;
    let report = grid.tick_with(|pair| {
        if pair.first_entity.intersect(*pair.second_entity).area() > 0.0 {
            hits += 1;
        }
    });

    println!(
        "{} entities, {} links, {} candidate pairs, {} overlapping",
        report.entities, report.links, report.pairs, hits
    );
    assert!(hits <= report.pairs);
}
