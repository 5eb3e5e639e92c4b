// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wall-clock driver for the broad phase.
//!
//! Fills a 2048×2048 grid of 16×16 cells with 500 000 random entities of half-extent 7,
//! then times insertion and one tick.
//!
//! Run:
//! - `cargo run --release -p understory_demos --example ugrid_bench`
//! - `cargo run --release -p understory_demos --example ugrid_bench -- <entities> <seed>`

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use understory_broadphase::{Body, GridConfig, SpatialGrid};

const CELLS: u32 = 2048;
const CELL: f32 = 16.0;
const HALF: f32 = 7.0;

fn main() {
    let mut args = std::env::args().skip(1);
    let count: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(500_000);
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(0x5EED);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let world = CELLS as f32 * CELL;
    let bodies: Vec<_> = (0..count)
        .map(|_| Body::new(rng.gen_range(0.0..world), rng.gen_range(0.0..world), HALF, HALF))
        .collect();

    let mut grid = SpatialGrid::new(GridConfig::new(CELLS, CELLS, CELL, CELL))
        .expect("grid geometry is valid");

    let start = Instant::now();
    grid.insert_many(bodies).expect("entities are finite");
    println!(
        "Elapsed insertion time: {} milliseconds ({} links)",
        start.elapsed().as_millis(),
        grid.link_count()
    );

    let start = Instant::now();
    let report = grid.tick();
    let elapsed = start.elapsed();
    println!("{} registered broad collisions", report.pairs);
    println!("Elapsed tick time: {} milliseconds", elapsed.as_millis());
}
