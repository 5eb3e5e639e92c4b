// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broad phase basics.
//!
//! Insert a few bodies, inspect cell membership, tick, and show that keys go stale
//! after compaction.
//!
//! Run:
//! - `cargo run -p understory_demos --example broadphase_basics`

use understory_broadphase::{Body, Cell, SpatialGrid};

fn main() {
    // 4×4 cells of 10×10 world units.
    let mut grid: SpatialGrid<Body> = SpatialGrid::with_cells(4, 4, 10.0, 10.0).unwrap();

    let a = grid.insert(Body::new(9.0, 9.0, 2.0, 2.0)).unwrap();
    let _b = grid.insert(Body::new(12.0, 12.0, 2.0, 2.0)).unwrap();
    let _c = grid.insert(Body::new(35.0, 5.0, 1.0, 1.0)).unwrap();

    // Body A straddles four cells.
    println!("A covers {:?}", grid.cells_of(grid.get(a).unwrap()));
    for x in 0..2 {
        for y in 0..2 {
            let members: Vec<_> = grid.cell_members(Cell::new(x, y)).map(|(k, _)| k).collect();
            println!("cell ({x}, {y}): {members:?}");
        }
    }

    let report = grid.tick();
    println!("tick: {report:?}");
    assert_eq!(report.pairs, 1, "A and B share cells");

    // Compaction renumbered everything; the old key no longer resolves.
    assert!(grid.get(a).is_none());
    println!("{grid:?}");
}
