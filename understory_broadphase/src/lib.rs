// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Broadphase: a uniform-grid broad phase for large entity counts.
//!
//! Understory Broadphase buckets axis-aligned entities into a fixed grid and reports
//! which entities share a cell, a superset of the pairs that may truly overlap.
//!
//! - Bulk-insert entities; each is linked into every cell its bounding box covers.
//! - [`SpatialGrid::tick`] compacts storage and counts co-located pairs in one pass.
//! - [`SpatialGrid::tick_with`] also hands each counted pair to a caller-supplied narrow phase.
//!
//! Storage is two [`SlotArena`]s: one for entities, one for the per-cell [`Link`] chains.
//! Arenas recycle released slots through an intrusive free list and reserve slot `0`, so
//! "no slot" is `Option<SlotId>` at no extra cost. Every tick rebuilds both arenas tightly
//! and renumbers entities in the order the cell scan first reaches them; the scan's pair
//! de-duplication depends on that order.
//!
//! # Example
//!
//! ```rust
//! use understory_broadphase::{Body, SpatialGrid};
//!
//! // A single 100×100 cell.
//! let mut grid: SpatialGrid<Body> = SpatialGrid::with_cells(1, 1, 100.0, 100.0).unwrap();
//!
//! // Bodies are a centre and a half-extent.
//! grid.insert(Body::new(10.0, 10.0, 5.0, 5.0)).unwrap();
//! grid.insert(Body::new(12.0, 12.0, 5.0, 5.0)).unwrap();
//!
//! let report = grid.tick();
//! assert_eq!(report.pairs, 1);
//! ```
//!
//! Entities are any type implementing [`Entity`]. Visiting pairs gives access to both:
//!
//! ```rust
//! use understory_broadphase::{Dim, Entity, GridConfig, PairCounting, Pos, SpatialGrid};
//!
//! struct Ship {
//!     id: u32,
//!     at: Pos,
//!     half: Dim,
//! }
//!
//! impl Entity for Ship {
//!     fn pos(&self) -> Pos {
//!         self.at
//!     }
//!     fn dim(&self) -> Dim {
//!         self.half
//!     }
//! }
//!
//! let config = GridConfig::new(16, 16, 8.0, 8.0).with_pair_counting(PairCounting::Exact);
//! let mut grid = SpatialGrid::new(config).unwrap();
//! for (id, x) in [(1, 10.0), (2, 14.0), (3, 90.0)] {
//!     grid.insert(Ship { id, at: Pos::new(x, 10.0), half: Dim::new(3.0, 3.0) }).unwrap();
//! }
//!
//! let mut close = Vec::new();
//! grid.tick_with(|pair| close.push((pair.first_entity.id, pair.second_entity.id)));
//! assert_eq!(close.len(), 1);
//! ```
//!
//! ## Pair counting
//!
//! - [`PairCounting::Watermark`] (default): no per-pair memory. Exact when every entity
//!   sits in a single cell. When entities span cells it may miss pairs but never counts
//!   one twice. See [`scan`] for details.
//! - [`PairCounting::Exact`]: each unordered pair sharing at least one cell is counted once.
//!
//! ## Geometry
//!
//! The grid covers `0..cells_x * cell_width` by `0..cells_y * cell_height`. Positions
//! outside that area are clamped into the border cells. Coordinates must be finite;
//! [`SpatialGrid::insert`] rejects NaN and infinities.
//!
//! With the `kurbo` feature, `kurbo::Rect` implements [`Entity`] (centre and half-size)
//! and [`GridConfig::covering`] sizes cells from a world extent.
//!
//! ## Logging
//!
//! Compaction and tick summaries are emitted as `tracing` debug events; arena growth as
//! trace events. Install a subscriber to see them.

#![no_std]

extern crate alloc;

pub mod arena;
pub mod compact;
pub mod config;
pub mod error;
pub mod grid;
pub mod link;
pub mod scan;
pub mod types;

pub use arena::{SlotArena, SlotId};
pub use compact::CompactionStats;
pub use config::GridConfig;
pub use error::{Axis, GridError, GridResult};
pub use grid::{EntityKey, SpatialGrid, TickReport};
pub use link::{Chain, Link};
pub use scan::{Pair, PairCounting};
pub use types::{Body, Cell, CellRange, CellRangeIter, Dim, Entity, Pos};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_tick() {
        let mut grid: SpatialGrid<Body> = SpatialGrid::with_cells(4, 4, 10.0, 10.0).unwrap();
        let _ = grid.insert(Body::new(5.0, 5.0, 1.0, 1.0)).unwrap();
        let _ = grid.insert(Body::new(6.0, 6.0, 1.0, 1.0)).unwrap();
        let _ = grid.insert(Body::new(35.0, 35.0, 1.0, 1.0)).unwrap();
        let report = grid.tick();
        assert_eq!(report.pairs, 1);
        assert_eq!(report.entities, 3);
    }

    #[test]
    fn watermark_and_exact_agree_on_single_cell_entities() {
        let bodies = [
            Body::new(1.0, 1.0, 0.5, 0.5),
            Body::new(2.0, 2.0, 0.5, 0.5),
            Body::new(3.0, 1.0, 0.5, 0.5),
            Body::new(15.0, 15.0, 0.5, 0.5),
            Body::new(16.0, 14.0, 0.5, 0.5),
        ];
        let mut counts = [0; 2];
        for (i, counting) in [PairCounting::Watermark, PairCounting::Exact].into_iter().enumerate() {
            let mut grid =
                SpatialGrid::new(GridConfig::new(2, 2, 10.0, 10.0).with_pair_counting(counting))
                    .unwrap();
            let _ = grid.insert_many(bodies).unwrap();
            counts[i] = grid.tick().pairs;
        }
        assert_eq!(counts, [4, 4]);
    }
}
