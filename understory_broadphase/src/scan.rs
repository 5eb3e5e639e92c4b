// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broad-phase scan: count entity pairs that share a cell.
//!
//! The scan runs over a freshly compacted table, where entity slots increase with the
//! order in which cells first reach them. Two de-duplication strategies are offered:
//!
//! - [`PairCounting::Watermark`] keeps one running slot boundary, the watermark. After a
//!   cell is scanned, the watermark rises to the highest entity slot seen in it. An entity
//!   at or below the watermark starts no pairs; a partner strictly below it is skipped.
//!   This needs no per-pair memory but is only a heuristic: a pair is counted at most
//!   once, in the cell where its later-discovered entity first appears, so it never
//!   double-counts. When two entities first meet in a later cell, the pair may be missed.
//! - [`PairCounting::Exact`] records every counted pair in an ordered set and counts each
//!   unordered pair sharing at least one cell exactly once, at O(pairs) memory.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::arena::{SlotArena, SlotId};
use crate::grid::EntityKey;
use crate::link::{Chain, Link};

/// Pair de-duplication strategy for [`SpatialGrid::tick`](crate::SpatialGrid::tick).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PairCounting {
    /// Single running watermark over compacted slot order. Allocation-free; may miss
    /// pairs when entities span several cells, never double-counts.
    #[default]
    Watermark,
    /// Every unordered pair sharing at least one cell, counted once.
    Exact,
}

/// A pair of co-located entities reported by
/// [`SpatialGrid::tick_with`](crate::SpatialGrid::tick_with).
///
/// `first` was discovered no later than `second` in scan order.
#[derive(Debug)]
pub struct Pair<'a, E> {
    /// Key of the earlier-discovered entity.
    pub first: EntityKey,
    /// The earlier-discovered entity.
    pub first_entity: &'a E,
    /// Key of the later-discovered entity.
    pub second: EntityKey,
    /// The later-discovered entity.
    pub second_entity: &'a E,
}

/// Scratch buffers reused across scans.
#[derive(Debug, Default)]
pub(crate) struct Scanner {
    chain: Vec<SlotId>,
    seen: BTreeSet<(u32, u32)>,
}

impl Scanner {
    /// Scan every cell in table order and return the number of counted pairs.
    pub(crate) fn run<E>(
        &mut self,
        counting: PairCounting,
        cells: &[Option<SlotId>],
        links: &SlotArena<Link>,
        entities: &SlotArena<E>,
        epoch: u32,
        mut visit: impl FnMut(Pair<'_, E>),
    ) -> u64 {
        let mut report = |a: SlotId, b: SlotId| {
            if let (Some(first_entity), Some(second_entity)) = (entities.get(a), entities.get(b)) {
                visit(Pair {
                    first: EntityKey::new(a, epoch),
                    first_entity,
                    second: EntityKey::new(b, epoch),
                    second_entity,
                });
            }
        };
        self.seen.clear();
        let mut pairs = 0_u64;
        let mut watermark = 0_u32;

        for &head in cells {
            self.chain.clear();
            self.chain
                .extend(Chain::new(links, head).map(|(_, link)| link.referent));
            match counting {
                PairCounting::Watermark => {
                    let mut local_max = 0_u32;
                    for (i, &r) in self.chain.iter().enumerate() {
                        local_max = local_max.max(r.get());
                        if r.get() <= watermark {
                            continue;
                        }
                        for &r2 in &self.chain[i + 1..] {
                            if r2.get() < watermark {
                                continue;
                            }
                            pairs += 1;
                            if r < r2 {
                                report(r, r2);
                            } else {
                                report(r2, r);
                            }
                        }
                    }
                    watermark = watermark.max(local_max);
                }
                PairCounting::Exact => {
                    for (i, &r) in self.chain.iter().enumerate() {
                        for &r2 in &self.chain[i + 1..] {
                            let (a, b) = if r < r2 { (r, r2) } else { (r2, r) };
                            if self.seen.insert((a.get(), b.get())) {
                                pairs += 1;
                                report(a, b);
                            }
                        }
                    }
                }
            }
        }
        pairs
    }
}
