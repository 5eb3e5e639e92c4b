// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mark-compact pass over the cell table.
//!
//! Rebuilds both arenas into fresh storage sized to the live contents. Entities are
//! renumbered in the order they are first reached while walking cells in table order
//! and each chain from its head, so a lower entity slot always means "discovered in an
//! earlier or the same cell". The broad-phase scan relies on that ordering.

use alloc::vec::Vec;

use crate::arena::{SlotArena, SlotId};
use crate::link::{Chain, Link};

/// Summary of one compaction pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CompactionStats {
    /// Entities carried over.
    pub entities: usize,
    /// Links carried over.
    pub links: usize,
    /// Capacity of the rebuilt entity arena, sentinel included.
    pub entity_capacity: usize,
    /// Capacity of the rebuilt link arena, sentinel included.
    pub link_capacity: usize,
}

/// Owns the relocation table used during a pass.
///
/// `relocated[old]` is the new slot of the entity that lived in slot `old`, or `None`
/// until the pass first reaches it. The table is reset at the start of every pass and
/// kept between passes only to reuse its allocation.
#[derive(Debug, Default)]
pub(crate) struct Compactor {
    relocated: Vec<Option<SlotId>>,
}

impl Compactor {
    pub(crate) fn run<E>(
        &mut self,
        cells: &mut [Option<SlotId>],
        entities: &mut SlotArena<E>,
        links: &mut SlotArena<Link>,
    ) -> CompactionStats {
        let mut old_entities = core::mem::take(entities);
        let old_links = core::mem::take(links);

        let mut new_entities = SlotArena::with_capacity(fresh_capacity(&old_entities));
        let mut new_links = SlotArena::with_capacity(fresh_capacity(&old_links));

        self.relocated.clear();
        self.relocated.resize(old_entities.used(), None);

        for head in cells.iter_mut() {
            let old_head = head.take();
            let mut tail: Option<SlotId> = None;
            for (_, link) in Chain::new(&old_links, old_head) {
                let Some(seen) = self.relocated.get_mut(link.referent.index()) else {
                    continue;
                };
                let referent = match *seen {
                    Some(moved) => moved,
                    None => {
                        let Some(entity) = old_entities.release(link.referent) else {
                            continue;
                        };
                        let moved = new_entities.append(entity);
                        *seen = Some(moved);
                        moved
                    }
                };
                let id = new_links.append(Link {
                    next: None,
                    referent,
                });
                match tail {
                    Some(prev) => new_links[prev].next = Some(id),
                    None => *head = Some(id),
                }
                tail = Some(id);
            }
        }

        let stats = CompactionStats {
            entities: new_entities.len(),
            links: new_links.len(),
            entity_capacity: new_entities.capacity(),
            link_capacity: new_links.capacity(),
        };
        if !old_entities.is_empty() {
            tracing::debug!(
                dropped = old_entities.len(),
                "compaction dropped entities unreachable from any cell"
            );
        }
        *entities = new_entities;
        *links = new_links;
        stats
    }
}

/// `min(capacity, 2 * used)`: shrinks storage that grew past twice its high-water mark.
fn fresh_capacity<T>(arena: &SlotArena<T>) -> usize {
    arena.capacity().min(arena.used().saturating_mul(2))
}
