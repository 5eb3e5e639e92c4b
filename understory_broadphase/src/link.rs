// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell membership links and chain traversal.

use crate::arena::{SlotArena, SlotId};

/// One membership record: "entity `referent` overlaps this cell".
///
/// Links form singly linked chains rooted at the cell table. A cell holding K entities
/// owns K links; an entity covering K cells is referenced by K links.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Link {
    /// Next link in the same cell, `None` at the end of the chain.
    pub next: Option<SlotId>,
    /// Entity slot this link names.
    pub referent: SlotId,
}

/// Walks a chain from its head, yielding `(link slot, link)` in chain order.
///
/// A link slot that is vacant ends the walk.
#[derive(Clone, Debug)]
pub struct Chain<'a> {
    links: &'a SlotArena<Link>,
    cursor: Option<SlotId>,
}

impl<'a> Chain<'a> {
    pub(crate) fn new(links: &'a SlotArena<Link>, head: Option<SlotId>) -> Self {
        Self {
            links,
            cursor: head,
        }
    }
}

impl Iterator for Chain<'_> {
    type Item = (SlotId, Link);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let link = *self.links.get(id)?;
        self.cursor = link.next;
        Some((id, link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn chain_follows_next_until_none() {
        let mut links = SlotArena::new();
        let e = SlotId::new(1).unwrap();
        let f = SlotId::new(2).unwrap();
        let tail = links
            .acquire(Link {
                next: None,
                referent: e,
            })
            .unwrap();
        let head = links
            .acquire(Link {
                next: Some(tail),
                referent: f,
            })
            .unwrap();

        let referents: Vec<_> = Chain::new(&links, Some(head))
            .map(|(_, l)| l.referent)
            .collect();
        assert_eq!(referents, [f, e]);
        assert_eq!(Chain::new(&links, None).count(), 0);
    }
}
