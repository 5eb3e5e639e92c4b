// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recyclable slot storage with non-zero handles.
//!
//! A [`SlotArena`] hands out [`SlotId`]s for stored values and reuses released slots
//! through an intrusive free list threaded through the vacant slots themselves.
//! Slot `0` is a permanently reserved sentinel, so a `SlotId` is never zero and
//! `Option<SlotId>` costs no more than a `u32`. Grid chains use `None` as their
//! end-of-chain marker.
//!
//! Growth follows a fixed policy: when every slot up to the capacity is in use and the
//! free list is empty, the capacity becomes `2 * capacity + 1`.

use alloc::vec::Vec;
use core::fmt::{self, Debug};
use core::num::NonZeroU32;
use core::ops::{Index, IndexMut};

use crate::error::{GridError, GridResult};

/// Highest number of slots (sentinel included) an arena can address.
const MAX_SLOTS: usize = (u32::MAX as usize).saturating_add(1);

/// Handle to a slot in a [`SlotArena`].
///
/// Handles are plain indices: a released-then-reacquired slot yields the same `SlotId`
/// again. Never zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(NonZeroU32);

impl SlotId {
    /// Wrap a raw index. Returns `None` for the sentinel index `0`.
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// The raw index.
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    pub(crate) const fn index(self) -> usize {
        self.0.get() as usize
    }

    /// Handle for a slot position already known to be in `1..MAX_SLOTS`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Callers bound `idx` by MAX_SLOTS, so it fits in u32."
    )]
    fn from_index(idx: usize) -> Self {
        debug_assert!(idx != 0 && idx < MAX_SLOTS, "slot index out of range");
        Self(NonZeroU32::MIN.saturating_add((idx as u32).saturating_sub(1)))
    }
}

#[derive(Clone, Debug)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<SlotId> },
}

/// Generic recyclable storage pool.
///
/// `acquire` prefers the most recently released slot (LIFO) and only grows when no
/// free slot exists. Access is checked: vacant and out-of-range handles read as `None`.
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    capacity: usize,
    free_head: Option<SlotId>,
    live: usize,
}

impl<T> SlotArena<T> {
    /// Create an empty arena holding only the sentinel slot.
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Create an empty arena with room for `capacity` slots, sentinel included.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_SLOTS);
        let mut slots = Vec::with_capacity(capacity);
        slots.push(Slot::Vacant { next_free: None });
        Self {
            slots,
            capacity,
            free_head: None,
            live: 0,
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.live
    }

    /// True if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Slots handed out so far, sentinel included; released slots still count.
    pub fn used(&self) -> usize {
        self.slots.len()
    }

    /// Slots available before the next growth step, sentinel included.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many more values can be acquired before the index space runs out.
    pub fn headroom(&self) -> usize {
        let vacant = self.slots.len() - 1 - self.live;
        MAX_SLOTS - self.slots.len() + vacant
    }

    /// Store `value` and return its slot.
    ///
    /// Pops the free list first; appends otherwise, growing the capacity to
    /// `2 * capacity + 1` when the backing storage is full.
    pub fn acquire(&mut self, value: T) -> GridResult<SlotId> {
        if let Some(id) = self.free_head {
            match core::mem::replace(&mut self.slots[id.index()], Slot::Occupied(value)) {
                Slot::Vacant { next_free } => self.free_head = next_free,
                Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
            }
            self.live += 1;
            return Ok(id);
        }
        if self.slots.len() >= MAX_SLOTS {
            return Err(GridError::CapacityExhausted);
        }
        Ok(self.append(value))
    }

    /// Append `value` past the last handed-out slot, ignoring the free list.
    ///
    /// The caller guarantees the index space is not exhausted.
    pub(crate) fn append(&mut self, value: T) -> SlotId {
        if self.slots.len() == self.capacity {
            self.grow();
        }
        let id = SlotId::from_index(self.slots.len());
        self.slots.push(Slot::Occupied(value));
        self.live += 1;
        id
    }

    /// Grow, following the doubling policy, until `additional` more slots fit.
    pub fn reserve(&mut self, additional: usize) {
        let want = self.slots.len().saturating_add(additional).min(MAX_SLOTS);
        while self.capacity < want {
            self.grow();
        }
    }

    fn grow(&mut self) {
        let capacity = self.capacity.saturating_mul(2).saturating_add(1).min(MAX_SLOTS);
        tracing::trace!(from = self.capacity, to = capacity, "slot arena grow");
        self.slots.reserve_exact(capacity - self.slots.len());
        self.capacity = capacity;
    }

    /// Release a slot, returning its value.
    ///
    /// The slot goes to the head of the free list. Releasing a vacant slot is a no-op
    /// that returns `None`.
    pub fn release(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.index())?;
        match core::mem::replace(
            slot,
            Slot::Vacant {
                next_free: self.free_head,
            },
        ) {
            Slot::Occupied(value) => {
                self.free_head = Some(id);
                self.live -= 1;
                Some(value)
            }
            vacant @ Slot::Vacant { .. } => {
                *slot = vacant;
                None
            }
        }
    }

    /// Borrow the value in `id`, if occupied.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        match self.slots.get(id.index())? {
            Slot::Occupied(v) => Some(v),
            Slot::Vacant { .. } => None,
        }
    }

    /// Mutably borrow the value in `id`, if occupied.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        match self.slots.get_mut(id.index())? {
            Slot::Occupied(v) => Some(v),
            Slot::Vacant { .. } => None,
        }
    }

    /// Iterate occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(i, slot)| match slot {
                Slot::Occupied(v) => Some((SlotId::from_index(i), v)),
                Slot::Vacant { .. } => None,
            })
    }

    /// Drop every value and forget the free list. Capacity is kept.
    pub fn clear(&mut self) {
        self.slots.truncate(1);
        self.free_head = None;
        self.live = 0;
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<SlotId> for SlotArena<T> {
    type Output = T;

    fn index(&self, id: SlotId) -> &T {
        match self.get(id) {
            Some(v) => v,
            None => panic!("slot {} is vacant or out of range", id.get()),
        }
    }
}

impl<T> IndexMut<SlotId> for SlotArena<T> {
    fn index_mut(&mut self, id: SlotId) -> &mut T {
        match self.get_mut(id) {
            Some(v) => v,
            None => panic!("slot {} is vacant or out of range", id.get()),
        }
    }
}

impl<T> Debug for SlotArena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotArena")
            .field("live", &self.live)
            .field("used", &self.slots.len())
            .field("capacity", &self.capacity)
            .field("free_head", &self.free_head)
            .finish_non_exhaustive()
    }
}
