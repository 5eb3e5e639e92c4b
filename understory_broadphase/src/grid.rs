// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The uniform grid: cell table, insertion, and the tick driver.

use alloc::boxed::Box;
use alloc::vec;
use core::fmt::{self, Debug};

use crate::arena::{SlotArena, SlotId};
use crate::compact::{CompactionStats, Compactor};
use crate::config::GridConfig;
use crate::error::{GridError, GridResult};
use crate::link::{Chain, Link};
use crate::scan::{Pair, PairCounting, Scanner};
use crate::types::{Cell, CellRange, Dim, Entity, Pos};

/// Handle to an inserted entity.
///
/// Keys are stamped with the grid's epoch, which advances on every compaction. A key
/// taken before a [`SpatialGrid::tick`] (or [`SpatialGrid::optimize`]) no longer
/// resolves afterwards, since compaction renumbers every entity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    epoch: u32,
    slot: SlotId,
}

impl EntityKey {
    pub(crate) const fn new(slot: SlotId, epoch: u32) -> Self {
        Self { epoch, slot }
    }

    /// Entity slot. After a compaction, lower slots were discovered earlier in scan order.
    pub const fn slot(self) -> SlotId {
        self.slot
    }

    /// Epoch the key was issued in.
    pub const fn epoch(self) -> u32 {
        self.epoch
    }
}

/// Result of one [`SpatialGrid::tick`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Co-located entity pairs counted by the scan.
    pub pairs: u64,
    /// Entities in the grid after compaction.
    pub entities: usize,
    /// Cell membership links after compaction.
    pub links: usize,
    /// Cells walked by the scan.
    pub cells_visited: usize,
}

/// Uniform grid broad phase.
///
/// Entities are inserted into every cell their bounding box overlaps. Each
/// [`tick`](Self::tick) compacts storage and then counts entity pairs sharing a cell.
///
/// Positions outside the covered world are clamped into the border cells rather than
/// rejected, so the border cells double as overflow buckets.
pub struct SpatialGrid<E> {
    cells: Box<[Option<SlotId>]>,
    cells_x: u32,
    cells_y: u32,
    cell_size: Dim,
    entities: SlotArena<E>,
    links: SlotArena<Link>,
    pair_counting: PairCounting,
    compactor: Compactor,
    scanner: Scanner,
    epoch: u32,
}

impl<E: Entity> SpatialGrid<E> {
    /// Build a grid from a validated configuration.
    pub fn new(config: GridConfig) -> GridResult<Self> {
        config.validate()?;
        let total = config.cell_total()?;
        Ok(Self {
            cells: vec![None; total].into_boxed_slice(),
            cells_x: config.cells_x,
            cells_y: config.cells_y,
            cell_size: Dim::new(config.cell_width, config.cell_height),
            entities: SlotArena::with_capacity(config.entity_capacity as usize),
            links: SlotArena::with_capacity(config.link_capacity as usize),
            pair_counting: config.pair_counting,
            compactor: Compactor::default(),
            scanner: Scanner::default(),
            epoch: 0,
        })
    }

    /// Shorthand for [`SpatialGrid::new`] with default sizing and watermark counting.
    pub fn with_cells(
        cells_x: u32,
        cells_y: u32,
        cell_width: f32,
        cell_height: f32,
    ) -> GridResult<Self> {
        Self::new(GridConfig::new(cells_x, cells_y, cell_width, cell_height))
    }

    /// Number of columns and rows.
    pub fn cells(&self) -> (u32, u32) {
        (self.cells_x, self.cells_y)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Size of one cell.
    pub fn cell_size(&self) -> Dim {
        self.cell_size
    }

    /// Pair de-duplication strategy used by [`tick`](Self::tick).
    pub fn pair_counting(&self) -> PairCounting {
        self.pair_counting
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if the grid holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of cell membership links.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Reserve room for `entities` more entities and `links` more links without growth.
    ///
    /// Capacity still follows the doubling policy; this only front-loads it.
    pub fn reserve(&mut self, entities: usize, links: usize) {
        self.entities.reserve(entities);
        self.links.reserve(links);
    }

    /// The cell containing `pos`.
    ///
    /// Each axis is clamped to at least zero, divided by the cell size, truncated, and
    /// clamped to the last cell.
    pub fn pos_to_cell(&self, pos: Pos) -> Cell {
        Cell::new(
            axis_cell(pos.x, self.cell_size.w, self.cells_x),
            axis_cell(pos.y, self.cell_size.h, self.cells_y),
        )
    }

    /// Cells covered by the box `pos - dim ..= pos + dim`.
    pub fn cells_for(&self, pos: Pos, dim: Dim) -> CellRange {
        let start = self.pos_to_cell(pos - dim);
        let end = self.pos_to_cell(pos + dim);
        // A negative half-extent would invert the box; keep the range well formed.
        CellRange::new(
            Cell::new(start.x.min(end.x), start.y.min(end.y)),
            Cell::new(start.x.max(end.x), start.y.max(end.y)),
        )
    }

    /// Cells covered by `entity`.
    pub fn cells_of(&self, entity: &E) -> CellRange {
        self.cells_for(entity.pos(), entity.dim())
    }

    /// Insert an entity into every cell its bounding box overlaps.
    ///
    /// Each covered cell gets its own link, prepended to the cell's chain.
    /// Fails without modifying the grid if the geometry is not finite or the index
    /// space is exhausted.
    pub fn insert(&mut self, entity: E) -> GridResult<EntityKey> {
        let (pos, dim) = (entity.pos(), entity.dim());
        if !pos.is_finite() || !dim.is_finite() {
            return Err(GridError::NonFiniteGeometry);
        }
        let range = self.cells_for(pos, dim);
        if self.entities.headroom() == 0 || self.links.headroom() < range.len() {
            return Err(GridError::CapacityExhausted);
        }

        let slot = self.entities.acquire(entity)?;
        for cell in range {
            let head = &mut self.cells[cell_index(cell, self.cells_y)];
            let link = self.links.acquire(Link {
                next: *head,
                referent: slot,
            })?;
            *head = Some(link);
        }
        Ok(EntityKey::new(slot, self.epoch))
    }

    /// Insert every entity from `entities`, stopping at the first failure.
    ///
    /// Returns how many were inserted.
    pub fn insert_many(&mut self, entities: impl IntoIterator<Item = E>) -> GridResult<usize> {
        let mut n = 0;
        for entity in entities {
            let _ = self.insert(entity)?;
            n += 1;
        }
        Ok(n)
    }

    /// Look up an entity. Keys from before the last compaction resolve to `None`.
    pub fn get(&self, key: EntityKey) -> Option<&E> {
        if key.epoch != self.epoch {
            return None;
        }
        self.entities.get(key.slot)
    }

    /// Entities in `cell`, in chain order (most recently linked first).
    ///
    /// Out-of-range cells are empty.
    pub fn cell_members(&self, cell: Cell) -> impl Iterator<Item = (EntityKey, &E)> + '_ {
        let head = if cell.x < self.cells_x && cell.y < self.cells_y {
            self.cells[cell_index(cell, self.cells_y)]
        } else {
            None
        };
        let epoch = self.epoch;
        Chain::new(&self.links, head).filter_map(move |(_, link)| {
            self.entities
                .get(link.referent)
                .map(|e| (EntityKey::new(link.referent, epoch), e))
        })
    }

    /// Remove every entity, keeping geometry and storage.
    ///
    /// Outstanding keys become stale.
    pub fn clear(&mut self) {
        self.cells.fill(None);
        self.entities.clear();
        self.links.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Compact both arenas and renumber entities in scan order.
    ///
    /// Runs at the start of every [`tick`](Self::tick); calling it directly is only
    /// useful to inspect the compacted layout. Outstanding keys become stale.
    pub fn optimize(&mut self) -> CompactionStats {
        let stats = self
            .compactor
            .run(&mut self.cells, &mut self.entities, &mut self.links);
        self.epoch = self.epoch.wrapping_add(1);
        tracing::debug!(
            entities = stats.entities,
            links = stats.links,
            entity_capacity = stats.entity_capacity,
            link_capacity = stats.link_capacity,
            "grid compacted"
        );
        stats
    }

    /// Compact, then count entity pairs sharing a cell.
    ///
    /// Outstanding keys become stale.
    pub fn tick(&mut self) -> TickReport {
        self.tick_with(|_| {})
    }

    /// Like [`tick`](Self::tick), also handing each counted pair to `visit`.
    ///
    /// Keys in the visited pairs belong to the new epoch and stay valid until the next
    /// compaction. This is the hook for a narrow phase.
    pub fn tick_with(&mut self, visit: impl FnMut(Pair<'_, E>)) -> TickReport {
        let stats = self.optimize();
        let pairs = self.scanner.run(
            self.pair_counting,
            &self.cells,
            &self.links,
            &self.entities,
            self.epoch,
            visit,
        );
        tracing::debug!(pairs, cells = self.cells.len(), "broad phase tick");
        TickReport {
            pairs,
            entities: stats.entities,
            links: stats.links,
            cells_visited: self.cells.len(),
        }
    }
}

/// Table position of `cell`: columns are contiguous.
#[inline]
fn cell_index(cell: Cell, cells_y: u32) -> usize {
    cell.x as usize * cells_y as usize + cell.y as usize
}

#[inline]
fn axis_cell(coord: f32, size: f32, count: u32) -> u32 {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "The operand is clamped non-negative; the float-to-int cast truncates and saturates."
    )]
    let cell = (coord.max(0.0) / size) as u32;
    cell.min(count - 1)
}

impl<E> Debug for SpatialGrid<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let occupied = self.cells.iter().filter(|c| c.is_some()).count();
        f.debug_struct("SpatialGrid")
            .field("cells_x", &self.cells_x)
            .field("cells_y", &self.cells_y)
            .field("cell_size", &self.cell_size)
            .field("occupied_cells", &occupied)
            .field("entities", &self.entities)
            .field("links", &self.links)
            .field("pair_counting", &self.pair_counting)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}
