// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types: positions, half-extents, cells, and cell ranges.

use core::ops::{Add, Sub};

/// A point in world space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Pos {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Pos {
    /// Create a position.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Half-extent of an entity.
///
/// The bounding box of an entity at `pos` spans `pos - dim ..= pos + dim`, so `w` and `h`
/// are half the box's width and height.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Dim {
    /// Horizontal half-extent.
    pub w: f32,
    /// Vertical half-extent.
    pub h: f32,
}

impl Dim {
    /// Create a half-extent.
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    /// Whether both components are finite.
    pub fn is_finite(self) -> bool {
        self.w.is_finite() && self.h.is_finite()
    }
}

impl Add<Dim> for Pos {
    type Output = Self;

    fn add(self, rhs: Dim) -> Self {
        Self::new(self.x + rhs.w, self.y + rhs.h)
    }
}

impl Sub<Dim> for Pos {
    type Output = Self;

    fn sub(self, rhs: Dim) -> Self {
        Self::new(self.x - rhs.w, self.y - rhs.h)
    }
}

/// Something the grid can bucket: a position and a half-extent.
///
/// The grid stores entities by value and hands them back from queries and pair visits.
pub trait Entity {
    /// Centre of the entity.
    fn pos(&self) -> Pos;

    /// Half-extent of the entity around [`Entity::pos`].
    fn dim(&self) -> Dim;
}

/// Plain entity: a centre and a half-extent with no payload.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Body {
    /// Centre.
    pub pos: Pos,
    /// Half-extent.
    pub dim: Dim,
}

impl Body {
    /// Create a body centred at `(x, y)` with half-extent `(w, h)`.
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Pos::new(x, y),
            dim: Dim::new(w, h),
        }
    }
}

impl Entity for Body {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn dim(&self) -> Dim {
        self.dim
    }
}

/// Integer cell coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl Cell {
    /// Create a cell coordinate.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Inclusive rectangle of cells covered by a bounding box.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellRange {
    /// Lowest covered cell on both axes.
    pub start: Cell,
    /// Highest covered cell on both axes (inclusive).
    pub end: Cell,
}

impl CellRange {
    /// Create a range. `start` must not exceed `end` on either axis.
    pub const fn new(start: Cell, end: Cell) -> Self {
        Self { start, end }
    }

    /// Number of cells in the range.
    pub fn len(&self) -> usize {
        let w = (self.end.x - self.start.x) as usize + 1;
        let h = (self.end.y - self.start.y) as usize + 1;
        w * h
    }

    /// Always false: a range covers at least one cell.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `cell` lies inside the range.
    pub fn contains(&self, cell: Cell) -> bool {
        (self.start.x..=self.end.x).contains(&cell.x) && (self.start.y..=self.end.y).contains(&cell.y)
    }

    /// Iterate covered cells, column by column.
    pub fn iter(&self) -> CellRangeIter {
        CellRangeIter {
            range: *self,
            next: Some(self.start),
        }
    }
}

impl IntoIterator for CellRange {
    type Item = Cell;
    type IntoIter = CellRangeIter;

    fn into_iter(self) -> CellRangeIter {
        self.iter()
    }
}

/// Iterator over the cells of a [`CellRange`].
#[derive(Clone, Debug)]
pub struct CellRangeIter {
    range: CellRange,
    next: Option<Cell>,
}

impl Iterator for CellRangeIter {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        let cell = self.next?;
        self.next = if cell.y < self.range.end.y {
            Some(Cell::new(cell.x, cell.y + 1))
        } else if cell.x < self.range.end.x {
            Some(Cell::new(cell.x + 1, self.range.start.y))
        } else {
            None
        };
        Some(cell)
    }
}

#[cfg(feature = "kurbo")]
mod kurbo_interop {
    #![allow(
        clippy::cast_possible_truncation,
        reason = "Kurbo works in f64; the grid stores f32 and accepts the precision loss."
    )]

    use super::{Dim, Entity, Pos};

    impl From<kurbo::Point> for Pos {
        fn from(p: kurbo::Point) -> Self {
            Self::new(p.x as f32, p.y as f32)
        }
    }

    impl From<kurbo::Vec2> for Dim {
        fn from(v: kurbo::Vec2) -> Self {
            Self::new(v.x as f32, v.y as f32)
        }
    }

    /// A rectangle is bucketed by its centre and half its size.
    impl Entity for kurbo::Rect {
        fn pos(&self) -> Pos {
            self.center().into()
        }

        fn dim(&self) -> Dim {
            let size = self.size();
            Dim::new((size.width * 0.5).abs() as f32, (size.height * 0.5).abs() as f32)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn body_box_is_pos_plus_minus_dim() {
        let b = Body::new(10.0, 20.0, 3.0, 4.0);
        assert_eq!(b.pos() - b.dim(), Pos::new(7.0, 16.0));
        assert_eq!(b.pos() + b.dim(), Pos::new(13.0, 24.0));
    }

    #[test]
    fn cell_range_iterates_every_cell_once() {
        let r = CellRange::new(Cell::new(1, 2), Cell::new(2, 4));
        let cells: Vec<_> = r.iter().collect();
        assert_eq!(cells.len(), r.len());
        assert_eq!(
            cells,
            [
                Cell::new(1, 2),
                Cell::new(1, 3),
                Cell::new(1, 4),
                Cell::new(2, 2),
                Cell::new(2, 3),
                Cell::new(2, 4),
            ]
        );
        assert!(r.contains(Cell::new(2, 3)));
        assert!(!r.contains(Cell::new(0, 3)));
    }

    #[test]
    fn single_cell_range() {
        let c = Cell::new(5, 5);
        let r = CellRange::new(c, c);
        assert_eq!(r.len(), 1);
        assert_eq!(r.into_iter().collect::<Vec<_>>(), [c]);
    }

    #[test]
    fn finiteness() {
        assert!(Pos::new(1.0, 2.0).is_finite());
        assert!(!Pos::new(f32::NAN, 2.0).is_finite());
        assert!(!Dim::new(1.0, f32::INFINITY).is_finite());
    }
}
