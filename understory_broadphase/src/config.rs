// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid configuration.

use crate::error::{Axis, GridError, GridResult};
use crate::scan::PairCounting;

/// Geometry and sizing for a [`SpatialGrid`](crate::SpatialGrid).
///
/// The world covered by the grid spans `0..cells_x * cell_width` horizontally and
/// `0..cells_y * cell_height` vertically. Geometry is fixed for the grid's lifetime.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Number of columns.
    pub cells_x: u32,
    /// Number of rows.
    pub cells_y: u32,
    /// Width of one cell.
    pub cell_width: f32,
    /// Height of one cell.
    pub cell_height: f32,
    /// Initial entity arena capacity, in slots.
    pub entity_capacity: u32,
    /// Initial link arena capacity, in slots.
    pub link_capacity: u32,
    /// How [`SpatialGrid::tick`](crate::SpatialGrid::tick) de-duplicates pairs.
    pub pair_counting: PairCounting,
}

impl GridConfig {
    /// A `cells_x` × `cells_y` grid of `cell_width` × `cell_height` cells with
    /// minimal initial storage and watermark pair counting.
    pub const fn new(cells_x: u32, cells_y: u32, cell_width: f32, cell_height: f32) -> Self {
        Self {
            cells_x,
            cells_y,
            cell_width,
            cell_height,
            entity_capacity: 1,
            link_capacity: 1,
            pair_counting: PairCounting::Watermark,
        }
    }

    /// Pre-size the entity and link arenas.
    ///
    /// Use this when the expected population is known to skip the early growth steps.
    #[must_use]
    pub const fn with_capacity(mut self, entities: u32, links: u32) -> Self {
        self.entity_capacity = entities;
        self.link_capacity = links;
        self
    }

    /// Choose the pair de-duplication strategy.
    #[must_use]
    pub const fn with_pair_counting(mut self, pair_counting: PairCounting) -> Self {
        self.pair_counting = pair_counting;
        self
    }

    /// Check the geometry.
    pub fn validate(&self) -> GridResult<()> {
        if self.cells_x == 0 {
            return Err(GridError::ZeroCellCount { axis: Axis::X });
        }
        if self.cells_y == 0 {
            return Err(GridError::ZeroCellCount { axis: Axis::Y });
        }
        check_size(Axis::X, self.cell_width)?;
        check_size(Axis::Y, self.cell_height)?;
        self.cell_total().map(|_| ())
    }

    /// Number of cells in the table.
    pub(crate) fn cell_total(&self) -> GridResult<usize> {
        (self.cells_x as usize)
            .checked_mul(self.cells_y as usize)
            .ok_or(GridError::TooManyCells {
                cells_x: self.cells_x,
                cells_y: self.cells_y,
            })
    }
}

fn check_size(axis: Axis, size: f32) -> GridResult<()> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidCellSize { axis, size })
    }
}

#[cfg(feature = "kurbo")]
impl GridConfig {
    /// A grid of `cells_x` × `cells_y` cells covering a world of the given size.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Kurbo sizes are f64; cell sizes are stored as f32."
    )]
    pub fn covering(size: kurbo::Size, cells_x: u32, cells_y: u32) -> Self {
        let w = size.width / f64::from(cells_x.max(1));
        let h = size.height / f64::from(cells_y.max(1));
        Self::new(cells_x, cells_y, w as f32, h as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_geometry_passes() {
        assert_eq!(GridConfig::new(4, 8, 1.5, 2.0).validate(), Ok(()));
    }

    #[test]
    fn zero_counts_are_rejected() {
        assert_eq!(
            GridConfig::new(0, 8, 1.0, 1.0).validate(),
            Err(GridError::ZeroCellCount { axis: Axis::X })
        );
        assert_eq!(
            GridConfig::new(8, 0, 1.0, 1.0).validate(),
            Err(GridError::ZeroCellCount { axis: Axis::Y })
        );
    }

    #[test]
    fn bad_sizes_are_rejected() {
        assert_eq!(
            GridConfig::new(1, 1, 0.0, 1.0).validate(),
            Err(GridError::InvalidCellSize {
                axis: Axis::X,
                size: 0.0
            })
        );
        assert_eq!(
            GridConfig::new(1, 1, 1.0, -2.0).validate(),
            Err(GridError::InvalidCellSize {
                axis: Axis::Y,
                size: -2.0
            })
        );
        assert!(matches!(
            GridConfig::new(1, 1, f32::NAN, 1.0).validate(),
            Err(GridError::InvalidCellSize { axis: Axis::X, .. })
        ));
        assert!(GridConfig::new(1, 1, f32::INFINITY, 1.0).validate().is_err());
    }

    #[test]
    fn builders_set_fields() {
        let cfg = GridConfig::new(2, 2, 1.0, 1.0)
            .with_capacity(100, 400)
            .with_pair_counting(PairCounting::Exact);
        assert_eq!(cfg.entity_capacity, 100);
        assert_eq!(cfg.link_capacity, 400);
        assert_eq!(cfg.pair_counting, PairCounting::Exact);
    }
}
