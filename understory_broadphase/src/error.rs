// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by grid construction and insertion.

use core::fmt;

use thiserror::Error;

/// Grid axis, used to point at the offending half of a configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

/// Errors that can occur while building or filling a grid.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GridError {
    /// A cell count of zero.
    #[error("cell count along {axis} must be at least 1")]
    ZeroCellCount {
        /// Offending axis.
        axis: Axis,
    },

    /// A cell size that is zero, negative, or not finite.
    #[error("cell size along {axis} must be positive and finite, got {size}")]
    InvalidCellSize {
        /// Offending axis.
        axis: Axis,
        /// The rejected size.
        size: f32,
    },

    /// The cell table would not be addressable.
    #[error("{cells_x}x{cells_y} cells do not fit in the cell table")]
    TooManyCells {
        /// Requested columns.
        cells_x: u32,
        /// Requested rows.
        cells_y: u32,
    },

    /// An entity with a NaN or infinite position or half-extent.
    #[error("entity position and half-extent must be finite")]
    NonFiniteGeometry,

    /// A slot arena ran out of 32-bit indices.
    #[error("slot arena index space exhausted")]
    CapacityExhausted,
}

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_axis() {
        let e = GridError::InvalidCellSize {
            axis: Axis::Y,
            size: -1.0,
        };
        assert_eq!(
            e.to_string(),
            "cell size along y must be positive and finite, got -1"
        );
        assert_eq!(
            GridError::ZeroCellCount { axis: Axis::X }.to_string(),
            "cell count along x must be at least 1"
        );
    }
}
