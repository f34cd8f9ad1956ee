//! Grid coordinates.

use serde::{Deserialize, Serialize};

/// A `(row, col)` coordinate on the board.
///
/// Boards store tiles in a flat row-major sequence; use
/// [`Board::index_of`](crate::Board::index_of) and
/// [`Board::position_of`](crate::Board::position_of) to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Zero-based row, top to bottom.
    pub row: usize,
    /// Zero-based column, left to right.
    pub col: usize,
}

impl Position {
    /// Creates a position.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns true if `other` is exactly one step away horizontally or
    /// vertically. Diagonal, identical and distant positions are not adjacent.
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
