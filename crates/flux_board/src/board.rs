//! Flat row-major board of tiles.

use crate::{EngineError, Position, Tile};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A `rows x cols` grid of tiles stored row-major, index `row * cols + col`.
///
/// The tile sequence always has exactly `rows * cols` entries and every cell
/// holds a tile; there is no empty state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
}

/// Unchecked wire form of [`Board`].
#[derive(Deserialize)]
struct RawBoard {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
}

impl TryFrom<RawBoard> for Board {
    type Error = EngineError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        Board::from_tiles(raw.rows, raw.cols, raw.tiles)
    }
}

impl Board {
    /// Builds a board from a flat row-major tile sequence.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidBoard`] if the length is not `rows * cols`.
    #[instrument(skip(tiles), fields(len = tiles.len()))]
    pub fn from_tiles(rows: usize, cols: usize, tiles: Vec<Tile>) -> Result<Self, EngineError> {
        if rows.checked_mul(cols) != Some(tiles.len()) {
            return Err(EngineError::InvalidBoard {
                rows,
                cols,
                len: tiles.len(),
            });
        }
        Ok(Self { rows, cols, tiles })
    }

    /// Parses a text board, one string per row, one letter per tile
    /// (`R B G Y P O`). Whitespace inside a row is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidBoard`] for ragged rows or unknown letters.
    pub fn from_rows(rows: &[&str]) -> Result<Self, EngineError> {
        let parsed: Vec<Vec<Tile>> = rows
            .iter()
            .map(|row| {
                row.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(Tile::from_letter)
                    .collect::<Option<Vec<_>>>()
            })
            .collect::<Option<Vec<_>>>()
            .ok_or(EngineError::InvalidBoard {
                rows: rows.len(),
                cols: 0,
                len: 0,
            })?;

        let cols = parsed.first().map_or(0, Vec::len);
        let tiles: Vec<Tile> = parsed.into_iter().flatten().collect();
        Self::from_tiles(rows.len(), cols, tiles)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells (`rows * cols`).
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True for a zero-sized board.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Consumes the board, returning its tiles.
    pub fn into_tiles(self) -> Vec<Tile> {
        self.tiles
    }

    /// Tile at a flat index.
    pub fn get(&self, index: usize) -> Option<Tile> {
        self.tiles.get(index).copied()
    }

    /// Tile at a grid position.
    pub fn at(&self, position: Position) -> Option<Tile> {
        self.index_of(position).and_then(|index| self.get(index))
    }

    /// Overwrites the tile at `index`. Out-of-range indices are ignored.
    pub(crate) fn set(&mut self, index: usize, tile: Tile) {
        if let Some(cell) = self.tiles.get_mut(index) {
            *cell = tile;
        }
    }

    /// Exchanges two cells in place. Both indices must be in range.
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.tiles.swap(a, b);
    }

    /// Converts a flat index into a grid position.
    pub fn position_of(&self, index: usize) -> Option<Position> {
        (index < self.len()).then(|| Position::new(index / self.cols, index % self.cols))
    }

    /// Converts a grid position into a flat index.
    pub fn index_of(&self, position: Position) -> Option<usize> {
        (position.row < self.rows && position.col < self.cols)
            .then(|| position.row * self.cols + position.col)
    }

    /// True iff both indices are on the board and orthogonally adjacent.
    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        match (self.position_of(a), self.position_of(b)) {
            (Some(pa), Some(pb)) => pa.is_adjacent(&pb),
            _ => false,
        }
    }

    /// Formats the board as rows of tile letters.
    pub fn display(&self) -> String {
        self.tiles
            .chunks(self.cols.max(1))
            .map(|row| row.iter().map(|t| t.letter()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tiles_rejects_wrong_length() {
        let result = Board::from_tiles(2, 2, vec![Tile::Red; 3]);
        assert_eq!(
            result,
            Err(EngineError::InvalidBoard {
                rows: 2,
                cols: 2,
                len: 3
            })
        );
    }

    #[test]
    fn test_deserialize_checks_length() {
        let short = serde_json::from_str::<Board>(r#"{"rows":8,"cols":8,"tiles":["red"]}"#);
        assert!(short.is_err());

        let ok: Board =
            serde_json::from_str(r#"{"rows":1,"cols":3,"tiles":["red","green","blue"]}"#)
                .unwrap();
        assert_eq!(ok, Board::from_rows(&["RGB"]).unwrap());
    }

    #[test]
    fn test_from_tiles_rejects_overflowing_dimensions() {
        assert!(Board::from_tiles(usize::MAX, 2, vec![Tile::Red; 2]).is_err());
    }

    #[test]
    fn test_from_rows_parses_letters() {
        let board = Board::from_rows(&["RGB", "YPO"]).unwrap();
        assert_eq!(board.rows(), 2);
        assert_eq!(board.cols(), 3);
        assert_eq!(board.get(0), Some(Tile::Red));
        assert_eq!(board.get(5), Some(Tile::Orange));
        assert_eq!(board.display(), "RGB\nYPO");
    }

    #[test]
    fn test_from_rows_rejects_ragged_and_unknown() {
        assert!(Board::from_rows(&["RGB", "YP"]).is_err());
        assert!(Board::from_rows(&["RGX"]).is_err());
    }

    #[test]
    fn test_index_position_round_trip() {
        let board = Board::from_tiles(8, 8, vec![Tile::Red; 64]).unwrap();
        for index in 0..64 {
            let position = board.position_of(index).unwrap();
            assert_eq!(board.index_of(position), Some(index));
        }
        assert_eq!(board.position_of(64), None);
        assert_eq!(board.index_of(Position::new(0, 8)), None);
        assert_eq!(board.position_of(9), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_adjacency_uses_grid_width() {
        let board = Board::from_tiles(8, 8, vec![Tile::Blue; 64]).unwrap();
        assert!(board.is_adjacent(0, 1));
        assert!(board.is_adjacent(0, 8));
        assert!(!board.is_adjacent(0, 9));
        assert!(!board.is_adjacent(0, 2));
        assert!(!board.is_adjacent(0, 0));
        // 7 and 8 are consecutive indices but on different rows
        assert!(!board.is_adjacent(7, 8));
        assert!(!board.is_adjacent(63, 64));
    }
}
