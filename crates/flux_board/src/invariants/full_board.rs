//! Full board invariant: one tile per cell.

use super::Invariant;
use crate::Board;

/// Invariant: the tile sequence has exactly `rows * cols` entries.
pub struct FullBoard;

impl Invariant<Board> for FullBoard {
    fn holds(board: &Board) -> bool {
        board.rows().checked_mul(board.cols()) == Some(board.tiles().len())
    }

    fn description() -> &'static str {
        "Board holds exactly rows * cols tiles"
    }
}
