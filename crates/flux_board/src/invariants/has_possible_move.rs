//! Solvability invariant.

use super::Invariant;
use crate::{Board, has_possible_move};

/// Invariant: at least one adjacent swap produces a match.
pub struct HasPossibleMove;

impl Invariant<Board> for HasPossibleMove {
    fn holds(board: &Board) -> bool {
        has_possible_move(board)
    }

    fn description() -> &'static str {
        "Board has at least one scoring swap"
    }
}
