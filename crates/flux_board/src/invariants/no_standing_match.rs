//! No standing match invariant.

use super::Invariant;
use crate::{Board, find_matches};

/// Invariant: no run of three equal tiles is on the board.
pub struct NoStandingMatch;

impl Invariant<Board> for NoStandingMatch {
    fn holds(board: &Board) -> bool {
        find_matches(board).is_empty()
    }

    fn description() -> &'static str {
        "Board has no standing match"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holds_without_runs() {
        let board = Board::from_rows(&["RGB", "GBR"]).unwrap();
        assert!(NoStandingMatch::holds(&board));
    }

    #[test]
    fn test_violated_by_vertical_run() {
        let board = Board::from_rows(&["RG", "RB", "RY"]).unwrap();
        assert!(!NoStandingMatch::holds(&board));
    }
}
