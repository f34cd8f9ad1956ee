//! Possible-move search.

use crate::{Board, find_matches};
use tracing::{debug, instrument};

/// Every adjacent pair `(a, b)` with `a < b`, each pair exactly once: the
/// right neighbour and the bottom neighbour of every cell.
fn adjacent_pairs(board: &Board) -> impl Iterator<Item = (usize, usize)> + '_ {
    let rows = board.rows();
    let cols = board.cols();
    (0..board.len()).flat_map(move |i| {
        let (r, c) = (i / cols, i % cols);
        let right = (c + 1 < cols).then_some((i, i + 1));
        let down = (r + 1 < rows).then_some((i, i + cols));
        right.into_iter().chain(down)
    })
}

fn swap_scores(board: &Board, scratch: &mut Board, a: usize, b: usize) -> bool {
    scratch.swap(a, b);
    let scores = !find_matches(scratch).is_empty();
    scratch.swap(a, b);
    debug_assert_eq!(scratch, board);
    scores
}

/// Returns true if at least one adjacent swap would produce a match.
#[instrument(skip(board), fields(rows = board.rows(), cols = board.cols()))]
pub fn has_possible_move(board: &Board) -> bool {
    let mut scratch = board.clone();
    let found = adjacent_pairs(board).any(|(a, b)| swap_scores(board, &mut scratch, a, b));
    debug!(found, "Possible move search complete");
    found
}

/// Lists every adjacent swap that would produce a match, in scan order.
#[instrument(skip(board), fields(rows = board.rows(), cols = board.cols()))]
pub fn possible_moves(board: &Board) -> Vec<(usize, usize)> {
    let mut scratch = board.clone();
    let moves: Vec<_> = adjacent_pairs(board)
        .filter(|&(a, b)| swap_scores(board, &mut scratch, a, b))
        .collect();
    debug!(count = moves.len(), "Possible moves listed");
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_pairs_cover_each_pair_once() {
        let board = Board::from_rows(&["RGB", "GBR"]).unwrap();
        let pairs: Vec<_> = adjacent_pairs(&board).collect();
        // 2 rows x 2 horizontal pairs + 3 vertical pairs
        assert_eq!(pairs.len(), 7);
        assert!(pairs.contains(&(0, 1)));
        assert!(pairs.contains(&(0, 3)));
        assert!(!pairs.contains(&(2, 3)));
    }

    #[test]
    fn test_detects_single_scoring_swap() {
        let board = Board::from_rows(&["RRGR", "GBYB"]).unwrap();
        assert!(has_possible_move(&board));
        assert_eq!(possible_moves(&board), vec![(2, 3)]);
    }

    #[test]
    fn test_two_by_two_has_no_move() {
        let board = Board::from_rows(&["RG", "GR"]).unwrap();
        assert!(!has_possible_move(&board));
        assert!(possible_moves(&board).is_empty());
    }
}
