//! Match detection.
//!
//! This is the only match detector in the engine. Generation validity,
//! possible-move search and cascade resolution all call [`find_matches`].

use crate::Board;
use std::collections::BTreeSet;
use tracing::{instrument, trace};

/// Board indices taking part in at least one run of three or more equal
/// tiles, horizontally or vertically. Iterates in ascending index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet(BTreeSet<usize>);

impl MatchSet {
    /// True when no run was found.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of matched cells.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if `index` is part of a run.
    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    /// Matched indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    fn insert_triple(&mut self, a: usize, b: usize, c: usize) {
        self.0.insert(a);
        self.0.insert(b);
        self.0.insert(c);
    }
}

impl FromIterator<usize> for MatchSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Finds every cell that belongs to a horizontal or vertical triple.
///
/// Longer runs are covered by their overlapping triples: a run of four
/// contributes two triples and all four indices.
#[instrument(skip(board), fields(rows = board.rows(), cols = board.cols()))]
pub fn find_matches(board: &Board) -> MatchSet {
    let rows = board.rows();
    let cols = board.cols();
    let tiles = board.tiles();
    let mut matches = MatchSet::default();

    for r in 0..rows {
        for c in 0..cols.saturating_sub(2) {
            let i = r * cols + c;
            if tiles[i] == tiles[i + 1] && tiles[i] == tiles[i + 2] {
                matches.insert_triple(i, i + 1, i + 2);
            }
        }
    }

    for c in 0..cols {
        for r in 0..rows.saturating_sub(2) {
            let i = r * cols + c;
            if tiles[i] == tiles[i + cols] && tiles[i] == tiles[i + 2 * cols] {
                matches.insert_triple(i, i + cols, i + 2 * cols);
            }
        }
    }

    trace!(matched = matches.len(), "Match scan complete");
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_on_striped_board() {
        let board = Board::from_rows(&["RGB", "GBR", "BRG"]).unwrap();
        assert!(find_matches(&board).is_empty());
    }

    #[test]
    fn test_vertical_triple() {
        let board = Board::from_rows(&["RGB", "RBG", "RGB"]).unwrap();
        let matches = find_matches(&board);
        assert_eq!(matches.iter().collect::<Vec<_>>(), vec![0, 3, 6]);
    }

    #[test]
    fn test_run_of_four_covers_all_cells() {
        let board = Board::from_rows(&["YYYY", "RGBO"]).unwrap();
        let matches = find_matches(&board);
        assert_eq!(matches.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_crossing_runs_union() {
        let board = Board::from_rows(&["GRG", "RRR", "GRG"]).unwrap();
        let matches = find_matches(&board);
        assert_eq!(matches.iter().collect::<Vec<_>>(), vec![1, 3, 4, 5, 7]);
    }

    #[test]
    fn test_narrow_boards_never_match() {
        let board = Board::from_rows(&["RR", "RR"]).unwrap();
        assert!(find_matches(&board).is_empty());
    }
}
