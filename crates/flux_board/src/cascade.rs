//! Swap application and cascade resolution.
//!
//! Matched cells are refilled in place with fresh draws; tiles never fall.
//! A refill may draw the same color it replaced.

use crate::invariants::{InvariantSet, ResolvedBoardInvariants};
use crate::{Board, EngineError, Rules, TileSource, find_matches};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Result of [`apply_swap`].
///
/// Rejected swaps (non-adjacent, out of range, or producing no match) carry
/// the input board unchanged and a zero score delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    /// Whether the swap produced at least one match.
    pub accepted: bool,
    /// Board after resolution (the input board when rejected).
    pub board: Board,
    /// Points earned over all cascade passes.
    pub score_delta: u64,
    /// Number of award/refill passes run.
    pub passes: usize,
}

impl SwapOutcome {
    fn rejected(board: &Board) -> Self {
        Self {
            accepted: false,
            board: board.clone(),
            score_delta: 0,
            passes: 0,
        }
    }
}

/// Swaps the tiles at `a` and `b` and resolves the resulting cascade.
///
/// Each pass awards `matched cells * points_per_tile`, refills every matched
/// cell in ascending index order from `source`, and re-runs detection until
/// the board is stable.
///
/// # Errors
///
/// Returns [`EngineError::CascadeRunaway`] if the board is still matching
/// after `max_cascade_passes` passes. A truncated result is never returned.
#[instrument(skip(board, rules, source))]
pub fn apply_swap<S>(
    board: &Board,
    a: usize,
    b: usize,
    rules: &Rules,
    source: &mut S,
) -> Result<SwapOutcome, EngineError>
where
    S: TileSource + ?Sized,
{
    if !board.is_adjacent(a, b) {
        warn!(a, b, "Rejected swap of non-adjacent cells");
        return Ok(SwapOutcome::rejected(board));
    }

    let mut next = board.clone();
    next.swap(a, b);

    let mut matches = find_matches(&next);
    if matches.is_empty() {
        debug!(a, b, "Swap produced no match, reverting");
        return Ok(SwapOutcome::rejected(board));
    }

    let max_passes = *rules.max_cascade_passes();
    let mut score_delta = 0;
    let mut passes = 0;

    while !matches.is_empty() {
        if passes == max_passes {
            warn!(passes, score_delta, "Cascade exceeded its pass cap");
            return Err(EngineError::CascadeRunaway { passes });
        }
        passes += 1;
        score_delta += matches.len() as u64 * rules.points_per_tile();

        for index in matches.iter() {
            next.set(index, source.next_tile(rules.palette()));
        }
        debug!(pass = passes, cleared = matches.len(), score_delta, "Cascade pass resolved");

        matches = find_matches(&next);
    }

    debug_assert!(ResolvedBoardInvariants::check_all(&next).is_ok());
    info!(a, b, passes, score_delta, "Swap accepted");

    Ok(SwapOutcome {
        accepted: true,
        board: next,
        score_delta,
        passes,
    })
}
