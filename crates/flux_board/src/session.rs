//! Per-player game session bookkeeping.
//!
//! The engine itself returns the same rejected shape for invalid and
//! ineffective swaps. The session tells them apart: an invalid request does
//! not spend a move, an ineffective adjacent swap does.

use crate::{Board, EngineError, Rules, TileSource, apply_swap, generate_board};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Board, score and remaining moves of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    board: Board,
    score: u64,
    moves_remaining: u32,
}

/// Result of one played turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Whether the swap produced a match.
    pub accepted: bool,
    /// Points earned this turn.
    pub score_delta: u64,
    /// Cascade passes run this turn.
    pub passes: usize,
}

/// Reasons a turn could not be played.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PlayError {
    /// The session has no moves left.
    #[display("No moves remaining")]
    NoMovesRemaining,

    /// The two cells are not orthogonal neighbours on the board.
    #[display("Cells {} and {} are not adjacent", from, to)]
    NotAdjacent {
        /// First cell.
        from: usize,
        /// Second cell.
        to: usize,
    },

    /// The engine failed.
    #[display("{}", _0)]
    Engine(EngineError),
}

impl std::error::Error for PlayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlayError::Engine(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EngineError> for PlayError {
    fn from(err: EngineError) -> Self {
        PlayError::Engine(err)
    }
}

impl GameSession {
    /// Starts a session on a freshly generated board with zero score and the
    /// full move allowance.
    ///
    /// # Errors
    ///
    /// Propagates generation failures.
    #[instrument(skip(rules, source))]
    pub fn new<S>(rules: &Rules, source: &mut S) -> Result<Self, EngineError>
    where
        S: TileSource + ?Sized,
    {
        let board = generate_board(rules, source)?;
        Ok(Self {
            board,
            score: 0,
            moves_remaining: *rules.max_moves(),
        })
    }

    /// Rebuilds a session from persisted parts.
    pub fn from_parts(board: Board, score: u64, moves_remaining: u32) -> Self {
        Self {
            board,
            score,
            moves_remaining,
        }
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Accumulated score.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Moves left before the session is over.
    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    /// True once every move has been spent.
    pub fn is_over(&self) -> bool {
        self.moves_remaining == 0
    }

    /// Plays the swap of `from` and `to`.
    ///
    /// Accepted and ineffective swaps both spend a move; only accepted swaps
    /// change the board and score.
    ///
    /// # Errors
    ///
    /// - [`PlayError::NoMovesRemaining`] when the session is over
    /// - [`PlayError::NotAdjacent`] for non-adjacent or out-of-range cells
    /// - [`PlayError::Engine`] if the cascade runs away
    #[instrument(skip(self, rules, source), fields(score = self.score, moves = self.moves_remaining))]
    pub fn play<S>(
        &mut self,
        from: usize,
        to: usize,
        rules: &Rules,
        source: &mut S,
    ) -> Result<Turn, PlayError>
    where
        S: TileSource + ?Sized,
    {
        if self.is_over() {
            warn!("Play attempted with no moves remaining");
            return Err(PlayError::NoMovesRemaining);
        }
        if !self.board.is_adjacent(from, to) {
            return Err(PlayError::NotAdjacent { from, to });
        }

        let outcome = apply_swap(&self.board, from, to, rules, source)?;
        self.moves_remaining -= 1;
        self.score += outcome.score_delta;
        self.board = outcome.board;

        info!(
            accepted = outcome.accepted,
            score = self.score,
            moves_remaining = self.moves_remaining,
            "Turn played"
        );

        Ok(Turn {
            accepted: outcome.accepted,
            score_delta: outcome.score_delta,
            passes: outcome.passes,
        })
    }

    /// Replaces the session with a fresh one: new board, zero score, full
    /// move allowance.
    ///
    /// # Errors
    ///
    /// Propagates generation failures; the session is unchanged on error.
    #[instrument(skip(self, rules, source))]
    pub fn reset<S>(&mut self, rules: &Rules, source: &mut S) -> Result<(), EngineError>
    where
        S: TileSource + ?Sized,
    {
        *self = Self::new(rules, source)?;
        info!("Session reset");
        Ok(())
    }
}
