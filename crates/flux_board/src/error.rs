//! Engine error types.

/// Fatal errors raised by the board engine.
///
/// Rejected swaps are not errors; they come back as a
/// [`SwapOutcome`](crate::SwapOutcome) with `accepted == false`.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum EngineError {
    /// The rules cannot describe a playable board.
    #[display("Invalid rules: {}", _0)]
    InvalidRules(String),

    /// No board satisfying the generation invariants was found in budget.
    #[display("No valid board found after {} attempts", attempts)]
    GenerationExhausted {
        /// Number of rejected candidate boards.
        attempts: usize,
    },

    /// The cascade loop kept finding matches past its pass cap.
    #[display("Cascade did not settle within {} passes", passes)]
    CascadeRunaway {
        /// Number of passes run before giving up.
        passes: usize,
    },

    /// A tile sequence does not fit the requested grid.
    #[display("Board of {}x{} needs {} tiles, got {}", rows, cols, rows.saturating_mul(*cols), len)]
    InvalidBoard {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
        /// Length of the supplied tile sequence.
        len: usize,
    },
}

impl std::error::Error for EngineError {}
