//! Flux Board - pure match-3 board engine.
//!
//! The engine owns no state between calls. Every operation takes a [`Board`]
//! value plus an injected [`TileSource`] and returns a new value, so it can be
//! driven by a server, a test harness or a replay tool alike.
//!
//! # Architecture
//!
//! - **Generator**: rejection-samples boards with no standing match and at
//!   least one scoring swap
//! - **Matches**: the single horizontal/vertical triple detector
//! - **Moves**: adjacency and possible-move queries
//! - **Cascade**: swap, award, refill in place, repeat until stable
//! - **Session**: score and move bookkeeping on top of the engine
//!
//! # Example
//!
//! ```
//! use flux_board::{Rules, apply_swap, find_matches, generate_board};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! # fn example() -> Result<(), flux_board::EngineError> {
//! let rules = Rules::default();
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let board = generate_board(&rules, &mut rng)?;
//! assert!(find_matches(&board).is_empty());
//!
//! let outcome = apply_swap(&board, 0, 1, &rules, &mut rng)?;
//! if !outcome.accepted {
//!     assert_eq!(outcome.board, board);
//! }
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod cascade;
mod error;
mod generator;
mod invariants;
mod matches;
mod moves;
mod position;
mod rules;
mod session;
mod source;
mod tile;

pub use board::Board;
pub use cascade::{SwapOutcome, apply_swap};
pub use error::EngineError;
pub use generator::generate_board;
pub use invariants::{
    FullBoard, GeneratedBoardInvariants, HasPossibleMove, Invariant, InvariantSet,
    InvariantViolation, NoStandingMatch, ResolvedBoardInvariants,
};
pub use matches::{MatchSet, find_matches};
pub use moves::{has_possible_move, possible_moves};
pub use position::Position;
pub use rules::{Palette, Rules};
pub use session::{GameSession, PlayError, Turn};
pub use source::{ScriptedTiles, TileSource};
pub use tile::Tile;
