//! First-class board invariants.
//!
//! Invariants are logical properties of a [`Board`](crate::Board). The
//! generator accepts a candidate exactly when [`GeneratedBoardInvariants`]
//! holds, and the cascade resolver checks [`ResolvedBoardInvariants`] on its
//! output in debug builds.

mod full_board;
mod has_possible_move;
mod no_standing_match;

pub use full_board::FullBoard;
pub use has_possible_move::HasPossibleMove;
pub use no_standing_match::NoStandingMatch;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants checked together, implemented for tuples.
pub trait InvariantSet<S> {
    /// Checks every invariant in the set, collecting all violations.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn check<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

fn finish(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check::<S, I1>(state, &mut violations);
        check::<S, I2>(state, &mut violations);
        finish(violations)
    }
}

// The third member is only checked once the first two hold.
impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        <(I1, I2)>::check_all(state)?;
        let mut violations = Vec::new();
        check::<S, I3>(state, &mut violations);
        finish(violations)
    }
}

/// Invariants of a freshly generated board.
pub type GeneratedBoardInvariants = (FullBoard, NoStandingMatch, HasPossibleMove);

/// Invariants of a board after a swap has been resolved.
pub type ResolvedBoardInvariants = (FullBoard, NoStandingMatch);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Board;

    #[test]
    fn test_generated_set_holds_for_playable_board() {
        let board = Board::from_rows(&["RRGR", "GBYB", "YOPO"]).unwrap();
        assert!(GeneratedBoardInvariants::check_all(&board).is_ok());
    }

    #[test]
    fn test_generated_set_reports_standing_match() {
        let board = Board::from_rows(&["RRRG", "GBYB", "YOPO"]).unwrap();
        let violations = GeneratedBoardInvariants::check_all(&board).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].description, NoStandingMatch::description());
    }

    #[test]
    fn test_generated_set_reports_dead_board() {
        let board = Board::from_rows(&["RG", "GR"]).unwrap();
        let violations = GeneratedBoardInvariants::check_all(&board).unwrap_err();
        assert_eq!(violations[0].description, HasPossibleMove::description());
    }

    #[test]
    fn test_resolved_set_ignores_dead_boards() {
        let board = Board::from_rows(&["RG", "GR"]).unwrap();
        assert!(ResolvedBoardInvariants::check_all(&board).is_ok());
    }
}
