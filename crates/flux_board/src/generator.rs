//! Board generation by rejection sampling.

use crate::invariants::{GeneratedBoardInvariants, InvariantSet};
use crate::{Board, EngineError, Rules, TileSource};
use tracing::{debug, info, instrument, warn};

/// Generates a board with no standing match and at least one scoring swap.
///
/// Every cell is drawn independently from the palette; candidates failing
/// either invariant are discarded and redrawn from scratch.
///
/// # Errors
///
/// - [`EngineError::InvalidRules`] if the rules describe no playable grid
/// - [`EngineError::GenerationExhausted`] once `max_generation_attempts`
///   candidates were rejected (e.g. one color, or a grid too small to match)
#[instrument(skip(rules, source), fields(rows = rules.rows(), cols = rules.cols(), colors = rules.palette().len()))]
pub fn generate_board<S>(rules: &Rules, source: &mut S) -> Result<Board, EngineError>
where
    S: TileSource + ?Sized,
{
    rules.validate()?;

    let attempts = *rules.max_generation_attempts();
    for attempt in 1..=attempts {
        let tiles = (0..rules.cell_count())
            .map(|_| source.next_tile(rules.palette()))
            .collect();
        let board = Board::from_tiles(*rules.rows(), *rules.cols(), tiles)?;

        match GeneratedBoardInvariants::check_all(&board) {
            Ok(()) => {
                info!(attempt, "Board generated");
                return Ok(board);
            }
            Err(violations) => {
                debug!(attempt, violations = violations.len(), "Candidate board rejected");
            }
        }
    }

    warn!(attempts, "Board generation exhausted its budget");
    Err(EngineError::GenerationExhausted { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Palette, ScriptedTiles, Tile, find_matches, has_possible_move};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generated_board_has_configured_shape() {
        let rules = Rules::default().with_rows(6).with_cols(5);
        let mut rng = StdRng::seed_from_u64(3);
        let board = generate_board(&rules, &mut rng).unwrap();
        assert_eq!(board.rows(), 6);
        assert_eq!(board.cols(), 5);
        assert_eq!(board.len(), 30);
        assert!(find_matches(&board).is_empty());
        assert!(has_possible_move(&board));
    }

    #[test]
    fn test_single_color_palette_exhausts_budget() {
        let rules = Rules::default()
            .with_palette(Palette::new(vec![Tile::Red]).unwrap())
            .with_max_generation_attempts(25);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate_board(&rules, &mut rng),
            Err(EngineError::GenerationExhausted { attempts: 25 })
        );
    }

    #[test]
    fn test_grid_too_small_to_match_exhausts_budget() {
        let rules = Rules::default()
            .with_rows(2)
            .with_cols(2)
            .with_max_generation_attempts(10);
        let mut rng = StdRng::seed_from_u64(2);
        assert!(matches!(
            generate_board(&rules, &mut rng),
            Err(EngineError::GenerationExhausted { attempts: 10 })
        ));
    }

    #[test]
    fn test_invalid_rules_fail_before_sampling() {
        let rules = Rules::default().with_cols(0);
        let mut source = ScriptedTiles::new(vec![Tile::Red]);
        assert!(matches!(
            generate_board(&rules, &mut source),
            Err(EngineError::InvalidRules(_))
        ));
        assert_eq!(source.drawn(), 0);
    }
}
