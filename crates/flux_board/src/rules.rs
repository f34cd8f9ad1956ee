//! Grid, palette and scoring configuration.

use crate::{EngineError, Tile};
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::instrument;

/// Non-empty, duplicate-free set of tiles the engine draws from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Tile>", into = "Vec<Tile>")]
pub struct Palette(Vec<Tile>);

impl Palette {
    /// Builds a palette, rejecting empty or duplicated color lists.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRules`] on empty or duplicated input.
    pub fn new(tiles: Vec<Tile>) -> Result<Self, EngineError> {
        if tiles.is_empty() {
            return Err(EngineError::InvalidRules("palette is empty".to_string()));
        }
        for (i, tile) in tiles.iter().enumerate() {
            if tiles[..i].contains(tile) {
                return Err(EngineError::InvalidRules(format!(
                    "palette lists {} twice",
                    tile
                )));
            }
        }
        Ok(Self(tiles))
    }

    /// Colors in draw order.
    pub fn tiles(&self) -> &[Tile] {
        &self.0
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(Tile::iter().collect())
    }
}

impl TryFrom<Vec<Tile>> for Palette {
    type Error = EngineError;

    fn try_from(tiles: Vec<Tile>) -> Result<Self, Self::Error> {
        Self::new(tiles)
    }
}

impl From<Palette> for Vec<Tile> {
    fn from(palette: Palette) -> Self {
        palette.0
    }
}

/// Rules of one game: grid size, palette, scoring and safety budgets.
///
/// Defaults are the canonical configuration: 8x8, six colors, 5 points per
/// matched tile, 30 moves per session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct Rules {
    /// Board height.
    rows: usize,
    /// Board width.
    cols: usize,
    /// Colors drawn for generation and refills.
    palette: Palette,
    /// Points awarded per matched tile per cascade pass.
    points_per_tile: u64,
    /// Moves granted to a fresh session.
    max_moves: u32,
    /// Cascade passes allowed before the resolver reports a runaway.
    max_cascade_passes: usize,
    /// Candidate boards the generator may reject before giving up.
    max_generation_attempts: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            rows: 8,
            cols: 8,
            palette: Palette::default(),
            points_per_tile: 5,
            max_moves: 30,
            max_cascade_passes: 64,
            max_generation_attempts: 10_000,
        }
    }
}

impl Rules {
    /// Number of cells on a board built with these rules.
    ///
    /// Saturates for grids too large to address; [`Rules::validate`] rejects
    /// those.
    pub fn cell_count(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Checks that the rules describe a non-degenerate board.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRules`] for zero dimensions, a cell count
    /// that overflows `usize`, or zero budgets.
    #[instrument(skip(self), fields(rows = self.rows, cols = self.cols))]
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(EngineError::InvalidRules(format!(
                "grid must have at least one row and column, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.rows.checked_mul(self.cols).is_none() {
            return Err(EngineError::InvalidRules(format!(
                "grid of {}x{} cells is too large",
                self.rows, self.cols
            )));
        }
        if self.max_cascade_passes == 0 {
            return Err(EngineError::InvalidRules(
                "max_cascade_passes must be positive".to_string(),
            ));
        }
        if self.max_generation_attempts == 0 {
            return Err(EngineError::InvalidRules(
                "max_generation_attempts must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_are_canonical() {
        let rules = Rules::default();
        assert_eq!(*rules.rows(), 8);
        assert_eq!(*rules.cols(), 8);
        assert_eq!(rules.palette().len(), 6);
        assert_eq!(*rules.points_per_tile(), 5);
        assert_eq!(*rules.max_moves(), 30);
        assert_eq!(rules.cell_count(), 64);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_palette_rejects_empty_and_duplicates() {
        assert!(Palette::new(vec![]).is_err());
        assert!(Palette::new(vec![Tile::Red, Tile::Blue, Tile::Red]).is_err());
        assert!(Palette::new(vec![Tile::Red, Tile::Blue]).is_ok());
    }

    #[test]
    fn test_zero_sized_grid_is_invalid() {
        let rules = Rules::default().with_rows(0);
        assert!(matches!(rules.validate(), Err(EngineError::InvalidRules(_))));
    }

    #[test]
    fn test_overflowing_grid_is_invalid() {
        let rules = Rules::default().with_rows(usize::MAX).with_cols(2);
        assert!(matches!(rules.validate(), Err(EngineError::InvalidRules(_))));
        assert_eq!(rules.cell_count(), usize::MAX);
    }

    #[test]
    fn test_palette_deserializes_from_names() {
        let palette: Palette = serde_json::from_str(r#"["red","green","blue"]"#).unwrap();
        assert_eq!(palette.tiles(), &[Tile::Red, Tile::Green, Tile::Blue]);
        assert!(serde_json::from_str::<Palette>("[]").is_err());
    }
}
