//! Randomness sources for generation and refills.

use crate::{Palette, Tile};
use rand::Rng;

/// Supplies tile colors to the generator and the cascade resolver.
///
/// Any [`rand::Rng`] is a source drawing uniformly from the palette. Tests
/// use [`ScriptedTiles`] to pin the exact refill sequence.
pub trait TileSource {
    /// Draws the next tile from `palette`.
    fn next_tile(&mut self, palette: &Palette) -> Tile;
}

impl<R: Rng> TileSource for R {
    fn next_tile(&mut self, palette: &Palette) -> Tile {
        palette.tiles()[self.random_range(0..palette.len())]
    }
}

/// Replays a fixed tile sequence, starting over once it runs out.
///
/// Every scripted tile must belong to the palette it is drawn against;
/// debug builds panic on a tile outside it.
#[derive(Debug, Clone)]
pub struct ScriptedTiles {
    script: Vec<Tile>,
    cursor: usize,
}

impl ScriptedTiles {
    /// Creates a source replaying `script`. An empty script falls back to the
    /// first palette color.
    pub fn new(script: Vec<Tile>) -> Self {
        Self { script, cursor: 0 }
    }

    /// Number of tiles drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl TileSource for ScriptedTiles {
    fn next_tile(&mut self, palette: &Palette) -> Tile {
        let tile = if self.script.is_empty() {
            palette.tiles()[0]
        } else {
            self.script[self.cursor % self.script.len()]
        };
        debug_assert!(
            palette.tiles().contains(&tile),
            "scripted tile {} is outside the palette",
            tile
        );
        self.cursor += 1;
        tile
    }
}
