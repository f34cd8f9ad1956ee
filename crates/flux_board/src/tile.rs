//! Tile colors.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A colored tile occupying one cell of the board.
///
/// Tiles carry no attributes beyond their color. They serialize as lowercase
/// color names (`"red"`, `"blue"`, ...), which is also the stored format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tile {
    /// Red tile.
    Red,
    /// Blue tile.
    Blue,
    /// Green tile.
    Green,
    /// Yellow tile.
    Yellow,
    /// Purple tile.
    Purple,
    /// Orange tile.
    Orange,
}

impl Tile {
    /// Single-letter shorthand used by text boards.
    pub fn letter(self) -> char {
        match self {
            Tile::Red => 'R',
            Tile::Blue => 'B',
            Tile::Green => 'G',
            Tile::Yellow => 'Y',
            Tile::Purple => 'P',
            Tile::Orange => 'O',
        }
    }

    /// Parses the single-letter shorthand (case-insensitive).
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'R' => Some(Tile::Red),
            'B' => Some(Tile::Blue),
            'G' => Some(Tile::Green),
            'Y' => Some(Tile::Yellow),
            'P' => Some(Tile::Purple),
            'O' => Some(Tile::Orange),
            _ => None,
        }
    }
}
