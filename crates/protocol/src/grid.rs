//! Grid description
//!
//! A grid is a rectangle of cells. Black cells hold the clues ("definitions")
//! and never receive letters; every other cell is a fillable position.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{null_as_default, ProtocolError};

/// Direction a word runs in, away from its definition cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Right,
    Down,
}

impl Direction {
    /// The other direction
    pub const fn flipped(self) -> Self {
        match self {
            Self::Right => Self::Down,
            Self::Down => Self::Right,
        }
    }

    /// One step along this direction as `(d_row, d_col)`
    pub const fn step(self) -> (isize, isize) {
        match self {
            Self::Right => (0, 1),
            Self::Down => (1, 0),
        }
    }

    pub const fn arrow(self) -> char {
        match self {
            Self::Right => '\u{2192}',
            Self::Down => '\u{2193}',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Right => "right",
            Self::Down => "down",
        };
        write!(f, "{s}")
    }
}

/// A clue carried by a black cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub text: String,
    pub direction: Direction,
}

impl Definition {
    pub fn new(text: impl Into<String>, direction: Direction) -> Self {
        Self {
            text: text.into(),
            direction,
        }
    }

    /// Clue text prefixed with its direction arrow, e.g. `→ Capitale`
    pub fn label(&self) -> String {
        format!("{} {}", self.direction.arrow(), self.text)
    }
}

/// A single grid cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub black: bool,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub definitions: Vec<Definition>,
}

impl Cell {
    /// A fillable cell
    pub const fn open() -> Self {
        Self {
            black: false,
            definitions: Vec::new(),
        }
    }

    /// A definition cell with the given clues
    pub const fn black(definitions: Vec<Definition>) -> Self {
        Self {
            black: true,
            definitions,
        }
    }

    /// Clue of this cell running in `direction`, if any
    pub fn definition(&self, direction: Direction) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.direction == direction)
    }
}

/// Grid as returned by the load step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Check that `cells` matches the declared dimensions
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.cells.len() != self.rows {
            return Err(ProtocolError::GridRowCount {
                expected: self.rows,
                found: self.cells.len(),
            });
        }
        for (row, cells) in self.cells.iter().enumerate() {
            if cells.len() != self.cols {
                return Err(ProtocolError::GridRowWidth {
                    row,
                    expected: self.cols,
                    found: cells.len(),
                });
            }
        }
        Ok(())
    }
}
