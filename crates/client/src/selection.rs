//! Cursor and navigation automaton
//!
//! The cursor always sits on an open cell. Clicking the selected cell again
//! flips the reading direction; arrows jump over black cells; the word under
//! the cursor is highlighted and its clue looked up in the black cell that
//! precedes it.

use fleche_protocol::{Definition, Direction};

use crate::grid::{GridModel, Position};

/// What the render step shows for the current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionView {
    pub cursor: Option<Position>,
    pub direction: Direction,
    /// Segment cells other than the cursor itself
    pub highlighted: Vec<Position>,
    pub definition: Option<Definition>,
}

impl SelectionView {
    pub fn definition_label(&self) -> Option<String> {
        self.definition.as_ref().map(Definition::label)
    }
}

/// Cursor position and reading direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    cursor: Option<Position>,
    direction: Direction,
}

impl Selection {
    /// Start on the first open cell in row-major order, reading right
    pub fn new(grid: &GridModel) -> Self {
        Self {
            cursor: grid.first_open(),
            direction: Direction::Right,
        }
    }

    pub const fn cursor(&self) -> Option<Position> {
        self.cursor
    }

    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Click on a cell
    ///
    /// Same cell flips the direction, another open cell moves the cursor,
    /// black or out-of-bounds cells are ignored. Returns whether anything
    /// changed.
    pub fn select(&mut self, grid: &GridModel, pos: Position) -> bool {
        if !grid.is_open(pos) {
            return false;
        }
        if self.cursor == Some(pos) {
            self.direction = self.direction.flipped();
        } else {
            self.cursor = Some(pos);
        }
        true
    }

    /// Step by `(d_row, d_col)` until an open cell is reached
    ///
    /// Leaving the grid without finding one keeps the cursor where it was.
    pub fn move_by(&mut self, grid: &GridModel, d_row: isize, d_col: isize) -> bool {
        let Some(mut pos) = self.cursor else {
            return false;
        };
        if d_row == 0 && d_col == 0 {
            return false;
        }
        while let Some(next) = grid.offset(pos, d_row, d_col) {
            if grid.is_open(next) {
                self.cursor = Some(next);
                return true;
            }
            pos = next;
        }
        false
    }

    pub fn toggle_direction(&mut self) -> bool {
        if self.cursor.is_none() {
            return false;
        }
        self.direction = self.direction.flipped();
        true
    }

    /// Advance along the reading direction
    pub fn next(&mut self, grid: &GridModel) -> bool {
        let (d_row, d_col) = self.direction.step();
        self.move_by(grid, d_row, d_col)
    }

    /// Step back along the reading direction
    pub fn prev(&mut self, grid: &GridModel) -> bool {
        let (d_row, d_col) = self.direction.step();
        self.move_by(grid, -d_row, -d_col)
    }

    /// Highlighted word and active clue for the current state
    pub fn view(&self, grid: &GridModel) -> SelectionView {
        let segment = self
            .cursor
            .and_then(|pos| grid.segment(pos, self.direction));

        let highlighted = segment
            .map(|seg| seg.cells().filter(|&p| Some(p) != self.cursor).collect())
            .unwrap_or_default();
        let definition = segment
            .as_ref()
            .and_then(|seg| grid.definition_for(seg))
            .cloned();

        SelectionView {
            cursor: self.cursor,
            direction: self.direction,
            highlighted,
            definition,
        }
    }
}
