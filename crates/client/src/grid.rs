//! Immutable puzzle model
//!
//! Wraps the loaded [`Grid`] in a flat row-major cell array and answers the
//! geometric questions the selection automaton asks: which cells are open,
//! where a word segment starts and ends, and which clue describes it.

use fleche_protocol::{Cell, Definition, Direction, Grid, ProtocolError};

/// Cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Maximal run of open cells in one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: Position,
    pub len: usize,
    pub direction: Direction,
}

impl Segment {
    /// Cells of the segment from start to end
    pub fn cells(self) -> impl Iterator<Item = Position> {
        (0..self.len).map(move |i| match self.direction {
            Direction::Right => Position::new(self.start.row, self.start.col + i),
            Direction::Down => Position::new(self.start.row + i, self.start.col),
        })
    }
}

/// Grid geometry, fixed for the lifetime of a game
#[derive(Debug, Clone)]
pub struct GridModel {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl GridModel {
    /// Build from the wire grid, rejecting inconsistent dimensions
    pub fn from_grid(grid: Grid) -> Result<Self, ProtocolError> {
        grid.validate()?;
        Ok(Self {
            rows: grid.rows,
            cols: grid.cols,
            cells: grid.cells.into_iter().flatten().collect(),
        })
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        if pos.row < self.rows && pos.col < self.cols {
            self.cells.get(pos.row * self.cols + pos.col)
        } else {
            None
        }
    }

    /// In bounds and able to hold a letter
    pub fn is_open(&self, pos: Position) -> bool {
        self.cell(pos).is_some_and(|c| !c.black)
    }

    pub fn is_black(&self, pos: Position) -> bool {
        self.cell(pos).is_some_and(|c| c.black)
    }

    /// Neighbour at `(d_row, d_col)`, if inside the grid
    pub fn offset(&self, pos: Position, d_row: isize, d_col: isize) -> Option<Position> {
        let row = pos.row.checked_add_signed(d_row)?;
        let col = pos.col.checked_add_signed(d_col)?;
        (row < self.rows && col < self.cols).then_some(Position::new(row, col))
    }

    /// All open cells in row-major order
    pub fn open_cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| Position::new(row, col)))
            .filter(|&pos| self.is_open(pos))
    }

    pub fn first_open(&self) -> Option<Position> {
        self.open_cells().next()
    }

    /// Segment through `pos` along `direction`; `None` when `pos` is not open
    pub fn segment(&self, pos: Position, direction: Direction) -> Option<Segment> {
        if !self.is_open(pos) {
            return None;
        }
        let (d_row, d_col) = direction.step();

        let mut start = pos;
        while let Some(prev) = self.offset(start, -d_row, -d_col) {
            if !self.is_open(prev) {
                break;
            }
            start = prev;
        }

        let mut len = 1;
        let mut end = start;
        while let Some(next) = self.offset(end, d_row, d_col) {
            if !self.is_open(next) {
                break;
            }
            end = next;
            len += 1;
        }

        Some(Segment {
            start,
            len,
            direction,
        })
    }

    /// Clue held by the black cell right before the segment start
    pub fn definition_for(&self, segment: &Segment) -> Option<&Definition> {
        let (d_row, d_col) = segment.direction.step();
        self.offset(segment.start, -d_row, -d_col)
            .and_then(|pos| self.cell(pos))
            .filter(|cell| cell.black)
            .and_then(|cell| cell.definition(segment.direction))
    }
}
