//! Mutable shared game state: the fill matrix and the player roster

use fleche_protocol::{cell_value_to_wire, parse_cell_value, FillMatrix, PlayerMap};

use crate::grid::{GridModel, Position};
use crate::roster::PlayerRoster;

/// Letters typed so far plus the connected players
#[derive(Debug, Clone)]
pub struct SessionState {
    rows: usize,
    cols: usize,
    letters: Vec<Option<char>>,
    roster: PlayerRoster,
}

impl SessionState {
    /// Empty fill for `grid`
    pub fn new(grid: &GridModel, roster: PlayerRoster) -> Self {
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            letters: vec![None; grid.rows() * grid.cols()],
            roster,
        }
    }

    pub fn get(&self, pos: Position) -> Option<char> {
        self.index(pos).and_then(|i| self.letters[i])
    }

    /// Write or erase a letter; only open cells are writable
    ///
    /// Returns `false` (and leaves the state untouched) for black or
    /// out-of-bounds cells.
    pub fn set(&mut self, grid: &GridModel, pos: Position, value: Option<char>) -> bool {
        if !grid.is_open(pos) {
            return false;
        }
        match self.index(pos) {
            Some(i) => {
                self.letters[i] = value;
                true
            }
            None => false,
        }
    }

    /// Replace the whole fill from a wire matrix
    ///
    /// Missing cells read as empty; black cells, extra cells and values that
    /// are not a single letter are ignored.
    pub fn replace_fill(&mut self, grid: &GridModel, matrix: &FillMatrix) {
        self.letters.iter_mut().for_each(|l| *l = None);
        for pos in grid.open_cells() {
            let Some(raw) = matrix.get(pos.row).and_then(|r| r.get(pos.col)) else {
                continue;
            };
            match parse_cell_value(raw) {
                Ok(value) => {
                    self.set(grid, pos, value);
                }
                Err(e) => tracing::debug!(row = pos.row, col = pos.col, error = %e, "Skipping snapshot cell"),
            }
        }
    }

    /// Full resync: fill and roster both replaced
    pub fn replace(&mut self, grid: &GridModel, matrix: &FillMatrix, players: &PlayerMap) {
        self.replace_fill(grid, matrix);
        self.roster.replace_all(players);
    }

    /// Wire form, `""` for empty and black cells
    pub fn to_matrix(&self) -> FillMatrix {
        self.letters
            .chunks(self.cols.max(1))
            .take(self.rows)
            .map(|row| row.iter().copied().map(cell_value_to_wire).collect())
            .collect()
    }

    pub const fn roster(&self) -> &PlayerRoster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut PlayerRoster {
        &mut self.roster
    }

    fn index(&self, pos: Position) -> Option<usize> {
        (pos.row < self.rows && pos.col < self.cols).then(|| pos.row * self.cols + pos.col)
    }
}
