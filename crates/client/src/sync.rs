//! Optimistic edits reconciled with the authoritative event stream
//!
//! Local edits are written to the fill before the move request is sent. A
//! failed submission erases the cell (no prior value is kept). Stream events
//! always overwrite whatever is displayed, so the fill converges on the
//! server's view.

use fleche_protocol::{cell_value_to_wire, parse_cell_value, FillMatrix, MoveRequest, PlayerMap};

use crate::error::{ClientError, Result};
use crate::grid::{GridModel, Position};
use crate::state::SessionState;

/// Result of a move submission as seen by the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Accepted,
    /// Non-success HTTP status
    Rejected { status: u16 },
    /// Transport failure before any status was received
    Failed(String),
}

impl MoveOutcome {
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl From<std::result::Result<(), ClientError>> for MoveOutcome {
    fn from(result: std::result::Result<(), ClientError>) -> Self {
        match result {
            Ok(()) => Self::Accepted,
            Err(ClientError::MoveRejected { status }) => Self::Rejected { status },
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// A fill change to hand to the render step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChange {
    pub position: Position,
    pub value: Option<char>,
    /// Set when another player made the change
    pub author: Option<String>,
}

impl CellChange {
    pub const fn is_remote(&self) -> bool {
        self.author.is_some()
    }
}

/// Edit submission and reconciliation for one player
#[derive(Debug, Clone)]
pub struct SyncChannel {
    pseudo: String,
}

impl SyncChannel {
    pub fn new(pseudo: impl Into<String>) -> Self {
        Self {
            pseudo: pseudo.into(),
        }
    }

    pub fn pseudo(&self) -> &str {
        &self.pseudo
    }

    /// Validate and apply an edit locally, returning the request to send
    ///
    /// Nothing is mutated when the value or the target cell is invalid.
    pub fn submit_edit(
        &self,
        grid: &GridModel,
        state: &mut SessionState,
        pos: Position,
        value: &str,
    ) -> Result<MoveRequest> {
        let invalid = |reason: String| ClientError::InvalidMove {
            row: pos.row,
            col: pos.col,
            reason,
        };
        let letter = parse_cell_value(value).map_err(|e| invalid(e.to_string()))?;
        if !grid.is_open(pos) {
            let reason = if grid.cell(pos).is_some() {
                "black cell"
            } else {
                "outside the grid"
            };
            return Err(invalid(reason.to_string()));
        }

        state.set(grid, pos, letter);
        Ok(MoveRequest {
            pseudo: self.pseudo.clone(),
            row: pos.row,
            col: pos.col,
            value: cell_value_to_wire(letter),
        })
    }

    /// Reconcile a finished submission
    ///
    /// Any failure erases the cell; the returned change must be rendered.
    pub fn settle(
        &self,
        grid: &GridModel,
        state: &mut SessionState,
        request: &MoveRequest,
        outcome: &MoveOutcome,
    ) -> Option<CellChange> {
        if outcome.is_accepted() {
            return None;
        }
        let position = Position::new(request.row, request.col);
        tracing::warn!(
            row = request.row,
            col = request.col,
            value = %request.value,
            ?outcome,
            "Move not accepted, reverting cell"
        );
        state.set(grid, position, None).then_some(CellChange {
            position,
            value: None,
            author: None,
        })
    }

    /// Apply a `cell_update` from the stream, unconditionally
    pub fn apply_cell_update(
        &self,
        grid: &GridModel,
        state: &mut SessionState,
        pos: Position,
        value: &str,
        author: &str,
    ) -> Option<CellChange> {
        let letter = match parse_cell_value(value) {
            Ok(letter) => letter,
            Err(e) => {
                tracing::debug!(row = pos.row, col = pos.col, error = %e, "Ignoring cell update");
                return None;
            }
        };
        if !state.set(grid, pos, letter) {
            tracing::debug!(row = pos.row, col = pos.col, "Ignoring cell update for non-writable cell");
            return None;
        }
        Some(CellChange {
            position: pos,
            value: letter,
            author: (author != self.pseudo).then(|| author.to_string()),
        })
    }

    /// Full resync from a `game_state` event
    pub fn apply_game_state(
        &self,
        grid: &GridModel,
        state: &mut SessionState,
        matrix: &FillMatrix,
        players: &PlayerMap,
    ) {
        tracing::debug!(players = players.len(), "Resynchronizing game state");
        state.replace(grid, matrix, players);
    }
}
