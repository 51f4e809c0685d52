//! Stream message dispatch
//!
//! Decodes one payload from the event stream and routes it to the component
//! that owns the affected state. Anything that cannot be decoded is dropped.

use fleche_protocol::StreamEvent;
use tokio::time::Instant;

use crate::grid::{GridModel, Position};
use crate::state::SessionState;
use crate::sync::{CellChange, SyncChannel};

/// What applying one event changed, for the render step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    CellChanged(CellChange),
    PlayerAdded(String),
    PlayerLeaving(String),
    /// Fill and roster replaced wholesale
    Resynced,
    Ignored,
}

/// Decode a stream payload, logging and dropping anything unusable
pub fn decode(payload: &str) -> Option<StreamEvent> {
    match StreamEvent::decode(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::debug!(error = %e, payload, "Ignoring stream message");
            None
        }
    }
}

/// Apply an event to the session state
pub fn apply(
    event: StreamEvent,
    grid: &GridModel,
    state: &mut SessionState,
    sync: &SyncChannel,
    now: Instant,
) -> Outcome {
    match event {
        StreamEvent::CellUpdate {
            row,
            col,
            value,
            pseudo,
        } => sync
            .apply_cell_update(grid, state, Position::new(row, col), &value, &pseudo)
            .map_or(Outcome::Ignored, Outcome::CellChanged),
        StreamEvent::PlayerJoined { pseudo, color } => {
            if state.roster_mut().add(&pseudo, &color) {
                tracing::info!(%pseudo, "Player joined");
                Outcome::PlayerAdded(pseudo)
            } else {
                Outcome::Ignored
            }
        }
        StreamEvent::PlayerLeft { pseudo } => {
            if state.roster_mut().remove(&pseudo, now) {
                tracing::info!(%pseudo, "Player left");
                Outcome::PlayerLeaving(pseudo)
            } else {
                Outcome::Ignored
            }
        }
        StreamEvent::GameState { state: matrix, players } => {
            sync.apply_game_state(grid, state, &matrix, &players);
            Outcome::Resynced
        }
    }
}
