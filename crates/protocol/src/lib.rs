//! Shared protocol types for fleche
//!
//! Defines the JSON structures exchanged between the game backend and
//! clients: the grid description, request/response bodies, route paths and
//! the events pushed on the game stream.

pub mod events;
pub mod grid;
pub mod messages;
pub mod routes;

pub use events::*;
pub use grid::*;
pub use messages::*;

use serde::{Deserialize, Deserializer};

/// Errors raised while validating or decoding protocol data
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid cell value {0:?}: expected a single letter A-Z or nothing")]
    InvalidCellValue(String),
    #[error("grid declares {expected} rows but carries {found}")]
    GridRowCount { expected: usize, found: usize },
    #[error("grid declares {expected} columns but row {row} carries {found}")]
    GridRowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("malformed event: {0}")]
    MalformedEvent(#[from] serde_json::Error),
    #[error("event has no type")]
    MissingEventType,
    #[error("unknown event type {0:?}")]
    UnknownEventType(String),
}

/// The backend serializes empty lists and maps as `null`
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
