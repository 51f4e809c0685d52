//! Request and response bodies of the game HTTP API

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{null_as_default, Grid, ProtocolError};

/// Letters per cell as sent on the wire, `""` meaning empty
pub type FillMatrix = Vec<Vec<String>>;

/// Connected players keyed by pseudo
pub type PlayerMap = BTreeMap<String, Player>;

/// A participant of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub pseudo: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<String>,
}

impl Player {
    pub fn new(pseudo: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            pseudo: pseudo.into(),
            color: color.into(),
            joined_at: None,
        }
    }
}

/// Body of `POST /games/{id}/join`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub pseudo: String,
}

/// Body of `POST /games/{id}/move`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub pseudo: String,
    pub row: usize,
    pub col: usize,
    pub value: String,
}

/// Error body returned with 4xx/5xx responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Response of `GET /games/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub grid: Grid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: FillMatrix,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: PlayerMap,
}

/// Parse a wire cell value: one ASCII letter (any case) or empty
pub fn parse_cell_value(raw: &str) -> Result<Option<char>, ProtocolError> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(Some(c.to_ascii_uppercase())),
        _ => Err(ProtocolError::InvalidCellValue(raw.to_string())),
    }
}

/// Wire form of a cell value
pub fn cell_value_to_wire(value: Option<char>) -> String {
    value.map(String::from).unwrap_or_default()
}
