//! Events pushed on the game stream
//!
//! Each stream message is a JSON object whose `type` field names the event.
//! Unknown types are reported as errors so callers can drop them.

use serde::{Deserialize, Serialize};

use crate::{null_as_default, FillMatrix, PlayerMap, ProtocolError};

/// Known stream event types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    CellUpdate,   // cell_update
    PlayerJoined, // player_joined
    PlayerLeft,   // player_left
    GameState,    // game_state

    Unknown(String),
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        match s {
            "cell_update" => Self::CellUpdate,
            "player_joined" => Self::PlayerJoined,
            "player_left" => Self::PlayerLeft,
            "game_state" => Self::GameState,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CellUpdate => "cell_update",
            Self::PlayerJoined => "player_joined",
            Self::PlayerLeft => "player_left",
            Self::GameState => "game_state",
            Self::Unknown(s) => s,
        };
        write!(f, "{s}")
    }
}

/// A decoded stream event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A cell was written or erased by `pseudo`
    CellUpdate {
        row: usize,
        col: usize,
        #[serde(default)]
        value: String,
        #[serde(default)]
        pseudo: String,
    },
    PlayerJoined {
        pseudo: String,
        color: String,
    },
    PlayerLeft {
        pseudo: String,
    },
    /// Full snapshot sent first on every stream connection
    GameState {
        #[serde(default, deserialize_with = "null_as_default")]
        state: FillMatrix,
        #[serde(default, deserialize_with = "null_as_default")]
        players: PlayerMap,
    },
}

impl StreamEvent {
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::CellUpdate { .. } => EventKind::CellUpdate,
            Self::PlayerJoined { .. } => EventKind::PlayerJoined,
            Self::PlayerLeft { .. } => EventKind::PlayerLeft,
            Self::GameState { .. } => EventKind::GameState,
        }
    }

    /// Decode one stream payload
    pub fn decode(payload: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value = serde_json::from_str(payload)?;
        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .map(EventKind::from)
            .ok_or(ProtocolError::MissingEventType)?;

        if let EventKind::Unknown(name) = kind {
            return Err(ProtocolError::UnknownEventType(name));
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Encode as a single-line JSON payload
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
