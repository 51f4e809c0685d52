//! Error type for the fleche client

/// Errors surfaced by the client library
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend refused the pseudo (name taken, game full, ...)
    #[error("join rejected: {0}")]
    JoinRejected(String),
    #[error("game not joined yet")]
    NotJoined,
    /// Grid or game could not be fetched; fatal for the current view
    #[error("could not load game: {0}")]
    LoadFailed(String),
    #[error("move rejected with HTTP {status}")]
    MoveRejected { status: u16 },
    #[error("invalid move at ({row}, {col}): {reason}")]
    InvalidMove {
        row: usize,
        col: usize,
        reason: String,
    },
    #[error("event stream failed: {0}")]
    StreamFailed(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
