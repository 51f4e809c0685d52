// fleche client library
// Realtime sync engine for collaborative mots fléchés

// Puzzle and shared state
pub mod grid;
pub mod roster;
pub mod state;

// Interaction
pub mod keys;
pub mod selection;

// Synchronization
pub mod dispatch;
pub mod reconnect;
pub mod sync;

// Coordinator and event loop
pub mod runtime;
pub mod session;

// Join / load
pub mod join;

// Transport
pub mod api;
pub mod http;
pub mod sse;

// Render step
pub mod render;

// Configuration
pub mod config;

// Errors
pub mod error;

pub use api::{EventStream, GameApi};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use grid::{GridModel, Position, Segment};
pub use http::HttpGameApi;
pub use join::{Bootstrap, JoinState};
pub use keys::Key;
pub use reconnect::ConnectionStatus;
pub use render::{Renderer, TextRenderer};
pub use session::{Effect, GameSession, Input, StreamSignal};
pub use sync::{CellChange, MoveOutcome};
