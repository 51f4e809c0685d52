//! Game service interface
//!
//! The session never talks HTTP directly; the runtime drives a [`GameApi`]
//! so tests can swap in an in-memory service.

use async_trait::async_trait;
use futures::stream::BoxStream;

use fleche_protocol::{GameSnapshot, MoveRequest, Player};

use crate::error::Result;

/// Payloads of one event stream connection, in arrival order
///
/// The stream ends or yields an error when the connection drops.
pub type EventStream = BoxStream<'static, Result<String>>;

/// The four operations consumed from the game backend
#[async_trait]
pub trait GameApi: Send + Sync + 'static {
    /// Register `pseudo` in the game; fails with `JoinRejected` on refusal
    async fn join(&self, game_id: &str, pseudo: &str) -> Result<Player>;

    /// One-shot fetch of grid, fill and players
    async fn load(&self, game_id: &str) -> Result<GameSnapshot>;

    /// Fails with `MoveRejected` on a non-success status
    async fn submit_move(&self, game_id: &str, request: &MoveRequest) -> Result<()>;

    /// Open the event stream; resolves once the connection is established
    async fn open_events(&self, game_id: &str, pseudo: &str) -> Result<EventStream>;
}
