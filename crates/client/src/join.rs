//! Join and bootstrap
//!
//! `unjoined -> joined`: a name is submitted until the backend accepts it,
//! then the game is fetched once and a [`GameSession`] is built from it.

use std::sync::Arc;

use crate::api::GameApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::render::Renderer;
use crate::session::GameSession;

/// Longest pseudo the backend keeps, in characters
pub const MAX_PSEUDO_CHARS: usize = 20;

/// Trim and truncate a pseudo the way the backend does
pub fn sanitize_pseudo(raw: &str) -> String {
    raw.trim().chars().take(MAX_PSEUDO_CHARS).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinState {
    /// Waiting for a name; holds the last rejection message
    Unjoined { error: Option<String> },
    Joined { pseudo: String, color: String },
}

/// Drives the join step, then loads the game
pub struct Bootstrap<A: GameApi> {
    api: Arc<A>,
    game_id: String,
    state: JoinState,
}

impl<A: GameApi> Bootstrap<A> {
    pub fn new(api: Arc<A>, game_id: impl Into<String>) -> Self {
        Self {
            api,
            game_id: game_id.into(),
            state: JoinState::Unjoined { error: None },
        }
    }

    pub const fn state(&self) -> &JoinState {
        &self.state
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn api(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    /// Submit a name
    ///
    /// Returns `Ok(false)` without any request when the name is blank. A
    /// rejection keeps the state unjoined, records the message and is
    /// returned as `JoinRejected`; there is no automatic retry.
    pub async fn join(&mut self, name: &str) -> Result<bool> {
        if matches!(self.state, JoinState::Joined { .. }) {
            return Ok(true);
        }
        let pseudo = sanitize_pseudo(name);
        if pseudo.is_empty() {
            return Ok(false);
        }

        match self.api.join(&self.game_id, &pseudo).await {
            Ok(player) => {
                tracing::info!(game = %self.game_id, pseudo = %player.pseudo, "Joined game");
                self.state = JoinState::Joined {
                    pseudo: player.pseudo,
                    color: player.color,
                };
                Ok(true)
            }
            Err(e) => {
                let message = match &e {
                    ClientError::JoinRejected(message) => message.clone(),
                    other => other.to_string(),
                };
                self.state = JoinState::Unjoined {
                    error: Some(message),
                };
                Err(e)
            }
        }
    }

    /// Fetch the game and build the session; failures here are fatal
    pub async fn load<R: Renderer>(
        &self,
        renderer: R,
        config: &ClientConfig,
    ) -> Result<GameSession<R>> {
        let JoinState::Joined { pseudo, .. } = &self.state else {
            return Err(ClientError::NotJoined);
        };

        let snapshot = self.api.load(&self.game_id).await.map_err(|e| match e {
            ClientError::LoadFailed(_) => e,
            other => ClientError::LoadFailed(other.to_string()),
        })?;
        tracing::info!(
            game = %self.game_id,
            rows = snapshot.grid.rows,
            cols = snapshot.grid.cols,
            players = snapshot.players.len(),
            "Game loaded"
        );
        GameSession::new(self.game_id.clone(), pseudo.clone(), snapshot, config, renderer)
    }
}
