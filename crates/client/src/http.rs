//! HTTP transport for the game backend
//!
//! One-shot requests carry the configured timeout. The event stream does
//! not: it is expected to stay open for the whole session, and only a
//! connect timeout applies to it.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::{Client, Response};

use fleche_protocol::{routes, ErrorBody, GameSnapshot, JoinRequest, MoveRequest, Player};

use crate::api::{EventStream, GameApi};
use crate::config::ServerConfig;
use crate::error::{ClientError, Result};
use crate::sse::SseDecoder;

/// Shown when a rejection carries no readable `{error}` body
const GENERIC_JOIN_ERROR: &str = "Erreur";

/// `reqwest` implementation of [`GameApi`]
#[derive(Debug, Clone)]
pub struct HttpGameApi {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpGameApi {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `{error}` text of a failed response, if any
    async fn error_text(response: Response) -> Option<String> {
        response
            .json::<ErrorBody>()
            .await
            .ok()
            .map(|body| body.error)
            .filter(|e| !e.is_empty())
    }
}

#[async_trait]
impl GameApi for HttpGameApi {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn join(&self, game_id: &str, pseudo: &str) -> Result<Player> {
        let response = self
            .client
            .post(self.url(&routes::join(game_id)))
            .timeout(self.request_timeout)
            .json(&JoinRequest {
                pseudo: pseudo.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = Self::error_text(response)
                .await
                .unwrap_or_else(|| GENERIC_JOIN_ERROR.to_string());
            tracing::warn!(%status, %message, "Join rejected");
            return Err(ClientError::JoinRejected(message));
        }

        // Any 2xx is an acceptance; the body, when present, names the player
        let body = response.bytes().await?;
        Ok(serde_json::from_slice::<Player>(&body).unwrap_or_else(|_| {
            tracing::debug!("Join accepted without a player body");
            Player::new(pseudo, "")
        }))
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn load(&self, game_id: &str) -> Result<GameSnapshot> {
        let response = self
            .client
            .get(self.url(&routes::game(game_id)))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| ClientError::LoadFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = Self::error_text(response)
                .await
                .unwrap_or_else(|| status.to_string());
            return Err(ClientError::LoadFailed(message));
        }
        response
            .json()
            .await
            .map_err(|e| ClientError::LoadFailed(e.to_string()))
    }

    #[tracing::instrument(skip(self, request), fields(row = request.row, col = request.col), level = "debug")]
    async fn submit_move(&self, game_id: &str, request: &MoveRequest) -> Result<()> {
        let response = self
            .client
            .post(self.url(&routes::submit_move(game_id)))
            .timeout(self.request_timeout)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ClientError::MoveRejected {
                status: status.as_u16(),
            })
        }
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn open_events(&self, game_id: &str, pseudo: &str) -> Result<EventStream> {
        let response = self
            .client
            .get(self.url(&routes::events(game_id, pseudo)))
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::StreamFailed(format!("HTTP {status}")));
        }

        let body = response.bytes_stream().boxed();
        let messages = stream::unfold(
            (body, SseDecoder::new(), false),
            |(mut body, mut decoder, done)| async move {
                if done {
                    return None;
                }
                match body.next().await {
                    Some(Ok(chunk)) => match decoder.push(&chunk) {
                        Ok(messages) => {
                            let items = messages.into_iter().map(Ok).collect::<Vec<Result<String>>>();
                            Some((stream::iter(items), (body, decoder, false)))
                        }
                        Err(e) => Some((stream::iter(vec![Err(e)]), (body, decoder, true))),
                    },
                    Some(Err(e)) => {
                        let items = vec![Err(ClientError::StreamFailed(e.to_string()))];
                        Some((stream::iter(items), (body, decoder, true)))
                    }
                    None => {
                        let items = decoder.finish().into_iter().map(Ok).collect::<Vec<Result<String>>>();
                        Some((stream::iter(items), (body, decoder, true)))
                    }
                }
            },
        )
        .flatten();

        Ok(messages.boxed())
    }
}
