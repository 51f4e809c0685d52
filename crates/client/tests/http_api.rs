//! Contract test: the reqwest transport against a local axum backend

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;

use fleche_client::config::ServerConfig;
use fleche_client::{ClientError, GameApi, HttpGameApi};
use fleche_protocol::{EventKind, JoinRequest, MoveRequest, StreamEvent};

#[derive(Clone, Default)]
struct Backend {
    moves: Arc<Mutex<Vec<MoveRequest>>>,
}

async fn join_game(Path(id): Path<String>, Json(req): Json<JoinRequest>) -> Response {
    match req.pseudo.as_str() {
        _ if id != "g 1" => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Partie introuvable" })),
        )
            .into_response(),
        "taken" => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({ "error": "Pseudo déjà pris" })),
        )
            .into_response(),
        "mute" => StatusCode::BAD_REQUEST.into_response(),
        "quiet" => StatusCode::OK.into_response(),
        pseudo => Json(serde_json::json!({
            "pseudo": pseudo,
            "color": "#e6194b",
            "joined_at": "2026-10-18T12:00:00Z",
        }))
        .into_response(),
    }
}

async fn load_game(Path(id): Path<String>) -> Response {
    if id != "g 1" {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Partie introuvable" })),
        )
            .into_response();
    }
    Json(serde_json::json!({
        "id": "g 1",
        "created_at": "2026-10-18T12:00:00Z",
        "grid": {
            "rows": 1,
            "cols": 3,
            "cells": [[
                { "black": true, "definitions": [{ "text": "Note", "direction": "right" }] },
                { "black": false },
                { "black": false, "definitions": null }
            ]]
        },
        "state": null,
        "players": { "bob": { "pseudo": "bob", "color": "#3cb44b", "joined_at": "2026-10-18T11:00:00Z" } }
    }))
    .into_response()
}

async fn submit_move(State(backend): State<Backend>, Json(req): Json<MoveRequest>) -> Response {
    let valid = req.value.is_empty()
        || (req.value.len() == 1 && req.value.chars().all(|c| c.is_ascii_uppercase()));
    if !valid {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Valeur invalide" })),
        )
            .into_response();
    }
    backend.moves.lock().unwrap().push(req);
    StatusCode::NO_CONTENT.into_response()
}

async fn events(Query(query): Query<HashMap<String, String>>) -> Response {
    let pseudo = query.get("pseudo").cloned().unwrap_or_default();
    let joined = serde_json::json!({ "type": "player_joined", "pseudo": pseudo, "color": "#fff" });
    let chunks: Vec<Result<String, Infallible>> = vec![
        Ok(": heartbeat\n\n".into()),
        Ok("data: {\"type\":\"game_state\",\"state\":[[\"\",\"A\",\"\"]],\"players\":null}\n\n".into()),
        Ok(format!("data: {joined}\n\n")),
        Ok("data: {\"type\":\"cell_up".into()),
        Ok("date\",\"row\":0,\"col\":2,\"value\":\"b\",\"pseudo\":\"bob\"}\r\n\r\n".into()),
        Ok(": heartbeat\n\n".into()),
        Ok("data: {\"type\":\"weird\"}\n\n".into()),
    ];
    Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream")
        .body(Body::from_stream(futures::stream::iter(chunks)))
        .unwrap()
}

async fn serve(backend: Backend) -> SocketAddr {
    let app = Router::new()
        .route("/api/games/:id", get(load_game))
        .route("/api/games/:id/join", post(join_game))
        .route("/api/games/:id/move", post(submit_move))
        .route("/api/games/:id/events", get(events))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr) -> HttpGameApi {
    HttpGameApi::new(&ServerConfig {
        base_url: format!("http://{addr}/api/"),
        request_timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_join_success_and_rejections() {
    let addr = serve(Backend::default()).await;
    let api = client(addr);
    assert_eq!(api.base_url(), format!("http://{addr}/api"));

    let player = api.join("g 1", "alice").await.unwrap();
    assert_eq!(player.pseudo, "alice");
    assert_eq!(player.color, "#e6194b");

    match api.join("g 1", "taken").await {
        Err(ClientError::JoinRejected(message)) => assert_eq!(message, "Pseudo déjà pris"),
        other => panic!("expected rejection, got {other:?}"),
    }
    // No error body: generic message
    match api.join("g 1", "mute").await {
        Err(ClientError::JoinRejected(message)) => assert_eq!(message, "Erreur"),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_join_accepts_bare_ok() {
    let addr = serve(Backend::default()).await;
    let api = client(addr);

    let player = api.join("g 1", "quiet").await.unwrap();
    assert_eq!(player.pseudo, "quiet");
    assert!(player.color.is_empty());
}

#[tokio::test]
async fn test_load_snapshot() {
    let addr = serve(Backend::default()).await;
    let api = client(addr);

    let snapshot = api.load("g 1").await.unwrap();
    assert_eq!(snapshot.grid.cols, 3);
    assert!(snapshot.grid.cells[0][0].black);
    assert!(snapshot.grid.cells[0][2].definitions.is_empty());
    assert!(snapshot.state.is_empty());
    assert_eq!(snapshot.players["bob"].color, "#3cb44b");

    match api.load("nope").await {
        Err(ClientError::LoadFailed(message)) => assert_eq!(message, "Partie introuvable"),
        other => panic!("expected load failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_submit_move_statuses() {
    let backend = Backend::default();
    let addr = serve(backend.clone()).await;
    let api = client(addr);

    let ok = MoveRequest {
        pseudo: "alice".into(),
        row: 0,
        col: 1,
        value: "A".into(),
    };
    api.submit_move("g 1", &ok).await.unwrap();
    assert_eq!(backend.moves.lock().unwrap().as_slice(), &[ok.clone()]);

    let bad = MoveRequest {
        value: "5".into(),
        ..ok
    };
    match api.submit_move("g 1", &bad).await {
        Err(ClientError::MoveRejected { status }) => assert_eq!(status, 400),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_event_stream_framing() {
    let addr = serve(Backend::default()).await;
    let api = client(addr);

    let payloads: Vec<String> = api
        .open_events("g 1", "al ice")
        .await
        .unwrap()
        .map(Result::unwrap)
        .collect()
        .await;
    assert_eq!(payloads.len(), 4);

    let kinds: Vec<EventKind> = payloads
        .iter()
        .map(|p| StreamEvent::decode(p).map_or_else(|_| EventKind::from("?"), |e| e.kind()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::GameState,
            EventKind::PlayerJoined,
            EventKind::CellUpdate,
            EventKind::Unknown("?".into()),
        ]
    );

    // Query value made the round trip intact
    assert_eq!(
        StreamEvent::decode(&payloads[1]).unwrap(),
        StreamEvent::PlayerJoined {
            pseudo: "al ice".into(),
            color: "#fff".into(),
        }
    );
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(addr);
    assert!(matches!(api.join("g 1", "alice").await, Err(ClientError::Http(_))));
    assert!(matches!(api.load("g 1").await, Err(ClientError::LoadFailed(_))));
    assert!(api.open_events("g 1", "alice").await.is_err());
}
