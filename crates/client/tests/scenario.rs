//! End-to-end scenarios through the public session API, no network

mod common;

use std::sync::Arc;

use fleche_client::config::ClientConfig;
use fleche_client::{
    Bootstrap, ClientError, Effect, GameSession, Input, JoinState, Key, Position, StreamSignal,
};
use fleche_protocol::Direction;
use tokio::time::Instant;

use common::{five_by_five, snapshot, MockApi, RecordingRenderer};

fn session() -> (GameSession<RecordingRenderer>, RecordingRenderer) {
    let renderer = RecordingRenderer::default();
    let session = GameSession::new(
        "g1",
        "alice",
        snapshot(five_by_five()),
        &ClientConfig::default(),
        renderer.clone(),
    )
    .unwrap();
    (session, renderer)
}

#[test]
fn test_type_then_tab_then_click_shows_down_clue() {
    let (mut s, renderer) = session();
    s.start();

    s.handle_input(Input::Click(Position::new(0, 1)));
    let view = renderer.last_selection().unwrap();
    assert_eq!(view.direction, Direction::Right);
    assert_eq!(view.highlighted, vec![Position::new(0, 0), Position::new(0, 2)]);
    // Segment starts at the grid edge
    assert!(view.definition.is_none());

    let effects = s.handle_input(Input::Key(Key::from("A")));
    assert!(matches!(&effects[..], [Effect::SubmitMove(m)] if m.value == "A" && m.col == 1));
    assert_eq!(s.state().get(Position::new(0, 1)), Some('A'));
    assert_eq!(s.state().to_matrix()[0][1], "A");

    s.handle_input(Input::Key(Key::Tab));
    s.handle_input(Input::Click(Position::new(0, 1)));

    let view = renderer.last_selection().unwrap();
    assert_eq!(view.cursor, Some(Position::new(0, 1)));
    assert_eq!(view.direction, Direction::Down);
    assert_eq!(
        view.highlighted,
        (1..5).map(|r| Position::new(r, 1)).collect::<Vec<_>>()
    );
    // No black cell above (0,1): panel hidden
    assert!(view.definition.is_none());
}

#[test]
fn test_clue_of_word_after_definition_cell() {
    let (mut s, renderer) = session();
    s.handle_input(Input::Click(Position::new(0, 4)));

    let view = renderer.last_selection().unwrap();
    assert!(view.highlighted.is_empty());
    assert_eq!(view.definition_label().as_deref(), Some("\u{2192} ABC"));
}

#[test]
fn test_arrows_jump_over_black_cell() {
    let (mut s, _) = session();
    s.handle_input(Input::Click(Position::new(0, 2)));
    s.handle_input(Input::Key(Key::ArrowRight));
    assert_eq!(s.selection().cursor(), Some(Position::new(0, 4)));
    s.handle_input(Input::Key(Key::ArrowLeft));
    assert_eq!(s.selection().cursor(), Some(Position::new(0, 2)));

    // Arrows ignore the reading direction
    s.handle_input(Input::Key(Key::ArrowDown));
    assert_eq!(s.selection().cursor(), Some(Position::new(1, 2)));
    assert_eq!(s.selection().direction(), Direction::Right);
}

#[test]
fn test_server_wins_over_pending_edit() {
    let (mut s, _) = session();
    let now = Instant::now();
    s.start();
    s.handle_stream(1, StreamSignal::Opened, now);

    s.handle_input(Input::Click(Position::new(2, 2)));
    s.handle_input(Input::Key(Key::Letter('X')));
    s.handle_stream(
        1,
        StreamSignal::Message(
            r#"{"type":"cell_update","row":2,"col":2,"value":"Y","pseudo":"bob"}"#.into(),
        ),
        now,
    );
    assert_eq!(s.state().get(Position::new(2, 2)), Some('Y'));
}

#[test]
fn test_reconnect_resync_replaces_fill() {
    let (mut s, renderer) = session();
    let now = Instant::now();
    s.start();
    s.handle_stream(1, StreamSignal::Opened, now);
    s.handle_input(Input::Key(Key::Letter('Q')));

    s.handle_stream(1, StreamSignal::Fault("reset".into()), now);
    let effects = s.tick(now + std::time::Duration::from_secs(1));
    assert_eq!(effects, vec![Effect::OpenStream { generation: 2 }]);

    s.handle_stream(2, StreamSignal::Opened, now);
    s.handle_stream(
        2,
        StreamSignal::Message(
            r##"{"type":"game_state","state":[["","B"]],"players":{"bob":{"pseudo":"bob","color":"#3cb44b"}}}"##
                .into(),
        ),
        now,
    );
    assert_eq!(s.state().get(Position::new(0, 0)), None);
    assert_eq!(s.state().get(Position::new(0, 1)), Some('B'));
    assert_eq!(renderer.last_roster(), Some(vec!["bob".to_string()]));
}

#[tokio::test]
async fn test_bootstrap_join_then_load() {
    let mut api = MockApi::new(snapshot(five_by_five()));
    api.rejected.push("taken".into());
    let api = Arc::new(api);
    let mut bootstrap = Bootstrap::new(Arc::clone(&api), "g1");

    // Blank names never reach the backend
    assert!(!bootstrap.join("   ").await.unwrap());
    assert!(api.joins.lock().unwrap().is_empty());

    let err = bootstrap.join(" taken ").await.unwrap_err();
    assert!(matches!(err, ClientError::JoinRejected(_)));
    assert_eq!(
        bootstrap.state(),
        &JoinState::Unjoined {
            error: Some("Pseudo déjà pris".into())
        }
    );

    let long = "x".repeat(30);
    assert!(bootstrap.join(&long).await.unwrap());
    assert_eq!(api.joins.lock().unwrap().last().unwrap().len(), 20);
    assert_eq!(
        bootstrap.state(),
        &JoinState::Joined {
            pseudo: "x".repeat(20),
            color: "#e6194b".into()
        }
    );

    let session = bootstrap
        .load(RecordingRenderer::default(), &ClientConfig::default())
        .await
        .unwrap();
    assert_eq!(session.pseudo(), "x".repeat(20));
    assert_eq!(session.grid().rows(), 5);
}

#[tokio::test]
async fn test_load_requires_join_and_reports_failure() {
    let mut api = MockApi::new(snapshot(five_by_five()));
    api.snapshot = None;
    let mut bootstrap = Bootstrap::new(Arc::new(api), "missing");

    let err = bootstrap
        .load(RecordingRenderer::default(), &ClientConfig::default())
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ClientError::NotJoined));

    bootstrap.join("alice").await.unwrap();
    let err = bootstrap
        .load(RecordingRenderer::default(), &ClientConfig::default())
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ClientError::LoadFailed(_)));
}
