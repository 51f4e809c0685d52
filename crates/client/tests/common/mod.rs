//! Common test utilities
#![allow(dead_code)] // Not every test file uses every helper

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::StreamExt;
use tokio::time::Instant;

use fleche_client::grid::GridModel;
use fleche_client::reconnect::ConnectionStatus;
use fleche_client::roster::PlayerRoster;
use fleche_client::selection::SelectionView;
use fleche_client::state::SessionState;
use fleche_client::{CellChange, ClientError, EventStream, GameApi, Renderer, Result};
use fleche_protocol::{
    Cell, Definition, Direction, GameSnapshot, Grid, MoveRequest, Player, PlayerMap,
};

/// 5×5 grid: row 0 is `. . . R .` where `R` carries `{ABC, right}`
pub fn five_by_five() -> Grid {
    let mut cells = vec![vec![Cell::open(); 5]; 5];
    cells[0][3] = Cell::black(vec![Definition::new("ABC", Direction::Right)]);
    Grid {
        id: Some("g1".into()),
        rows: 5,
        cols: 5,
        cells,
    }
}

pub fn snapshot(grid: Grid) -> GameSnapshot {
    GameSnapshot {
        grid,
        state: Vec::new(),
        players: PlayerMap::new(),
    }
}

/// Scripted behaviour of one `open_events` call
pub enum StreamScript {
    Fail,
    Live(mpsc::UnboundedReceiver<Result<String>>),
}

/// In-memory game service
pub struct MockApi {
    pub snapshot: Option<GameSnapshot>,
    pub rejected: Vec<String>,
    pub joins: Mutex<Vec<String>>,
    pub moves: Mutex<Vec<MoveRequest>>,
    /// Statuses for the next moves; accepted once exhausted
    pub move_statuses: Mutex<VecDeque<u16>>,
    pub streams: Mutex<VecDeque<StreamScript>>,
    pub opens: Mutex<Vec<Instant>>,
}

impl MockApi {
    pub fn new(snapshot: GameSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            rejected: Vec::new(),
            joins: Mutex::new(Vec::new()),
            moves: Mutex::new(Vec::new()),
            move_statuses: Mutex::new(VecDeque::new()),
            streams: Mutex::new(VecDeque::new()),
            opens: Mutex::new(Vec::new()),
        }
    }

    /// Queue a live stream and return the handle that feeds it
    pub fn live_stream(&self) -> mpsc::UnboundedSender<Result<String>> {
        let (tx, rx) = mpsc::unbounded();
        self.streams.lock().unwrap().push_back(StreamScript::Live(rx));
        tx
    }

    pub fn failing_stream(&self) {
        self.streams.lock().unwrap().push_back(StreamScript::Fail);
    }

    pub fn reject_next_move(&self, status: u16) {
        self.move_statuses.lock().unwrap().push_back(status);
    }

    pub fn open_times(&self) -> Vec<Instant> {
        self.opens.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<MoveRequest> {
        self.moves.lock().unwrap().clone()
    }
}

#[async_trait]
impl GameApi for MockApi {
    async fn join(&self, _game_id: &str, pseudo: &str) -> Result<Player> {
        self.joins.lock().unwrap().push(pseudo.to_string());
        if self.rejected.iter().any(|p| p == pseudo) {
            return Err(ClientError::JoinRejected("Pseudo déjà pris".into()));
        }
        Ok(Player::new(pseudo, "#e6194b"))
    }

    async fn load(&self, game_id: &str) -> Result<GameSnapshot> {
        self.snapshot
            .clone()
            .ok_or_else(|| ClientError::LoadFailed(format!("game {game_id} not found")))
    }

    async fn submit_move(&self, _game_id: &str, request: &MoveRequest) -> Result<()> {
        self.moves.lock().unwrap().push(request.clone());
        match self.move_statuses.lock().unwrap().pop_front() {
            Some(status) => Err(ClientError::MoveRejected { status }),
            None => Ok(()),
        }
    }

    async fn open_events(&self, _game_id: &str, _pseudo: &str) -> Result<EventStream> {
        self.opens.lock().unwrap().push(Instant::now());
        let script = self.streams.lock().unwrap().pop_front();
        match script {
            Some(StreamScript::Fail) => Err(ClientError::StreamFailed("connection refused".into())),
            Some(StreamScript::Live(rx)) => Ok(rx.boxed()),
            None => Ok(futures::stream::pending().boxed()),
        }
    }
}

/// One renderer call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Grid,
    Cell(CellChange),
    Selection(SelectionView),
    Roster(Vec<String>),
    Connection(ConnectionStatus),
    Error(String),
}

/// Renderer that records every call in a shared log
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    pub log: Arc<Mutex<Vec<Rendered>>>,
}

impl RecordingRenderer {
    pub fn calls(&self) -> Vec<Rendered> {
        self.log.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<ConnectionStatus> {
        self.calls()
            .into_iter()
            .filter_map(|r| match r {
                Rendered::Connection(status) => Some(status),
                _ => None,
            })
            .collect()
    }

    pub fn cells(&self) -> Vec<CellChange> {
        self.calls()
            .into_iter()
            .filter_map(|r| match r {
                Rendered::Cell(change) => Some(change),
                _ => None,
            })
            .collect()
    }

    pub fn last_selection(&self) -> Option<SelectionView> {
        self.calls().into_iter().rev().find_map(|r| match r {
            Rendered::Selection(view) => Some(view),
            _ => None,
        })
    }

    pub fn last_roster(&self) -> Option<Vec<String>> {
        self.calls().into_iter().rev().find_map(|r| match r {
            Rendered::Roster(names) => Some(names),
            _ => None,
        })
    }

    fn push(&self, rendered: Rendered) {
        self.log.lock().unwrap().push(rendered);
    }
}

impl Renderer for RecordingRenderer {
    fn grid(&mut self, _grid: &GridModel, _state: &SessionState) {
        self.push(Rendered::Grid);
    }

    fn cell(&mut self, change: &CellChange) {
        self.push(Rendered::Cell(change.clone()));
    }

    fn selection(&mut self, view: &SelectionView) {
        self.push(Rendered::Selection(view.clone()));
    }

    fn roster(&mut self, roster: &PlayerRoster) {
        self.push(Rendered::Roster(
            roster.badges().map(|b| b.pseudo.clone()).collect(),
        ));
    }

    fn connection(&mut self, status: ConnectionStatus) {
        self.push(Rendered::Connection(status));
    }

    fn error(&mut self, message: &str) {
        self.push(Rendered::Error(message.to_string()));
    }
}
