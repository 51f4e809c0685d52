//! Game session coordinator
//!
//! Owns every piece of mutable session state and is its only writer. Each
//! handler consumes one input, mutates state, calls the renderer, and
//! returns the side effects the runtime has to perform. No handler awaits,
//! so the whole session can be driven and tested without any I/O.

use fleche_protocol::{GameSnapshot, MoveRequest};
use tokio::time::Instant;

use crate::config::ClientConfig;
use crate::dispatch::{self, Outcome};
use crate::error::{ClientError, Result};
use crate::grid::{GridModel, Position};
use crate::keys::{Command, Key};
use crate::reconnect::{Backoff, ConnectionStatus, ReconnectSupervisor};
use crate::render::Renderer;
use crate::roster::PlayerRoster;
use crate::selection::Selection;
use crate::state::SessionState;
use crate::sync::{CellChange, MoveOutcome, SyncChannel};

/// User interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Click(Position),
    Key(Key),
}

/// What a stream task reports back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSignal {
    Opened,
    Message(String),
    Fault(String),
}

/// Side effect requested from the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitMove(MoveRequest),
    /// Close any current stream and open a new one for `generation`
    OpenStream { generation: u64 },
    CloseStream,
}

/// A joined and loaded game
pub struct GameSession<R: Renderer> {
    game_id: String,
    grid: GridModel,
    state: SessionState,
    selection: Selection,
    sync: SyncChannel,
    supervisor: ReconnectSupervisor,
    renderer: R,
}

impl<R: Renderer> GameSession<R> {
    /// Build the session from a loaded snapshot
    ///
    /// Fails when the grid shape is inconsistent.
    pub fn new(
        game_id: impl Into<String>,
        pseudo: impl Into<String>,
        snapshot: GameSnapshot,
        config: &ClientConfig,
        renderer: R,
    ) -> Result<Self> {
        let grid = GridModel::from_grid(snapshot.grid)
            .map_err(|e| ClientError::LoadFailed(e.to_string()))?;
        let mut state = SessionState::new(&grid, PlayerRoster::new(config.display.leave_delay()));
        state.replace(&grid, &snapshot.state, &snapshot.players);
        let selection = Selection::new(&grid);
        let backoff = Backoff::new(config.reconnect.initial_delay(), config.reconnect.max_delay());

        Ok(Self {
            game_id: game_id.into(),
            grid,
            state,
            selection,
            sync: SyncChannel::new(pseudo),
            supervisor: ReconnectSupervisor::new(backoff),
            renderer,
        })
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn pseudo(&self) -> &str {
        self.sync.pseudo()
    }

    pub const fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    pub const fn status(&self) -> ConnectionStatus {
        self.supervisor.status()
    }

    pub const fn supervisor(&self) -> &ReconnectSupervisor {
        &self.supervisor
    }

    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Initial render and first stream attempt
    pub fn start(&mut self) -> Vec<Effect> {
        self.render_all();
        vec![self.open_stream()]
    }

    pub fn handle_input(&mut self, input: Input) -> Vec<Effect> {
        match input {
            Input::Click(pos) => {
                if self.selection.select(&self.grid, pos) {
                    self.render_selection();
                }
                Vec::new()
            }
            Input::Key(key) => self.handle_key(key),
        }
    }

    fn handle_key(&mut self, key: Key) -> Vec<Effect> {
        let Some(cursor) = self.selection.cursor() else {
            return Vec::new();
        };
        let Some(command) = key.command() else {
            return Vec::new();
        };

        let mut effects = Vec::new();
        match command {
            Command::Move(d_row, d_col) => {
                self.selection.move_by(&self.grid, d_row, d_col);
            }
            Command::ToggleDirection => {
                self.selection.toggle_direction();
            }
            Command::Erase { then_prev } => {
                effects.extend(self.edit(cursor, ""));
                if then_prev {
                    self.selection.prev(&self.grid);
                }
            }
            Command::Type(letter) => {
                effects.extend(self.edit(cursor, &letter.to_string()));
                self.selection.next(&self.grid);
            }
        }
        self.render_selection();
        effects
    }

    fn edit(&mut self, pos: Position, value: &str) -> Option<Effect> {
        match self.sync.submit_edit(&self.grid, &mut self.state, pos, value) {
            Ok(request) => {
                self.renderer.cell(&CellChange {
                    position: pos,
                    value: self.state.get(pos),
                    author: None,
                });
                Some(Effect::SubmitMove(request))
            }
            Err(e) => {
                self.renderer.error(&e.to_string());
                None
            }
        }
    }

    /// A move request finished; failures erase the cell
    pub fn handle_move_settled(&mut self, request: &MoveRequest, outcome: &MoveOutcome) {
        if let Some(change) = self.sync.settle(&self.grid, &mut self.state, request, outcome) {
            self.renderer.cell(&change);
        }
    }

    pub fn handle_stream(
        &mut self,
        generation: u64,
        signal: StreamSignal,
        now: Instant,
    ) -> Vec<Effect> {
        if !self.supervisor.is_current(generation) {
            tracing::debug!(generation, "Dropping signal from superseded stream");
            return Vec::new();
        }

        match signal {
            StreamSignal::Opened => {
                if self.supervisor.on_open(generation) {
                    self.renderer.connection(ConnectionStatus::Open);
                }
                Vec::new()
            }
            StreamSignal::Message(payload) => {
                if let Some(event) = dispatch::decode(&payload) {
                    let outcome =
                        dispatch::apply(event, &self.grid, &mut self.state, &self.sync, now);
                    self.render_outcome(outcome);
                }
                Vec::new()
            }
            StreamSignal::Fault(reason) => {
                tracing::debug!(generation, %reason, "Stream fault");
                if self.supervisor.on_fault(generation, now).is_some() {
                    self.renderer.connection(ConnectionStatus::Closed);
                    vec![Effect::CloseStream]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Fire every deadline that is due
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let removed = self.state.roster_mut().sweep(now);
        if !removed.is_empty() {
            tracing::debug!(?removed, "Dropped departed players");
            self.renderer.roster(self.state.roster());
        }

        match self.supervisor.poll_timer(now) {
            Some(generation) => {
                self.renderer.connection(ConnectionStatus::Connecting);
                vec![Effect::OpenStream { generation }]
            }
            None => Vec::new(),
        }
    }

    /// Earliest pending timer: reconnect or badge removal
    pub fn next_deadline(&self) -> Option<Instant> {
        match (
            self.supervisor.next_deadline(),
            self.state.roster().next_deadline(),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn open_stream(&mut self) -> Effect {
        let generation = self.supervisor.start();
        self.renderer.connection(ConnectionStatus::Connecting);
        Effect::OpenStream { generation }
    }

    fn render_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::CellChanged(change) => self.renderer.cell(&change),
            Outcome::PlayerAdded(_) | Outcome::PlayerLeaving(_) => {
                self.renderer.roster(self.state.roster());
            }
            Outcome::Resynced => self.render_all(),
            Outcome::Ignored => {}
        }
    }

    fn render_selection(&mut self) {
        let view = self.selection.view(&self.grid);
        self.renderer.selection(&view);
    }

    fn render_all(&mut self) {
        self.render_selection();
        self.renderer.grid(&self.grid, &self.state);
        self.renderer.roster(self.state.roster());
    }
}
