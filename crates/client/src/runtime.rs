//! Single-task event loop
//!
//! The loop owns the [`GameSession`] and is the only code that touches it.
//! Network work runs in spawned tasks that report back over a channel, so
//! every state change happens sequentially on the loop task.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use fleche_protocol::MoveRequest;

use crate::api::GameApi;
use crate::render::Renderer;
use crate::session::{Effect, GameSession, Input, StreamSignal};
use crate::sync::MoveOutcome;

/// Completion reported by a network task
#[derive(Debug)]
enum Completion {
    Stream { generation: u64, signal: StreamSignal },
    MoveSettled { request: MoveRequest, outcome: MoveOutcome },
}

/// Executes effects against the API
struct EffectDriver<A: GameApi> {
    api: Arc<A>,
    game_id: String,
    pseudo: String,
    tx: mpsc::UnboundedSender<Completion>,
    stream: Option<JoinHandle<()>>,
}

impl<A: GameApi> EffectDriver<A> {
    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitMove(request) => self.submit(request),
                Effect::OpenStream { generation } => {
                    self.close_stream();
                    self.open_stream(generation);
                }
                Effect::CloseStream => self.close_stream(),
            }
        }
    }

    fn submit(&self, request: MoveRequest) {
        let api = Arc::clone(&self.api);
        let game_id = self.game_id.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = MoveOutcome::from(api.submit_move(&game_id, &request).await);
            let _ = tx.send(Completion::MoveSettled { request, outcome });
        });
    }

    fn open_stream(&mut self, generation: u64) {
        let api = Arc::clone(&self.api);
        let game_id = self.game_id.clone();
        let pseudo = self.pseudo.clone();
        let tx = self.tx.clone();
        self.stream = Some(tokio::spawn(async move {
            pump_stream(api.as_ref(), &game_id, &pseudo, generation, &tx).await;
        }));
    }

    fn close_stream(&mut self) {
        if let Some(handle) = self.stream.take() {
            handle.abort();
        }
    }
}

fn report(tx: &mpsc::UnboundedSender<Completion>, generation: u64, signal: StreamSignal) -> bool {
    tx.send(Completion::Stream { generation, signal }).is_ok()
}

/// Forward one stream connection to the loop until it drops
async fn pump_stream<A: GameApi>(
    api: &A,
    game_id: &str,
    pseudo: &str,
    generation: u64,
    tx: &mpsc::UnboundedSender<Completion>,
) {
    let mut events = match api.open_events(game_id, pseudo).await {
        Ok(events) => events,
        Err(e) => {
            report(tx, generation, StreamSignal::Fault(e.to_string()));
            return;
        }
    };
    if !report(tx, generation, StreamSignal::Opened) {
        return;
    }

    while let Some(item) = events.next().await {
        let signal = match item {
            Ok(payload) => StreamSignal::Message(payload),
            Err(e) => {
                report(tx, generation, StreamSignal::Fault(e.to_string()));
                return;
            }
        };
        if !report(tx, generation, signal) {
            return;
        }
    }
    report(tx, generation, StreamSignal::Fault("stream closed by server".to_string()));
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

/// Run the session until the input channel closes, then hand it back
pub async fn run<A: GameApi, R: Renderer>(
    api: Arc<A>,
    mut session: GameSession<R>,
    mut input: mpsc::Receiver<Input>,
) -> GameSession<R> {
    let (tx, mut completions) = mpsc::unbounded_channel();
    let mut driver = EffectDriver {
        api,
        game_id: session.game_id().to_string(),
        pseudo: session.pseudo().to_string(),
        tx,
        stream: None,
    };

    let effects = session.start();
    driver.execute(effects);

    loop {
        let deadline = session.next_deadline();
        let effects = tokio::select! {
            received = input.recv() => match received {
                Some(event) => session.handle_input(event),
                None => break,
            },
            Some(completion) = completions.recv() => match completion {
                Completion::Stream { generation, signal } => {
                    session.handle_stream(generation, signal, Instant::now())
                }
                Completion::MoveSettled { request, outcome } => {
                    session.handle_move_settled(&request, &outcome);
                    Vec::new()
                }
            },
            () = sleep_until_deadline(deadline) => session.tick(Instant::now()),
        };
        driver.execute(effects);
    }

    tracing::debug!(game = %session.game_id(), "Input closed, stopping session");
    driver.close_stream();
    session
}
