//! Live force simulation over WebSocket
//!
//! Each connection owns one simulation task. The hub remembers the running
//! task per session so opening a new view aborts the previous simulation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::{
    extract::{
        rejection::QueryRejection,
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use dashmap::DashMap;
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;
use tower_sessions::Session;

use crate::config::SimulationConfig;
use crate::error::AppResult;
use crate::layout::{Frame, Simulation};
use crate::network::RelationFilter;
use crate::render::settled_simulation_blocking;
use crate::state::AppState;

/// Pointer position of a drag gesture, in chart coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragPoint {
    pub id: i64,
    pub x: f64,
    pub y: f64,
}

/// WebSocket message types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WsMessage {
    #[serde(rename = "dragStart")]
    DragStart(DragPoint),
    #[serde(rename = "drag")]
    Drag(DragPoint),
    #[serde(rename = "dragEnd")]
    DragEnd(DragPoint),
    #[serde(rename = "tick")]
    Tick(Frame),
    #[serde(rename = "settled")]
    Settled,
}

/// Running simulations by session
pub struct SimulationHub {
    running: DashMap<String, (u64, AbortHandle)>,
    next_token: AtomicU64,
}

impl SimulationHub {
    pub fn new() -> Self {
        Self {
            running: DashMap::new(),
            next_token: AtomicU64::new(1),
        }
    }

    /// Record `handle` as the simulation of `key`, aborting the one it replaces
    pub fn register(&self, key: &str, handle: AbortHandle) -> u64 {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        if let Some((_, previous)) = self.running.insert(key.to_string(), (token, handle)) {
            previous.abort();
            tracing::debug!("Aborted previous simulation for session {}", key);
        }
        token
    }

    /// Forget the simulation of `key` if it is still the one issued `token`
    pub fn unregister(&self, key: &str, token: u64) {
        self.running.remove_if(key, |_, (current, _)| *current == token);
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    fn anonymous_key(&self) -> String {
        format!("anonymous-{}", self.next_token.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SimulationHub {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
pub struct SimulationQuery {
    #[serde(default)]
    pub relation: RelationFilter,
}

/// WebSocket upgrade handler
pub async fn serve_simulation(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    session: Session,
    query: Result<Query<SimulationQuery>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(query) = query?;
    let key = session
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| state.simulations.anonymous_key());
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, query.relation, key)))
}

/// Handle a WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState, relation: RelationFilter, key: String) {
    let network = state.data.functional_relations_network().filtered(relation);
    let sim = match settled_simulation_blocking(network, state.config.clone()).await {
        Ok(sim) => sim,
        Err(e) => {
            tracing::error!("Initial layout failed for session {}: {}", key, e);
            return;
        }
    };
    tracing::debug!("Simulation started for session {} ({} links)", key, sim.spring_count());

    let (sender, receiver) = socket.split();
    let task = tokio::spawn(run_simulation(sender, receiver, sim, state.config.simulation.clone()));
    let token = state.simulations.register(&key, task.abort_handle());

    if let Err(e) = task.await {
        if !e.is_cancelled() {
            tracing::error!("Simulation task failed: {}", e);
        }
    }

    state.simulations.unregister(&key, token);
    tracing::debug!("Simulation stopped for session {}", key);
}

async fn send<S>(sender: &mut S, msg: &WsMessage) -> bool
where
    S: Sink<Message> + Unpin,
{
    match serde_json::to_string(msg) {
        Ok(text) => sender.send(Message::Text(text)).await.is_ok(),
        Err(e) => {
            tracing::error!("Failed to encode simulation message: {}", e);
            false
        }
    }
}

/// Stream frames while the simulation is warm and apply drag gestures
async fn run_simulation<S, R, E>(mut sender: S, mut receiver: R, mut sim: Simulation, config: SimulationConfig)
where
    S: Sink<Message> + Unpin,
    R: Stream<Item = Result<Message, E>> + Unpin,
{
    let mut interval = tokio::time::interval(Duration::from_millis(config.tick_interval_ms.max(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // first frame mirrors the statically rendered layout
    if !send(&mut sender, &WsMessage::Tick(sim.frame())).await {
        return;
    }
    let mut idle = false;

    loop {
        tokio::select! {
            _ = interval.tick(), if !idle => {
                if sim.is_settled() {
                    idle = true;
                    if !send(&mut sender, &WsMessage::Settled).await {
                        break;
                    }
                    continue;
                }
                sim.tick();
                if !send(&mut sender, &WsMessage::Tick(sim.frame())).await {
                    break;
                }
            }
            incoming = receiver.next() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => continue,
                };
                match serde_json::from_str::<WsMessage>(&text) {
                    Ok(msg) => {
                        if apply_gesture(&mut sim, msg) {
                            idle = false;
                        }
                    }
                    Err(e) => tracing::debug!("Ignoring malformed simulation message: {}", e),
                }
            }
        }
    }
}

/// Apply a client gesture; returns whether the simulation needs ticking again
fn apply_gesture(sim: &mut Simulation, msg: WsMessage) -> bool {
    match msg {
        WsMessage::DragStart(p) => sim.drag_start(p.id, p.x, p.y),
        WsMessage::Drag(p) => sim.drag_to(p.id, p.x, p.y),
        WsMessage::DragEnd(p) => sim.drag_end(p.id),
        WsMessage::Tick(_) | WsMessage::Settled => false,
    }
}
