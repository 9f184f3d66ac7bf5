use crate::interface_adapters::utils::ids::ConnectionIds;
use crate::use_cases::{GameEvent, SimStatus};
use axum::extract::ws::Utf8Bytes;
use tokio::sync::{broadcast, mpsc, watch};

pub struct AppState {
    // Source of ids for newly accepted sockets.
    pub connection_ids: ConnectionIds,
    // Connection lifecycle and inputs flowing into the simulation task.
    pub input_tx: mpsc::Sender<GameEvent>,
    // Serialized state messages, shared across all connections.
    pub world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    // Latest serialized state message for lag recovery.
    pub world_latest_tx: watch::Sender<Utf8Bytes>,
    // Tick counter and session count published by the simulation.
    pub status_rx: watch::Receiver<SimStatus>,
}
