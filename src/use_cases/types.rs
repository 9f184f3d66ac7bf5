// Use-case level inputs/outputs for the simulation loop.

use crate::domain::{Building, ConnectionId, VehicleInput, VehicleSnapshot};
use crate::use_cases::SessionError;
use std::sync::Arc;
use tokio::sync::oneshot;

#[derive(Debug)]
pub enum GameEvent {
    Connect {
        connection_id: ConnectionId,
        reply: oneshot::Sender<Result<WorldInit, SessionError>>,
    },
    Input {
        connection_id: ConnectionId,
        input: VehicleInput,
    },
    Reset {
        connection_id: ConnectionId,
    },
    Disconnect {
        connection_id: ConnectionId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Idle,
    Running,
}

/// Lightweight status published after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimStatus {
    pub state: ServerState,
    pub tick: u64,
    pub sessions: usize,
}

impl Default for SimStatus {
    fn default() -> Self {
        Self {
            state: ServerState::Idle,
            tick: 0,
            sessions: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridInfo {
    pub spacing: f32,
    pub road_half: f32,
}

/// Static world description handed to a connection once its vehicle exists.
#[derive(Debug, Clone)]
pub struct WorldInit {
    pub connection_id: ConnectionId,
    pub grid: GridInfo,
    pub buildings: Arc<[Building]>,
}

#[derive(Debug, Clone)]
pub struct WorldUpdate {
    pub tick: u64,
    pub vehicles: Vec<VehicleSnapshot>,
}
