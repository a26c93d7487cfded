// Use-case level identities, broadcasts, and errors for room workflows.

use crate::domain::{Boss, Enemy, Player, SimulationState};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Opaque room identifier; also the room's wave seed.
pub type RoomId = Arc<str>;

/// Per-connection identifier assigned by the transport adapter.
pub type ConnectionId = u64;

/// Events a room pushes to its members.
#[derive(Debug, Clone)]
pub enum RoomBroadcast {
    // A newcomer joined; sent to members already in the room.
    PlayerJoined { id: ConnectionId, name: String },
    // Simulation started; clients seed their own generator from `seed`.
    GameStart { seed: RoomId, start_time: u64 },
    // Full per-tick snapshot, shared between all members.
    GameState(Arc<GameStateSnapshot>),
}

/// Sender half of a connection's outbound queue.
pub type Outbound = mpsc::Sender<RoomBroadcast>;

/// What a room needs to know about a connection to admit it.
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub name: String,
    pub outbound: Outbound,
}

/// Full room state as broadcast every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct GameStateSnapshot {
    pub wave: u32,
    pub wave_start_time: u64,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    pub players: Vec<Player>,
}

impl From<&SimulationState> for GameStateSnapshot {
    fn from(state: &SimulationState) -> Self {
        Self {
            wave: state.wave,
            wave_start_time: state.wave_start_time,
            enemies: state.enemies.clone(),
            boss: state.boss.clone(),
            players: state.players.values().cloned().collect(),
        }
    }
}

/// Lobby listing entry for a joinable room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: String,
}

/// Errors returned by room registry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomError {
    /// No room is registered under the requested id.
    RoomNotFound,
    /// The room's join window closed when its simulation started.
    AlreadyStarted,
    /// A fresh room id could not be allocated.
    CreationFailure,
}

impl fmt::Display for RoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            RoomError::RoomNotFound => "Room not found",
            RoomError::AlreadyStarted => "Game already started",
            RoomError::CreationFailure => "Room could not be created",
        };
        f.write_str(reason)
    }
}

impl std::error::Error for RoomError {}
