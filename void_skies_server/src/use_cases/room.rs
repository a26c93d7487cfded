// A room: its members, its simulation, and the tick driver that advances it.

use crate::domain::RoomSimulation;
use crate::domain::state::PlayerUpdate;
use crate::use_cases::types::{
    Connection, ConnectionId, GameStateSnapshot, Outbound, RoomBroadcast, RoomId,
};
use std::sync::{Arc, Weak};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, info};

/// Rooms are shared between the registry and their tick driver. The lock
/// makes each tick (advance plus broadcast) one critical section.
pub type SharedRoom = Arc<Mutex<Room>>;

struct Member {
    id: ConnectionId,
    outbound: Outbound,
}

// Present only while the room is ticking.
struct Ticker {
    shutdown: Arc<Notify>,
}

pub struct Room {
    id: RoomId,
    name: String,
    /// Members in join order.
    members: Vec<Member>,
    started: bool,
    simulation: RoomSimulation,
    ticker: Option<Ticker>,
}

impl Room {
    /// Builds an idle room seeded from its id.
    pub fn new(id: RoomId, name: String) -> Self {
        let simulation = RoomSimulation::new(&id);
        Self::with_simulation(id, name, simulation)
    }

    pub fn with_simulation(id: RoomId, name: String, simulation: RoomSimulation) -> Self {
        Self {
            id,
            name,
            members: Vec::new(),
            started: false,
            simulation,
            ticker: None,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn has_member(&self, id: ConnectionId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    pub fn simulation(&self) -> &RoomSimulation {
        &self.simulation
    }

    /// Admits a connection as a player and tells existing members about it.
    pub fn add_member(&mut self, connection: &Connection) {
        self.broadcast(RoomBroadcast::PlayerJoined {
            id: connection.id,
            name: connection.name.clone(),
        });
        self.members.push(Member {
            id: connection.id,
            outbound: connection.outbound.clone(),
        });
        self.simulation.add_player(connection.id, connection.name.clone());
    }

    /// Drops a member and its player. Returns false if it was not a member.
    pub fn remove_member(&mut self, id: ConnectionId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.id != id);
        self.simulation.remove_player(id);
        before != self.members.len()
    }

    /// Applies client input to a member's player once the game is running.
    pub fn apply_input(&mut self, id: ConnectionId, update: PlayerUpdate) -> bool {
        self.started && self.simulation.apply_player_update(id, update)
    }

    /// Starts the simulation and its tick driver. No-op if already started.
    ///
    /// `handle` must be the shared handle that owns `self`; the driver keeps
    /// only a weak reference to it.
    pub fn start(&mut self, handle: &SharedRoom, tick_interval: Duration) -> bool {
        if self.started {
            return false;
        }

        let now = epoch_millis();
        self.started = true;
        self.simulation.start(now);
        self.broadcast(RoomBroadcast::GameStart {
            seed: self.id.clone(),
            start_time: now,
        });

        let shutdown = Arc::new(Notify::new());
        tokio::spawn(tick_task(
            Arc::downgrade(handle),
            shutdown.clone(),
            tick_interval,
        ));
        self.ticker = Some(Ticker { shutdown });

        info!(room_id = %self.id, members = self.members.len(), "game started");
        true
    }

    /// Stops the tick driver. Safe to call repeatedly.
    ///
    /// The driver re-checks the ticker under the room lock, so once this
    /// returns no further broadcast is sent.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.shutdown.notify_one();
            info!(room_id = %self.id, "tick loop stopped");
        }
    }

    /// One fixed tick: advance the simulation, then push the full state.
    pub fn tick(&mut self, dt: f64) {
        let outcome = self.simulation.advance(dt);
        if outcome.despawned > 0 {
            debug!(room_id = %self.id, count = outcome.despawned, "enemies fell through");
        }
        if let Some(wave) = outcome.wave_started {
            info!(room_id = %self.id, wave, "wave started");
        }

        let snapshot = Arc::new(GameStateSnapshot::from(self.simulation.state()));
        self.broadcast(RoomBroadcast::GameState(snapshot));
    }

    fn broadcast(&self, msg: RoomBroadcast) {
        for member in &self.members {
            match member.outbound.try_send(msg.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    // The next snapshot supersedes this one.
                    debug!(room_id = %self.id, conn_id = member.id, "outbound full; dropping");
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(room_id = %self.id, conn_id = member.id, "outbound closed");
                }
            }
        }
    }
}

/// Drives one room at a fixed interval until stopped or dropped.
async fn tick_task(room: Weak<Mutex<Room>>, shutdown: Arc<Notify>, tick_interval: Duration) {
    let mut interval = tokio::time::interval(tick_interval);
    let dt = tick_interval.as_secs_f64();

    loop {
        tokio::select! {
            _ = shutdown.notified() => break,
            _ = interval.tick() => {}
        }

        let Some(room) = room.upgrade() else {
            break;
        };
        let mut room = room.lock().await;
        if !room.is_ticking() {
            break;
        }
        room.tick(dt);
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    const TICK: Duration = Duration::from_millis(50);

    fn connection(id: ConnectionId, name: &str) -> (Connection, mpsc::Receiver<RoomBroadcast>) {
        let (outbound, rx) = mpsc::channel(64);
        (
            Connection {
                id,
                name: name.to_string(),
                outbound,
            },
            rx,
        )
    }

    fn shared_room(id: &str) -> SharedRoom {
        Arc::new(Mutex::new(Room::new(Arc::from(id), "Lobby".to_string())))
    }

    #[tokio::test]
    async fn when_member_joins_then_only_existing_members_are_notified() {
        let room = shared_room("r1");
        let (first, mut first_rx) = connection(1, "First");
        let (second, mut second_rx) = connection(2, "Second");

        {
            let mut room = room.lock().await;
            room.add_member(&first);
            room.add_member(&second);
            assert_eq!(room.member_count(), 2);
            assert_eq!(room.simulation().state().players.len(), 2);
        }

        match first_rx.try_recv() {
            Ok(RoomBroadcast::PlayerJoined { id, name }) => {
                assert_eq!(id, 2);
                assert_eq!(name, "Second");
            }
            other => panic!("expected player joined, got {other:?}"),
        }
        assert!(second_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn when_started_then_game_start_precedes_ticks() {
        let room = shared_room("seed-room");
        let (member, mut rx) = connection(1, "Pilot");
        {
            let mut guard = room.lock().await;
            guard.add_member(&member);
            assert!(guard.start(&room, TICK));
            assert!(!guard.start(&room, TICK));
        }

        match rx.recv().await {
            Some(RoomBroadcast::GameStart { seed, .. }) => assert_eq!(&*seed, "seed-room"),
            other => panic!("expected game start, got {other:?}"),
        }
        for _ in 0..3 {
            match rx.recv().await {
                Some(RoomBroadcast::GameState(state)) => {
                    assert_eq!(state.wave, 1);
                    assert_eq!(state.players.len(), 1);
                    assert_eq!(state.enemies.len(), 8);
                }
                other => panic!("expected game state, got {other:?}"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn when_stopped_then_no_more_game_state_is_sent() {
        let room = shared_room("stop-room");
        let (member, mut rx) = connection(1, "Pilot");
        {
            let mut guard = room.lock().await;
            guard.add_member(&member);
            guard.start(&room, TICK);
        }
        tokio::time::sleep(TICK * 3).await;

        {
            let mut guard = room.lock().await;
            guard.stop();
            guard.stop();
            assert!(!guard.is_ticking());
        }
        while rx.try_recv().is_ok() {}

        tokio::time::sleep(TICK * 10).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn when_not_started_then_input_is_ignored() {
        let room = shared_room("idle");
        let (member, _rx) = connection(1, "Pilot");
        let mut guard = room.lock().await;
        guard.add_member(&member);

        let applied = guard.apply_input(
            1,
            PlayerUpdate {
                x: Some(10.0),
                ..PlayerUpdate::default()
            },
        );

        assert!(!applied);
        assert_eq!(guard.simulation().state().players[&1].x, 480.0);
    }

    #[tokio::test]
    async fn when_removing_unknown_member_then_nothing_changes() {
        let room = shared_room("r2");
        let (member, _rx) = connection(1, "Pilot");
        let mut guard = room.lock().await;
        guard.add_member(&member);

        assert!(!guard.remove_member(42));
        assert!(guard.remove_member(1));
        assert!(guard.is_empty());
        assert!(guard.simulation().state().players.is_empty());
    }
}
