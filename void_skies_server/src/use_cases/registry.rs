// Room registry: creation, membership, and teardown of rooms.

use crate::domain::state::PlayerUpdate;
use crate::use_cases::room::{Room, SharedRoom};
use crate::use_cases::types::{Connection, ConnectionId, RoomError, RoomId, RoomSummary};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Shared configuration for rooms created by the registry.
#[derive(Debug, Clone)]
pub struct RoomSettings {
    /// Fixed tick interval for every room's simulation.
    pub tick_interval: Duration,
    /// Attempts at drawing an unused room id before giving up.
    pub id_attempts: usize,
}

/// Thread-safe registry for live rooms.
///
/// Lock order is always registry, then room. Tick drivers only take the room
/// lock, so they never wait on the registry.
pub struct RoomRegistry {
    settings: RoomSettings,
    rooms: RwLock<HashMap<RoomId, SharedRoom>>,
}

impl RoomRegistry {
    pub fn new(settings: RoomSettings) -> Self {
        Self {
            settings,
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a new idle room with no members.
    pub async fn create_room(&self, name: String) -> Result<RoomId, RoomError> {
        let mut rooms = self.rooms.write().await;
        self.insert_room(&mut rooms, name)
    }

    /// Creates a room and admits its creator in one step, so the room is
    /// never observable without members.
    pub async fn host_room(
        &self,
        name: String,
        creator: &Connection,
    ) -> Result<RoomId, RoomError> {
        let mut rooms = self.rooms.write().await;
        let room_id = self.insert_room(&mut rooms, name)?;
        let room = rooms.get(&room_id).ok_or(RoomError::CreationFailure)?;
        room.lock().await.add_member(creator);
        info!(room_id = %room_id, conn_id = creator.id, "room hosted");
        Ok(room_id)
    }

    fn insert_room(
        &self,
        rooms: &mut HashMap<RoomId, SharedRoom>,
        name: String,
    ) -> Result<RoomId, RoomError> {
        let Some(room_id) = (0..self.settings.id_attempts)
            .map(|_| RoomId::from(uuid::Uuid::new_v4().to_string()))
            .find(|id| !rooms.contains_key(id))
        else {
            warn!(attempts = self.settings.id_attempts, "room id allocation failed");
            return Err(RoomError::CreationFailure);
        };

        let room = Room::new(room_id.clone(), name);
        info!(room_id = %room_id, name = %room.name(), "room created");
        rooms.insert(room_id.clone(), Arc::new(Mutex::new(room)));
        Ok(room_id)
    }

    /// Admits a connection to an existing room that has not started yet.
    pub async fn join_room(&self, room_id: &str, connection: &Connection) -> Result<(), RoomError> {
        // Hold the registry read lock so the room cannot be torn down mid-join.
        let rooms = self.rooms.read().await;
        let room = rooms.get(room_id).ok_or(RoomError::RoomNotFound)?;
        let mut room = room.lock().await;
        if room.has_member(connection.id) {
            debug!(room_id, conn_id = connection.id, "already a member");
            return Ok(());
        }
        if room.is_started() {
            return Err(RoomError::AlreadyStarted);
        }
        room.add_member(connection);
        info!(room_id, conn_id = connection.id, members = room.member_count(), "joined room");
        Ok(())
    }

    /// Removes a connection from every room it is in, deleting rooms it
    /// leaves empty. Idempotent; returns the rooms that were left.
    pub async fn leave_room(&self, connection_id: ConnectionId) -> Vec<RoomId> {
        let mut rooms = self.rooms.write().await;
        let mut left = Vec::new();
        let mut emptied = Vec::new();

        for (room_id, room) in rooms.iter() {
            let mut room = room.lock().await;
            if !room.remove_member(connection_id) {
                continue;
            }
            left.push(room_id.clone());
            if room.is_empty() {
                room.stop();
                emptied.push(room_id.clone());
            }
        }

        for room_id in emptied {
            rooms.remove(&room_id);
            info!(room_id = %room_id, "room closed");
        }
        left
    }

    /// Starts a room's simulation. Unknown or running rooms are a no-op.
    pub async fn start_game(&self, room_id: &str) -> bool {
        let rooms = self.rooms.read().await;
        let Some(handle) = rooms.get(room_id) else {
            return false;
        };
        let mut room = handle.lock().await;
        room.start(handle, self.settings.tick_interval)
    }

    /// Rooms still accepting players, sorted by name then id.
    pub async fn list_joinable_rooms(&self) -> Vec<RoomSummary> {
        let rooms = self.rooms.read().await;
        let mut joinable = Vec::new();
        for room in rooms.values() {
            let room = room.lock().await;
            if !room.is_started() {
                joinable.push(RoomSummary {
                    id: room.id().clone(),
                    name: room.name().to_string(),
                });
            }
        }
        joinable.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        joinable
    }

    /// Routes a player's input to its room. Returns false if not applied.
    pub async fn apply_input(
        &self,
        room_id: &str,
        connection_id: ConnectionId,
        update: PlayerUpdate,
    ) -> bool {
        let Some(room) = self.get_room(room_id).await else {
            return false;
        };
        room.lock().await.apply_input(connection_id, update)
    }

    pub async fn get_room(&self, room_id: &str) -> Option<SharedRoom> {
        self.rooms.read().await.get(room_id).cloned()
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}
