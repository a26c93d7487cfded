// Per-connection protocol handling: maps inbound events to room operations.

use crate::domain::state::PlayerUpdate;
use crate::domain::tuning::arena::DEFAULT_PLAYER_NAME;
use crate::use_cases::registry::RoomRegistry;
use crate::use_cases::types::{
    Connection, ConnectionId, Outbound, RoomError, RoomId, RoomSummary,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Inbound application events, already decoded from the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    SetPlayerName(String),
    CreateRoom(String),
    JoinRoom(String),
    GetRoomNames,
    StartGame,
    PlayerInput(PlayerUpdate),
    LeaveRoom,
}

/// Synchronous replies for events that carry an acknowledgement.
#[derive(Debug, Clone, PartialEq)]
pub enum Ack {
    /// `None` when the room could not be created.
    RoomCreated(Option<RoomId>),
    Joined(Result<(), RoomError>),
    RoomNames(Vec<RoomSummary>),
}

/// Protocol state for one connection.
///
/// Validation stops at position clamping: reported hit points and score are
/// applied as sent.
pub struct Session {
    connection: Connection,
    registry: Arc<RoomRegistry>,
    // Room targeted by startGame and playerInput (last created or joined).
    current_room: Option<RoomId>,
}

impl Session {
    pub fn new(id: ConnectionId, registry: Arc<RoomRegistry>, outbound: Outbound) -> Self {
        Self {
            connection: Connection {
                id,
                name: DEFAULT_PLAYER_NAME.to_string(),
                outbound,
            },
            registry,
            current_room: None,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.connection.id
    }

    pub fn current_room(&self) -> Option<&RoomId> {
        self.current_room.as_ref()
    }

    /// Dispatches one event. Errors are reported through the ack, never raised.
    pub async fn handle(&mut self, event: ClientEvent) -> Option<Ack> {
        let conn_id = self.connection.id;
        match event {
            ClientEvent::SetPlayerName(name) => {
                debug!(conn_id, %name, "player name set");
                self.connection.name = name;
                None
            }
            ClientEvent::CreateRoom(name) => {
                let created = match self.registry.host_room(name, &self.connection).await {
                    Ok(room_id) => {
                        self.current_room = Some(room_id.clone());
                        Some(room_id)
                    }
                    Err(e) => {
                        warn!(conn_id, error = %e, "create room failed");
                        None
                    }
                };
                Some(Ack::RoomCreated(created))
            }
            ClientEvent::JoinRoom(room_id) => {
                let result = self.registry.join_room(&room_id, &self.connection).await;
                match &result {
                    Ok(()) => self.current_room = Some(RoomId::from(room_id)),
                    Err(e) => info!(conn_id, %room_id, error = %e, "join room rejected"),
                }
                Some(Ack::Joined(result))
            }
            ClientEvent::GetRoomNames => {
                Some(Ack::RoomNames(self.registry.list_joinable_rooms().await))
            }
            ClientEvent::StartGame => {
                if let Some(room_id) = &self.current_room {
                    if !self.registry.start_game(room_id).await {
                        debug!(conn_id, %room_id, "start ignored");
                    }
                }
                None
            }
            ClientEvent::PlayerInput(update) => {
                if let Some(room_id) = &self.current_room {
                    self.registry.apply_input(room_id, conn_id, update).await;
                }
                None
            }
            ClientEvent::LeaveRoom => {
                self.leave().await;
                None
            }
        }
    }

    /// Transport closed; same effect as leaving.
    pub async fn disconnect(&mut self, reason: &str) {
        info!(conn_id = self.connection.id, reason, "client disconnected");
        self.leave().await;
    }

    async fn leave(&mut self) {
        let left = self.registry.leave_room(self.connection.id).await;
        if !left.is_empty() {
            debug!(conn_id = self.connection.id, rooms = left.len(), "left rooms");
        }
        self.current_room = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::registry::RoomSettings;
    use crate::use_cases::types::RoomBroadcast;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn registry() -> Arc<RoomRegistry> {
        Arc::new(RoomRegistry::new(RoomSettings {
            tick_interval: Duration::from_millis(50),
            id_attempts: 3,
        }))
    }

    fn session(id: ConnectionId, registry: &Arc<RoomRegistry>) -> (Session, mpsc::Receiver<RoomBroadcast>) {
        let (tx, rx) = mpsc::channel(256);
        (Session::new(id, registry.clone(), tx), rx)
    }

    async fn create(session: &mut Session, name: &str) -> RoomId {
        match session.handle(ClientEvent::CreateRoom(name.to_string())).await {
            Some(Ack::RoomCreated(Some(id))) => id,
            other => panic!("expected created room, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn when_creating_room_then_creator_is_first_member() {
        let registry = registry();
        let (mut host, _rx) = session(1, &registry);

        let room_id = create(&mut host, "Alpha").await;

        assert_eq!(host.current_room(), Some(&room_id));
        let room = registry.get_room(&room_id).await.expect("room exists");
        assert!(room.lock().await.has_member(1));
    }

    #[tokio::test]
    async fn when_name_is_set_then_joiners_are_announced_with_it() {
        let registry = registry();
        let (mut host, mut host_rx) = session(1, &registry);
        let (mut guest, _guest_rx) = session(2, &registry);
        let room_id = create(&mut host, "Alpha").await;

        guest.handle(ClientEvent::SetPlayerName("Nova".to_string())).await;
        let ack = guest.handle(ClientEvent::JoinRoom(room_id.to_string())).await;

        assert_eq!(ack, Some(Ack::Joined(Ok(()))));
        match host_rx.try_recv() {
            Ok(RoomBroadcast::PlayerJoined { id, name }) => assert_eq!((id, name.as_str()), (2, "Nova")),
            other => panic!("expected player joined, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn when_joining_unknown_room_then_ack_carries_reason() {
        let registry = registry();
        let (mut guest, _rx) = session(2, &registry);

        let ack = guest.handle(ClientEvent::JoinRoom("nope".to_string())).await;

        assert_eq!(ack, Some(Ack::Joined(Err(RoomError::RoomNotFound))));
        assert!(guest.current_room().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn when_host_starts_then_members_get_game_start_with_room_seed() {
        let registry = registry();
        let (mut host, mut host_rx) = session(1, &registry);
        let room_id = create(&mut host, "Alpha").await;

        assert_eq!(host.handle(ClientEvent::StartGame).await, None);

        match host_rx.recv().await {
            Some(RoomBroadcast::GameStart { seed, .. }) => assert_eq!(seed, room_id),
            other => panic!("expected game start, got {other:?}"),
        }
        assert!(matches!(host_rx.recv().await, Some(RoomBroadcast::GameState(_))));
        assert_eq!(
            host.handle(ClientEvent::GetRoomNames).await,
            Some(Ack::RoomNames(Vec::new()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn when_input_reports_hp_and_score_then_they_are_broadcast_verbatim() {
        let registry = registry();
        let (mut host, mut host_rx) = session(1, &registry);
        create(&mut host, "Alpha").await;
        host.handle(ClientEvent::StartGame).await;

        host.handle(ClientEvent::PlayerInput(PlayerUpdate {
            x: Some(2_000.0),
            y: None,
            hp: Some(3.5),
            score: Some(9_001.0),
        }))
        .await;

        tokio::time::sleep(Duration::from_millis(60)).await;
        let mut last = None;
        while let Ok(msg) = host_rx.try_recv() {
            if let RoomBroadcast::GameState(state) = msg {
                last = Some(state);
            }
        }
        let state = last.expect("a tick after the input");
        let player = &state.players[0];
        assert_eq!((player.x, player.y), (960.0, 440.0));
        assert_eq!((player.hp, player.score), (3.5, 9_001.0));
    }

    #[tokio::test]
    async fn when_last_member_disconnects_then_room_is_gone() {
        let registry = registry();
        let (mut host, _rx) = session(1, &registry);
        let room_id = create(&mut host, "Alpha").await;

        host.disconnect("transport close").await;
        host.disconnect("transport close").await;

        assert!(registry.get_room(&room_id).await.is_none());
        assert!(host.current_room().is_none());
    }

    #[tokio::test]
    async fn when_leaving_then_start_no_longer_targets_old_room() {
        let registry = registry();
        let (mut host, _host_rx) = session(1, &registry);
        let (mut guest, _guest_rx) = session(2, &registry);
        let room_id = create(&mut host, "Alpha").await;
        guest.handle(ClientEvent::JoinRoom(room_id.to_string())).await;

        guest.handle(ClientEvent::LeaveRoom).await;
        guest.handle(ClientEvent::StartGame).await;

        let room = registry.get_room(&room_id).await.expect("host keeps room");
        assert!(!room.lock().await.is_started());
    }
}
