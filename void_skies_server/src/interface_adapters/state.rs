use crate::use_cases::RoomRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    // Every room on this server, shared by all connections.
    pub room_registry: Arc<RoomRegistry>,
    // Queue depth of each connection's outbound broadcast channel.
    pub outbound_capacity: usize,
}
