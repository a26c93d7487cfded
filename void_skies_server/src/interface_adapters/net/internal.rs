use crate::interface_adapters::protocol::RoomSummaryDto;
use crate::interface_adapters::state::AppState;

use axum::extract::{Json, State};
use std::sync::Arc;

// Read-only view of the lobby for tooling; same list `getRoomNames` returns.
pub async fn list_rooms_handler(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.room_registry.list_joinable_rooms().await;
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}
