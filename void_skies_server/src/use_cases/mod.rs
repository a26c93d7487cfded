// Use cases layer: room workflows on top of the domain simulation.

pub mod registry;
pub mod room;
pub mod session;
pub mod types;

pub use registry::{RoomRegistry, RoomSettings};
pub use room::{Room, SharedRoom};
pub use session::{Ack, ClientEvent, Session};
pub use types::{
    Connection, ConnectionId, GameStateSnapshot, Outbound, RoomBroadcast, RoomError, RoomId,
    RoomSummary,
};
