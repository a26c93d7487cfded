// Network adapter modules split by the client websocket vs plain HTTP routes.

pub mod client;
pub mod internal;

pub use client::ws_handler;
pub use internal::list_rooms_handler;
