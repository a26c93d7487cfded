use crate::domain::tuning::arena::TICK_RATE;
use std::{env, net::IpAddr, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    env::var("GAME_SERVER_PORT")
        .or_else(|_| env::var("PORT"))
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080)
}

pub fn bind_host() -> IpAddr {
    env::var("GAME_SERVER_HOST")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(IpAddr::from([0, 0, 0, 0]))
}

// Per-connection queue of room broadcasts; full queues drop snapshots.
pub const OUTBOUND_CHANNEL_CAPACITY: usize = 256;

pub const TICK_INTERVAL: Duration = Duration::from_millis(1000 / TICK_RATE as u64);
pub const ROOM_ID_ATTEMPTS: usize = 3;
