use std::sync::atomic::{AtomicU64, Ordering};

// Zero is never handed out, so it can't collide with a default-initialized id.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Next id for an accepted socket. Ids double as player ids and are unique
/// for the life of the process.
pub fn next_connection_id() -> u64 {
    NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed)
}
