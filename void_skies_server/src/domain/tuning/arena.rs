/// Logical arena width shared with clients (independent of canvas pixels).
pub const ARENA_WIDTH: f64 = 960.0;

/// Logical arena height shared with clients.
pub const ARENA_HEIGHT: f64 = 540.0;

/// Fixed simulation rate in ticks per second.
pub const TICK_RATE: u32 = 20;

/// Simulated seconds advanced per tick.
pub const TICK_DT: f64 = 1.0 / TICK_RATE as f64;

/// Enemies further than this below the bottom edge are despawned.
pub const DESPAWN_MARGIN: f64 = 100.0;

/// Seconds the arena must stay empty before the next wave begins.
pub const WAVE_CLEAR_DELAY: f64 = 0.5;

/// Slack for comparing accumulated simulated time against thresholds.
pub const TIME_EPSILON: f64 = 1e-9;

/// Where a freshly joined player appears.
pub const PLAYER_SPAWN_X: f64 = ARENA_WIDTH / 2.0;
pub const PLAYER_SPAWN_Y: f64 = ARENA_HEIGHT - 100.0;

pub const PLAYER_MAX_HP: f64 = 100.0;

pub const DEFAULT_PLAYER_NAME: &str = "Player";
