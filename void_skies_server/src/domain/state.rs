// Domain-level simulation entities and the per-room simulation state.

use crate::domain::tuning::arena::{
    ARENA_HEIGHT, ARENA_WIDTH, PLAYER_MAX_HP, PLAYER_SPAWN_X, PLAYER_SPAWN_Y,
};
use crate::domain::tuning::enemy::EnemyKind;
use std::collections::BTreeMap;

/// Knockback impulse applied to an enemy, in units per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knockback {
    pub vx: f64,
    pub vy: f64,
}

/// Extra state for the oscillating manta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MantaState {
    pub start_x: f64,
    pub amplitude: f64,
    pub frequency: f64,
    pub dodge_cooldown: f64,
    pub dodging: bool,
}

/// Kind-specific behavior; each variant carries only its own extra state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyBehavior {
    Drone,
    Hunter,
    Phantom { phased: bool },
    Mech { attack_phase: f64 },
    Angler,
    Manta(MantaState),
}

impl EnemyBehavior {
    pub fn kind(&self) -> EnemyKind {
        match self {
            EnemyBehavior::Drone => EnemyKind::Drone,
            EnemyBehavior::Hunter => EnemyKind::Hunter,
            EnemyBehavior::Phantom { .. } => EnemyKind::Phantom,
            EnemyBehavior::Mech { .. } => EnemyKind::Mech,
            EnemyBehavior::Angler => EnemyKind::Angler,
            EnemyBehavior::Manta(_) => EnemyKind::Manta,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    /// Unique within the room, increasing in spawn order.
    pub id: u64,
    pub behavior: EnemyBehavior,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub speed: f64,
    pub hp: f64,
    pub hp_max: f64,

    // Cosmetic/reward attributes, consumed by clients.
    pub color: &'static str,
    pub xp: u32,
    pub score: u32,
    pub shards: u32,
    pub fire_chance: f64,

    // Timers, in seconds.
    pub age: f64,
    pub fire_cooldown: f64,
    pub stun_timer: f64,
    pub knockback: Option<Knockback>,
}

impl Enemy {
    pub fn kind(&self) -> EnemyKind {
        self.behavior.kind()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boss {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub hp: f64,
    pub hp_max: f64,
    pub age: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: u64,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub hp: f64,
    pub score: f64,
}

/// Partial player update; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub hp: Option<f64>,
    pub score: Option<f64>,
}

impl Player {
    /// A new player at the spawn point with full health and no score.
    pub fn spawn(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            x: PLAYER_SPAWN_X,
            y: PLAYER_SPAWN_Y,
            hp: PLAYER_MAX_HP,
            score: 0.0,
        }
    }

    /// Applies a client-reported update.
    ///
    /// Position is clamped to the arena. Hit points and score are taken as
    /// reported: clients in a room are trusted co-op peers, so they are not
    /// recomputed from server-side damage.
    pub fn apply(&mut self, update: PlayerUpdate) {
        if let Some(x) = update.x.filter(|v| v.is_finite()) {
            self.x = x.clamp(0.0, ARENA_WIDTH);
        }
        if let Some(y) = update.y.filter(|v| v.is_finite()) {
            self.y = y.clamp(0.0, ARENA_HEIGHT);
        }
        if let Some(hp) = update.hp.filter(|v| v.is_finite()) {
            self.hp = hp;
        }
        if let Some(score) = update.score.filter(|v| v.is_finite()) {
            self.score = score;
        }
    }
}

/// Everything the room simulation owns for one session.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Current wave, starting at 1.
    pub wave: u32,
    pub enemies: Vec<Enemy>,
    /// Boss waves carry a boss instead of a regular roster.
    pub boss: Option<Boss>,
    /// Players keyed by connection id.
    pub players: BTreeMap<u64, Player>,
    /// Epoch milliseconds at which the current wave began.
    pub wave_start_time: u64,
    pub enemy_health_bonus: f64,
    pub enemy_density_bonus: f64,
    /// Simulated seconds the arena has been empty.
    pub wave_clear_timer: f64,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            wave: 1,
            enemies: Vec::new(),
            boss: None,
            players: BTreeMap::new(),
            wave_start_time: 0,
            enemy_health_bonus: 1.0,
            enemy_density_bonus: 1.0,
            wave_clear_timer: 0.0,
        }
    }
}
