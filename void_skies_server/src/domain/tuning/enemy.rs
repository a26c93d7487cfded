/// The fixed set of regular enemy kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Drone,
    Hunter,
    Phantom,
    Mech,
    Angler,
    Manta,
}

impl EnemyKind {
    /// Wire/log name, matching the client asset keys.
    pub fn as_str(self) -> &'static str {
        match self {
            EnemyKind::Drone => "drone",
            EnemyKind::Hunter => "hunter",
            EnemyKind::Phantom => "phantom",
            EnemyKind::Mech => "mech",
            EnemyKind::Angler => "angler",
            EnemyKind::Manta => "manta",
        }
    }

    pub fn tuning(self) -> EnemyTuning {
        match self {
            EnemyKind::Drone => EnemyTuning {
                radius: 10.0,
                speed: 80.0,
                base_hp: 20.0,
                color: "#C0C0C0",
                xp: 5,
                score: 50,
                shards: 1,
                fire_chance: 0.004,
                fire_cooldown: 0.0,
            },
            EnemyKind::Hunter => EnemyTuning {
                radius: 20.0,
                speed: 100.0,
                base_hp: 15.0,
                color: "#DC143C",
                xp: 8,
                score: 80,
                shards: 1,
                fire_chance: 0.005,
                fire_cooldown: 0.0,
            },
            EnemyKind::Phantom => EnemyTuning {
                radius: 14.0,
                speed: 90.0,
                base_hp: 30.0,
                color: "#FFFFFF",
                xp: 10,
                score: 100,
                shards: 2,
                fire_chance: 0.006,
                fire_cooldown: 1.5,
            },
            EnemyKind::Mech => EnemyTuning {
                radius: 18.0,
                speed: 40.0,
                base_hp: 70.0,
                color: "#FF8500",
                xp: 15,
                score: 150,
                shards: 3,
                fire_chance: 0.007,
                fire_cooldown: 0.0,
            },
            EnemyKind::Angler => EnemyTuning {
                radius: 22.0,
                speed: 30.0,
                base_hp: 120.0,
                color: "#00008b",
                xp: 18,
                score: 180,
                shards: 4,
                fire_chance: 0.008,
                fire_cooldown: 0.0,
            },
            EnemyKind::Manta => EnemyTuning {
                radius: 26.0,
                speed: 50.0,
                base_hp: 150.0,
                color: "#53B6FF",
                xp: 22,
                score: 220,
                shards: 5,
                fire_chance: 0.009,
                fire_cooldown: 0.0,
            },
        }
    }
}

/// Per-kind base stats, before wave scaling.
#[derive(Debug, Clone, Copy)]
pub struct EnemyTuning {
    /// Collision radius in arena units.
    pub radius: f64,
    /// Downward speed in units per second.
    pub speed: f64,
    /// Hit points at wave 0 with no health bonus.
    pub base_hp: f64,
    pub color: &'static str,
    pub xp: u32,
    pub score: u32,
    /// Shards dropped on kill.
    pub shards: u32,
    /// Per-frame chance of firing, evaluated client-side.
    pub fire_chance: f64,
    /// Initial fire cooldown in seconds.
    pub fire_cooldown: f64,
}

/// Manta oscillation ranges: `amplitude = base + r * spread`.
pub const MANTA_AMPLITUDE_BASE: f64 = 150.0;
pub const MANTA_AMPLITUDE_SPREAD: f64 = 100.0;
pub const MANTA_FREQUENCY_BASE: f64 = 0.5;
pub const MANTA_FREQUENCY_SPREAD: f64 = 0.5;
