use crate::domain::sequence::SeededSequence;
use crate::domain::state::{Boss, Enemy, EnemyBehavior, MantaState};
use crate::domain::tuning::arena::ARENA_WIDTH;
use crate::domain::tuning::enemy::{
    EnemyKind, MANTA_AMPLITUDE_BASE, MANTA_AMPLITUDE_SPREAD, MANTA_FREQUENCY_BASE,
    MANTA_FREQUENCY_SPREAD,
};

/// Every fifth wave is a boss wave with no regular roster.
pub const BOSS_WAVE_INTERVAL: u32 = 5;

/// Health scaling per wave (`1.075^wave`).
pub const HEALTH_GROWTH: f64 = 1.075;

/// Waves beyond this stop growing enemy health, keeping hp finite.
pub const HEALTH_SCALING_WAVE_CAP: u32 = 1_000;

const BASE_SPAWN_COUNT: u32 = 7;
const SPAWN_COUNT_PER_WAVE: f64 = 1.8;

// Spawn band: a margin on each side, above the top edge.
const SPAWN_MARGIN_X: f64 = 20.0;
const SPAWN_TOP_Y: f64 = -50.0;
const SPAWN_DEPTH: f64 = 250.0;

/// Hook for boss waves. The roster generator never spawns bosses itself.
pub trait BossSpawner: Send {
    fn spawn_boss(
        &mut self,
        wave: u32,
        health_bonus: f64,
        sequence: &mut SeededSequence,
    ) -> Option<Boss>;
}

/// Boss waves stay empty and clear after the usual debounce.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBoss;

impl BossSpawner for NoBoss {
    fn spawn_boss(&mut self, _: u32, _: f64, _: &mut SeededSequence) -> Option<Boss> {
        None
    }
}

pub fn is_boss_wave(wave: u32) -> bool {
    wave % BOSS_WAVE_INTERVAL == 0
}

/// `1.075^wave`, with the exponent capped so huge waves stay finite.
pub fn health_multiplier(wave: u32) -> f64 {
    HEALTH_GROWTH.powi(wave.min(HEALTH_SCALING_WAVE_CAP) as i32)
}

/// Number of regular enemies in a non-boss wave.
pub fn spawn_count(wave: u32, density_bonus: f64) -> usize {
    let base = f64::from(BASE_SPAWN_COUNT) + (f64::from(wave) * SPAWN_COUNT_PER_WAVE).floor();
    (base * density_bonus).floor().max(0.0) as usize
}

/// Kinds eligible at `wave`. Drone appears twice to bias draws toward it.
pub fn kind_pool(wave: u32) -> Vec<EnemyKind> {
    let mut pool = vec![EnemyKind::Drone, EnemyKind::Drone, EnemyKind::Hunter];
    if wave > 3 {
        pool.push(EnemyKind::Phantom);
    }
    if wave > 5 {
        pool.push(EnemyKind::Mech);
    }
    if wave > 7 {
        pool.push(EnemyKind::Angler);
    }
    if wave > 9 {
        pool.push(EnemyKind::Manta);
    }
    pool
}

/// Generates the regular roster for `wave`.
///
/// Draw order per enemy: kind, x, y, then amplitude and frequency for mantas.
/// Clients replaying the same seed rely on this order.
pub fn generate_wave(
    wave: u32,
    density_bonus: f64,
    health_bonus: f64,
    sequence: &mut SeededSequence,
    next_enemy_id: &mut u64,
) -> Vec<Enemy> {
    if is_boss_wave(wave) {
        return Vec::new();
    }

    let pool = kind_pool(wave);
    let count = spawn_count(wave, density_bonus);
    let mut enemies = Vec::with_capacity(count);
    for _ in 0..count {
        let kind = pool[sequence.next_index(pool.len())];
        let id = *next_enemy_id;
        *next_enemy_id = next_enemy_id.wrapping_add(1);
        enemies.push(spawn_enemy(kind, id, wave, health_bonus, sequence));
    }
    enemies
}

/// Builds one enemy of `kind` at a seeded position above the arena.
pub fn spawn_enemy(
    kind: EnemyKind,
    id: u64,
    wave: u32,
    health_bonus: f64,
    sequence: &mut SeededSequence,
) -> Enemy {
    let tuning = kind.tuning();
    let hp = tuning.base_hp * health_multiplier(wave) * health_bonus;

    let x = SPAWN_MARGIN_X + sequence.next_f64() * (ARENA_WIDTH - 2.0 * SPAWN_MARGIN_X);
    let y = SPAWN_TOP_Y - sequence.next_f64() * SPAWN_DEPTH;

    let behavior = match kind {
        EnemyKind::Drone => EnemyBehavior::Drone,
        EnemyKind::Hunter => EnemyBehavior::Hunter,
        EnemyKind::Phantom => EnemyBehavior::Phantom { phased: true },
        EnemyKind::Mech => EnemyBehavior::Mech { attack_phase: 0.0 },
        EnemyKind::Angler => EnemyBehavior::Angler,
        EnemyKind::Manta => {
            let amplitude = MANTA_AMPLITUDE_BASE + sequence.next_f64() * MANTA_AMPLITUDE_SPREAD;
            let frequency = MANTA_FREQUENCY_BASE + sequence.next_f64() * MANTA_FREQUENCY_SPREAD;
            EnemyBehavior::Manta(MantaState {
                start_x: x,
                amplitude,
                frequency,
                dodge_cooldown: 0.0,
                dodging: false,
            })
        }
    };

    Enemy {
        id,
        behavior,
        x,
        y,
        radius: tuning.radius,
        speed: tuning.speed,
        hp,
        hp_max: hp,
        color: tuning.color,
        xp: tuning.xp,
        score: tuning.score,
        shards: tuning.shards,
        fire_chance: tuning.fire_chance,
        age: 0.0,
        fire_cooldown: tuning.fire_cooldown,
        stun_timer: 0.0,
        knockback: None,
    }
}
