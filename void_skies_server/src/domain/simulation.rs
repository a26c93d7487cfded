// Authoritative per-room simulation: wave lifecycle over a fixed timestep.

use crate::domain::sequence::SeededSequence;
use crate::domain::state::{Player, PlayerUpdate, SimulationState};
use crate::domain::systems::boss::tick_boss;
use crate::domain::systems::enemies::tick_enemies;
use crate::domain::systems::waves::{BossSpawner, NoBoss, generate_wave, is_boss_wave};
use crate::domain::tuning::arena::{TIME_EPSILON, WAVE_CLEAR_DELAY};
use crate::domain::tuning::boss::BossTuning;

/// Draws discarded right after seeding; replaying clients skip the same count.
pub const SEQUENCE_WARMUP_DRAWS: usize = 3;

/// What a single `advance` call changed, for logging by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Enemies that fell through the bottom band this tick.
    pub despawned: usize,
    /// The wave that began this tick, if any.
    pub wave_started: Option<u32>,
}

/// Owns the seeded sequence and the simulation state for one room.
///
/// Performs no I/O; every method is a pure state transformation.
pub struct RoomSimulation {
    sequence: SeededSequence,
    state: SimulationState,
    next_enemy_id: u64,
    boss_spawner: Box<dyn BossSpawner>,
    boss_tuning: BossTuning,
    // Game start in epoch ms plus simulated time, for wave timestamps.
    start_time: u64,
    elapsed: f64,
}

impl RoomSimulation {
    /// Seeds the room sequence from the room id and performs the warm-up draws.
    pub fn new(seed: &str) -> Self {
        Self::with_boss_spawner(seed, Box::new(NoBoss))
    }

    pub fn with_boss_spawner(seed: &str, boss_spawner: Box<dyn BossSpawner>) -> Self {
        let mut sequence = SeededSequence::from_str_seed(seed);
        let warmup: Vec<f64> = (0..SEQUENCE_WARMUP_DRAWS)
            .map(|_| sequence.next_f64())
            .collect();
        tracing::debug!(seed, ?warmup, "seeded room sequence");

        Self {
            sequence,
            state: SimulationState::default(),
            next_enemy_id: 0,
            boss_spawner,
            boss_tuning: BossTuning::default(),
            start_time: 0,
            elapsed: 0.0,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Stamps the start time and generates the first wave.
    pub fn start(&mut self, now_ms: u64) {
        self.start_time = now_ms;
        self.elapsed = 0.0;
        self.begin_wave();
    }

    pub fn add_player(&mut self, id: u64, name: impl Into<String>) {
        self.state.players.insert(id, Player::spawn(id, name));
    }

    pub fn remove_player(&mut self, id: u64) -> Option<Player> {
        self.state.players.remove(&id)
    }

    /// Applies a client update to a player; returns false for unknown ids.
    pub fn apply_player_update(&mut self, id: u64, update: PlayerUpdate) -> bool {
        match self.state.players.get_mut(&id) {
            Some(player) => {
                player.apply(update);
                true
            }
            None => false,
        }
    }

    /// Advances one fixed tick of `dt` simulated seconds.
    pub fn advance(&mut self, dt: f64) -> TickOutcome {
        self.elapsed += dt;
        let mut outcome = TickOutcome {
            despawned: tick_enemies(&mut self.state.enemies, dt),
            ..TickOutcome::default()
        };

        if let Some(boss) = self.state.boss.as_mut() {
            tick_boss(boss, dt, &self.boss_tuning);
        }

        if self.state.enemies.is_empty() && self.state.boss.is_none() {
            self.state.wave_clear_timer += dt;
            if self.state.wave_clear_timer + TIME_EPSILON >= WAVE_CLEAR_DELAY {
                self.state.wave = self.state.wave.saturating_add(1);
                self.begin_wave();
                outcome.wave_started = Some(self.state.wave);
            }
        } else {
            self.state.wave_clear_timer = 0.0;
        }

        outcome
    }

    fn begin_wave(&mut self) {
        let wave = self.state.wave;
        self.state.wave_clear_timer = 0.0;
        self.state.wave_start_time = self.start_time + (self.elapsed * 1_000.0).round() as u64;
        self.state.enemies = generate_wave(
            wave,
            self.state.enemy_density_bonus,
            self.state.enemy_health_bonus,
            &mut self.sequence,
            &mut self.next_enemy_id,
        );
        self.state.boss = if is_boss_wave(wave) {
            self.boss_spawner
                .spawn_boss(wave, self.state.enemy_health_bonus, &mut self.sequence)
        } else {
            None
        };
    }
}
