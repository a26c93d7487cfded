use crate::domain::state::Boss;
use crate::domain::systems::waves::health_multiplier;
use crate::domain::tuning::arena::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::domain::tuning::boss::BossTuning;

/// A boss centred above the arena, with hp scaled like regular enemies.
pub fn spawn_boss(wave: u32, health_bonus: f64, tuning: &BossTuning) -> Boss {
    let hp = tuning.base_hp * health_multiplier(wave) * health_bonus;
    Boss {
        x: ARENA_WIDTH / 2.0,
        y: tuning.spawn_y,
        radius: tuning.radius,
        hp,
        hp_max: hp,
        age: 0.0,
    }
}

/// Descends to the hover line, then sways horizontally inside the edges.
pub fn tick_boss(boss: &mut Boss, dt: f64, tuning: &BossTuning) {
    boss.age += dt;
    if boss.y < tuning.hover_y {
        boss.y += tuning.descend_speed * dt;
    }

    boss.x = (boss.x + (boss.age * tuning.sway_frequency).sin() * tuning.sway_speed * dt)
        .clamp(tuning.edge_margin, ARENA_WIDTH - tuning.edge_margin);
    boss.y = boss
        .y
        .clamp(tuning.min_y, ARENA_HEIGHT * tuning.max_y_fraction);
}
