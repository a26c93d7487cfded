use crate::domain::state::{Enemy, EnemyBehavior};
use crate::domain::tuning::arena::{ARENA_HEIGHT, DESPAWN_MARGIN};

/// Integrates one enemy: age, fall, and kind-specific motion.
pub fn tick_enemy(enemy: &mut Enemy, dt: f64) {
    enemy.age += dt;
    enemy.y += enemy.speed * dt;

    if let EnemyBehavior::Manta(manta) = &enemy.behavior {
        enemy.x = manta.start_x + (enemy.age * manta.frequency).sin() * manta.amplitude;
    }
}

/// Advances every enemy, then drops those that fell past the bottom band.
///
/// Falling through is a despawn, not a kill: nothing is awarded. Returns the
/// number of enemies removed.
pub fn tick_enemies(enemies: &mut Vec<Enemy>, dt: f64) -> usize {
    for enemy in enemies.iter_mut() {
        tick_enemy(enemy, dt);
    }

    let before = enemies.len();
    enemies.retain(|e| !has_fallen_through(e));
    before - enemies.len()
}

pub fn has_fallen_through(enemy: &Enemy) -> bool {
    enemy.y > ARENA_HEIGHT + DESPAWN_MARGIN
}
