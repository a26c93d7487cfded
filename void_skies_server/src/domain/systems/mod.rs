// Per-tick simulation systems and wave generation.

pub mod boss;
pub mod enemies;
pub mod waves;
