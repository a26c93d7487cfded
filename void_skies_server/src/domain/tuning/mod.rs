// Gameplay tuning tables. Runtime/server settings live in `frameworks::config`.

pub mod arena;
pub mod boss;
pub mod enemy;
