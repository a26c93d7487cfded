// Domain layer: core simulation types and rules.

pub mod sequence;
pub mod simulation;
pub mod state;
pub mod systems;
pub mod tuning;

pub use sequence::SeededSequence;
pub use simulation::{RoomSimulation, TickOutcome};
pub use state::{Boss, Enemy, EnemyBehavior, Player, PlayerUpdate, SimulationState};
