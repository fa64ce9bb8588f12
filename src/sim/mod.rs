//! Deterministic fixed-timestep simulation
//!
//! One call to [`tick::tick`] advances the world by a single 60 Hz step.
//! All randomness flows through the RNG stored in [`state::GameState`], so
//! a seed plus an input trace replays a run exactly.

pub mod aabb;
pub mod collision;
pub mod enemy;
pub mod level;
pub mod player;
pub mod projectile;
pub mod state;
pub mod tick;

pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};

/// Simulation rate in ticks per second.
pub const TICK_RATE: u32 = 60;
