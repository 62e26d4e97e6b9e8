//! Simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Seeded RNG only (injected, never global)
//! - Fixed physics step for ball movement
//! - No rendering or platform dependencies

pub mod arena;
pub mod ball;
pub mod cards;
pub mod collision;
pub mod score;
pub mod serve;
pub mod state;
pub mod tick;

pub use arena::{Arena, Contact};
pub use ball::BallSimulator;
pub use cards::{Card, CardEffects, CardKind, CardPickup, PlayerHand};
pub use collision::{aim_velocity, hit_factor, reflect_velocity};
pub use score::MatchState;
pub use serve::ServeScheduler;
pub use state::{BallState, GameEvent, GoalOutcome, MatchPhase, ServeDirection, Side};
pub use tick::{Game, TickInput};
