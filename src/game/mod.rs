//! Snake movement and per-tick game logic
//!
//! Everything in here interprets board tiles (deadly, edible, free);
//! the board module itself stays agnostic about game rules.

pub mod action;
pub mod engine;
pub mod snake;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use engine::{CollisionType, GameEngine, GameState, StepResult};
pub use snake::Snake;
