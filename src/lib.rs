//! tile_snake - A terminal snake game built around a level-driven tile board
//!
//! This library provides:
//! - The playfield engine: tile grid, level loading, border policy (board module)
//! - Snake movement and per-tick game logic (game module)
//! - TUI rendering (render module)
//! - Keyboard input handling (input module)
//! - Interactive play mode (modes module)

pub mod board;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
