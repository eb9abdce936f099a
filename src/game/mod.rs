//! Core game logic module for Snake
//!
//! The board wraps on both axes, so the only way to lose is running into
//! your own body. Nothing here does I/O or rendering; the session and the
//! terminal front-end drive it from outside.

pub mod board;
pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use board::{Board, Cell};
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, Snapshot, TickOutcome};
pub use state::{GameState, Position, Snake};
