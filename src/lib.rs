//! Torus Snake - a Snake game on a board that wraps at every edge
//!
//! This library provides:
//! - Core game logic (game module)
//! - A timer-driven session that owns the engine (session module)
//! - Terminal input, rendering, and play statistics
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod session;
