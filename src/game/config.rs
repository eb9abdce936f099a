use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::direction::Direction;
use super::state::Position;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square, wrapping board
    pub board_size: usize,
    /// Milliseconds between two ticks of the session timer
    pub tick_interval_ms: u64,
    /// Points awarded per food eaten
    pub score_increment: u32,
    /// Where the one-segment snake starts
    pub initial_position: Position,
    /// Heading at the start of every game
    pub initial_direction: Direction,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 20,
            tick_interval_ms: 150,
            score_increment: 10,
            initial_position: Position::new(10, 10),
            initial_direction: Direction::Right,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom board size.
    ///
    /// The start cell is moved to the board centre so it stays on the board.
    pub fn new(board_size: usize) -> Self {
        let centre = (board_size / 2) as i32;
        Self {
            board_size,
            initial_position: Position::new(centre, centre),
            ..Default::default()
        }
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check that the values describe a playable board
    pub fn validate(&self) -> Result<()> {
        ensure!(self.board_size >= 2, "board_size must be at least 2");
        ensure!(
            self.board_size <= i32::MAX as usize,
            "board_size {} is too large",
            self.board_size
        );
        ensure!(
            self.tick_interval_ms > 0,
            "tick_interval_ms must be positive"
        );
        ensure!(
            self.contains_position(self.initial_position),
            "initial_position ({}, {}) lies outside a {}x{} board",
            self.initial_position.row,
            self.initial_position.col,
            self.board_size,
            self.board_size
        );
        Ok(())
    }

    /// Load a configuration from a JSON file and validate it.
    /// Missing fields fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Whether `pos` lies on the board
    pub fn contains_position(&self, pos: Position) -> bool {
        let n = self.board_size as i32;
        (0..n).contains(&pos.row) && (0..n).contains(&pos.col)
    }
}
