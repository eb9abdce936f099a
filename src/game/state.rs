use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A cell on the game board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Move one cell in a direction on a square board of side `size`,
    /// re-entering from the opposite edge when leaving the board.
    pub fn wrapped_step(&self, direction: Direction, size: usize) -> Self {
        let n = size as i32;
        let (d_row, d_col) = direction.delta();
        Self {
            row: (self.row + d_row).rem_euclid(n),
            col: (self.col + d_col).rem_euclid(n),
        }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: Vec<Position>,
}

impl Snake {
    /// Create a one-segment snake
    pub fn new(head: Position) -> Self {
        Self { body: vec![head] }
    }

    /// Create a snake from explicit segments, head first.
    /// Returns `None` for an empty segment list.
    pub fn from_segments(segments: Vec<Position>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { body: segments })
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn segments(&self) -> &[Position] {
        &self.body
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Would moving the head onto `pos` hit the body?
    ///
    /// The tail cell only counts when the snake grows this tick, since
    /// otherwise it is vacated by the same move.
    pub fn would_collide(&self, pos: Position, growing: bool) -> bool {
        let window = if growing {
            &self.body[..]
        } else {
            &self.body[..self.body.len() - 1]
        };
        window.contains(&pos)
    }

    /// Push a new head, keeping the tail when `grow` is true
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least one segment
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub snake: Snake,
    /// Direction of the last move (or the starting heading)
    pub direction: Direction,
    /// Direction the next tick will take
    pub pending_direction: Direction,
    pub food: Position,
    pub score: u32,
    pub is_game_over: bool,
    pub is_paused: bool,
    /// Ticks that moved the snake since the last start
    pub ticks: u64,
}

impl GameState {
    /// Create a running game state
    pub fn new(snake: Snake, direction: Direction, food: Position) -> Self {
        Self {
            snake,
            direction,
            pending_direction: direction,
            food,
            score: 0,
            is_game_over: false,
            is_paused: false,
            ticks: 0,
        }
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }
}
