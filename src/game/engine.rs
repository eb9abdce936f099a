use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::{
    board::Board,
    config::GameConfig,
    direction::Direction,
    state::{GameState, Position, Snake},
};

/// What a call to [`GameEngine::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused or over; nothing changed
    Idle,
    /// The snake moved one cell
    Moved,
    /// The snake moved onto the food and grew
    Ate,
    /// The snake ran into itself; the game is over
    Collided,
}

impl TickOutcome {
    /// Whether observers should redraw
    pub fn changed_state(self) -> bool {
        !matches!(self, TickOutcome::Idle)
    }
}

/// Immutable view of the game handed to observers after every change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub score: u32,
    pub is_game_over: bool,
    pub is_paused: bool,
    pub is_started: bool,
    pub direction: Direction,
    pub head: Position,
    pub snake_len: usize,
    pub ticks: u64,
}

/// The game engine that owns the game state and handles all game logic.
///
/// Every operation is total: input that does not apply in the current state
/// (reversing, steering while paused, ticking a finished game) is ignored.
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    board: Board,
    started: bool,
    rng: StdRng,
}

impl GameEngine {
    /// Create an engine waiting for [`start`](Self::start), seeded from the OS
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine with a reproducible food sequence
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let mut engine = Self::from_state_with_rng(config.clone(), initial_state(&config), rng);
        engine.state.food = engine.spawn_food_avoid_snake();
        engine.state.is_paused = true;
        engine.started = false;
        engine.refresh_board();
        engine
    }

    /// Wrap an existing, already running game state
    pub fn from_state(config: GameConfig, state: GameState, seed: u64) -> Self {
        Self::from_state_with_rng(config, state, StdRng::seed_from_u64(seed))
    }

    fn from_state_with_rng(config: GameConfig, state: GameState, rng: StdRng) -> Self {
        let board = Board::derive(config.board_size, &state.snake, state.food);
        Self {
            config,
            state,
            board,
            started: true,
            rng,
        }
    }

    /// Reset everything and begin a new, unpaused game
    pub fn start(&mut self) {
        self.state = initial_state(&self.config);
        self.state.food = self.spawn_food_avoid_snake();
        self.started = true;
        self.refresh_board();

        info!(
            head = ?self.state.snake.head(),
            food = ?self.state.food,
            "game started"
        );
    }

    /// Queue a turn for the next tick.
    ///
    /// Ignored while paused or over, and when `requested` reverses the
    /// direction the snake last moved in.
    pub fn set_direction(&mut self, requested: Direction) {
        if self.state.is_paused || self.state.is_game_over {
            return;
        }

        if self.state.direction.is_opposite(requested) {
            debug!(?requested, current = ?self.state.direction, "ignoring reversal");
            return;
        }

        self.state.pending_direction = requested;
    }

    /// Flip the pause flag; a finished game stays as it is.
    ///
    /// Resuming before the first [`start`](Self::start) plays on from the
    /// waiting layout.
    pub fn toggle_pause(&mut self) {
        if self.state.is_game_over {
            return;
        }

        self.state.is_paused = !self.state.is_paused;
        if !self.state.is_paused {
            self.started = true;
        }
        info!(paused = self.state.is_paused, "pause toggled");
    }

    /// Advance the game by one cell
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.is_paused || self.state.is_game_over {
            return TickOutcome::Idle;
        }

        let direction = self.state.pending_direction;
        let new_head = self
            .state
            .snake
            .head()
            .wrapped_step(direction, self.config.board_size);

        // Growth keeps the tail in place, so it has to be known before the
        // collision window is chosen
        let ate_food = new_head == self.state.food;

        if self.state.snake.would_collide(new_head, ate_food) {
            self.state.is_game_over = true;
            info!(
                score = self.state.score,
                length = self.state.snake.len(),
                at = ?new_head,
                "game over"
            );
            return TickOutcome::Collided;
        }

        self.state.direction = direction;
        self.state.snake.advance(new_head, ate_food);
        self.state.ticks += 1;

        let outcome = if ate_food {
            self.state.score = self.state.score.saturating_add(self.config.score_increment);
            self.state.food = self.spawn_food_avoid_snake();
            debug!(
                score = self.state.score,
                length = self.state.snake.len(),
                food = ?self.state.food,
                "food eaten"
            );
            TickOutcome::Ate
        } else {
            TickOutcome::Moved
        };

        self.refresh_board();
        outcome
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused
    }

    /// False until the first [`start`](Self::start)
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Direction the snake last moved in
    pub fn current_direction(&self) -> Direction {
        self.state.direction
    }

    /// Direction the next tick will take
    pub fn pending_direction(&self) -> Direction {
        self.state.pending_direction
    }

    pub fn snake(&self) -> &Snake {
        &self.state.snake
    }

    pub fn food(&self) -> Position {
        self.state.food
    }

    pub fn ticks(&self) -> u64 {
        self.state.ticks
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            score: self.state.score,
            is_game_over: self.state.is_game_over,
            is_paused: self.state.is_paused,
            is_started: self.started,
            direction: self.state.pending_direction,
            head: self.state.snake.head(),
            snake_len: self.state.snake.len(),
            ticks: self.state.ticks,
        }
    }

    fn refresh_board(&mut self) {
        self.board = Board::derive(self.config.board_size, &self.state.snake, self.state.food);
    }

    /// Spawn food at a random empty position.
    ///
    /// Rejection sampling; never returns if the snake fills the board.
    fn spawn_food_avoid_snake(&mut self) -> Position {
        let n = self.config.board_size as i32;
        loop {
            let pos = Position::new(self.rng.gen_range(0..n), self.rng.gen_range(0..n));

            if !self.state.is_occupied_by_snake(pos) {
                return pos;
            }
        }
    }
}

fn initial_state(config: &GameConfig) -> GameState {
    GameState::new(
        Snake::new(config.initial_position),
        config.initial_direction,
        // replaced by a sampled cell before anyone can observe it
        config.initial_position,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;

    fn engine_with(segments: Vec<Position>, direction: Direction, food: Position) -> GameEngine {
        let snake = Snake::from_segments(segments).unwrap();
        GameEngine::from_state(
            GameConfig::default(),
            GameState::new(snake, direction, food),
            7,
        )
    }

    #[test]
    fn test_new_engine_waits_for_start() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);

        assert!(!engine.is_started());
        assert!(engine.is_paused());
        assert_eq!(engine.snake().head(), Position::new(10, 10));
        assert!(!engine.snake().contains(engine.food()));
    }

    #[test]
    fn test_resume_before_start_plays_waiting_layout() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        let food = engine.food();

        engine.toggle_pause();

        assert!(!engine.is_paused());
        assert!(engine.is_started());
        assert_ne!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.snake().head(), Position::new(10, 11));
        if engine.snake().len() == 1 {
            assert_eq!(engine.food(), food);
        }
    }

    #[test]
    fn test_start() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        engine.start();

        assert!(engine.is_started());
        assert!(!engine.is_paused());
        assert!(!engine.is_game_over());
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.snake().segments(), &[Position::new(10, 10)]);
        assert_eq!(engine.current_direction(), Direction::Right);
        assert_ne!(engine.food(), Position::new(10, 10));
        assert_eq!(engine.board().at(engine.food()), Cell::Food);
    }

    #[test]
    fn test_scenario_plain_move() {
        let mut engine = engine_with(vec![Position::new(10, 10)], Direction::Right, Position::new(5, 5));

        assert_eq!(engine.tick(), TickOutcome::Moved);

        assert_eq!(engine.snake().segments(), &[Position::new(10, 11)]);
        assert_eq!(engine.board().get(10, 11), Cell::Snake);
        assert_eq!(engine.board().get(10, 10), Cell::Empty);
        assert_eq!(engine.board().get(5, 5), Cell::Food);
        assert_eq!(engine.score(), 0);
        assert!(!engine.is_game_over());
    }

    #[test]
    fn test_scenario_wrap_up() {
        let mut engine = engine_with(vec![Position::new(0, 0)], Direction::Up, Position::new(5, 5));

        engine.tick();

        assert_eq!(engine.snake().head(), Position::new(19, 0));
        assert!(!engine.is_game_over());
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine_with(
            vec![Position::new(10, 10), Position::new(10, 9)],
            Direction::Right,
            Position::new(10, 11),
        );

        assert_eq!(engine.tick(), TickOutcome::Ate);

        assert_eq!(engine.score(), 10);
        assert_eq!(
            engine.snake().segments(),
            &[Position::new(10, 11), Position::new(10, 10), Position::new(10, 9)]
        );
        assert!(!engine.snake().contains(engine.food()));
        assert_eq!(engine.board().count(Cell::Snake), 3);
        assert_eq!(engine.board().count(Cell::Food), 1);
    }

    #[test]
    fn test_following_vacating_tail_is_legal() {
        // head (5,5) moving right onto the tail at (5,6)
        let mut engine = engine_with(
            vec![Position::new(5, 5), Position::new(5, 6)],
            Direction::Right,
            Position::new(0, 0),
        );

        assert_eq!(engine.tick(), TickOutcome::Moved);

        assert!(!engine.is_game_over());
        assert_eq!(
            engine.snake().segments(),
            &[Position::new(5, 6), Position::new(5, 5)]
        );
    }

    #[test]
    fn test_tail_with_food_is_a_collision() {
        // Growth keeps the tail, so moving onto it ends the game
        let mut engine = engine_with(
            vec![Position::new(10, 10), Position::new(10, 9)],
            Direction::Left,
            Position::new(10, 9),
        );

        assert_eq!(engine.tick(), TickOutcome::Collided);

        assert!(engine.is_game_over());
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.snake().len(), 2);
    }

    #[test]
    fn test_self_collision() {
        // A U-shaped snake whose head turns back into its body
        let mut engine = engine_with(
            vec![
                Position::new(5, 5),
                Position::new(5, 4),
                Position::new(4, 4),
                Position::new(4, 5),
                Position::new(4, 6),
            ],
            Direction::Right,
            Position::new(0, 0),
        );
        engine.set_direction(Direction::Up);

        assert_eq!(engine.tick(), TickOutcome::Collided);
        assert!(engine.is_game_over());

        let before = engine.state().clone();
        assert_eq!(engine.tick(), TickOutcome::Idle);
        engine.set_direction(Direction::Down);
        engine.toggle_pause();
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 3);
        engine.start();

        engine.set_direction(Direction::Left);

        assert_eq!(engine.current_direction(), Direction::Right);
        assert_eq!(engine.pending_direction(), Direction::Right);
    }

    #[test]
    fn test_quick_double_turn_cannot_reverse() {
        let mut engine = engine_with(vec![Position::new(10, 10)], Direction::Right, Position::new(0, 0));

        // Up is accepted, but Left is still checked against the last move
        engine.set_direction(Direction::Up);
        engine.set_direction(Direction::Left);
        assert_eq!(engine.pending_direction(), Direction::Up);

        engine.tick();
        assert_eq!(engine.snake().head(), Position::new(9, 10));
        assert_eq!(engine.current_direction(), Direction::Up);
    }

    #[test]
    fn test_direction_ignored_while_paused() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 3);
        engine.start();
        engine.toggle_pause();

        engine.set_direction(Direction::Down);
        assert_eq!(engine.pending_direction(), Direction::Right);
        assert_eq!(engine.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_toggle_pause_twice_restores() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 3);
        engine.start();

        engine.toggle_pause();
        assert!(engine.is_paused());
        engine.toggle_pause();
        assert!(!engine.is_paused());
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut engine = engine_with(
            vec![Position::new(10, 10), Position::new(10, 9)],
            Direction::Left,
            Position::new(10, 9),
        );
        engine.tick();
        assert!(engine.is_game_over());

        engine.start();

        assert!(!engine.is_game_over());
        assert!(!engine.is_paused());
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.snake().len(), 1);
        assert_eq!(engine.ticks(), 0);
    }

    #[test]
    fn test_seed_reproduces_food() {
        let mut a = GameEngine::with_seed(GameConfig::default(), 42);
        let mut b = GameEngine::with_seed(GameConfig::default(), 42);
        a.start();
        b.start();

        assert_eq!(a.food(), b.food());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut engine = engine_with(vec![Position::new(3, 3)], Direction::Down, Position::new(4, 3));
        engine.tick();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.score, 10);
        assert_eq!(snapshot.snake_len, 2);
        assert_eq!(snapshot.head, Position::new(4, 3));
        assert_eq!(snapshot.ticks, 1);
        assert_eq!(&snapshot.board, engine.board());
        assert!(snapshot.is_started);
    }
}
