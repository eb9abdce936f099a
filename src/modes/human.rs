use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use crate::game::{GameEngine, Snapshot};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::session::{Command, GameSession, SessionHandle};

pub struct HumanMode {
    engine: Option<GameEngine>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            engine: Some(engine),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let engine = self
            .engine
            .take()
            .context("Human mode has already been run")?;

        // Setup terminal; anything failing after raw mode is on rolls it back
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut terminal = setup_or_restore(setup_terminal, restore_terminal)?;

        let session = GameSession::spawn(engine);

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal, &session).await;

        let stopped = session.shutdown().await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        let engine = stopped?;
        info!(
            games = self.metrics.games_played,
            best = self.metrics.best_score,
            last_score = engine.score(),
            "leaving"
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
        session: &SessionHandle,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut snapshots = session.subscribe();
        let mut snapshot = snapshots.borrow_and_update().clone();

        // Redraw at least once a second so the clock moves
        let mut clock_timer = interval(Duration::from_secs(1));

        loop {
            self.metrics.update(is_running(&snapshot));
            terminal
                .draw(|frame| {
                    self.renderer.render(frame, &snapshot, &self.metrics);
                })
                .context("Failed to draw frame")?;

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event, session).await?,
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game state changed
                changed = snapshots.changed() => {
                    changed.context("Game session stopped unexpectedly")?;
                    let next = snapshots.borrow_and_update().clone();
                    self.observe(&snapshot, &next);
                    snapshot = next;
                }

                _ = clock_timer.tick() => {}

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    async fn handle_event(&mut self, event: Event, session: &SessionHandle) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Game(command) => {
                    if command == Command::Start {
                        self.metrics.on_game_start();
                    }
                    session.send(command).await?;
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    /// Track game over transitions for the session statistics
    fn observe(&mut self, previous: &Snapshot, next: &Snapshot) {
        if next.is_game_over && !previous.is_game_over {
            self.metrics.on_game_over(next.score);
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stderr>>> {
    let mut stderr = stderr();
    execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(terminal)
}

/// Best-effort undo of [`setup_terminal`] after a partial failure
fn restore_terminal() {
    let _ = execute!(stderr(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Run `setup`, calling `restore` before passing on its error
fn setup_or_restore<T>(
    setup: impl FnOnce() -> Result<T>,
    restore: impl FnOnce(),
) -> Result<T> {
    setup().inspect_err(|_| restore())
}

fn is_running(snapshot: &Snapshot) -> bool {
    snapshot.is_started && !snapshot.is_paused && !snapshot.is_game_over
}
