//! Timer-driven game session
//!
//! A session moves the engine into a single tokio task. Input arrives as
//! [`Command`]s over a channel and is interleaved with the tick timer, so
//! every engine call happens on that one task. After each change the task
//! publishes a fresh [`Snapshot`] on a watch channel for the view to draw.
//!
//! The timer lives inside the task: it stops when the task ends, which
//! happens on [`SessionHandle::shutdown`] or when the handle is dropped.

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::game::{Direction, GameEngine, Snapshot, TickOutcome};

const COMMAND_BUFFER: usize = 64;

/// Requests the input side can make of a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Turn(Direction),
    TogglePause,
}

pub struct GameSession;

impl GameSession {
    /// Move `engine` into a new task on the current tokio runtime
    pub fn spawn(engine: GameEngine) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());

        let task = tokio::spawn(run_session(engine, command_rx, snapshot_tx));

        SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            task,
        }
    }
}

/// Owning handle to a running session
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Snapshot>,
    task: JoinHandle<GameEngine>,
}

impl SessionHandle {
    pub async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .context("game session has stopped")
    }

    pub async fn start(&self) -> Result<()> {
        self.send(Command::Start).await
    }

    pub async fn set_direction(&self, direction: Direction) -> Result<()> {
        self.send(Command::Turn(direction)).await
    }

    pub async fn toggle_pause(&self) -> Result<()> {
        self.send(Command::TogglePause).await
    }

    /// A receiver that is notified whenever the game changes
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// The most recently published snapshot
    pub fn latest(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Stop the timer and hand the engine back
    pub async fn shutdown(self) -> Result<GameEngine> {
        let SessionHandle { commands, task, .. } = self;
        drop(commands);
        task.await.context("game session task failed")
    }
}

async fn run_session(
    mut engine: GameEngine,
    mut commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<Snapshot>,
) -> GameEngine {
    let period = engine.config().tick_interval();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick of an interval completes immediately
    ticker.tick().await;

    info!(?period, "session running");

    loop {
        tokio::select! {
            maybe_command = commands.recv() => {
                let Some(command) = maybe_command else {
                    break;
                };

                apply(&mut engine, command);
                if command == Command::Start {
                    // a fresh game gets a full interval before its first move
                    ticker.reset();
                }
                publish(&snapshots, &engine);
            }

            _ = ticker.tick() => {
                let outcome = engine.tick();
                if outcome.changed_state() {
                    publish(&snapshots, &engine);
                }
                if outcome == TickOutcome::Collided {
                    debug!(ticks = engine.ticks(), "snake collided");
                }
            }
        }
    }

    info!(score = engine.score(), "session stopped");
    engine
}

fn apply(engine: &mut GameEngine, command: Command) {
    match command {
        Command::Start => engine.start(),
        Command::Turn(direction) => engine.set_direction(direction),
        Command::TogglePause => engine.toggle_pause(),
    }
}

/// Publish only when the snapshot differs from the last one sent
fn publish(snapshots: &watch::Sender<Snapshot>, engine: &GameEngine) {
    let next = engine.snapshot();
    snapshots.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });
}
