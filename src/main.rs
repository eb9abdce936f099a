use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use torus_snake::game::{GameConfig, GameEngine, Position};
use torus_snake::logging;
use torus_snake::modes::HumanMode;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Snake on a board that wraps around every edge")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of the square board
    #[arg(long)]
    board_size: Option<usize>,

    /// Milliseconds between snake moves
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(size) = cli.board_size {
        config.board_size = size;
        if !config.contains_position(config.initial_position) {
            let centre = (size / 2) as i32;
            warn!(size, "start cell is off the resized board, using the centre");
            config.initial_position = Position::new(centre, centre);
        }
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_interval_ms = tick_ms;
    }

    config.validate().context("Invalid game settings")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_file.as_deref())?;

    let config = build_config(&cli)?;
    info!(?config, seed = ?cli.seed, "starting");

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(engine);
            human_mode.run().await?;
        }
    }

    Ok(())
}
