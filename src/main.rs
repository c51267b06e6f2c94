//! Headless arcade runner (default binary).
//!
//! Plays a scripted session of either engine and prints the final snapshot
//! as JSON on stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use arcade::defense::DefenseConfig;
use arcade::headless;
use arcade::tetris::TetrisConfig;

#[derive(Parser)]
#[command(name = "arcade")]
#[command(about = "Run the falling-block or tower-defense engine headless")]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Play a scripted falling-block session
    Tetris {
        /// Piece queue seed
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Number of 16 ms frames to simulate
        #[arg(long, default_value_t = 3_600)]
        frames: u32,
    },
    /// Autoplay tower-defense waves with a fixed build order
    Defense {
        /// JSON file overriding the default tables
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of waves to play
        #[arg(long, default_value_t = 3)]
        waves: u32,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

fn load_defense_config(path: Option<PathBuf>) -> Result<DefenseConfig> {
    let Some(path) = path else {
        return Ok(DefenseConfig::default());
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: DefenseConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    info!(path = %path.display(), towers = config.towers.len(), "defense config loaded");
    Ok(config)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let json = match cli.mode {
        Mode::Tetris { seed, frames } => {
            let snapshot = headless::run_tetris(TetrisConfig::with_seed(seed), frames);
            serde_json::to_string_pretty(&snapshot)?
        }
        Mode::Defense { config, waves } => {
            let config = load_defense_config(config)?;
            config.validate().context("invalid defense config")?;
            let snapshot = headless::run_defense(config, waves);
            serde_json::to_string_pretty(&snapshot)?
        }
    };

    println!("{json}");
    Ok(())
}
