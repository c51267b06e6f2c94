//! Falling-block puzzle rules - pure, deterministic, and testable
//!
//! No rendering, input handling or I/O lives here. A session is driven by
//! calling [`GameState::apply_action`] for player intents and
//! [`GameState::update`] with elapsed milliseconds.
//!
//! # Module Structure
//!
//! - [`board`]: 10x22 grid (2 hidden rows) with collision and line clearing
//! - [`pieces`]: tetromino shapes and SRS rotation with wall kicks
//! - [`rng`]: seeded 7-bag piece queue
//! - [`scoring`]: line clear, drop and gravity curves
//! - [`game_state`]: session lifecycle, gravity, lock delay, hold
//! - [`snapshot`]: serializable view for renderers and tooling
//!
//! # Example
//!
//! ```
//! use arcade_tetris::GameState;
//! use arcade_tetris::types::GameAction;
//!
//! let mut game = GameState::with_seed(12345);
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! // Hard drop awards points
//! assert!(game.score() > 0);
//! ```

pub mod board;
pub mod config;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use arcade_types as types;

pub use board::{Board, LockResult, U8Grid};
pub use config::TetrisConfig;
pub use game_state::{GameState, LockEvent, Phase};
pub use pieces::{get_shape, try_rotate, Tetromino};
pub use rng::PieceQueue;
pub use scoring::{calculate_drop_score, calculate_line_score, get_drop_interval_ms};
pub use snapshot::{ActiveSnapshot, GameSnapshot, TimersSnapshot};
