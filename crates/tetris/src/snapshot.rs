//! Serializable view of a game session
//!
//! Everything a renderer or the headless driver needs, copied out of
//! [`GameState`](crate::GameState) without borrowing it.

use serde::Serialize;

use crate::board::U8Grid;
use crate::game_state::Phase;
use crate::pieces::Tetromino;
use crate::types::{PieceKind, Rotation, BOARD_ROWS, BOARD_WIDTH, NEXT_QUEUE_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    pub cells: [(i8, i8); 4],
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            cells: value.cells(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct TimersSnapshot {
    pub gravity_ms: u32,
    pub lock_ms: u32,
}

/// Full session view. `board` includes the hidden rows (rows 0 and 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub board: U8Grid,
    pub active: Option<ActiveSnapshot>,
    pub ghost: Option<ActiveSnapshot>,
    pub hold: Option<PieceKind>,
    pub next_queue: [PieceKind; NEXT_QUEUE_LEN],
    pub can_hold: bool,
    pub phase: Phase,
    pub paused: bool,
    pub game_over: bool,
    pub episode_id: u32,
    pub seed: u64,
    pub piece_id: u32,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub timers: TimersSnapshot,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.phase == Phase::Playing
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_ROWS as usize],
            active: None,
            ghost: None,
            hold: None,
            next_queue: [PieceKind::I; NEXT_QUEUE_LEN],
            can_hold: true,
            phase: Phase::Idle,
            paused: false,
            game_over: false,
            episode_id: 0,
            seed: 0,
            piece_id: 0,
            score: 0,
            level: 1,
            lines: 0,
            timers: TimersSnapshot::default(),
        }
    }
}
