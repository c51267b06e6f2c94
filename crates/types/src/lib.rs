//! Shared types and constants for both rules engines
//!
//! This crate defines the vocabulary used by the falling-block core
//! (`arcade-tetris`), the tower-defense core (`arcade-defense`) and the
//! headless driver. All types are plain data with no behaviour beyond
//! parsing and small helpers, so they can cross any boundary.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Visible height**: 20 rows
//! - **Hidden rows**: 2 overflow rows above the visible area
//! - **Total rows**: 22 (indexed 0-21, rows 0-1 hidden)
//! - **Spawn origin**: (3, 0), i.e. inside the hidden rows
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MAX_TICK_MS` | 100 | Largest delta a single update may simulate |
//! | `SOFT_DROP_MULTIPLIER` | 10 | Held soft drop is 10x faster |
//! | `SOFT_DROP_MIN_INTERVAL_MS` | 16 | Floor for the soft-drop interval |
//! | `LOCK_DELAY_MS` | 450 | Grounded time before a piece locks |
//! | `LOCK_RESET_LIMIT` | 15 | Max lock timer resets per piece |
//!
//! # Drop Intervals by Level
//!
//! Levels start at 1. Gravity increases with level (milliseconds per row):
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 1000ms |
//! | 2 | 800ms |
//! | 3 | 650ms |
//! | 4 | 500ms |
//! | 5 | 400ms |
//! | 6 | 320ms |
//! | 7 | 250ms |
//! | 8 | 200ms |
//! | 9 | 160ms |
//! | 10+ | 10ms faster per level, 100ms minimum |
//!
//! # Examples
//!
//! ```
//! use arcade_types::{PieceKind, Rotation, GameAction, TowerKind, BOARD_WIDTH, BOARD_ROWS};
//!
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(parsed, PieceKind::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
//! assert_eq!(TowerKind::from_str("cannon"), Some(TowerKind::Cannon));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_ROWS, 22);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Visible rows of the playfield
pub const VISIBLE_ROWS: u8 = 20;

/// Overflow rows above the visible playfield
pub const HIDDEN_ROWS: u8 = 2;

/// Total rows stored by the board (hidden + visible)
pub const BOARD_ROWS: u8 = VISIBLE_ROWS + HIDDEN_ROWS;

/// Spawn origin for new pieces (column, row)
pub const SPAWN_POSITION: (i8, i8) = (3, 0);

/// Number of upcoming pieces exposed in the preview
pub const NEXT_QUEUE_LEN: usize = 5;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Largest elapsed time a single update may simulate
pub const MAX_TICK_MS: u32 = 100;

/// Held soft drop speed multiplier
pub const SOFT_DROP_MULTIPLIER: u32 = 10;

/// Floor for the held soft-drop gravity interval
pub const SOFT_DROP_MIN_INTERVAL_MS: u32 = 16;

/// Lock delay when piece is grounded (450ms)
pub const LOCK_DELAY_MS: u32 = 450;

/// Maximum number of lock timer resets per piece (15)
pub const LOCK_RESET_LIMIT: u8 = 15;

/// Drop intervals by level (milliseconds per row)
///
/// Index 0 = Level 1, Index 8 = Level 9
pub const DROP_INTERVALS: [u32; 9] = [1000, 800, 650, 500, 400, 320, 250, 200, 160];

/// Interval reduction per level past the end of `DROP_INTERVALS`
pub const DROP_INTERVAL_STEP_MS: u32 = 10;

/// Absolute minimum drop interval (100ms)
pub const DROP_INTERVAL_MIN_MS: u32 = 100;

/// Points per row for a soft drop step
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per row for a hard drop
pub const HARD_DROP_POINTS: u32 = 2;

/// Line clear scoring table
///
/// Base points for clearing N lines in one lock, multiplied by the level
/// active at the moment of the clear:
/// - 1 line: 100
/// - 2 lines: 300
/// - 3 lines: 500
/// - 4 lines: 800
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];


/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Every kind, in canonical order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use arcade_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Non-zero cell code used by the `u8` board grid in snapshots (0 = empty)
    pub fn cell_code(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// - **North**: Spawn orientation (state 0)
/// - **East**: Rotated 90° clockwise (state 1)
/// - **South**: Rotated 180° (state 2)
/// - **West**: Rotated 90° counter-clockwise (state 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use arcade_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Rotate counter-clockwise (-90° or 270°)
    ///
    /// # Examples
    ///
    /// ```
    /// use arcade_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Rotation state number in `0..4`
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Rotation for a state number, taken modulo 4
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index % 4) as usize]
    }

    /// Parse rotation from string
    ///
    /// Accepts full names or single letters (case-insensitive):
    /// "north" | "n", "east" | "e", "south" | "s", "west" | "w"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" | "n" => Some(Rotation::North),
            "east" | "e" => Some(Rotation::East),
            "south" | "s" => Some(Rotation::South),
            "west" | "w" => Some(Rotation::West),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Discrete commands accepted by the falling-block core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down (with soft drop scoring)
    SoftDrop,
    /// Instantly drop piece to lowest valid position and lock it
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Hold current piece (once per piece)
    Hold,
    /// Toggle pause state
    Pause,
    /// Start a session from idle (no-op once started)
    Start,
    /// Fully reset and start a new session
    Restart,
}

impl GameAction {
    /// Parse action from its camelCase (or any-case) name
    ///
    /// # Examples
    ///
    /// ```
    /// use arcade_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("rotateCw"), Some(GameAction::RotateCw));
    /// assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "hold" => Some(GameAction::Hold),
            "pause" => Some(GameAction::Pause),
            "start" => Some(GameAction::Start),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Hold => "hold",
            GameAction::Pause => "pause",
            GameAction::Start => "start",
            GameAction::Restart => "restart",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a locked piece of that kind
pub type Cell = Option<PieceKind>;

/// Tower archetypes available to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TowerKind {
    /// Balanced range and fire rate
    Scout,
    /// Short range, rapid shots
    Burst,
    /// Long range, slow heavy shots
    Cannon,
}

impl TowerKind {
    pub const ALL: [TowerKind; 3] = [TowerKind::Scout, TowerKind::Burst, TowerKind::Cannon];

    /// Parse tower kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "scout" => Some(TowerKind::Scout),
            "burst" => Some(TowerKind::Burst),
            "cannon" => Some(TowerKind::Cannon),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TowerKind::Scout => "scout",
            TowerKind::Burst => "burst",
            TowerKind::Cannon => "cannon",
        }
    }
}

/// Enemy archetypes produced by wave plans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Grunt,
    Runner,
    Tank,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Grunt, EnemyKind::Runner, EnemyKind::Tank];

    /// Parse enemy kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "grunt" => Some(EnemyKind::Grunt),
            "runner" => Some(EnemyKind::Runner),
            "tank" => Some(EnemyKind::Tank),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Grunt => "grunt",
            EnemyKind::Runner => "runner",
            EnemyKind::Tank => "tank",
        }
    }
}

/// Build grid cell addressed by column and row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub column: i32,
    pub row: i32,
}

impl GridCell {
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }
}
