//! Game state module - manages the complete game state
//!
//! This module ties together all core components: board, pieces, RNG, and scoring.
//! It handles gravity and lock-delay timing, piece movement, rotation, hold,
//! line clears, and the session lifecycle:
//!
//! ```text
//! Idle --start--> Playing <--pause--> Paused
//!                    |
//!                    +--top out--> GameOver --restart--> Playing
//! ```

use tracing::{debug, info};

use crate::board::LockResult;
use crate::pieces::{try_rotate, Tetromino};
use crate::scoring::{
    calculate_drop_score, calculate_line_score, get_drop_interval_ms, level_for_lines,
};
use crate::snapshot::{ActiveSnapshot, GameSnapshot, TimersSnapshot};
use crate::types::*;
use crate::{Board, PieceQueue, TetrisConfig};

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Phase {
    Idle,
    Playing,
    Paused,
    GameOver,
}

/// Summary of the most recent lock, consumed by observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct LockEvent {
    pub lines_cleared: u32,
    /// Line clear points (already multiplied by the level)
    pub line_clear_score: u32,
    /// The lock ended the session
    pub topped_out: bool,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: TetrisConfig,
    board: Board,
    active: Option<Tetromino>,
    hold: Option<PieceKind>,
    can_hold: bool,
    next_queue: [PieceKind; NEXT_QUEUE_LEN],
    piece_queue: PieceQueue,
    phase: Phase,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Monotonic id for spawned pieces, including hold swaps.
    piece_id: u32,
    last_event: Option<LockEvent>,
    score: u32,
    level: u32,
    lines: u32,
    gravity_timer_ms: u32,
    lock_timer_ms: u32,
    lock_reset_count: u8,
    /// Deepest row the active piece has reached; only a new low re-arms
    /// the lock countdown and its reset budget.
    lowest_y: i8,
    soft_drop_held: bool,
}

impl GameState {
    /// Create a new idle game with the given configuration
    pub fn new(config: TetrisConfig) -> Self {
        let mut piece_queue = PieceQueue::new(config.seed);
        let next_queue = piece_queue.peek_array();

        Self {
            config,
            board: Board::new(),
            active: None,
            hold: None,
            can_hold: true,
            next_queue,
            piece_queue,
            phase: Phase::Idle,
            episode_id: 0,
            piece_id: 0,
            last_event: None,
            score: 0,
            level: 1,
            lines: 0,
            gravity_timer_ms: 0,
            lock_timer_ms: 0,
            lock_reset_count: 0,
            lowest_y: SPAWN_POSITION.1,
            soft_drop_held: false,
        }
    }

    /// Create a new idle game with default timing and the given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::new(TetrisConfig::with_seed(seed))
    }

    /// Start the game and spawn the first piece
    ///
    /// From `GameOver` this behaves like [`GameState::restart`]; while
    /// playing or paused it does nothing.
    pub fn start(&mut self) -> bool {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Playing;
                info!(seed = self.config.seed, episode = self.episode_id, "session started");
                self.spawn_next();
                true
            }
            Phase::GameOver => self.restart(),
            Phase::Playing | Phase::Paused => false,
        }
    }

    /// Fully reset every entity and counter, then start playing
    pub fn restart(&mut self) -> bool {
        let next_episode = self.episode_id.wrapping_add(1);
        *self = Self::new(self.config);
        self.episode_id = next_episode;
        self.start()
    }

    /// Toggle between `Playing` and `Paused`; ignored in other phases
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Playing => {
                self.phase = Phase::Paused;
                self.soft_drop_held = false;
                true
            }
            Phase::Paused => {
                self.phase = Phase::Playing;
                true
            }
            Phase::Idle | Phase::GameOver => false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn started(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    fn playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn next_queue(&self) -> &[PieceKind; NEXT_QUEUE_LEN] {
        &self.next_queue
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &TetrisConfig {
        &self.config
    }

    pub fn lock_timer_ms(&self) -> u32 {
        self.lock_timer_ms
    }

    pub fn soft_drop_held(&self) -> bool {
        self.soft_drop_held
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);

        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost = self.ghost().map(ActiveSnapshot::from);
        out.hold = self.hold;
        out.next_queue = self.next_queue;
        out.can_hold = self.can_hold;
        out.phase = self.phase;
        out.paused = self.paused();
        out.game_over = self.game_over();
        out.episode_id = self.episode_id;
        out.seed = self.piece_queue.seed();
        out.piece_id = self.piece_id;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.timers = TimersSnapshot {
            gravity_ms: self.gravity_timer_ms,
            lock_ms: self.lock_timer_ms,
        };
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Draw the next kind from the queue and spawn it
    fn spawn_next(&mut self) -> bool {
        let kind = self.piece_queue.draw();
        self.next_queue = self.piece_queue.peek_array();
        self.spawn_piece(kind)
    }

    /// Put a fresh `kind` piece at the spawn origin.
    ///
    /// Ends the session if the spawn cells are already taken.
    fn spawn_piece(&mut self, kind: PieceKind) -> bool {
        let piece = Tetromino::new(kind);

        self.gravity_timer_ms = 0;
        self.lock_timer_ms = 0;
        self.lock_reset_count = 0;
        self.lowest_y = piece.y;

        if !self.board.fits(&piece) {
            self.end_game();
            return false;
        }

        self.active = Some(piece);
        self.piece_id = self.piece_id.wrapping_add(1);
        true
    }

    fn end_game(&mut self) {
        self.phase = Phase::GameOver;
        self.active = None;
        self.soft_drop_held = false;
        info!(
            score = self.score,
            lines = self.lines,
            level = self.level,
            episode = self.episode_id,
            "game over"
        );
    }

    /// Current gravity interval based on level and held soft drop
    pub fn drop_interval_ms(&self) -> u32 {
        let base = get_drop_interval_ms(self.level);
        if self.soft_drop_held {
            (base / self.config.soft_drop_multiplier.max(1)).max(SOFT_DROP_MIN_INTERVAL_MS)
        } else {
            base
        }
    }

    /// Try to move the active piece
    pub(crate) fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if !self.playing() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        if !self.board.is_valid_placement(&active, active.rotation, dx, dy) {
            return false;
        }

        self.active = Some(active.shifted(dx, dy));

        // Lateral moves restart a running lock countdown; downward steps don't.
        if dx != 0 {
            self.reset_lock_timer();
        }

        true
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(1, 0)
    }

    /// Move down one row, scoring one soft-drop point
    pub fn soft_drop(&mut self) -> bool {
        let moved = self.try_move(0, 1);
        if moved {
            self.score += calculate_drop_score(1, false);
        }
        moved
    }

    /// Mark soft drop as held (faster gravity, soft-drop points per step)
    pub fn set_soft_drop(&mut self, held: bool) {
        let held = held && self.playing();
        if held != self.soft_drop_held {
            // Switch speeds from a clean slate.
            self.gravity_timer_ms = 0;
        }
        self.soft_drop_held = held;
    }

    /// Try to rotate the active piece with SRS wall kicks
    pub(crate) fn try_rotate(&mut self, clockwise: bool) -> bool {
        if !self.playing() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let board = &self.board;
        let result = try_rotate(
            active.kind,
            active.rotation,
            active.x,
            active.y,
            clockwise,
            |x, y| board.is_free(x, y),
        );

        let Some(rotated) = result else {
            return false;
        };

        let (dx, dy) = rotated.kick;
        self.active = Some(Tetromino {
            rotation: rotated.rotation,
            x: active.x + dx,
            y: active.y + dy,
            ..active
        });
        self.reset_lock_timer();
        true
    }

    pub fn rotate_cw(&mut self) -> bool {
        self.try_rotate(true)
    }

    pub fn rotate_ccw(&mut self) -> bool {
        self.try_rotate(false)
    }

    /// Restart a running lock countdown, up to the configured number of times
    fn reset_lock_timer(&mut self) {
        if self.lock_timer_ms > 0 && self.lock_reset_count < self.config.lock_reset_limit {
            self.lock_timer_ms = 0;
            self.lock_reset_count += 1;
        }
    }

    /// Drop the active piece to the floor and lock it immediately
    pub fn hard_drop(&mut self) -> bool {
        if !self.playing() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let landed = self.board.ghost_placement(&active);
        let distance = (landed.y - active.y) as u32;

        self.active = Some(landed);
        self.score += calculate_drop_score(distance, true);
        self.lock_piece();
        true
    }

    /// Swap active piece with hold piece
    pub fn hold(&mut self) -> bool {
        if !self.playing() || !self.can_hold {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let held = self.hold.replace(active.kind);
        self.can_hold = false;
        self.soft_drop_held = false;

        match held {
            Some(kind) => {
                self.spawn_piece(kind);
            }
            None => {
                self.spawn_next();
            }
        }

        true
    }

    /// Lock the active piece onto the board and handle line clears
    pub(crate) fn lock_piece(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        let LockResult {
            lines_cleared,
            topped_out,
        } = self.board.lock(&active);

        // Scored at the level in effect before these lines count.
        let line_clear_score = calculate_line_score(lines_cleared, self.level);
        self.score += line_clear_score;
        self.lines += lines_cleared;
        self.level = level_for_lines(self.lines);

        self.last_event = Some(LockEvent {
            lines_cleared,
            line_clear_score,
            topped_out,
        });

        if lines_cleared > 0 {
            debug!(lines_cleared, score = self.score, level = self.level, "lines cleared");
        }

        if topped_out {
            self.end_game();
            return;
        }

        self.can_hold = true;
        self.spawn_next();
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Check if the active piece is resting on something
    pub fn is_grounded(&self) -> bool {
        match self.active {
            Some(ref piece) => !self.board.is_valid_placement(piece, piece.rotation, 0, 1),
            None => false,
        }
    }

    /// Where the active piece would land
    pub fn ghost(&self) -> Option<Tetromino> {
        self.active.map(|piece| self.board.ghost_placement(&piece))
    }

    /// Advance gravity and lock delay by `elapsed_ms` (clamped to `max_tick_ms`)
    ///
    /// Returns true if the active piece moved or locked.
    pub fn update(&mut self, elapsed_ms: u32) -> bool {
        if !self.playing() || self.active.is_none() {
            return false;
        }

        let elapsed = elapsed_ms.min(self.config.max_tick_ms);
        let interval = self.drop_interval_ms();
        let mut changed = false;

        self.gravity_timer_ms += elapsed;
        while self.gravity_timer_ms >= interval {
            self.gravity_timer_ms -= interval;
            if !self.try_move(0, 1) {
                // Grounded: don't bank gravity while resting.
                self.gravity_timer_ms = 0;
                break;
            }
            changed = true;
            if self.soft_drop_held {
                self.score += calculate_drop_score(1, false);
            }
        }

        // Being lifted by a kick keeps the countdown; only a new low clears it.
        if let Some(active) = self.active {
            if active.y > self.lowest_y {
                self.lowest_y = active.y;
                self.lock_timer_ms = 0;
                self.lock_reset_count = 0;
            }
        }

        if self.is_grounded() {
            self.lock_timer_ms += elapsed;
            if self.lock_timer_ms >= self.config.lock_delay_ms {
                self.lock_piece();
                return true;
            }
        }

        changed
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw => self.rotate_cw(),
            GameAction::RotateCcw => self.rotate_ccw(),
            GameAction::Hold => self.hold(),
            GameAction::Pause => self.toggle_pause(),
            GameAction::Start => self.start(),
            GameAction::Restart => self.restart(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(TetrisConfig::default())
    }
}
