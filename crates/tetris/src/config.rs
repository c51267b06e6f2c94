//! Session configuration
//!
//! Timing knobs for one game session. Defaults carry the constants from
//! `arcade_types`; every field can be overridden from JSON.

use serde::{Deserialize, Serialize};

use crate::types::{LOCK_DELAY_MS, LOCK_RESET_LIMIT, MAX_TICK_MS, SOFT_DROP_MULTIPLIER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetrisConfig {
    /// Seed for the bag randomizer
    pub seed: u64,
    /// Grounded time before the active piece locks
    pub lock_delay_ms: u32,
    /// How many moves/rotations may restart the lock countdown per piece
    pub lock_reset_limit: u8,
    /// Elapsed time above this is clamped in `update`
    pub max_tick_ms: u32,
    /// Gravity speed-up while soft drop is held
    pub soft_drop_multiplier: u32,
}

impl Default for TetrisConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            lock_delay_ms: LOCK_DELAY_MS,
            lock_reset_limit: LOCK_RESET_LIMIT,
            max_tick_ms: MAX_TICK_MS,
            soft_drop_multiplier: SOFT_DROP_MULTIPLIER,
        }
    }
}

impl TetrisConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}
