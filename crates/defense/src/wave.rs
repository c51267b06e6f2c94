//! Wave planning and spawn pacing
//!
//! ```text
//! Idle --start_next_wave--> Spawning --plan drained--> Idle
//! ```
//!
//! A wave may only start once the previous plan has drained, the field is
//! clear and the game is still running.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::info;

use crate::types::EnemyKind;

/// One planned spawn with its scale factors relative to the enemy table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpawnSpec {
    pub kind: EnemyKind,
    pub hp_scale: f32,
    pub speed_scale: f32,
    pub reward_scale: f32,
    /// Seconds until the next spawn after this one
    pub delay_after: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WaveStarted {
    pub wave: u32,
    pub enemy_count: usize,
}

/// Build the ordered spawn plan for wave `wave` (1-based)
pub fn build_wave_plan(wave: u32) -> Vec<SpawnSpec> {
    let w = wave as f32;
    let count = 8 + wave * 2 + wave / 3;
    let hp_scale = 1.0 + (w - 1.0) * 0.14;
    let reward_scale = 1.0 + (w - 1.0) * 0.08;
    let speed_scale = 1.0 + ((w - 1.0) * 0.018).min(0.55);

    let mut plan = Vec::with_capacity(count as usize + 1);

    for i in 0..count {
        let mut kind = EnemyKind::Grunt;
        // Later rules win.
        if wave >= 2 && i % 6 == 3 {
            kind = EnemyKind::Runner;
        }
        if wave >= 4 && i % 10 == 8 {
            kind = EnemyKind::Tank;
        }
        if wave >= 7 && i % 5 == 2 {
            kind = EnemyKind::Runner;
        }
        if wave >= 9 && i % 8 == 6 {
            kind = EnemyKind::Tank;
        }

        let elite = wave >= 6 && i % 11 == 5;
        let elite_hp = if elite { 1.22 } else { 1.0 };
        let elite_reward = if elite { 1.08 } else { 1.0 };

        let (hp_bonus, speed_bonus, reward_bonus, delay_bonus) = match kind {
            EnemyKind::Grunt => (1.0, 1.0, 1.0, 0.0),
            EnemyKind::Runner => (0.92, 1.2, 1.02, 0.0),
            EnemyKind::Tank => (1.15, 0.87, 1.35, 0.24),
        };

        let jitter = ((i % 3) as f32 - 1.0) * 0.04;
        let delay_after = (0.78 - w * 0.025 + delay_bonus + jitter).clamp(0.22, 0.95);

        plan.push(SpawnSpec {
            kind,
            hp_scale: hp_scale * elite_hp * hp_bonus,
            speed_scale: speed_scale * speed_bonus,
            reward_scale: reward_scale * reward_bonus * elite_reward,
            delay_after,
        });
    }

    if wave % 5 == 0 {
        plan.push(SpawnSpec {
            kind: EnemyKind::Tank,
            hp_scale: hp_scale * 1.9,
            speed_scale: speed_scale * 0.9,
            reward_scale: reward_scale * 2.1,
            delay_after: 0.5,
        });
    }

    plan
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaveManager {
    wave_number: u32,
    queue: VecDeque<SpawnSpec>,
    spawning: bool,
    spawn_timer: f32,
    first_spawn_delay: f32,
}

impl WaveManager {
    pub fn new(first_spawn_delay: f32) -> Self {
        Self {
            wave_number: 0,
            queue: VecDeque::new(),
            spawning: false,
            spawn_timer: 0.0,
            first_spawn_delay,
        }
    }

    pub fn wave_number(&self) -> u32 {
        self.wave_number
    }

    pub fn spawning(&self) -> bool {
        self.spawning
    }

    /// Spawns still waiting in the current plan
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn can_start_next_wave(&self, live_enemies: usize, game_over: bool) -> bool {
        !game_over && !self.spawning && live_enemies == 0
    }

    /// True while the plan is draining or enemies remain
    pub fn is_wave_running(&self, live_enemies: usize) -> bool {
        self.spawning || live_enemies > 0
    }

    /// Advance to the next wave and load its plan; refused while spawning.
    pub fn start_next_wave(&mut self) -> Option<WaveStarted> {
        if self.spawning {
            return None;
        }

        self.wave_number += 1;
        self.queue = build_wave_plan(self.wave_number).into();
        self.spawning = !self.queue.is_empty();
        self.spawn_timer = self.first_spawn_delay;

        let started = WaveStarted {
            wave: self.wave_number,
            enemy_count: self.queue.len(),
        };
        info!(wave = started.wave, enemies = started.enemy_count, "wave started");
        Some(started)
    }

    /// Count down the spawn timer, handing every due spawn to `spawn`.
    ///
    /// Several spawns may fall due in one call; leftover time carries into
    /// the next delay.
    pub fn update(&mut self, dt: f32, mut spawn: impl FnMut(&SpawnSpec)) {
        if !self.spawning {
            return;
        }

        self.spawn_timer -= dt;

        while self.spawning && self.spawn_timer <= 0.0 {
            let Some(next) = self.queue.pop_front() else {
                self.spawning = false;
                self.spawn_timer = 0.0;
                break;
            };

            spawn(&next);
            self.spawn_timer += next.delay_after;

            if self.queue.is_empty() {
                self.spawning = false;
            }
        }
    }
}

impl Default for WaveManager {
    fn default() -> Self {
        Self::new(0.15)
    }
}
