//! Enemies walking the path

use glam::Vec2;
use serde::Serialize;

use crate::config::EnemySpec;
use crate::path::Path;
use crate::types::EnemyKind;
use crate::wave::SpawnSpec;

/// Stable identifier; projectiles refer to their target through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EnemyId(pub u32);

/// Final stats of one spawned enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnemyStats {
    pub max_hp: f32,
    pub speed: f32,
    pub reward: u32,
    pub lives_damage: u32,
    pub radius: f32,
}

impl EnemyStats {
    /// Apply a plan entry's scale factors to the enemy table, rounded to
    /// whole numbers with floors of 1 hp, 20 speed and 1 reward.
    pub fn scaled(base: &EnemySpec, spawn: &SpawnSpec) -> Self {
        Self {
            max_hp: (base.max_hp * spawn.hp_scale).round().max(1.0),
            speed: (base.speed * spawn.speed_scale).round().max(20.0),
            reward: ((base.reward as f32 * spawn.reward_scale).round() as u32).max(1),
            lives_damage: base.lives_damage,
            radius: base.radius,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub position: Vec2,
    /// Distance travelled along the path
    pub progress: f32,
    pub hp: f32,
    pub stats: EnemyStats,
    alive: bool,
    escaped: bool,
}

impl Enemy {
    /// New enemy at the start of `path`
    pub fn spawn(id: EnemyId, kind: EnemyKind, stats: EnemyStats, path: &Path) -> Self {
        Self {
            id,
            kind,
            position: path.start(),
            progress: 0.0,
            hp: stats.max_hp,
            stats,
            alive: true,
            escaped: false,
        }
    }

    pub fn alive(&self) -> bool {
        self.alive
    }

    pub fn escaped(&self) -> bool {
        self.escaped
    }

    pub fn radius(&self) -> f32 {
        self.stats.radius
    }

    pub fn reward(&self) -> u32 {
        self.stats.reward
    }

    pub fn lives_damage(&self) -> u32 {
        self.stats.lives_damage
    }

    /// Walk `speed * dt` further along `path`.
    ///
    /// Returns true on the single call that carries the enemy past the end.
    pub fn update(&mut self, dt: f32, path: &Path) -> bool {
        if !self.alive {
            return false;
        }

        self.progress += self.stats.speed * dt;

        if self.progress >= path.total_length() {
            self.progress = path.total_length();
            self.position = path.point_at_distance(self.progress);
            self.alive = false;
            self.escaped = true;
            return true;
        }

        self.position = path.point_at_distance(self.progress);
        false
    }

    /// Subtract `amount` hit points (floored at 0).
    ///
    /// Returns true only for the hit that kills.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }

        self.hp -= amount;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.alive = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
pub(crate) fn test_enemy(id: u32, position: Vec2, progress: f32) -> Enemy {
    Enemy {
        id: EnemyId(id),
        kind: EnemyKind::Grunt,
        position,
        progress,
        hp: 38.0,
        stats: EnemyStats {
            max_hp: 38.0,
            speed: 62.0,
            reward: 14,
            lives_damage: 1,
            radius: 11.0,
        },
        alive: true,
        escaped: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefenseConfig;

    fn line(length: f32) -> Path {
        Path::new(vec![Vec2::ZERO, Vec2::new(length, 0.0)])
    }

    #[test]
    fn scaled_stats_round_and_floor() {
        let config = DefenseConfig::default();
        let grunt = config.enemy(EnemyKind::Grunt).unwrap();
        let spawn = SpawnSpec {
            kind: EnemyKind::Grunt,
            hp_scale: 1.14,
            speed_scale: 1.018,
            reward_scale: 1.08,
            delay_after: 0.5,
        };
        let stats = EnemyStats::scaled(grunt, &spawn);
        assert_eq!(stats.max_hp, 43.0);
        assert_eq!(stats.speed, 63.0);
        assert_eq!(stats.reward, 15);

        let tiny = SpawnSpec {
            hp_scale: 0.0,
            speed_scale: 0.1,
            reward_scale: 0.0,
            ..spawn
        };
        let stats = EnemyStats::scaled(grunt, &tiny);
        assert_eq!(stats.max_hp, 1.0);
        assert_eq!(stats.speed, 20.0);
        assert_eq!(stats.reward, 1);
    }

    #[test]
    fn walks_along_path() {
        let path = line(100.0);
        let mut enemy = test_enemy(1, Vec2::ZERO, 0.0);
        assert!(!enemy.update(0.5, &path));
        assert_eq!(enemy.progress, 31.0);
        assert_eq!(enemy.position, Vec2::new(31.0, 0.0));
    }

    #[test]
    fn escapes_exactly_once() {
        let path = line(100.0);
        let mut enemy = test_enemy(1, Vec2::ZERO, 0.0);

        assert!(!enemy.update(1.0, &path));
        assert!(enemy.update(1.0, &path));
        assert!(!enemy.alive());
        assert!(enemy.escaped());
        assert_eq!(enemy.position, Vec2::new(100.0, 0.0));

        assert!(!enemy.update(1.0, &path));
        assert_eq!(enemy.progress, 100.0);
    }

    #[test]
    fn only_killing_hit_reports_kill() {
        let mut enemy = test_enemy(1, Vec2::ZERO, 0.0);
        assert!(!enemy.take_damage(30.0));
        assert!(enemy.take_damage(30.0));
        assert_eq!(enemy.hp, 0.0);
        assert!(!enemy.take_damage(30.0));
    }
}
