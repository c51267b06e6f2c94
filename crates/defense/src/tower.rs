//! Towers: targeting, cooldowns, upgrades and resale

use glam::Vec2;
use serde::Serialize;

use crate::config::{TowerLevel, TowerSpec};
use crate::enemy::{Enemy, EnemyId};
use crate::types::{GridCell, TowerKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TowerId(pub u32);

/// A shot fired this tick; the simulation turns it into a projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireEvent {
    pub origin: Vec2,
    pub target: EnemyId,
    pub damage: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tower {
    pub id: TowerId,
    pub kind: TowerKind,
    pub cell: GridCell,
    pub position: Vec2,
    spec: TowerSpec,
    level_index: usize,
    cooldown: f32,
    total_spent: u32,
    /// Barrel angle in radians; starts pointing up
    facing: f32,
}

impl Tower {
    /// Build at level 0; `spec` must have at least one level.
    pub fn new(id: TowerId, kind: TowerKind, cell: GridCell, position: Vec2, spec: TowerSpec) -> Self {
        let total_spent = spec.build_cost();
        Self {
            id,
            kind,
            cell,
            position,
            spec,
            level_index: 0,
            cooldown: 0.0,
            total_spent,
            facing: -std::f32::consts::FRAC_PI_2,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &TowerSpec {
        &self.spec
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn max_level(&self) -> usize {
        self.spec.levels.len()
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn total_spent(&self) -> u32 {
        self.total_spent
    }

    /// Stats of the current level
    pub fn stats(&self) -> TowerLevel {
        // level_index only moves within `levels`
        self.spec.levels[self.level_index]
    }

    pub fn can_upgrade(&self) -> bool {
        self.level_index + 1 < self.spec.levels.len()
    }

    /// Price of the next level, if there is one
    pub fn upgrade_cost(&self) -> Option<u32> {
        self.spec.levels.get(self.level_index + 1).map(|level| level.cost)
    }

    /// Advance one level and record its cost; false at max level.
    pub fn upgrade(&mut self) -> bool {
        let Some(cost) = self.upgrade_cost() else {
            return false;
        };
        self.level_index += 1;
        self.total_spent += cost;
        true
    }

    pub fn sell_value(&self, refund_rate: f32) -> u32 {
        (self.total_spent as f32 * refund_rate).round() as u32
    }

    /// Cool down and fire at the best target in range, if any.
    pub fn update(&mut self, dt: f32, enemies: &[Enemy]) -> Option<FireEvent> {
        self.cooldown = (self.cooldown - dt).max(0.0);
        if self.cooldown > 0.0 {
            return None;
        }

        let stats = self.stats();
        let target = self.find_target(enemies, stats.range)?;

        let aim = target.position - self.position;
        self.facing = aim.y.atan2(aim.x);
        self.cooldown = stats.cooldown;

        let muzzle = self.spec.barrel_length - 3.0;
        Some(FireEvent {
            origin: self.position + Vec2::new(self.facing.cos(), self.facing.sin()) * muzzle,
            target: target.id,
            damage: stats.damage,
            speed: stats.projectile_speed,
        })
    }

    /// Alive enemy within `range` that is furthest along the path.
    ///
    /// Equal progress goes to the lower enemy id.
    pub fn find_target<'a>(&self, enemies: &'a [Enemy], range: f32) -> Option<&'a Enemy> {
        let range_sq = range * range;
        enemies
            .iter()
            .filter(|enemy| enemy.alive())
            .filter(|enemy| enemy.position.distance_squared(self.position) <= range_sq)
            .fold(None, |best: Option<&Enemy>, enemy| match best {
                Some(current)
                    if current.progress > enemy.progress
                        || (current.progress == enemy.progress && current.id < enemy.id) =>
                {
                    Some(current)
                }
                _ => Some(enemy),
            })
    }
}
