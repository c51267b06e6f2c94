//! Static tables for a tower-defense session
//!
//! A [`DefenseConfig`] is handed to the simulation at construction and never
//! mutated afterwards. Every field has a default, so a JSON override only
//! needs the keys it changes.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{EnemyKind, GridCell, TowerKind};

/// Stats for one tower level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerLevel {
    /// Build cost for level 0, upgrade cost for every later level
    pub cost: u32,
    pub range: f32,
    pub damage: f32,
    /// Seconds between shots
    pub cooldown: f32,
    pub projectile_speed: f32,
}

impl TowerLevel {
    const fn new(cost: u32, range: f32, damage: f32, cooldown: f32, projectile_speed: f32) -> Self {
        Self {
            cost,
            range,
            damage,
            cooldown,
            projectile_speed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerSpec {
    pub name: String,
    pub description: String,
    /// Projectiles leave the barrel 3 units short of its tip
    pub barrel_length: f32,
    pub levels: Vec<TowerLevel>,
}

impl TowerSpec {
    pub fn base(&self) -> Option<&TowerLevel> {
        self.levels.first()
    }

    pub fn build_cost(&self) -> u32 {
        self.base().map_or(0, |level| level.cost)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub name: String,
    pub max_hp: f32,
    pub speed: f32,
    pub reward: u32,
    pub lives_damage: u32,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenseConfig {
    pub field_width: f32,
    pub field_height: f32,
    pub grid_size: f32,
    pub path_width: f32,
    pub tower_radius: f32,
    /// Extra clearance between a tower centre and the path edge
    pub placement_path_buffer: f32,
    pub start_money: u32,
    pub start_lives: u32,
    pub sell_refund_rate: f32,
    /// Longest step `update` will simulate, in seconds
    pub max_dt: f32,
    pub projectile_radius: f32,
    pub first_spawn_delay: f32,
    pub waypoints: Vec<Vec2>,
    pub towers: BTreeMap<TowerKind, TowerSpec>,
    pub enemies: BTreeMap<EnemyKind, EnemySpec>,
}

impl Default for DefenseConfig {
    fn default() -> Self {
        Self {
            field_width: 960.0,
            field_height: 540.0,
            grid_size: 60.0,
            path_width: 40.0,
            tower_radius: 18.0,
            placement_path_buffer: 12.0,
            start_money: 260,
            start_lives: 20,
            sell_refund_rate: 0.7,
            max_dt: 0.05,
            projectile_radius: 4.0,
            first_spawn_delay: 0.15,
            waypoints: default_waypoints(),
            towers: default_towers(),
            enemies: default_enemies(),
        }
    }
}

fn default_waypoints() -> Vec<Vec2> {
    [
        (-40.0, 90.0),
        (210.0, 90.0),
        (210.0, 270.0),
        (450.0, 270.0),
        (450.0, 150.0),
        (720.0, 150.0),
        (720.0, 390.0),
        (1000.0, 390.0),
    ]
    .into_iter()
    .map(|(x, y)| Vec2::new(x, y))
    .collect()
}

fn default_towers() -> BTreeMap<TowerKind, TowerSpec> {
    let mut towers = BTreeMap::new();
    towers.insert(
        TowerKind::Scout,
        TowerSpec {
            name: "Scout".to_string(),
            description: "Balanced tower with reliable range and fire rate.".to_string(),
            barrel_length: 16.0,
            levels: vec![
                TowerLevel::new(80, 140.0, 13.0, 0.42, 420.0),
                TowerLevel::new(70, 156.0, 19.0, 0.38, 460.0),
                TowerLevel::new(105, 172.0, 27.0, 0.33, 500.0),
            ],
        },
    );
    towers.insert(
        TowerKind::Burst,
        TowerSpec {
            name: "Burst".to_string(),
            description: "Short range, rapid shots. Great near corners and exits.".to_string(),
            barrel_length: 14.0,
            levels: vec![
                TowerLevel::new(115, 118.0, 7.0, 0.16, 560.0),
                TowerLevel::new(85, 128.0, 10.0, 0.14, 600.0),
                TowerLevel::new(125, 140.0, 14.0, 0.12, 650.0),
            ],
        },
    );
    towers.insert(
        TowerKind::Cannon,
        TowerSpec {
            name: "Cannon".to_string(),
            description: "Long range heavy hitter with slow reload.".to_string(),
            barrel_length: 18.0,
            levels: vec![
                TowerLevel::new(165, 196.0, 36.0, 1.05, 300.0),
                TowerLevel::new(115, 210.0, 52.0, 0.95, 340.0),
                TowerLevel::new(165, 228.0, 74.0, 0.86, 380.0),
            ],
        },
    );
    towers
}

fn default_enemies() -> BTreeMap<EnemyKind, EnemySpec> {
    let spec = |name: &str, max_hp, speed, reward, lives_damage, radius| EnemySpec {
        name: name.to_string(),
        max_hp,
        speed,
        reward,
        lives_damage,
        radius,
    };

    let mut enemies = BTreeMap::new();
    enemies.insert(EnemyKind::Grunt, spec("Grunt", 38.0, 62.0, 14, 1, 11.0));
    enemies.insert(EnemyKind::Runner, spec("Runner", 28.0, 94.0, 13, 1, 10.0));
    enemies.insert(EnemyKind::Tank, spec("Tank", 104.0, 42.0, 26, 2, 14.0));
    enemies
}

impl DefenseConfig {
    pub fn tower(&self, kind: TowerKind) -> Option<&TowerSpec> {
        self.towers.get(&kind)
    }

    pub fn enemy(&self, kind: EnemyKind) -> Option<&EnemySpec> {
        self.enemies.get(&kind)
    }

    /// Number of build columns and rows on the field
    pub fn grid_dimensions(&self) -> (i32, i32) {
        if self.grid_size <= 0.0 {
            return (0, 0);
        }
        (
            (self.field_width / self.grid_size).floor() as i32,
            (self.field_height / self.grid_size).floor() as i32,
        )
    }

    pub fn contains_cell(&self, cell: GridCell) -> bool {
        let (columns, rows) = self.grid_dimensions();
        (0..columns).contains(&cell.column) && (0..rows).contains(&cell.row)
    }

    /// Centre of a build cell in field coordinates
    pub fn cell_center(&self, cell: GridCell) -> Vec2 {
        let half = self.grid_size / 2.0;
        Vec2::new(
            cell.column as f32 * self.grid_size + half,
            cell.row as f32 * self.grid_size + half,
        )
    }

    /// Minimum distance from a tower centre to the path centre line
    pub fn blocked_path_distance(&self) -> f32 {
        self.path_width / 2.0 + self.placement_path_buffer
    }

    /// Reject tables the simulation cannot run with.
    ///
    /// Loaders call this before building a simulation; the simulation itself
    /// degrades gracefully (an unconfigured tower kind just can't be built).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.grid_size > 0.0) {
            return Err(ConfigError::NonPositiveGridSize(self.grid_size));
        }
        if !(self.max_dt > 0.0) {
            return Err(ConfigError::NonPositiveMaxDt(self.max_dt));
        }
        if !(0.0..=1.0).contains(&self.sell_refund_rate) {
            return Err(ConfigError::RefundRateOutOfRange(self.sell_refund_rate));
        }
        if self.waypoints.len() < 2 {
            return Err(ConfigError::TooFewWaypoints(self.waypoints.len()));
        }
        for kind in TowerKind::ALL {
            let spec = self.tower(kind).ok_or(ConfigError::MissingTower(kind))?;
            if spec.levels.is_empty() {
                return Err(ConfigError::NoTowerLevels(kind));
            }
            if spec.levels.iter().any(|level| !(level.cooldown > 0.0)) {
                return Err(ConfigError::NonPositiveCooldown(kind));
            }
        }
        for kind in EnemyKind::ALL {
            if self.enemy(kind).is_none() {
                return Err(ConfigError::MissingEnemy(kind));
            }
        }
        Ok(())
    }
}
