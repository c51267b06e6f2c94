//! Plain owned views of a tower-defense session for renderers and tooling

use glam::Vec2;
use serde::Serialize;

use crate::enemy::{Enemy, EnemyId};
use crate::projectile::Projectile;
use crate::simulation::{SelectedTowerInfo, Status};
use crate::tower::{Tower, TowerId};
use crate::types::{EnemyKind, GridCell, TowerKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub position: Vec2,
    pub progress: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub radius: f32,
}

impl From<&Enemy> for EnemyView {
    fn from(enemy: &Enemy) -> Self {
        Self {
            id: enemy.id,
            kind: enemy.kind,
            position: enemy.position,
            progress: enemy.progress,
            hp: enemy.hp,
            max_hp: enemy.stats.max_hp,
            radius: enemy.radius(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TowerView {
    pub id: TowerId,
    pub kind: TowerKind,
    pub cell: GridCell,
    pub position: Vec2,
    /// 1-based
    pub level: usize,
    pub range: f32,
    pub facing: f32,
    pub selected: bool,
}

impl TowerView {
    pub fn new(tower: &Tower, selected: bool) -> Self {
        Self {
            id: tower.id,
            kind: tower.kind,
            cell: tower.cell,
            position: tower.position,
            level: tower.level_index() + 1,
            range: tower.stats().range,
            facing: tower.facing(),
            selected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub position: Vec2,
    pub target: EnemyId,
    pub radius: f32,
}

impl From<&Projectile> for ProjectileView {
    fn from(projectile: &Projectile) -> Self {
        Self {
            position: projectile.position,
            target: projectile.target,
            radius: projectile.radius,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefenseSnapshot {
    pub wave: u32,
    pub lives: u32,
    pub money: u32,
    pub enemy_count: usize,
    pub status: Status,
    pub status_label: &'static str,
    pub can_start_wave: bool,
    pub paused: bool,
    pub game_over: bool,
    pub build_selection: Option<TowerKind>,
    pub selected_tower: Option<SelectedTowerInfo>,
    pub message: String,
    pub enemies: Vec<EnemyView>,
    pub towers: Vec<TowerView>,
    pub projectiles: Vec<ProjectileView>,
}
