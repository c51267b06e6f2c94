//! Tower-defense session: economy, commands and the per-tick pipeline
//!
//! Each [`Simulation::update`] runs, in order: wave spawns, enemy movement
//! (escapes cost lives), tower fire, projectile flight (kills pay out), then
//! the game-over and wave-cleared checks. Pausing or game over skips the
//! whole pipeline, which freezes every timer.

use std::collections::VecDeque;

use glam::Vec2;
use serde::Serialize;
use tracing::info;

use crate::config::{DefenseConfig, TowerSpec};
use crate::enemy::{Enemy, EnemyId, EnemyStats};
use crate::error::CommandError;
use crate::path::Path;
use crate::projectile::{Projectile, ProjectileOutcome};
use crate::snapshot::{DefenseSnapshot, EnemyView, ProjectileView, TowerView};
use crate::tower::{Tower, TowerId};
use crate::types::{EnemyKind, GridCell, TowerKind};
use crate::wave::{WaveManager, WaveStarted};

const WELCOME_MESSAGE: &str = "Select a tower and prepare for the first wave.";

/// Events kept for a caller that never drains; older ones are dropped first
pub const EVENT_LOG_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    GameOver,
    Paused,
    WaveActive,
    Intermission,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::GameOver => "Game Over",
            Status::Paused => "Paused",
            Status::WaveActive => "Wave Active",
            Status::Intermission => "Intermission",
        }
    }
}

/// Things that happened since the caller last drained the log
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DefenseEvent {
    WaveStarted(WaveStarted),
    EnemySpawned { id: EnemyId, kind: EnemyKind },
    EnemyEscaped { id: EnemyId, lives_damage: u32 },
    EnemyKilled { id: EnemyId, reward: u32 },
    TowerPlaced { id: TowerId, kind: TowerKind, cell: GridCell, cost: u32 },
    TowerUpgraded { id: TowerId, level: usize, cost: u32 },
    TowerSold { id: TowerId, refund: u32 },
    WaveCleared { wave: u32 },
    GameOver { wave: u32 },
}

/// Whether a tower of the selected build type could go on `cell`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementPreview {
    pub cell: GridCell,
    pub center: Vec2,
    pub valid: bool,
    pub reason: Option<String>,
    pub tower_radius: f32,
    pub range: f32,
}

/// Detail panel data for the selected tower
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedTowerInfo {
    pub id: TowerId,
    pub kind: TowerKind,
    pub name: String,
    pub description: String,
    /// 1-based
    pub level: usize,
    pub max_level: usize,
    pub range: f32,
    pub damage: f32,
    pub cooldown: f32,
    pub can_upgrade: bool,
    pub upgrade_cost: Option<u32>,
    pub afford_upgrade: bool,
    pub sell_value: u32,
}

/// Ring buffer of the most recent events
#[derive(Debug, Clone, Default)]
struct EventLog {
    events: VecDeque<DefenseEvent>,
}

impl EventLog {
    fn push(&mut self, event: DefenseEvent) {
        if self.events.len() == EVENT_LOG_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    fn drain(&mut self) -> Vec<DefenseEvent> {
        self.events.drain(..).collect()
    }

    fn clear(&mut self) {
        self.events.clear();
    }
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: DefenseConfig,
    path: Path,
    waves: WaveManager,
    enemies: Vec<Enemy>,
    towers: Vec<Tower>,
    projectiles: Vec<Projectile>,
    money: u32,
    lives: u32,
    paused: bool,
    game_over: bool,
    build_selection: Option<TowerKind>,
    selected_tower: Option<TowerId>,
    next_tower_id: u32,
    next_enemy_id: u32,
    last_cleared_wave: u32,
    message: String,
    events: EventLog,
}

impl Simulation {
    pub fn new(config: DefenseConfig) -> Self {
        let path = Path::new(config.waypoints.clone());
        let waves = WaveManager::new(config.first_spawn_delay);
        Self::from_parts(config, path, waves)
    }

    /// Build around an existing path and wave manager
    pub fn from_parts(config: DefenseConfig, path: Path, waves: WaveManager) -> Self {
        Self {
            money: config.start_money,
            lives: config.start_lives,
            config,
            path,
            waves,
            enemies: Vec::new(),
            towers: Vec::new(),
            projectiles: Vec::new(),
            paused: false,
            game_over: false,
            build_selection: None,
            selected_tower: None,
            next_tower_id: 1,
            next_enemy_id: 1,
            last_cleared_wave: 0,
            message: WELCOME_MESSAGE.to_string(),
            events: EventLog::default(),
        }
    }

    /// Throw away every entity and counter and start from scratch
    pub fn restart(&mut self) {
        self.waves = WaveManager::new(self.config.first_spawn_delay);
        self.enemies.clear();
        self.towers.clear();
        self.projectiles.clear();
        self.money = self.config.start_money;
        self.lives = self.config.start_lives;
        self.paused = false;
        self.game_over = false;
        self.build_selection = None;
        self.selected_tower = None;
        self.next_tower_id = 1;
        self.next_enemy_id = 1;
        self.last_cleared_wave = 0;
        self.message = WELCOME_MESSAGE.to_string();
        self.events.clear();
        info!("defense session restarted");
    }

    pub fn config(&self) -> &DefenseConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn wave_number(&self) -> u32 {
        self.waves.wave_number()
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn build_selection(&self) -> Option<TowerKind> {
        self.build_selection
    }

    /// Last advisory message for the player
    pub fn status_message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Status {
        if self.game_over {
            Status::GameOver
        } else if self.paused {
            Status::Paused
        } else if self.waves.is_wave_running(self.enemies.len()) {
            Status::WaveActive
        } else {
            Status::Intermission
        }
    }

    pub fn can_start_next_wave(&self) -> bool {
        self.waves
            .can_start_next_wave(self.enemies.len(), self.game_over)
    }

    /// Take everything logged since the previous drain, oldest first.
    ///
    /// Draining is optional. Without it only the last
    /// [`EVENT_LOG_CAPACITY`] events are kept.
    pub fn drain_events(&mut self) -> Vec<DefenseEvent> {
        self.events.drain()
    }

    fn reject<T>(&mut self, error: CommandError) -> Result<T, CommandError> {
        self.message = error.to_string();
        Err(error)
    }

    /// Buildable spec for `kind`
    fn tower_spec(&self, kind: TowerKind) -> Result<TowerSpec, CommandError> {
        self.config
            .tower(kind)
            .filter(|spec| !spec.levels.is_empty())
            .cloned()
            .ok_or(CommandError::UnknownTowerKind(kind))
    }

    /// Toggle the build type; selecting the current one again clears it.
    pub fn select_build_type(&mut self, kind: TowerKind) -> Result<Option<TowerKind>, CommandError> {
        let spec = match self.tower_spec(kind) {
            Ok(spec) => spec,
            Err(err) => return self.reject(err),
        };

        if self.build_selection == Some(kind) {
            self.build_selection = None;
            self.message = "Build selection cleared.".to_string();
        } else {
            self.build_selection = Some(kind);
            self.message = format!("{} selected. Pick an open tile to build.", spec.name);
        }
        Ok(self.build_selection)
    }

    pub fn clear_build_selection(&mut self) {
        if self.build_selection.take().is_some() {
            self.message = "Build selection cleared.".to_string();
        }
    }

    /// Field position for a new tower on `cell`, or why it can't go there
    pub fn check_placement(&self, cell: GridCell) -> Result<Vec2, CommandError> {
        if !self.config.contains_cell(cell) {
            return Err(CommandError::OutOfBounds);
        }
        if self.tower_at(cell).is_some() {
            return Err(CommandError::Occupied);
        }

        let center = self.config.cell_center(cell);
        if self.path.distance_to_point(center) < self.config.blocked_path_distance() {
            return Err(CommandError::TooCloseToPath);
        }
        Ok(center)
    }

    /// Preview for the current build selection; `None` without one
    pub fn placement_preview(&self, cell: GridCell) -> Option<PlacementPreview> {
        let kind = self.build_selection?;
        let spec = self.tower_spec(kind).ok()?;
        let range = spec.base().map_or(0.0, |level| level.range);
        let check = self.check_placement(cell);

        Some(PlacementPreview {
            cell,
            center: self.config.cell_center(cell),
            valid: check.is_ok(),
            reason: check.err().map(|err| err.to_string()),
            tower_radius: self.config.tower_radius,
            range,
        })
    }

    pub fn place_tower(&mut self, cell: GridCell, kind: TowerKind) -> Result<TowerId, CommandError> {
        if self.game_over {
            return self.reject(CommandError::GameOver);
        }
        let spec = match self.tower_spec(kind) {
            Ok(spec) => spec,
            Err(err) => return self.reject(err),
        };
        let position = match self.check_placement(cell) {
            Ok(position) => position,
            Err(err) => return self.reject(err),
        };

        let cost = spec.build_cost();
        if self.money < cost {
            return self.reject(CommandError::CannotAffordPlacement {
                name: spec.name,
                shortfall: cost - self.money,
            });
        }

        let id = TowerId(self.next_tower_id);
        self.next_tower_id += 1;
        self.money -= cost;
        self.selected_tower = Some(id);
        self.message = format!("{} placed for ${cost}.", spec.name);
        self.towers.push(Tower::new(id, kind, cell, position, spec));
        self.events.push(DefenseEvent::TowerPlaced {
            id,
            kind,
            cell,
            cost,
        });
        info!(tower = id.0, kind = kind.as_str(), cost, money = self.money, "tower placed");

        Ok(id)
    }

    /// Place the current build selection on `cell`
    pub fn build_at(&mut self, cell: GridCell) -> Result<TowerId, CommandError> {
        if self.game_over {
            return self.reject(CommandError::GameOver);
        }
        let Some(kind) = self.build_selection else {
            return self.reject(CommandError::NoBuildSelection);
        };
        self.place_tower(cell, kind)
    }

    pub fn tower_at(&self, cell: GridCell) -> Option<&Tower> {
        self.towers.iter().find(|tower| tower.cell == cell)
    }

    /// Select the tower on `cell`; an empty tile clears the selection.
    pub fn select_tower(&mut self, cell: GridCell) -> Result<TowerId, CommandError> {
        let Some((id, name)) = self
            .tower_at(cell)
            .map(|tower| (tower.id, tower.name().to_string()))
        else {
            self.selected_tower = None;
            return self.reject(CommandError::NoTowerAt);
        };

        self.selected_tower = Some(id);
        self.message = format!("Selected {name} tower.");
        Ok(id)
    }

    pub fn deselect_tower(&mut self) {
        self.selected_tower = None;
    }

    pub fn selected_tower(&self) -> Option<&Tower> {
        let id = self.selected_tower?;
        self.towers.iter().find(|tower| tower.id == id)
    }

    fn selected_index(&self) -> Option<usize> {
        let id = self.selected_tower?;
        self.towers.iter().position(|tower| tower.id == id)
    }

    pub fn selected_tower_info(&self) -> Option<SelectedTowerInfo> {
        let tower = self.selected_tower()?;
        let stats = tower.stats();
        let upgrade_cost = tower.upgrade_cost();

        Some(SelectedTowerInfo {
            id: tower.id,
            kind: tower.kind,
            name: tower.name().to_string(),
            description: tower.spec().description.clone(),
            level: tower.level_index() + 1,
            max_level: tower.max_level(),
            range: stats.range,
            damage: stats.damage,
            cooldown: stats.cooldown,
            can_upgrade: upgrade_cost.is_some(),
            upgrade_cost,
            afford_upgrade: upgrade_cost.is_some_and(|cost| self.money >= cost),
            sell_value: tower.sell_value(self.config.sell_refund_rate),
        })
    }

    /// Upgrade the selected tower, returning its new 1-based level
    pub fn upgrade_tower(&mut self) -> Result<usize, CommandError> {
        if self.game_over {
            return self.reject(CommandError::GameOver);
        }
        let Some(index) = self.selected_index() else {
            return self.reject(CommandError::NoTowerSelected);
        };

        let tower = &self.towers[index];
        let name = tower.name().to_string();
        let Some(cost) = tower.upgrade_cost() else {
            return self.reject(CommandError::MaxLevel { name });
        };
        if self.money < cost {
            let shortfall = cost - self.money;
            return self.reject(CommandError::CannotAffordUpgrade { name, shortfall });
        }

        let tower = &mut self.towers[index];
        tower.upgrade();
        let id = tower.id;
        let level = tower.level_index() + 1;

        self.money -= cost;
        self.message = format!("{name} upgraded to level {level}.");
        self.events.push(DefenseEvent::TowerUpgraded { id, level, cost });
        Ok(level)
    }

    /// Sell the selected tower, returning the refund
    pub fn sell_tower(&mut self) -> Result<u32, CommandError> {
        if self.game_over {
            return self.reject(CommandError::GameOver);
        }
        let Some(index) = self.selected_index() else {
            return self.reject(CommandError::NoTowerSelected);
        };

        let tower = self.towers.remove(index);
        let refund = tower.sell_value(self.config.sell_refund_rate);

        self.money += refund;
        self.selected_tower = None;
        self.message = format!("{} sold for ${refund}.", tower.name());
        self.events.push(DefenseEvent::TowerSold {
            id: tower.id,
            refund,
        });
        info!(tower = tower.id.0, refund, money = self.money, "tower sold");
        Ok(refund)
    }

    /// Start the next wave; also lifts a pause
    pub fn start_next_wave(&mut self) -> Result<WaveStarted, CommandError> {
        if self.game_over {
            return self.reject(CommandError::GameOver);
        }
        if !self.can_start_next_wave() {
            return self.reject(CommandError::WaveInProgress);
        }
        let Some(started) = self.waves.start_next_wave() else {
            return self.reject(CommandError::WaveInProgress);
        };

        self.paused = false;
        self.message = format!(
            "Wave {} started ({} enemies).",
            started.wave, started.enemy_count
        );
        self.events.push(DefenseEvent::WaveStarted(started));
        Ok(started)
    }

    /// Flip the pause flag, returning the new state
    pub fn toggle_pause(&mut self) -> Result<bool, CommandError> {
        if self.game_over {
            return self.reject(CommandError::GameOver);
        }
        self.paused = !self.paused;
        let message = if self.paused {
            "Game paused."
        } else {
            "Game resumed."
        };
        self.message = message.to_string();
        Ok(self.paused)
    }

    /// Advance the simulation by `dt` seconds (clamped to `max_dt`)
    pub fn update(&mut self, dt: f32) {
        if self.paused || self.game_over {
            return;
        }
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_dt)
        } else {
            0.0
        };

        self.spawn_due_enemies(dt);

        for enemy in &mut self.enemies {
            if enemy.update(dt, &self.path) {
                self.lives = self.lives.saturating_sub(enemy.lives_damage());
                self.events.push(DefenseEvent::EnemyEscaped {
                    id: enemy.id,
                    lives_damage: enemy.lives_damage(),
                });
            }
        }
        self.enemies.retain(Enemy::alive);

        for tower in &mut self.towers {
            if let Some(shot) = tower.update(dt, &self.enemies) {
                self.projectiles
                    .push(Projectile::new(shot, self.config.projectile_radius));
            }
        }

        let mut income = 0;
        for projectile in &mut self.projectiles {
            if let ProjectileOutcome::Hit {
                target,
                killed: true,
                reward,
            } = projectile.update(dt, &mut self.enemies)
            {
                income += reward;
                self.events.push(DefenseEvent::EnemyKilled { id: target, reward });
            }
        }
        self.projectiles.retain(Projectile::active);
        self.enemies.retain(Enemy::alive);
        self.money += income;

        let wave = self.waves.wave_number();

        if self.lives == 0 {
            self.game_over = true;
            self.message = format!("Base breached on wave {wave}. Restart to try again.");
            self.events.push(DefenseEvent::GameOver { wave });
            info!(wave, money = self.money, towers = self.towers.len(), "base breached");
            return;
        }

        if !self.waves.spawning()
            && self.enemies.is_empty()
            && wave > 0
            && self.last_cleared_wave < wave
        {
            self.last_cleared_wave = wave;
            self.message = format!("Wave {wave} cleared. Build and start the next wave.");
            self.events.push(DefenseEvent::WaveCleared { wave });
            info!(wave, money = self.money, lives = self.lives, "wave cleared");
        }

        if self.selected_tower().is_none() {
            self.selected_tower = None;
        }
    }

    fn spawn_due_enemies(&mut self, dt: f32) {
        let Self {
            config,
            path,
            waves,
            enemies,
            next_enemy_id,
            events,
            ..
        } = self;

        waves.update(dt, |spawn| {
            // Kinds missing from the table are skipped.
            let Some(base) = config.enemy(spawn.kind) else {
                return;
            };
            let id = EnemyId(*next_enemy_id);
            *next_enemy_id += 1;
            enemies.push(Enemy::spawn(id, spawn.kind, EnemyStats::scaled(base, spawn), path));
            events.push(DefenseEvent::EnemySpawned {
                id,
                kind: spawn.kind,
            });
        });
    }

    pub fn snapshot(&self) -> DefenseSnapshot {
        let status = self.status();
        DefenseSnapshot {
            wave: self.waves.wave_number(),
            lives: self.lives,
            money: self.money,
            enemy_count: self.enemies.len(),
            status,
            status_label: status.label(),
            can_start_wave: self.can_start_next_wave(),
            paused: self.paused,
            game_over: self.game_over,
            build_selection: self.build_selection,
            selected_tower: self.selected_tower_info(),
            message: self.message.clone(),
            enemies: self.enemies.iter().map(EnemyView::from).collect(),
            towers: self
                .towers
                .iter()
                .map(|tower| TowerView::new(tower, self.selected_tower == Some(tower.id)))
                .collect(),
            projectiles: self.projectiles.iter().map(ProjectileView::from).collect(),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(DefenseConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN_TILE: GridCell = GridCell::new(0, 0);
    const PATH_TILE: GridCell = GridCell::new(3, 1);

    /// Short straight path so enemies escape quickly
    fn short_path_config(start_lives: u32) -> DefenseConfig {
        DefenseConfig {
            start_lives,
            waypoints: vec![Vec2::new(0.0, 510.0), Vec2::new(30.0, 510.0)],
            ..DefenseConfig::default()
        }
    }

    fn run(sim: &mut Simulation, seconds: f32) {
        let ticks = (seconds / 0.05).ceil() as usize;
        for _ in 0..ticks {
            sim.update(0.05);
        }
    }

    #[test]
    fn placement_spends_money_and_selects() {
        let mut sim = Simulation::default();
        let id = sim.place_tower(OPEN_TILE, TowerKind::Scout).unwrap();

        assert_eq!(sim.money(), 180);
        assert_eq!(sim.selected_tower().unwrap().id, id);
        assert_eq!(sim.status_message(), "Scout placed for $80.");
        assert_eq!(
            sim.drain_events(),
            vec![DefenseEvent::TowerPlaced {
                id,
                kind: TowerKind::Scout,
                cell: OPEN_TILE,
                cost: 80
            }]
        );
    }

    #[test]
    fn placement_rejections_leave_state_alone() {
        let mut sim = Simulation::default();
        sim.place_tower(OPEN_TILE, TowerKind::Scout).unwrap();

        assert_eq!(
            sim.place_tower(OPEN_TILE, TowerKind::Burst),
            Err(CommandError::Occupied)
        );
        assert_eq!(
            sim.place_tower(PATH_TILE, TowerKind::Burst),
            Err(CommandError::TooCloseToPath)
        );
        assert_eq!(
            sim.place_tower(GridCell::new(16, 0), TowerKind::Burst),
            Err(CommandError::OutOfBounds)
        );
        assert_eq!(sim.status_message(), "That tile is outside the field.");
        assert_eq!(sim.money(), 180);
        assert_eq!(sim.towers().len(), 1);
    }

    #[test]
    fn cannot_afford_reports_shortfall() {
        let mut sim = Simulation::new(DefenseConfig {
            start_money: 100,
            ..DefenseConfig::default()
        });
        assert_eq!(
            sim.place_tower(OPEN_TILE, TowerKind::Cannon),
            Err(CommandError::CannotAffordPlacement {
                name: "Cannon".to_string(),
                shortfall: 65
            })
        );
        assert_eq!(sim.status_message(), "Need 65 more to place Cannon.");
    }

    #[test]
    fn unconfigured_tower_kind_is_rejected() {
        let mut config = DefenseConfig::default();
        config.towers.remove(&TowerKind::Cannon);
        let mut sim = Simulation::new(config);

        assert_eq!(
            sim.place_tower(OPEN_TILE, TowerKind::Cannon),
            Err(CommandError::UnknownTowerKind(TowerKind::Cannon))
        );
        assert_eq!(
            sim.select_build_type(TowerKind::Cannon),
            Err(CommandError::UnknownTowerKind(TowerKind::Cannon))
        );
    }

    #[test]
    fn build_selection_toggles() {
        let mut sim = Simulation::default();
        assert_eq!(sim.select_build_type(TowerKind::Burst), Ok(Some(TowerKind::Burst)));
        assert_eq!(sim.select_build_type(TowerKind::Scout), Ok(Some(TowerKind::Scout)));
        assert_eq!(sim.select_build_type(TowerKind::Scout), Ok(None));

        sim.select_build_type(TowerKind::Cannon).unwrap();
        sim.clear_build_selection();
        assert_eq!(sim.build_selection(), None);
        assert_eq!(sim.status_message(), "Build selection cleared.");
    }

    #[test]
    fn preview_reports_reason() {
        let mut sim = Simulation::default();
        assert!(sim.placement_preview(OPEN_TILE).is_none());

        sim.select_build_type(TowerKind::Cannon).unwrap();
        let ok = sim.placement_preview(OPEN_TILE).unwrap();
        assert!(ok.valid);
        assert_eq!(ok.range, 196.0);
        assert_eq!(ok.center, Vec2::new(30.0, 30.0));

        let blocked = sim.placement_preview(PATH_TILE).unwrap();
        assert!(!blocked.valid);
        assert_eq!(blocked.reason.as_deref(), Some("Too close to the path."));
    }

    #[test]
    fn upgrade_and_sell_selected_tower() {
        let mut sim = Simulation::default();
        sim.place_tower(OPEN_TILE, TowerKind::Scout).unwrap();

        assert_eq!(sim.upgrade_tower(), Ok(2));
        assert_eq!(sim.money(), 110);
        let info = sim.selected_tower_info().unwrap();
        assert_eq!(info.level, 2);
        assert_eq!(info.max_level, 3);
        assert_eq!(info.upgrade_cost, Some(105));
        assert!(info.afford_upgrade);
        assert_eq!(info.sell_value, 105);

        assert_eq!(sim.sell_tower(), Ok(105));
        assert_eq!(sim.money(), 215);
        assert!(sim.towers().is_empty());
        assert_eq!(sim.sell_tower(), Err(CommandError::NoTowerSelected));
    }

    #[test]
    fn upgrade_limits() {
        let mut sim = Simulation::new(DefenseConfig {
            start_money: 500,
            ..DefenseConfig::default()
        });
        sim.place_tower(OPEN_TILE, TowerKind::Scout).unwrap();
        sim.upgrade_tower().unwrap();
        sim.upgrade_tower().unwrap();

        assert_eq!(
            sim.upgrade_tower(),
            Err(CommandError::MaxLevel {
                name: "Scout".to_string()
            })
        );
        assert_eq!(sim.money(), 500 - 80 - 70 - 105);
    }

    #[test]
    fn select_tower_by_tile() {
        let mut sim = Simulation::default();
        let id = sim.place_tower(OPEN_TILE, TowerKind::Scout).unwrap();
        sim.deselect_tower();
        assert!(sim.selected_tower().is_none());

        assert_eq!(sim.select_tower(OPEN_TILE), Ok(id));
        assert_eq!(sim.select_tower(GridCell::new(5, 5)), Err(CommandError::NoTowerAt));
        assert!(sim.selected_tower().is_none());
    }

    #[test]
    fn wave_gating_and_status() {
        let mut sim = Simulation::default();
        assert_eq!(sim.status(), Status::Intermission);
        assert!(sim.can_start_next_wave());

        let started = sim.start_next_wave().unwrap();
        assert_eq!(started.wave, 1);
        assert_eq!(started.enemy_count, 10);
        assert_eq!(sim.status(), Status::WaveActive);
        assert!(!sim.can_start_next_wave());
        assert_eq!(sim.start_next_wave(), Err(CommandError::WaveInProgress));

        // Plan drained but enemies still walking.
        run(&mut sim, 10.0);
        assert!(!sim.enemies().is_empty());
        assert!(!sim.can_start_next_wave());
    }

    #[test]
    fn escapes_cost_lives_once_each() {
        let mut sim = Simulation::new(short_path_config(20));
        sim.start_next_wave().unwrap();
        run(&mut sim, 15.0);

        let events = sim.drain_events();
        let escaped: u32 = events
            .iter()
            .filter_map(|event| match event {
                DefenseEvent::EnemyEscaped { lives_damage, .. } => Some(*lives_damage),
                _ => None,
            })
            .sum();
        assert_eq!(escaped, 10);
        assert_eq!(sim.lives(), 10);
        assert!(events.contains(&DefenseEvent::WaveCleared { wave: 1 }));
        assert!(sim.can_start_next_wave());
    }

    #[test]
    fn wave_cleared_notice_fires_once() {
        let mut sim = Simulation::new(short_path_config(20));
        sim.start_next_wave().unwrap();
        run(&mut sim, 15.0);
        run(&mut sim, 5.0);

        let cleared = sim
            .drain_events()
            .into_iter()
            .filter(|event| matches!(event, DefenseEvent::WaveCleared { .. }))
            .count();
        assert_eq!(cleared, 1);
        assert_eq!(
            sim.status_message(),
            "Wave 1 cleared. Build and start the next wave."
        );
    }

    #[test]
    fn losing_all_lives_ends_the_game() {
        let mut sim = Simulation::new(short_path_config(3));
        sim.place_tower(OPEN_TILE, TowerKind::Scout).unwrap();
        sim.start_next_wave().unwrap();
        run(&mut sim, 15.0);

        assert!(sim.game_over());
        assert_eq!(sim.lives(), 0);
        assert_eq!(sim.status(), Status::GameOver);
        assert_eq!(sim.status_message(), "Base breached on wave 1. Restart to try again.");
        assert!(!sim.can_start_next_wave());

        let frozen = sim.snapshot();
        sim.update(0.05);
        assert_eq!(sim.snapshot(), frozen);

        assert_eq!(sim.start_next_wave(), Err(CommandError::GameOver));
        assert_eq!(sim.sell_tower(), Err(CommandError::GameOver));
        assert_eq!(sim.toggle_pause(), Err(CommandError::GameOver));

        sim.restart();
        assert!(!sim.game_over());
        assert_eq!(sim.lives(), 3);
        assert_eq!(sim.money(), 260);
        assert_eq!(sim.wave_number(), 0);
        assert!(sim.towers().is_empty());
    }

    #[test]
    fn pause_freezes_everything() {
        let mut sim = Simulation::default();
        sim.start_next_wave().unwrap();
        run(&mut sim, 1.0);

        assert_eq!(sim.toggle_pause(), Ok(true));
        assert_eq!(sim.status(), Status::Paused);
        let frozen = sim.snapshot();
        run(&mut sim, 3.0);
        assert_eq!(sim.snapshot(), frozen);

        assert_eq!(sim.toggle_pause(), Ok(false));
        assert_eq!(sim.status_message(), "Game resumed.");
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut sim = Simulation::default();
        sim.start_next_wave().unwrap();
        sim.update(0.2);
        // Only 0.05s simulated: the 0.15s spawn delay has not elapsed.
        assert!(sim.enemies().is_empty());
        for _ in 0..3 {
            sim.update(10.0);
        }
        assert_eq!(sim.enemies().len(), 1);
    }

    #[test]
    fn build_at_uses_selection() {
        let mut sim = Simulation::default();
        assert_eq!(sim.build_at(OPEN_TILE), Err(CommandError::NoBuildSelection));
        assert_eq!(sim.status_message(), "Select a tower type first.");
        assert_eq!(sim.money(), 260);

        sim.select_build_type(TowerKind::Scout).unwrap();
        let id = sim.build_at(OPEN_TILE).unwrap();
        assert_eq!(sim.tower_at(OPEN_TILE).unwrap().id, id);
        assert_eq!(sim.money(), 180);
        assert_eq!(sim.build_at(OPEN_TILE), Err(CommandError::Occupied));
    }

    #[test]
    fn undrained_event_log_stays_bounded() {
        let mut sim = Simulation::new(DefenseConfig {
            start_lives: 100_000,
            ..DefenseConfig::default()
        });
        for _ in 0..20 {
            sim.start_next_wave().unwrap();
            while !sim.can_start_next_wave() {
                sim.update(0.05);
            }
        }

        let events = sim.drain_events();
        assert_eq!(events.len(), EVENT_LOG_CAPACITY);
        assert_eq!(events.last(), Some(&DefenseEvent::WaveCleared { wave: 20 }));
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn tower_kills_pay_out() {
        let mut sim = Simulation::new(DefenseConfig {
            start_money: 1_000,
            ..DefenseConfig::default()
        });
        // Both sides of the first corridor
        sim.place_tower(GridCell::new(2, 0), TowerKind::Cannon).unwrap();
        sim.place_tower(GridCell::new(2, 2), TowerKind::Cannon).unwrap();
        sim.place_tower(GridCell::new(1, 2), TowerKind::Burst).unwrap();
        let spent = 165 + 165 + 115;
        sim.start_next_wave().unwrap();
        run(&mut sim, 60.0);

        let kills: Vec<u32> = sim
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                DefenseEvent::EnemyKilled { reward, .. } => Some(reward),
                _ => None,
            })
            .collect();
        assert!(!kills.is_empty());
        assert!(kills.iter().all(|&reward| reward == 14));
        assert_eq!(sim.money(), 1_000 - spent + kills.iter().sum::<u32>());
    }
}
