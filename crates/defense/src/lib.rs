//! Tower-defense rules engine
//!
//! Enemies follow an arc-length parameterized [`Path`]; waves are planned by
//! [`WaveManager`]; towers pick targets and fire homing projectiles; the
//! [`Simulation`] owns every entity and advances them with
//! [`Simulation::update`].
//!
//! ```
//! use arcade_defense::{DefenseConfig, Simulation};
//! use arcade_defense::types::{GridCell, TowerKind};
//!
//! let mut sim = Simulation::new(DefenseConfig::default());
//! sim.place_tower(GridCell::new(0, 0), TowerKind::Scout).unwrap();
//! assert_eq!(sim.money(), 180);
//!
//! sim.start_next_wave().unwrap();
//! for _ in 0..100 {
//!     sim.update(0.05);
//! }
//! assert_eq!(sim.wave_number(), 1);
//! ```

pub mod config;
pub mod enemy;
pub mod error;
pub mod path;
pub mod projectile;
pub mod simulation;
pub mod snapshot;
pub mod tower;
pub mod wave;

pub use arcade_types as types;
pub use glam;

pub use config::{DefenseConfig, EnemySpec, TowerLevel, TowerSpec};
pub use enemy::{Enemy, EnemyId, EnemyStats};
pub use error::{CommandError, ConfigError};
pub use path::Path;
pub use projectile::{Projectile, ProjectileOutcome};
pub use simulation::{
    DefenseEvent, PlacementPreview, SelectedTowerInfo, Simulation, Status, EVENT_LOG_CAPACITY,
};
pub use snapshot::{DefenseSnapshot, EnemyView, ProjectileView, TowerView};
pub use tower::{FireEvent, Tower, TowerId};
pub use wave::{build_wave_plan, SpawnSpec, WaveManager, WaveStarted};
