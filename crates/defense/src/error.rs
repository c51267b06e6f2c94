//! Rejections and configuration faults
//!
//! A rejected command leaves the simulation untouched; its `Display` text is
//! what the player sees as the status message.

use thiserror::Error;

use crate::types::{EnemyKind, TowerKind};

/// Reasons a player command may be rejected by the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The base was breached; only restart is accepted.
    #[error("Game over. Restart to play again.")]
    GameOver,
    /// Spawning is still in progress or enemies remain on the field.
    #[error("Finish the current wave before starting the next one.")]
    WaveInProgress,
    /// The tower kind has no entry in the tower table.
    #[error("{} towers are not available.", .0.as_str())]
    UnknownTowerKind(TowerKind),
    #[error("Select a tower type first.")]
    NoBuildSelection,
    #[error("That tile is outside the field.")]
    OutOfBounds,
    #[error("Tile already occupied.")]
    Occupied,
    #[error("Too close to the path.")]
    TooCloseToPath,
    #[error("Need {shortfall} more to place {name}.")]
    CannotAffordPlacement { name: String, shortfall: u32 },
    #[error("Need {shortfall} more to upgrade {name}.")]
    CannotAffordUpgrade { name: String, shortfall: u32 },
    #[error("{name} is already max level.")]
    MaxLevel { name: String },
    #[error("No tower on that tile.")]
    NoTowerAt,
    #[error("Select a tower first.")]
    NoTowerSelected,
}

/// Reasons a [`DefenseConfig`](crate::DefenseConfig) cannot drive a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid_size must be positive (received {0})")]
    NonPositiveGridSize(f32),
    #[error("max_dt must be positive (received {0})")]
    NonPositiveMaxDt(f32),
    #[error("sell_refund_rate must be within 0..=1 (received {0})")]
    RefundRateOutOfRange(f32),
    #[error("path needs at least two waypoints (received {0})")]
    TooFewWaypoints(usize),
    #[error("tower table has no entry for {}", .0.as_str())]
    MissingTower(TowerKind),
    #[error("tower {} has no levels", .0.as_str())]
    NoTowerLevels(TowerKind),
    #[error("tower {} has a level with a non-positive cooldown", .0.as_str())]
    NonPositiveCooldown(TowerKind),
    #[error("enemy table has no entry for {}", .0.as_str())]
    MissingEnemy(EnemyKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_read_as_status_text() {
        let err = CommandError::CannotAffordPlacement {
            name: "Cannon".to_string(),
            shortfall: 25,
        };
        assert_eq!(err.to_string(), "Need 25 more to place Cannon.");
        assert_eq!(
            CommandError::UnknownTowerKind(TowerKind::Burst).to_string(),
            "burst towers are not available."
        );
    }

    #[test]
    fn config_errors_name_the_field() {
        let err = ConfigError::MissingEnemy(EnemyKind::Runner);
        assert_eq!(err.to_string(), "enemy table has no entry for runner");
    }
}
