//! Homing projectiles

use glam::Vec2;

use crate::enemy::{Enemy, EnemyId};
use crate::tower::FireEvent;

/// What happened to a projectile during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOutcome {
    /// Still travelling toward its target
    InFlight,
    /// Damage applied; `reward` is non-zero only for the killing blow
    Hit { target: EnemyId, killed: bool, reward: u32 },
    /// Target was already gone; no damage, no reward
    Missed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    /// Looked up in the live collection every tick
    pub target: EnemyId,
    pub damage: f32,
    pub speed: f32,
    pub radius: f32,
    active: bool,
}

impl Projectile {
    pub fn new(shot: FireEvent, radius: f32) -> Self {
        Self {
            position: shot.origin,
            target: shot.target,
            damage: shot.damage,
            speed: shot.speed,
            radius,
            active: true,
        }
    }

    pub fn active(&self) -> bool {
        self.active
    }

    /// Chase the target's current position, hitting on contact or when
    /// this tick's travel covers the remaining distance.
    pub fn update(&mut self, dt: f32, enemies: &mut [Enemy]) -> ProjectileOutcome {
        if !self.active {
            return ProjectileOutcome::Missed;
        }

        let Some(target) = enemies
            .iter_mut()
            .find(|enemy| enemy.id == self.target && enemy.alive())
        else {
            self.active = false;
            return ProjectileOutcome::Missed;
        };

        let offset = target.position - self.position;
        let distance = offset.length();
        let travel = self.speed * dt;

        if distance <= target.radius() + self.radius || distance <= travel {
            let killed = target.take_damage(self.damage);
            self.active = false;
            return ProjectileOutcome::Hit {
                target: target.id,
                killed,
                reward: if killed { target.reward() } else { 0 },
            };
        }

        self.position += offset / distance * travel;
        ProjectileOutcome::InFlight
    }
}
