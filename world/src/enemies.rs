//! Enemy and projectile records.

use glam::Vec2;
use lane_defence_core::{Color, EnemyKind, EnemyProfile, ProjectileMotion, TowerId};

/// Enemy stored inside the world. Read-only outside this crate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Enemy {
    /// Kind of enemy.
    pub kind: EnemyKind,
    /// Lane the enemy walks along.
    pub row: u32,
    /// Pixel position of the enemy's centre.
    pub position: Vec2,
    /// Current health; the enemy dies once this reaches zero.
    pub health: i32,
    /// Health at spawn.
    pub max_health: i32,
    /// Pixels travelled per tick while advancing.
    pub speed: f32,
    /// Damage dealt per strike.
    pub attack_power: i32,
    /// Money credited when the enemy is killed.
    pub reward: u32,
    /// Ticks left before the next strike. Zero means ready.
    pub attack_cooldown: u32,
    /// Tower being attacked. Non-owning; resolve through the world before use.
    pub target: Option<TowerId>,
    /// Colour forwarded to renderers.
    pub color: Color,
}

impl Enemy {
    pub(crate) fn from_profile(
        kind: EnemyKind,
        row: u32,
        position: Vec2,
        profile: &EnemyProfile,
    ) -> Self {
        Self {
            kind,
            row,
            position,
            health: profile.health,
            max_health: profile.health,
            speed: profile.speed,
            attack_power: profile.attack_power,
            reward: profile.reward,
            attack_cooldown: 0,
            target: None,
            color: profile.color,
        }
    }
}

/// Projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    /// Pixel position of the projectile's centre.
    pub position: Vec2,
    /// Damage applied on impact.
    pub damage: i32,
    /// Motion model driving the projectile.
    pub motion: ProjectileMotion,
}

impl Projectile {
    /// Tower owning the projectile, for homing projectiles.
    #[must_use]
    pub const fn owner(&self) -> Option<TowerId> {
        match self.motion {
            ProjectileMotion::Homing { owner, .. } => Some(owner),
            ProjectileMotion::Lane { .. } => None,
        }
    }
}
