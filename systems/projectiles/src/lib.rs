#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure projectile phase system: advances projectiles and reports landings.
//!
//! Lane projectiles travel right along a fixed line and hit the first enemy
//! whose box overlaps theirs. Homing projectiles chase a live enemy and are
//! dropped the moment that enemy disappears. A projectile sees the world as
//! left by the projectiles before it, so the caller applies each
//! projectile's commands before asking about the next one.

use glam::Vec2;
use lane_defence_core::{Command, EnemyId, ProjectileId, ProjectileMotion};
use lane_defence_world::World;

/// Projectile phase system.
#[derive(Debug, Default)]
pub struct ProjectileMotionSystem;

impl ProjectileMotionSystem {
    /// Creates a new projectile phase system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits the movement of one projectile and, if it landed or left the
    /// playfield, the command that consumes it.
    pub fn handle(&mut self, world: &World, projectile: ProjectileId, out: &mut Vec<Command>) {
        if world.is_game_over() {
            return;
        }
        let Some(record) = world.projectile(projectile) else {
            return;
        };
        match record.motion {
            ProjectileMotion::Lane { speed } => {
                fly_lane(world, projectile, record.position, speed, out);
            }
            ProjectileMotion::Homing { target, speed, .. } => {
                fly_homing(world, projectile, record.position, target, speed, out);
            }
        }
    }
}

fn fly_lane(
    world: &World,
    projectile: ProjectileId,
    position: Vec2,
    speed: f32,
    out: &mut Vec<Command>,
) {
    let rules = world.rules();
    let reach = rules.projectile.radius + rules.enemy_radius;
    let position = position + Vec2::new(speed, 0.0);
    out.push(Command::MoveProjectile {
        projectile,
        position,
    });

    let struck = world.enemies().find_map(|(id, enemy)| {
        let delta = (enemy.position - position).abs();
        (delta.x < reach && delta.y < reach).then_some(id)
    });
    match struck {
        Some(enemy) => out.push(Command::HitEnemy { projectile, enemy }),
        None if position.x > rules.playfield.width => {
            out.push(Command::ExpireProjectile { projectile });
        }
        None => {}
    }
}

fn fly_homing(
    world: &World,
    projectile: ProjectileId,
    position: Vec2,
    target: EnemyId,
    speed: f32,
    out: &mut Vec<Command>,
) {
    let Some(goal) = world.enemy(target).map(|enemy| enemy.position) else {
        out.push(Command::OrphanProjectile { projectile });
        return;
    };
    let offset = goal - position;
    let distance = offset.length();
    if distance <= world.rules().projectile.hit_epsilon {
        out.push(Command::HitEnemy {
            projectile,
            enemy: target,
        });
        return;
    }
    // Never overshoot: the final step lands on the target.
    out.push(Command::MoveProjectile {
        projectile,
        position: position + offset / distance * speed.min(distance),
    });
}
