#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure tower phase system: counts down cooldowns and fires from ready towers.

use glam::Vec2;
use lane_defence_core::{AttackStyle, Command, ProjectileMotion, TowerId};
use lane_defence_system_targeting::{homing_target, lane_fire_target, EnemyCandidate};
use lane_defence_world::{Tower, World};

/// Tower combat system that reuses its enemy workspace across ticks.
#[derive(Debug, Default)]
pub struct TowerCombat {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerCombat {
    /// Creates a new tower combat system with an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the enemies on the field at the start of the phase.
    pub fn prepare(&mut self, world: &World) {
        self.enemy_workspace.clear();
        let grid = world.rules().grid;
        self.enemy_workspace.extend(
            world
                .enemies()
                .map(|(id, enemy)| EnemyCandidate::locate(id, enemy.position, &grid)),
        );
    }

    /// Emits the command for a single tower's turn.
    ///
    /// A tower still cooling down only counts down. A ready tower acquires a
    /// target according to its attack style and fires at it; without a
    /// target it emits nothing and stays ready.
    pub fn handle(&mut self, world: &World, tower: TowerId, out: &mut Vec<Command>) {
        if world.is_game_over() {
            return;
        }
        let Some(record) = world.tower(tower) else {
            return;
        };
        if record.cooldown > 0 {
            out.push(Command::CoolTower { tower });
            return;
        }

        let rules = world.rules();
        if let Some((origin, motion)) =
            self.aim(tower, record, rules.grid.cell_size, rules.projectile.speed)
        {
            out.push(Command::FireProjectile {
                tower,
                origin,
                damage: record.style.damage(),
                motion,
            });
        }
    }

    fn aim(
        &self,
        id: TowerId,
        tower: &Tower,
        cell_size: f32,
        lane_speed: f32,
    ) -> Option<(Vec2, ProjectileMotion)> {
        match tower.style {
            AttackStyle::LaneFire { .. } => {
                let origin = Vec2::new(
                    tower.right_edge(cell_size),
                    tower.position.y + cell_size / 2.0,
                );
                lane_fire_target(
                    i64::from(tower.cell.row()),
                    i64::from(tower.cell.column()),
                    &self.enemy_workspace,
                )
                .map(|_| (origin, ProjectileMotion::Lane { speed: lane_speed }))
            }
            AttackStyle::Homing { range, speed, .. } => {
                let origin = tower.center(cell_size);
                let target = homing_target(origin, range, &self.enemy_workspace)?;
                let motion = ProjectileMotion::Homing {
                    target,
                    owner: id,
                    speed,
                };
                Some((origin, motion))
            }
        }
    }
}
