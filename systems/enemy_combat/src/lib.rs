#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure enemy phase system: lane advance, tower engagement and melee strikes.
//!
//! The phase is sequential. Each enemy decides against the world as left by
//! the enemies before it, so the caller applies an enemy's command before
//! asking about the next one.

use lane_defence_core::{Command, EnemyId};
use lane_defence_system_targeting::{blocking_tower, EnemyCandidate, TowerCandidate};
use lane_defence_world::World;

/// Enemy phase system that reuses its tower workspace across ticks.
#[derive(Debug, Default)]
pub struct EnemyCombat {
    tower_workspace: Vec<TowerCandidate>,
}

impl EnemyCombat {
    /// Creates a new enemy phase system with an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the towers standing at the start of the phase.
    pub fn prepare(&mut self, world: &World) {
        self.tower_workspace.clear();
        let cell_size = world.rules().grid.cell_size;
        self.tower_workspace
            .extend(world.towers().map(|(id, tower)| TowerCandidate {
                id,
                row: i64::from(tower.cell.row()),
                column: i64::from(tower.cell.column()),
                right_edge: tower.right_edge(cell_size),
            }));
    }

    /// Emits the command for a single enemy's turn.
    ///
    /// An enemy holding a live target strikes or counts down its cooldown.
    /// Any other enemy engages a blocking tower if there is one and
    /// otherwise walks left.
    pub fn handle(&mut self, world: &World, enemy: EnemyId, out: &mut Vec<Command>) {
        if world.is_game_over() {
            return;
        }
        let Some(record) = world.enemy(enemy) else {
            return;
        };

        let target = record
            .target
            .filter(|tower| world.tower(*tower).is_some());
        match target {
            Some(_) if record.attack_cooldown > 0 => out.push(Command::CoolEnemy { enemy }),
            Some(tower) => out.push(Command::StrikeTower { enemy, tower }),
            None => {
                // Towers destroyed earlier in the phase drop out here.
                self.tower_workspace
                    .retain(|candidate| world.tower(candidate.id).is_some());
                let candidate = EnemyCandidate::locate(enemy, record.position, &world.rules().grid);
                match blocking_tower(&candidate, record.speed, &self.tower_workspace) {
                    Some(tower) => out.push(Command::EngageTower { enemy, tower }),
                    None => out.push(Command::AdvanceEnemy { enemy }),
                }
            }
        }
    }
}
