#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure target acquisition shared by the enemy and tower phases.
//!
//! Every scan walks its candidates in the order they are supplied and
//! returns the first match. Callers pass candidates in the world's insertion
//! order, which makes that order the tie-break: there is no
//! preference for the nearest candidate.

use glam::Vec2;
use lane_defence_core::{EnemyId, GridConfig, TowerId};

/// Tower as seen by an enemy looking for something to attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerCandidate {
    /// Tower handle.
    pub id: TowerId,
    /// Lane of the tower.
    pub row: i64,
    /// Column of the tower.
    pub column: i64,
    /// Pixel x of the tower's right edge.
    pub right_edge: f32,
}

/// Enemy as seen by a tower looking for something to shoot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyCandidate {
    /// Enemy handle.
    pub id: EnemyId,
    /// Lane derived from the enemy's pixel position.
    pub row: i64,
    /// Column derived from the enemy's pixel position; negative past the margin.
    pub column: i64,
    /// Pixel position of the enemy's centre.
    pub center: Vec2,
}

impl EnemyCandidate {
    /// Derives grid coordinates for an enemy centred at `center`.
    #[must_use]
    pub fn locate(id: EnemyId, center: Vec2, grid: &GridConfig) -> Self {
        Self {
            id,
            row: grid.row_at(center.y),
            column: grid.column_at(center.x),
            center,
        }
    }
}

/// Selects the tower an advancing enemy should stop to attack.
///
/// A tower qualifies when it shares the enemy's lane, sits in a column
/// strictly left of the enemy, and its right edge lies less than one
/// movement step away from the enemy's position.
#[must_use]
pub fn blocking_tower(
    enemy: &EnemyCandidate,
    speed: f32,
    towers: &[TowerCandidate],
) -> Option<TowerId> {
    towers
        .iter()
        .find(|tower| {
            tower.row == enemy.row
                && tower.column < enemy.column
                && (enemy.center.x - tower.right_edge).abs() < speed
        })
        .map(|tower| tower.id)
}

/// Selects the enemy that triggers a lane-fire tower.
///
/// The first enemy in the tower's lane with a strictly greater column wins.
#[must_use]
pub fn lane_fire_target(row: i64, column: i64, enemies: &[EnemyCandidate]) -> Option<EnemyId> {
    enemies
        .iter()
        .find(|enemy| enemy.row == row && enemy.column > column)
        .map(|enemy| enemy.id)
}

/// Selects the enemy a homing tower locks onto.
///
/// The first enemy whose centre lies within `range` of `origin` wins.
#[must_use]
pub fn homing_target(origin: Vec2, range: f32, enemies: &[EnemyCandidate]) -> Option<EnemyId> {
    let range_sq = range * range;
    enemies
        .iter()
        .find(|enemy| enemy.center.distance_squared(origin) <= range_sq)
        .map(|enemy| enemy.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tower(slot: u32, row: i64, column: i64, right_edge: f32) -> TowerCandidate {
        TowerCandidate {
            id: TowerId::new(slot, 0),
            row,
            column,
            right_edge,
        }
    }

    fn enemy(slot: u32, row: i64, column: i64, center: Vec2) -> EnemyCandidate {
        EnemyCandidate {
            id: EnemyId::new(slot, 0),
            row,
            column,
            center,
        }
    }

    #[test]
    fn blocking_tower_requires_adjacency_within_one_step() {
        let towers = [tower(0, 1, 0, 130.0)];
        let close = enemy(0, 1, 1, Vec2::new(130.5, 170.0));
        let far = enemy(1, 1, 1, Vec2::new(140.0, 170.0));

        assert_eq!(blocking_tower(&close, 1.0, &towers), Some(TowerId::new(0, 0)));
        assert_eq!(blocking_tower(&far, 1.0, &towers), None);
    }

    #[test]
    fn blocking_tower_ignores_other_lanes_and_towers_behind() {
        let towers = [tower(0, 2, 0, 130.0), tower(1, 1, 3, 370.0)];
        let walker = enemy(0, 1, 1, Vec2::new(130.5, 170.0));
        assert_eq!(blocking_tower(&walker, 1.0, &towers), None);
    }

    #[test]
    fn lane_fire_prefers_iteration_order_over_distance() {
        let enemies = [
            enemy(7, 0, 8, Vec2::new(700.0, 90.0)),
            enemy(3, 0, 2, Vec2::new(250.0, 90.0)),
        ];
        assert_eq!(lane_fire_target(0, 0, &enemies), Some(EnemyId::new(7, 0)));
    }

    #[test]
    fn lane_fire_ignores_enemies_level_with_or_behind_the_tower() {
        let enemies = [
            enemy(0, 0, 2, Vec2::new(250.0, 90.0)),
            enemy(1, 0, 1, Vec2::new(170.0, 90.0)),
            enemy(2, 1, 5, Vec2::new(500.0, 170.0)),
        ];
        assert_eq!(lane_fire_target(0, 2, &enemies), None);
    }

    #[test]
    fn homing_range_is_inclusive_and_euclidean() {
        let origin = Vec2::new(0.0, 0.0);
        let enemies = [
            enemy(0, 0, 0, Vec2::new(30.0, 40.0)),
            enemy(1, 0, 0, Vec2::new(10.0, 0.0)),
        ];
        assert_eq!(homing_target(origin, 50.0, &enemies), Some(EnemyId::new(0, 0)));
        assert_eq!(homing_target(origin, 49.0, &enemies), Some(EnemyId::new(1, 0)));
        assert_eq!(homing_target(origin, 5.0, &enemies), None);
    }

    #[test]
    fn located_candidates_use_floor_division() {
        let grid = GridConfig::default();
        let candidate = EnemyCandidate::locate(EnemyId::new(0, 0), Vec2::new(-1.0, 90.0), &grid);
        assert_eq!(candidate.row, 0);
        assert_eq!(candidate.column, -1);
    }
}
