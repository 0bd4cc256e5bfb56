//! Tower records and the per-cell occupancy table.

use glam::Vec2;
use lane_defence_core::{AttackStyle, CellCoord, Color, TowerId, TowerKind, TowerProfile};

/// Tower stored inside the world.
///
/// Outside this crate a tower is only reachable by shared reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tower {
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Pixel position of the top-left corner, always grid-aligned.
    pub position: Vec2,
    /// Current health; the tower is removed once this reaches zero.
    pub health: i32,
    /// Health at placement.
    pub max_health: i32,
    /// Ticks left before the tower may fire. Zero means ready.
    pub cooldown: u32,
    /// Value the cooldown is reset to after each shot.
    pub cooldown_max: u32,
    /// Acquisition and projectile model.
    pub style: AttackStyle,
    /// Colour forwarded to renderers.
    pub color: Color,
}

impl Tower {
    pub(crate) fn from_profile(
        kind: TowerKind,
        cell: CellCoord,
        position: Vec2,
        profile: &TowerProfile,
    ) -> Self {
        Self {
            kind,
            cell,
            position,
            health: profile.health,
            max_health: profile.health,
            cooldown: 0,
            cooldown_max: profile.cooldown_ticks,
            style: profile.style,
            color: profile.color,
        }
    }

    /// Pixel x of the tower's right edge.
    #[must_use]
    pub fn right_edge(&self, cell_size: f32) -> f32 {
        self.position.x + cell_size
    }

    /// Pixel position of the tower's centre.
    #[must_use]
    pub fn center(&self, cell_size: f32) -> Vec2 {
        self.position + Vec2::splat(cell_size / 2.0)
    }
}

/// Dense row-major table recording which tower holds each cell.
#[derive(Clone, Debug)]
pub(crate) struct Occupancy {
    columns: u32,
    rows: u32,
    cells: Vec<Option<TowerId>>,
}

impl Occupancy {
    pub(crate) fn new(rows: u32, columns: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<TowerId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    pub(crate) fn occupy(&mut self, tower: TowerId, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(tower);
            }
        }
    }

    pub(crate) fn vacate(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = None;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_tracks_and_releases_cells() {
        let mut occupancy = Occupancy::new(2, 3);
        let cell = CellCoord::new(1, 2);
        let tower = TowerId::new(4, 0);

        assert_eq!(occupancy.occupant(cell), None);
        occupancy.occupy(tower, cell);
        assert_eq!(occupancy.occupant(cell), Some(tower));
        occupancy.vacate(cell);
        assert_eq!(occupancy.occupant(cell), None);
    }

    #[test]
    fn out_of_range_cells_are_never_occupied() {
        let mut occupancy = Occupancy::new(2, 2);
        let outside = CellCoord::new(2, 0);
        occupancy.occupy(TowerId::new(0, 0), outside);
        assert_eq!(occupancy.occupant(outside), None);
    }

    #[test]
    fn tower_geometry_derives_from_cell_size() {
        let profile = TowerProfile {
            health: 10,
            cooldown_ticks: 3,
            cost: 5,
            color: Color::from_rgb(0, 0, 0),
            style: AttackStyle::LaneFire { damage: 1 },
        };
        let tower = Tower::from_profile(
            TowerKind::Basic,
            CellCoord::new(0, 0),
            Vec2::new(50.0, 50.0),
            &profile,
        );
        assert_eq!(tower.right_edge(80.0), 130.0);
        assert_eq!(tower.center(80.0), Vec2::new(90.0, 90.0));
        assert_eq!(tower.cooldown, 0);
        assert_eq!(tower.max_health, 10);
    }
}
