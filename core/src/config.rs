//! Immutable tuning parameters consumed by the simulation.
//!
//! [`Config`] mirrors the on-disk layout and tolerates missing sections by
//! falling back to the stock tuning. [`Config::resolve`] turns it into
//! [`Rules`], whose per-kind profile lookups are infallible. Every system
//! reads `Rules` only, so an incomplete profile table is reported once,
//! before the first tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AttackStyle, CellCoord, Color, EnemyKind, TowerKind};

/// Reasons a configuration cannot drive a simulation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The tower table lacks a profile for the given kind.
    #[error("no profile configured for tower kind {0:?}")]
    MissingTowerProfile(TowerKind),
    /// The enemy table lacks a profile for the given kind.
    #[error("no profile configured for enemy kind {0:?}")]
    MissingEnemyProfile(EnemyKind),
    /// The grid has no cells or a non-positive cell size.
    #[error("grid must have at least one row, one column and a positive cell size")]
    InvalidGrid,
    /// A numeric parameter lies outside its permitted range.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Constraint the value violated.
        reason: &'static str,
    },
}

/// Complete tuning snapshot as supplied by the configuration loader.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pixel extent of the battlefield.
    pub playfield: PlayfieldConfig,
    /// Grid geometry.
    pub grid: GridConfig,
    /// Fixed timestep parameters.
    pub clock: ClockConfig,
    /// Starting money and lives.
    pub economy: EconomyConfig,
    /// Spawn cadence and enemy upgrade odds.
    pub spawn: SpawnConfig,
    /// Enemy-wide parameters and per-kind profiles.
    pub enemy: EnemyConfig,
    /// Lane-fire projectile parameters.
    pub projectile: ProjectileConfig,
    /// Per-kind tower profiles.
    pub towers: TowerProfiles,
}

impl Config {
    /// Checks every parameter and produces the lookup tables used by systems.
    pub fn resolve(&self) -> Result<Rules, ConfigError> {
        self.grid.validate()?;
        ensure(self.playfield.width > 0.0, "playfield.width", "must be positive")?;
        ensure(self.playfield.height > 0.0, "playfield.height", "must be positive")?;
        ensure(
            self.clock.ticks_per_second > 0,
            "clock.ticks_per_second",
            "must be positive",
        )?;
        ensure(
            self.spawn.interval_ticks > 0,
            "spawn.interval_ticks",
            "must be positive",
        )?;
        ensure(
            (0.0..=1.0).contains(&self.spawn.strong_chance),
            "spawn.strong_chance",
            "must lie within [0, 1]",
        )?;
        ensure(self.enemy.radius >= 0.0, "enemy.radius", "must not be negative")?;
        ensure(self.projectile.speed > 0.0, "projectile.speed", "must be positive")?;
        ensure(
            self.projectile.radius >= 0.0,
            "projectile.radius",
            "must not be negative",
        )?;
        ensure(
            self.projectile.hit_epsilon >= 0.0,
            "projectile.hit_epsilon",
            "must not be negative",
        )?;

        let towers = [
            self.tower_profile(TowerKind::Basic)?,
            self.tower_profile(TowerKind::Heavy)?,
            self.tower_profile(TowerKind::Seeker)?,
        ];
        let enemies = [
            self.enemy_profile(EnemyKind::Normal)?,
            self.enemy_profile(EnemyKind::Strong)?,
        ];

        Ok(Rules {
            playfield: self.playfield,
            grid: self.grid,
            clock: self.clock,
            economy: self.economy,
            spawn: self.spawn,
            projectile: self.projectile,
            enemy_radius: self.enemy.radius,
            enemy_attack_cooldown: self.enemy.attack_cooldown_ticks,
            towers,
            enemies,
        })
    }

    fn tower_profile(&self, kind: TowerKind) -> Result<TowerProfile, ConfigError> {
        let profile = self
            .towers
            .get(kind)
            .copied()
            .ok_or(ConfigError::MissingTowerProfile(kind))?;
        ensure(profile.health > 0, "towers.health", "must be positive")?;
        ensure(
            profile.style.damage() >= 0,
            "towers.style.damage",
            "must not be negative",
        )?;
        if let AttackStyle::Homing { range, speed, .. } = profile.style {
            ensure(range >= 0.0, "towers.style.range", "must not be negative")?;
            ensure(speed > 0.0, "towers.style.speed", "must be positive")?;
        }
        Ok(profile)
    }

    fn enemy_profile(&self, kind: EnemyKind) -> Result<EnemyProfile, ConfigError> {
        let profile = self
            .enemy
            .profiles
            .get(kind)
            .copied()
            .ok_or(ConfigError::MissingEnemyProfile(kind))?;
        ensure(profile.speed > 0.0, "enemy.profiles.speed", "must be positive")?;
        ensure(profile.health > 0, "enemy.profiles.health", "must be positive")?;
        ensure(
            profile.attack_power >= 0,
            "enemy.profiles.attack_power",
            "must not be negative",
        )?;
        Ok(profile)
    }
}

fn ensure(condition: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, reason })
    }
}

/// Pixel extent of the battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    /// Width in pixels; enemies enter at `width - grid.margin`.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: 820.0,
            height: 560.0,
        }
    }
}

/// Grid geometry shared by placement, targeting and rendering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of lanes.
    pub rows: u32,
    /// Number of placement columns per lane.
    pub columns: u32,
    /// Side length of a square cell in pixels.
    pub cell_size: f32,
    /// Offset of the first cell from the playfield's top-left corner.
    pub margin: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            columns: 9,
            cell_size: 80.0,
            margin: 50.0,
        }
    }
}

impl GridConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 || self.cell_size <= 0.0 {
            return Err(ConfigError::InvalidGrid);
        }
        Ok(())
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Pixel position of the cell's top-left corner.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            self.margin + cell.column() as f32 * self.cell_size,
            self.margin + cell.row() as f32 * self.cell_size,
        )
    }

    /// Vertical pixel coordinate of a lane's centre line.
    #[must_use]
    pub fn lane_center_y(&self, row: u32) -> f32 {
        self.margin + row as f32 * self.cell_size + self.cell_size / 2.0
    }

    /// Column index containing the horizontal coordinate.
    ///
    /// Uses floor division, so positions left of the margin map to negative
    /// columns rather than column zero.
    #[must_use]
    pub fn column_at(&self, x: f32) -> i64 {
        ((x - self.margin) / self.cell_size).floor() as i64
    }

    /// Row index containing the vertical coordinate, with the same flooring as
    /// [`GridConfig::column_at`].
    #[must_use]
    pub fn row_at(&self, y: f32) -> i64 {
        ((y - self.margin) / self.cell_size).floor() as i64
    }

    /// Cell under a pixel position, or `None` outside the grid.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<CellCoord> {
        let row = u32::try_from(self.row_at(point.y)).ok()?;
        let column = u32::try_from(self.column_at(point.x)).ok()?;
        let cell = CellCoord::new(row, column);
        self.contains(cell).then_some(cell)
    }
}

/// Fixed timestep parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Number of simulation ticks per second of wall time.
    pub ticks_per_second: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 60,
        }
    }
}

/// Starting money and lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Money available before the first placement.
    pub initial_money: u32,
    /// Enemies that may escape before the game ends.
    pub initial_lives: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            initial_money: 200,
            initial_lives: 10,
        }
    }
}

/// Spawn cadence and enemy upgrade odds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Ticks between consecutive spawns.
    pub interval_ticks: u32,
    /// Score from which strong enemies may appear.
    pub strong_score_threshold: u32,
    /// Probability that a spawn is upgraded once the threshold is met.
    pub strong_chance: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval_ticks: 120,
            strong_score_threshold: 10,
            strong_chance: 0.3,
        }
    }
}

/// Enemy-wide parameters and per-kind profiles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Collision radius shared by every enemy.
    pub radius: f32,
    /// Ticks an enemy waits between melee strikes.
    pub attack_cooldown_ticks: u32,
    /// Per-kind stat profiles.
    pub profiles: EnemyProfiles,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            attack_cooldown_ticks: 60,
            profiles: EnemyProfiles::default(),
        }
    }
}

/// Stat profile of one enemy kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    /// Pixels travelled per tick while advancing.
    pub speed: f32,
    /// Health at spawn.
    pub health: i32,
    /// Damage dealt to a tower per strike.
    pub attack_power: i32,
    /// Money credited when the enemy is killed.
    pub reward: u32,
    /// Colour used by renderers.
    pub color: Color,
}

/// Enemy profiles keyed by kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfiles {
    /// Profile for [`EnemyKind::Normal`].
    pub normal: Option<EnemyProfile>,
    /// Profile for [`EnemyKind::Strong`].
    pub strong: Option<EnemyProfile>,
}

impl EnemyProfiles {
    /// Profile configured for the kind, if any.
    #[must_use]
    pub const fn get(&self, kind: EnemyKind) -> Option<&EnemyProfile> {
        match kind {
            EnemyKind::Normal => self.normal.as_ref(),
            EnemyKind::Strong => self.strong.as_ref(),
        }
    }
}

impl Default for EnemyProfiles {
    fn default() -> Self {
        Self {
            normal: Some(EnemyProfile {
                speed: 1.0,
                health: 100,
                attack_power: 10,
                reward: 25,
                color: Color::from_rgb(0x6a, 0x9c, 0x3d),
            }),
            strong: Some(EnemyProfile {
                speed: 0.7,
                health: 250,
                attack_power: 25,
                reward: 50,
                color: Color::from_rgb(0x8e, 0x24, 0x2b),
            }),
        }
    }
}

/// Lane-fire projectile parameters and the homing hit tolerance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Pixels travelled per tick by lane-fire projectiles.
    pub speed: f32,
    /// Collision radius of every projectile.
    pub radius: f32,
    /// Distance at which a homing projectile counts as having reached its target.
    pub hit_epsilon: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            radius: 5.0,
            hit_epsilon: 4.0,
        }
    }
}

/// Stat profile of one tower kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerProfile {
    /// Health at placement.
    pub health: i32,
    /// Ticks between shots.
    pub cooldown_ticks: u32,
    /// Money debited on placement.
    pub cost: u32,
    /// Colour used by renderers.
    pub color: Color,
    /// Acquisition and projectile model.
    pub style: AttackStyle,
}

/// Tower profiles keyed by kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerProfiles {
    /// Profile for [`TowerKind::Basic`].
    pub basic: Option<TowerProfile>,
    /// Profile for [`TowerKind::Heavy`].
    pub heavy: Option<TowerProfile>,
    /// Profile for [`TowerKind::Seeker`].
    pub seeker: Option<TowerProfile>,
}

impl TowerProfiles {
    /// Profile configured for the kind, if any.
    #[must_use]
    pub const fn get(&self, kind: TowerKind) -> Option<&TowerProfile> {
        match kind {
            TowerKind::Basic => self.basic.as_ref(),
            TowerKind::Heavy => self.heavy.as_ref(),
            TowerKind::Seeker => self.seeker.as_ref(),
        }
    }
}

impl Default for TowerProfiles {
    fn default() -> Self {
        Self {
            basic: Some(TowerProfile {
                health: 100,
                cooldown_ticks: 60,
                cost: 100,
                color: Color::from_rgb(0x2f, 0x95, 0x32),
                style: AttackStyle::LaneFire { damage: 20 },
            }),
            heavy: Some(TowerProfile {
                health: 200,
                cooldown_ticks: 90,
                cost: 175,
                color: Color::from_rgb(0x1b, 0x5e, 0x20),
                style: AttackStyle::LaneFire { damage: 50 },
            }),
            seeker: Some(TowerProfile {
                health: 80,
                cooldown_ticks: 75,
                cost: 150,
                color: Color::from_rgb(0x58, 0x47, 0xff),
                style: AttackStyle::Homing {
                    damage: 30,
                    range: 240.0,
                    speed: 6.0,
                },
            }),
        }
    }
}

/// Validated tuning with infallible per-kind lookups.
#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    /// Pixel extent of the battlefield.
    pub playfield: PlayfieldConfig,
    /// Grid geometry.
    pub grid: GridConfig,
    /// Fixed timestep parameters.
    pub clock: ClockConfig,
    /// Starting money and lives.
    pub economy: EconomyConfig,
    /// Spawn cadence and enemy upgrade odds.
    pub spawn: SpawnConfig,
    /// Projectile parameters.
    pub projectile: ProjectileConfig,
    /// Collision radius shared by every enemy.
    pub enemy_radius: f32,
    /// Ticks an enemy waits between melee strikes.
    pub enemy_attack_cooldown: u32,
    towers: [TowerProfile; 3],
    enemies: [EnemyProfile; 2],
}

impl Rules {
    /// Profile of the given tower kind.
    #[must_use]
    pub fn tower(&self, kind: TowerKind) -> &TowerProfile {
        &self.towers[kind.index()]
    }

    /// Profile of the given enemy kind.
    #[must_use]
    pub fn enemy(&self, kind: EnemyKind) -> &EnemyProfile {
        &self.enemies[kind.index()]
    }

    /// Horizontal pixel coordinate where spawned enemies enter.
    #[must_use]
    pub fn spawn_x(&self) -> f32 {
        self.playfield.width - self.grid.margin
    }
}
