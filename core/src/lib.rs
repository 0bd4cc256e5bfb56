#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative world, and the per-phase systems. Adapters and systems
//! alike submit [`Command`] values describing desired mutations; only the
//! world executes them, reporting what happened as [`Event`] values so a
//! single tick can be replayed, logged, or animated after the fact.

mod config;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{
    ClockConfig, Config, ConfigError, EconomyConfig, EnemyConfig, EnemyProfile, EnemyProfiles,
    GridConfig, PlayfieldConfig, ProjectileConfig, Rules, SpawnConfig, TowerProfile,
    TowerProfiles,
};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name {
            slot: u32,
            generation: u32,
        }

        impl $name {
            /// Creates an identifier from an arena slot and the slot's generation.
            #[must_use]
            pub const fn new(slot: u32, generation: u32) -> Self {
                Self { slot, generation }
            }

            /// Arena slot the entity occupies.
            #[must_use]
            pub const fn slot(&self) -> u32 {
                self.slot
            }

            /// Generation of the slot at the time the entity was inserted.
            #[must_use]
            pub const fn generation(&self) -> u32 {
                self.generation
            }
        }
    };
}

entity_id!(
    /// Handle to a tower stored in the world. Stale handles never resolve.
    TowerId
);

entity_id!(
    /// Handle to an enemy stored in the world. Stale handles never resolve.
    EnemyId
);

entity_id!(
    /// Handle to an in-flight projectile stored in the world.
    ProjectileId
);

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row (lane) index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// RGB colour forwarded to renderers untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Creates a new colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl From<[u8; 3]> for Color {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::from_rgb(red, green, blue)
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        [color.red, color.green, color.blue]
    }
}

/// Types of towers that can be placed on the grid.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Cheap lane-fire tower.
    #[default]
    Basic,
    /// Sturdier lane-fire tower with a heavier shot.
    Heavy,
    /// Tower launching homing projectiles at enemies within a radius.
    Seeker,
}

impl TowerKind {
    /// Every tower kind in selection order.
    pub const ALL: [TowerKind; 3] = [Self::Basic, Self::Heavy, Self::Seeker];

    /// Dense index of the kind, matching its position in [`TowerKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Basic => 0,
            Self::Heavy => 1,
            Self::Seeker => 2,
        }
    }

    /// Kind that follows this one when cycling the selection.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Basic => Self::Heavy,
            Self::Heavy => Self::Seeker,
            Self::Seeker => Self::Basic,
        }
    }
}

/// Types of enemies the spawner can release.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Baseline enemy released from the start.
    Normal,
    /// Tougher enemy that appears once the score threshold is reached.
    Strong,
}

impl EnemyKind {
    /// Every enemy kind.
    pub const ALL: [EnemyKind; 2] = [Self::Normal, Self::Strong];

    /// Dense index of the kind, matching its position in [`EnemyKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::Strong => 1,
        }
    }
}

/// How a tower engages enemies.
///
/// Both styles share one cooldown-gated resolver; only acquisition and the
/// projectile they emit differ.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AttackStyle {
    /// Fires a rightward projectile whenever an enemy is further down its lane.
    LaneFire {
        /// Damage carried by each projectile.
        damage: i32,
    },
    /// Fires a projectile that chases the first enemy found within `range`.
    Homing {
        /// Damage applied on impact.
        damage: i32,
        /// Acquisition radius measured from the tower centre in pixels.
        range: f32,
        /// Distance travelled by the projectile each tick.
        speed: f32,
    },
}

impl AttackStyle {
    /// Damage dealt by a single projectile of this style.
    #[must_use]
    pub const fn damage(&self) -> i32 {
        match self {
            Self::LaneFire { damage } | Self::Homing { damage, .. } => *damage,
        }
    }
}

/// Motion model of an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ProjectileMotion {
    /// Travels right along its lane at a fixed speed and hits whatever it overlaps first.
    Lane {
        /// Horizontal distance travelled each tick.
        speed: f32,
    },
    /// Chases a single enemy, re-aiming at its live position every tick.
    Homing {
        /// Enemy the projectile was launched at.
        target: EnemyId,
        /// Tower that launched and owns the projectile.
        owner: TowerId,
        /// Distance travelled each tick.
        speed: f32,
    },
}

/// Reasons a tower placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// Another tower already occupies the requested cell.
    #[error("cell is already occupied by a tower")]
    Occupied,
    /// The player cannot afford the selected tower.
    #[error("tower costs {cost} but only {available} is available")]
    InsufficientFunds {
        /// Price of the requested tower kind.
        cost: u32,
        /// Money held at the time of the request.
        available: u32,
    },
    /// The session already ended.
    #[error("the game is over")]
    GameOver,
}

/// Commands that express all permissible world mutations.
///
/// Adapters issue the placement and selection commands. The phase commands
/// are emitted by the systems, one entity at a time, and carry no authority
/// of their own: the world re-checks every handle before acting on it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Requests placement of a tower of the given kind at the provided cell.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Cell the tower should occupy.
        cell: CellCoord,
    },
    /// Selects the tower kind used by subsequent placements.
    SelectTowerType {
        /// Kind that becomes the active selection.
        kind: TowerKind,
    },
    /// Advances the selection to the next tower kind.
    CycleTowerType,
    /// Advances the simulation clock by one fixed tick.
    Tick,
    /// Counts one tick toward the next spawn.
    AdvanceSpawnTimer,
    /// Releases an enemy at the right edge of a lane and restarts the spawn timer.
    SpawnEnemy {
        /// Type of enemy to release.
        kind: EnemyKind,
        /// Lane the enemy walks along.
        row: u32,
    },
    /// Moves an enemy one step left, charging a life if it leaves the playfield.
    AdvanceEnemy {
        /// Enemy that walks.
        enemy: EnemyId,
    },
    /// Locks an enemy onto the tower blocking its lane.
    EngageTower {
        /// Enemy that stops to attack.
        enemy: EnemyId,
        /// Tower the enemy attacks from now on.
        tower: TowerId,
    },
    /// Counts down an engaged enemy's attack cooldown.
    CoolEnemy {
        /// Enemy waiting to strike again.
        enemy: EnemyId,
    },
    /// Applies one melee blow, removing the tower if its health runs out.
    StrikeTower {
        /// Enemy dealing the blow.
        enemy: EnemyId,
        /// Tower taking the blow.
        tower: TowerId,
    },
    /// Moves a projectile to a new position.
    MoveProjectile {
        /// Projectile in flight.
        projectile: ProjectileId,
        /// Position after this tick's step.
        position: Vec2,
    },
    /// Consumes a projectile against an enemy, killing it if its health runs out.
    HitEnemy {
        /// Projectile that landed.
        projectile: ProjectileId,
        /// Enemy that was struck.
        enemy: EnemyId,
    },
    /// Discards a projectile that left the playfield.
    ExpireProjectile {
        /// Projectile that is discarded.
        projectile: ProjectileId,
    },
    /// Discards a homing projectile whose target no longer exists.
    OrphanProjectile {
        /// Projectile that is discarded.
        projectile: ProjectileId,
    },
    /// Counts down a tower's firing cooldown.
    CoolTower {
        /// Tower reloading.
        tower: TowerId,
    },
    /// Launches a projectile from a ready tower and restarts its cooldown.
    FireProjectile {
        /// Tower that fires.
        tower: TowerId,
        /// Launch position of the projectile.
        origin: Vec2,
        /// Damage carried by the projectile.
        damage: i32,
        /// Motion model of the projectile.
        motion: ProjectileMotion,
    },
}

/// Events describing every change the world and systems made.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Cell the tower occupies.
        cell: CellCoord,
        /// Money debited for the placement.
        cost: u32,
    },
    /// Reports that a placement request was rejected without mutating state.
    TowerPlacementRejected {
        /// Type of tower requested.
        kind: TowerKind,
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces a change of the selected tower kind.
    TowerTypeSelected {
        /// Kind that is now selected.
        kind: TowerKind,
    },
    /// Confirms that the spawner released an enemy.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Type of enemy released.
        kind: EnemyKind,
        /// Lane the enemy walks along.
        row: u32,
    },
    /// An enemy locked onto a tower blocking its lane.
    EnemyEngaged {
        /// Enemy that stopped to attack.
        enemy: EnemyId,
        /// Tower under attack.
        tower: TowerId,
    },
    /// An enemy struck its target tower.
    TowerDamaged {
        /// Tower that lost health.
        tower: TowerId,
        /// Enemy that dealt the blow.
        enemy: EnemyId,
        /// Health left after the blow.
        remaining: i32,
    },
    /// A tower's health dropped to zero and it left the grid.
    TowerDestroyed {
        /// Tower that was removed.
        tower: TowerId,
        /// Cell the tower released.
        cell: CellCoord,
    },
    /// An enemy crossed the left edge of the playfield.
    EnemyEscaped {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Lives left after the escape.
        lives: u32,
    },
    /// An enemy's health dropped to zero.
    EnemyKilled {
        /// Enemy that was removed.
        enemy: EnemyId,
        /// Money credited for the kill.
        reward: u32,
    },
    /// A tower launched a projectile.
    ProjectileFired {
        /// Identifier of the new projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
    },
    /// A projectile struck an enemy and was consumed.
    ProjectileHit {
        /// Projectile that was consumed.
        projectile: ProjectileId,
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Damage applied.
        damage: i32,
    },
    /// A projectile left the playfield without hitting anything.
    ProjectileExpired {
        /// Projectile that was discarded.
        projectile: ProjectileId,
    },
    /// A homing projectile lost its target or owner before impact.
    ProjectileOrphaned {
        /// Projectile that was discarded.
        projectile: ProjectileId,
    },
    /// Lives reached zero; the simulation is frozen from now on.
    GameOver {
        /// Score at the end of the session.
        final_score: u32,
    },
}

/// Immutable representation of a single tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TowerSnapshot {
    /// Identifier assigned to the tower.
    pub id: TowerId,
    /// Type of tower.
    pub kind: TowerKind,
    /// Cell the tower occupies.
    pub cell: CellCoord,
    /// Pixel position of the tower's top-left corner.
    pub position: Vec2,
    /// Current health.
    pub health: i32,
    /// Health the tower was built with.
    pub max_health: i32,
    /// Ticks left until the tower may fire again.
    pub cooldown: u32,
    /// Colour configured for the tower kind.
    pub color: Color,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EnemySnapshot {
    /// Identifier assigned to the enemy.
    pub id: EnemyId,
    /// Type of enemy.
    pub kind: EnemyKind,
    /// Lane the enemy walks along.
    pub row: u32,
    /// Pixel position of the enemy's centre.
    pub position: Vec2,
    /// Current health.
    pub health: i32,
    /// Health the enemy spawned with.
    pub max_health: i32,
    /// Tower the enemy is attacking, if any.
    pub target: Option<TowerId>,
    /// Colour configured for the enemy kind.
    pub color: Color,
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProjectileSnapshot {
    /// Identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Pixel position of the projectile's centre.
    pub position: Vec2,
    /// Motion model driving the projectile.
    pub motion: ProjectileMotion,
}

/// Read-only snapshot of everything a renderer needs to draw one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GameView {
    /// Towers in insertion order.
    pub towers: Vec<TowerSnapshot>,
    /// Enemies in insertion order.
    pub enemies: Vec<EnemySnapshot>,
    /// Projectiles in insertion order.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Money available for placements.
    pub money: u32,
    /// Number of enemies killed.
    pub score: u32,
    /// Lives left before the game ends.
    pub lives: u32,
    /// Whether the session has ended.
    pub game_over: bool,
    /// Tower kind used by the next placement.
    pub selected_tower: TowerKind,
    /// Number of ticks simulated so far.
    pub tick: u64,
}
