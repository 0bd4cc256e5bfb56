#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for Lane Defence.
//!
//! The [`World`] is the single owner of every tower, enemy and projectile,
//! together with money, score, lives and the game-over flag. Entities refer
//! to each other through generational handles, so a reference to something
//! that was removed earlier in the same tick resolves to `None` instead of
//! aliasing a newer entity.
//!
//! Every mutation goes through [`apply`]. Adapters submit placement and
//! selection commands; the systems submit phase commands. Either way the
//! world keeps the bookkeeping (occupancy, money, score, lives) consistent
//! itself, and outsiders only ever see entities by shared reference.

mod arena;
mod enemies;
mod towers;

use glam::Vec2;
use lane_defence_core::{
    CellCoord, Command, EnemyId, EnemyKind, Event, PlacementError, ProjectileId, ProjectileMotion,
    Rules, TowerId, TowerKind,
};
use tracing::{debug, trace};

use self::arena::Arena;
use self::towers::Occupancy;

pub use self::enemies::{Enemy, Projectile};
pub use self::towers::Tower;

/// Represents the authoritative Lane Defence world state.
#[derive(Debug)]
pub struct World {
    rules: Rules,
    towers: Arena<TowerId, Tower>,
    enemies: Arena<EnemyId, Enemy>,
    projectiles: Arena<ProjectileId, Projectile>,
    occupancy: Occupancy,
    money: u32,
    score: u32,
    lives: u32,
    spawn_timer: u32,
    selected_tower: TowerKind,
    game_over: bool,
    tick_index: u64,
}

impl World {
    /// Creates a fresh world using the provided validated rules.
    #[must_use]
    pub fn new(rules: Rules) -> Self {
        let occupancy = Occupancy::new(rules.grid.rows, rules.grid.columns);
        Self {
            money: rules.economy.initial_money,
            lives: rules.economy.initial_lives,
            score: 0,
            towers: Arena::new(),
            enemies: Arena::new(),
            projectiles: Arena::new(),
            occupancy,
            spawn_timer: 0,
            selected_tower: TowerKind::default(),
            game_over: false,
            tick_index: 0,
            rules,
        }
    }

    /// Validated rules the world was created with.
    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Reports whether lives ran out. Once set, the flag never clears.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Validates and performs a tower placement, debiting its cost.
    ///
    /// Rejections leave the world untouched.
    pub fn place_tower(
        &mut self,
        kind: TowerKind,
        cell: CellCoord,
    ) -> Result<TowerId, PlacementError> {
        if self.game_over {
            return Err(PlacementError::GameOver);
        }
        if !self.rules.grid.contains(cell) {
            return Err(PlacementError::OutOfBounds);
        }
        if self.occupancy.occupant(cell).is_some() {
            return Err(PlacementError::Occupied);
        }
        let profile = *self.rules.tower(kind);
        if profile.cost > self.money {
            return Err(PlacementError::InsufficientFunds {
                cost: profile.cost,
                available: self.money,
            });
        }

        let position = self.rules.grid.cell_origin(cell);
        let tower = self
            .towers
            .insert(Tower::from_profile(kind, cell, position, &profile));
        self.occupancy.occupy(tower, cell);
        self.money -= profile.cost;
        debug!(?tower, ?kind, row = cell.row(), column = cell.column(), "tower placed");
        Ok(tower)
    }

    /// Live tower handles in insertion order, copied so the caller may keep
    /// iterating while towers are removed.
    #[must_use]
    pub fn tower_ids(&self) -> Vec<TowerId> {
        self.towers.keys()
    }

    /// Live enemy handles in insertion order, copied so the caller may keep
    /// iterating while enemies are removed.
    #[must_use]
    pub fn enemy_ids(&self) -> Vec<EnemyId> {
        self.enemies.keys()
    }

    /// Live projectile handles in insertion order, copied so the caller may
    /// keep iterating while projectiles are removed.
    #[must_use]
    pub fn projectile_ids(&self) -> Vec<ProjectileId> {
        self.projectiles.keys()
    }

    /// Iterates live towers in insertion order.
    pub fn towers(&self) -> impl Iterator<Item = (TowerId, &Tower)> + '_ {
        self.towers.iter()
    }

    /// Iterates live enemies in insertion order.
    pub fn enemies(&self) -> impl Iterator<Item = (EnemyId, &Enemy)> + '_ {
        self.enemies.iter()
    }

    /// Iterates live projectiles in insertion order.
    pub fn projectiles(&self) -> impl Iterator<Item = (ProjectileId, &Projectile)> + '_ {
        self.projectiles.iter()
    }

    /// Resolves a tower handle; stale handles yield `None`.
    #[must_use]
    pub fn tower(&self, id: TowerId) -> Option<&Tower> {
        self.towers.get(id)
    }

    /// Resolves an enemy handle; stale handles yield `None`.
    #[must_use]
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(id)
    }

    /// Resolves a projectile handle; stale handles yield `None`.
    #[must_use]
    pub fn projectile(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.get(id)
    }

    fn admit_enemy(&mut self, kind: EnemyKind, row: u32, x: f32) -> EnemyId {
        let position = Vec2::new(x, self.rules.grid.lane_center_y(row));
        let profile = *self.rules.enemy(kind);
        self.enemies
            .insert(Enemy::from_profile(kind, row, position, &profile))
    }

    fn launch_projectile(
        &mut self,
        position: Vec2,
        damage: i32,
        motion: ProjectileMotion,
    ) -> ProjectileId {
        self.projectiles.insert(Projectile {
            position,
            damage,
            motion,
        })
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, row: u32, out_events: &mut Vec<Event>) {
        if row >= self.rules.grid.rows {
            return;
        }
        self.spawn_timer = 0;
        let x = self.rules.spawn_x();
        let enemy = self.admit_enemy(kind, row, x);
        trace!(?enemy, ?kind, row, "enemy spawned");
        out_events.push(Event::EnemySpawned { enemy, kind, row });
    }

    fn advance_enemy(&mut self, id: EnemyId, out_events: &mut Vec<Event>) {
        let Some(walker) = self.enemies.get_mut(id) else {
            return;
        };
        // A handle left over from a tower destroyed elsewhere is dropped here.
        walker.target = None;
        walker.position.x -= walker.speed;
        if walker.position.x < 0.0 {
            self.escape_enemy(id, out_events);
        }
    }

    fn engage_tower(&mut self, enemy: EnemyId, tower: TowerId, out_events: &mut Vec<Event>) {
        if !self.towers.contains(tower) {
            return;
        }
        let Some(attacker) = self.enemies.get_mut(enemy) else {
            return;
        };
        attacker.target = Some(tower);
        trace!(?enemy, ?tower, "enemy engaged tower");
        out_events.push(Event::EnemyEngaged { enemy, tower });
    }

    fn strike_tower(&mut self, enemy: EnemyId, tower: TowerId, out_events: &mut Vec<Event>) {
        let attack_period = self.rules.enemy_attack_cooldown;
        let Some(attacker) = self.enemies.get_mut(enemy) else {
            return;
        };
        if attacker.target != Some(tower) || attacker.attack_cooldown > 0 {
            return;
        }
        let Some(defender) = self.towers.get_mut(tower) else {
            return;
        };
        attacker.attack_cooldown = attack_period;
        defender.health -= attacker.attack_power;
        let remaining = defender.health;
        out_events.push(Event::TowerDamaged {
            tower,
            enemy,
            remaining,
        });

        if remaining <= 0 {
            self.destroy_tower(tower, out_events);
        }
    }

    /// Frees the cell, clears the target of every enemy attacking the tower
    /// and discards homing projectiles the tower owned.
    fn destroy_tower(&mut self, id: TowerId, out_events: &mut Vec<Event>) {
        let Some(tower) = self.towers.remove(id) else {
            return;
        };
        self.occupancy.vacate(tower.cell);
        out_events.push(Event::TowerDestroyed {
            tower: id,
            cell: tower.cell,
        });

        for enemy_id in self.enemies.keys() {
            if let Some(enemy) = self.enemies.get_mut(enemy_id) {
                if enemy.target == Some(id) {
                    enemy.target = None;
                }
            }
        }

        for projectile_id in self.projectiles.keys() {
            let owned = self
                .projectiles
                .get(projectile_id)
                .is_some_and(|projectile| projectile.owner() == Some(id));
            if owned && self.projectiles.remove(projectile_id).is_some() {
                out_events.push(Event::ProjectileOrphaned {
                    projectile: projectile_id,
                });
            }
        }

        debug!(tower = ?id, row = tower.cell.row(), column = tower.cell.column(), "tower destroyed");
    }

    fn hit_enemy(&mut self, projectile: ProjectileId, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let Some(spent) = self.projectiles.remove(projectile) else {
            return;
        };
        let Some(victim) = self.enemies.get_mut(enemy) else {
            return;
        };
        victim.health -= spent.damage;
        let remaining = victim.health;
        out_events.push(Event::ProjectileHit {
            projectile,
            enemy,
            damage: spent.damage,
        });

        if remaining <= 0 {
            self.kill_enemy(enemy, out_events);
        }
    }

    /// Removes a slain enemy, crediting its reward and one point of score.
    fn kill_enemy(&mut self, id: EnemyId, out_events: &mut Vec<Event>) {
        let Some(enemy) = self.enemies.remove(id) else {
            return;
        };
        self.score = self.score.saturating_add(1);
        self.money = self.money.saturating_add(enemy.reward);
        out_events.push(Event::EnemyKilled {
            enemy: id,
            reward: enemy.reward,
        });
        debug!(enemy = ?id, reward = enemy.reward, score = self.score, "enemy killed");
    }

    /// Charges one life for an enemy that crossed the left edge. Lives never
    /// drop below zero and the game ends when they run out.
    fn escape_enemy(&mut self, id: EnemyId, out_events: &mut Vec<Event>) {
        if self.enemies.remove(id).is_none() {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        out_events.push(Event::EnemyEscaped {
            enemy: id,
            lives: self.lives,
        });
        debug!(enemy = ?id, lives = self.lives, "enemy escaped");

        if self.lives == 0 && !self.game_over {
            self.game_over = true;
            out_events.push(Event::GameOver {
                final_score: self.score,
            });
        }
    }

    fn discard_projectile(&mut self, id: ProjectileId, event: Event, out_events: &mut Vec<Event>) {
        if self.projectiles.remove(id).is_some() {
            trace!(projectile = ?id, ?event, "projectile discarded");
            out_events.push(event);
        }
    }

    fn fire_projectile(
        &mut self,
        tower: TowerId,
        origin: Vec2,
        damage: i32,
        motion: ProjectileMotion,
        out_events: &mut Vec<Event>,
    ) {
        let Some(shooter) = self.towers.get_mut(tower) else {
            return;
        };
        if shooter.cooldown > 0 {
            return;
        }
        shooter.cooldown = shooter.cooldown_max;
        let projectile = self.launch_projectile(origin, damage, motion);
        trace!(?tower, ?projectile, "tower fired");
        out_events.push(Event::ProjectileFired { projectile, tower });
    }
}

#[cfg(any(test, feature = "test_scaffolding"))]
impl World {
    /// Overrides the money balance.
    pub fn set_money(&mut self, money: u32) {
        self.money = money;
    }

    /// Overrides the score.
    pub fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    /// Overrides the remaining lives.
    pub fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
    }

    /// Overrides the spawn timer.
    pub fn set_spawn_timer(&mut self, ticks: u32) {
        self.spawn_timer = ticks;
    }

    /// Inserts an enemy at an explicit horizontal position along a lane.
    pub fn insert_enemy(&mut self, kind: EnemyKind, row: u32, x: f32) -> EnemyId {
        self.admit_enemy(kind, row, x)
    }

    /// Inserts a projectile without a firing tower.
    pub fn insert_projectile(
        &mut self,
        position: Vec2,
        damage: i32,
        motion: ProjectileMotion,
    ) -> ProjectileId {
        self.launch_projectile(position, damage, motion)
    }

    /// Points an enemy at a tower without the engagement scan.
    pub fn set_enemy_target(&mut self, enemy: EnemyId, target: Option<TowerId>) {
        if let Some(record) = self.enemies.get_mut(enemy) {
            record.target = target;
        }
    }

    /// Overrides an enemy's health.
    pub fn set_enemy_health(&mut self, enemy: EnemyId, health: i32) {
        if let Some(record) = self.enemies.get_mut(enemy) {
            record.health = health;
        }
    }

    /// Overrides a tower's firing cooldown.
    pub fn set_tower_cooldown(&mut self, tower: TowerId, cooldown: u32) {
        if let Some(record) = self.towers.get_mut(tower) {
            record.cooldown = cooldown;
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Phase commands naming entities that no longer exist, or whose
/// preconditions no longer hold, are ignored. Once the game is over only
/// the selection commands have any effect.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceTower { kind, cell } => match world.place_tower(kind, cell) {
            Ok(tower) => {
                let cost = world.rules.tower(kind).cost;
                out_events.push(Event::TowerPlaced {
                    tower,
                    kind,
                    cell,
                    cost,
                });
            }
            Err(reason) => {
                debug!(?kind, row = cell.row(), column = cell.column(), %reason, "placement rejected");
                out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            }
        },
        Command::SelectTowerType { kind } => {
            world.selected_tower = kind;
            out_events.push(Event::TowerTypeSelected { kind });
        }
        Command::CycleTowerType => {
            world.selected_tower = world.selected_tower.next();
            out_events.push(Event::TowerTypeSelected {
                kind: world.selected_tower,
            });
        }
        _ if world.game_over => {}
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
        }
        Command::AdvanceSpawnTimer => {
            world.spawn_timer = world.spawn_timer.saturating_add(1);
        }
        Command::SpawnEnemy { kind, row } => world.spawn_enemy(kind, row, out_events),
        Command::AdvanceEnemy { enemy } => world.advance_enemy(enemy, out_events),
        Command::EngageTower { enemy, tower } => world.engage_tower(enemy, tower, out_events),
        Command::CoolEnemy { enemy } => {
            if let Some(record) = world.enemies.get_mut(enemy) {
                record.attack_cooldown = record.attack_cooldown.saturating_sub(1);
            }
        }
        Command::StrikeTower { enemy, tower } => world.strike_tower(enemy, tower, out_events),
        Command::MoveProjectile {
            projectile,
            position,
        } => {
            if let Some(record) = world.projectiles.get_mut(projectile) {
                record.position = position;
            }
        }
        Command::HitEnemy { projectile, enemy } => world.hit_enemy(projectile, enemy, out_events),
        Command::ExpireProjectile { projectile } => world.discard_projectile(
            projectile,
            Event::ProjectileExpired { projectile },
            out_events,
        ),
        Command::OrphanProjectile { projectile } => world.discard_projectile(
            projectile,
            Event::ProjectileOrphaned { projectile },
            out_events,
        ),
        Command::CoolTower { tower } => {
            if let Some(record) = world.towers.get_mut(tower) {
                record.cooldown = record.cooldown.saturating_sub(1);
            }
        }
        Command::FireProjectile {
            tower,
            origin,
            damage,
            motion,
        } => world.fire_projectile(tower, origin, damage, motion, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use lane_defence_core::{
        CellCoord, EnemySnapshot, GameView, ProjectileSnapshot, TowerId, TowerKind, TowerSnapshot,
    };

    use super::World;

    /// Money available for placements.
    #[must_use]
    pub fn money(world: &World) -> u32 {
        world.money
    }

    /// Number of enemies killed.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Lives left before the game ends.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Ticks accumulated toward the next spawn.
    #[must_use]
    pub fn spawn_timer(world: &World) -> u32 {
        world.spawn_timer
    }

    /// Tower kind used by the next placement.
    #[must_use]
    pub fn selected_tower(world: &World) -> TowerKind {
        world.selected_tower
    }

    /// Number of ticks simulated so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Tower occupying the cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        world.occupancy.occupant(cell)
    }

    /// Number of live towers, enemies and projectiles.
    #[must_use]
    pub fn population(world: &World) -> (usize, usize, usize) {
        (
            world.towers.len(),
            world.enemies.len(),
            world.projectiles.len(),
        )
    }

    /// Reports whether the tower handle still resolves.
    #[must_use]
    pub fn contains_tower(world: &World, tower: TowerId) -> bool {
        world.towers.contains(tower)
    }

    /// Captures everything a renderer needs to draw the current frame.
    #[must_use]
    pub fn game_view(world: &World) -> GameView {
        GameView {
            towers: world
                .towers
                .iter()
                .map(|(id, tower)| TowerSnapshot {
                    id,
                    kind: tower.kind,
                    cell: tower.cell,
                    position: tower.position,
                    health: tower.health,
                    max_health: tower.max_health,
                    cooldown: tower.cooldown,
                    color: tower.color,
                })
                .collect(),
            enemies: world
                .enemies
                .iter()
                .map(|(id, enemy)| EnemySnapshot {
                    id,
                    kind: enemy.kind,
                    row: enemy.row,
                    position: enemy.position,
                    health: enemy.health,
                    max_health: enemy.max_health,
                    target: enemy.target,
                    color: enemy.color,
                })
                .collect(),
            projectiles: world
                .projectiles
                .iter()
                .map(|(id, projectile)| ProjectileSnapshot {
                    id,
                    position: projectile.position,
                    motion: projectile.motion,
                })
                .collect(),
            money: world.money,
            score: world.score,
            lives: world.lives,
            game_over: world.game_over,
            selected_tower: world.selected_tower,
            tick: world.tick_index,
        }
    }
}
