#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation clock for Lane Defence.
//!
//! [`Simulation`] owns the world, one instance of every system and the
//! seeded generator used by the spawner. Each call to [`Simulation::tick`]
//! runs the phases in a fixed order and hands back the events they produced.
//!
//! Systems only read the world and emit commands. Within a phase the
//! commands for one entity are applied before the next entity decides, so
//! every entity sees the effects of those that acted before it.

use glam::Vec2;
use lane_defence_core::{
    CellCoord, Command, Config, ConfigError, Event, GameView, PlacementError, TowerId, TowerKind,
};
use lane_defence_system_enemy_combat::EnemyCombat;
use lane_defence_system_projectiles::ProjectileMotionSystem;
use lane_defence_system_spawning::Spawning;
use lane_defence_system_tower_combat::TowerCombat;
use lane_defence_world::{apply, query, World};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Drives the world one fixed tick at a time.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    rng: ChaCha8Rng,
    systems: Systems,
    events: Vec<Event>,
}

impl Simulation {
    /// Validates the configuration and builds a fresh simulation.
    ///
    /// A missing tower or enemy profile is reported here, before any tick.
    pub fn new(config: &Config, seed: u64) -> Result<Self, ConfigError> {
        let rules = config.resolve()?;
        Ok(Self::from_world(World::new(rules), seed))
    }

    /// Wraps an existing world, seeding the spawner's generator.
    #[must_use]
    pub fn from_world(world: World, seed: u64) -> Self {
        let systems = Systems::for_world(&world);
        debug!(seed, "simulation created");
        Self {
            world,
            rng: ChaCha8Rng::seed_from_u64(seed),
            systems,
            events: Vec::new(),
        }
    }

    /// Advances one tick using the simulation's own generator.
    pub fn tick(&mut self) -> &[Event] {
        self.systems.run(&mut self.world, &mut self.rng, &mut self.events);
        &self.events
    }

    /// Advances one tick drawing spawn decisions from an external generator.
    pub fn tick_with<R>(&mut self, rng: &mut R) -> &[Event]
    where
        R: RngCore + ?Sized,
    {
        self.systems.run(&mut self.world, rng, &mut self.events);
        &self.events
    }

    /// Places a tower of `kind` at `cell`, debiting its cost.
    pub fn place_tower(
        &mut self,
        cell: CellCoord,
        kind: TowerKind,
    ) -> Result<TowerId, PlacementError> {
        self.world.place_tower(kind, cell)
    }

    /// Places a tower of the currently selected kind.
    pub fn place_selected(&mut self, cell: CellCoord) -> Result<TowerId, PlacementError> {
        let kind = query::selected_tower(&self.world);
        self.place_tower(cell, kind)
    }

    /// Chooses the tower kind used by [`Simulation::place_selected`].
    pub fn select_tower_type(&mut self, kind: TowerKind) {
        let _ = self.execute(Command::SelectTowerType { kind });
    }

    /// Switches the selection to the next tower kind and returns it.
    pub fn cycle_tower_type(&mut self) -> TowerKind {
        let _ = self.execute(Command::CycleTowerType);
        query::selected_tower(&self.world)
    }

    /// Applies an externally triggered command and returns the events it produced.
    pub fn execute(&mut self, command: Command) -> &[Event] {
        self.events.clear();
        apply(&mut self.world, command, &mut self.events);
        &self.events
    }

    /// Maps a pointer position in pixels to the grid cell beneath it.
    #[must_use]
    pub fn cell_at(&self, x: f32, y: f32) -> Option<CellCoord> {
        self.world.rules().grid.cell_at(Vec2::new(x, y))
    }

    /// Read-only view of everything a renderer draws.
    #[must_use]
    pub fn snapshot(&self) -> GameView {
        query::game_view(&self.world)
    }

    /// Authoritative world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Reports whether the game has ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.world.is_game_over()
    }

    /// Fixed tick rate adapters should pace frames at.
    #[must_use]
    pub fn ticks_per_second(&self) -> u32 {
        self.world.rules().clock.ticks_per_second
    }
}

/// Every per-tick system plus the scratch buffer their commands pass through.
#[derive(Debug)]
struct Systems {
    spawning: Spawning,
    enemy_combat: EnemyCombat,
    projectiles: ProjectileMotionSystem,
    tower_combat: TowerCombat,
    commands: Vec<Command>,
}

impl Systems {
    fn for_world(world: &World) -> Self {
        Self {
            spawning: Spawning::for_world(world),
            enemy_combat: EnemyCombat::new(),
            projectiles: ProjectileMotionSystem::new(),
            tower_combat: TowerCombat::new(),
            commands: Vec::new(),
        }
    }

    fn run<R>(&mut self, world: &mut World, rng: &mut R, events: &mut Vec<Event>)
    where
        R: RngCore + ?Sized,
    {
        events.clear();
        if world.is_game_over() {
            return;
        }

        apply(world, Command::Tick, events);
        self.spawning.handle(world, rng, &mut self.commands);
        flush(world, &mut self.commands, events);

        self.enemy_combat.prepare(world);
        for enemy in world.enemy_ids() {
            if world.is_game_over() {
                break;
            }
            self.enemy_combat.handle(world, enemy, &mut self.commands);
            flush(world, &mut self.commands, events);
        }

        for projectile in world.projectile_ids() {
            if world.is_game_over() {
                break;
            }
            self.projectiles.handle(world, projectile, &mut self.commands);
            flush(world, &mut self.commands, events);
        }

        self.tower_combat.prepare(world);
        for tower in world.tower_ids() {
            if world.is_game_over() {
                break;
            }
            self.tower_combat.handle(world, tower, &mut self.commands);
            flush(world, &mut self.commands, events);
        }

        if world.is_game_over() {
            info!(
                tick = query::tick_index(world),
                final_score = query::score(world),
                "game over"
            );
        }
    }
}

fn flush(world: &mut World, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
    for command in commands.drain(..) {
        apply(world, command, events);
    }
}
