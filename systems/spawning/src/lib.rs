#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure spawning system that queues enemy releases on a fixed cadence.
//!
//! Randomness enters only through the caller-supplied generator, so a
//! seeded generator reproduces the same lanes and upgrades every run.

use lane_defence_core::{Command, EnemyKind, SpawnConfig};
use lane_defence_world::{query, World};
use rand::{Rng, RngCore};

/// Spawner that counts ticks and releases one enemy per interval.
#[derive(Clone, Copy, Debug)]
pub struct Spawning {
    config: SpawnConfig,
    rows: u32,
}

impl Spawning {
    /// Creates a spawner for a grid with `rows` lanes.
    #[must_use]
    pub const fn new(config: SpawnConfig, rows: u32) -> Self {
        Self { config, rows }
    }

    /// Creates a spawner from the rules the world was built with.
    #[must_use]
    pub fn for_world(world: &World) -> Self {
        let rules = world.rules();
        Self::new(rules.spawn, rules.grid.rows)
    }

    /// Emits the timer advance and, once the interval elapses, a
    /// `Command::SpawnEnemy`.
    ///
    /// The lane is drawn uniformly. Once the score reaches the configured
    /// threshold, a second draw may upgrade the enemy to [`EnemyKind::Strong`].
    pub fn handle<R>(&self, world: &World, rng: &mut R, out: &mut Vec<Command>)
    where
        R: RngCore + ?Sized,
    {
        if world.is_game_over() || self.rows == 0 {
            return;
        }

        out.push(Command::AdvanceSpawnTimer);
        let timer = query::spawn_timer(world).saturating_add(1);
        if timer < self.config.interval_ticks {
            return;
        }

        let row = rng.gen_range(0..self.rows);
        let kind = self.select_kind(query::score(world), rng);
        out.push(Command::SpawnEnemy { kind, row });
    }

    fn select_kind<R>(&self, score: u32, rng: &mut R) -> EnemyKind
    where
        R: RngCore + ?Sized,
    {
        if score >= self.config.strong_score_threshold && rng.gen_bool(self.config.strong_chance)
        {
            EnemyKind::Strong
        } else {
            EnemyKind::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::Config;
    use rand::rngs::mock::StepRng;

    fn world() -> World {
        World::new(Config::default().resolve().expect("stock rules"))
    }

    fn spawning(threshold: u32, chance: f64) -> Spawning {
        Spawning::new(
            SpawnConfig {
                interval_ticks: 10,
                strong_score_threshold: threshold,
                strong_chance: chance,
            },
            5,
        )
    }

    #[test]
    fn below_threshold_always_spawns_normal() {
        let mut rng = StepRng::new(0, 0);
        assert_eq!(spawning(10, 1.0).select_kind(9, &mut rng), EnemyKind::Normal);
    }

    #[test]
    fn certain_upgrade_spawns_strong_at_threshold() {
        let mut rng = StepRng::new(0, 0);
        assert_eq!(spawning(10, 1.0).select_kind(10, &mut rng), EnemyKind::Strong);
    }

    #[test]
    fn impossible_upgrade_never_spawns_strong() {
        let mut rng = StepRng::new(u64::MAX, 0);
        assert_eq!(spawning(0, 0.0).select_kind(500, &mut rng), EnemyKind::Normal);
    }

    #[test]
    fn pending_timer_only_queues_the_advance() {
        let world = world();
        let mut rng = StepRng::new(0, 0);
        let mut out = Vec::new();

        Spawning::for_world(&world).handle(&world, &mut rng, &mut out);

        assert_eq!(out, vec![Command::AdvanceSpawnTimer]);
    }

    #[test]
    fn due_timer_queues_a_spawn_after_the_advance() {
        let world = world();
        let spawning = Spawning::new(
            SpawnConfig {
                interval_ticks: 1,
                strong_score_threshold: 0,
                strong_chance: 1.0,
            },
            5,
        );
        let mut rng = StepRng::new(0, 0);
        let mut out = Vec::new();

        // Nothing is applied in between, so the same decision repeats.
        spawning.handle(&world, &mut rng, &mut out);
        spawning.handle(&world, &mut rng, &mut out);

        let expected = [
            Command::AdvanceSpawnTimer,
            Command::SpawnEnemy {
                kind: EnemyKind::Strong,
                row: 0,
            },
        ];
        assert_eq!(out, [expected, expected].concat());
    }
}
