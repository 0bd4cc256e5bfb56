use glam::Vec2;
use lane_defence_core::{
    CellCoord, Config, EnemyKind, Event, PlacementError, ProjectileMotion, TowerKind,
};
use lane_defence_simulation::Simulation;
use lane_defence_world::{query, World};

const SEED: u64 = 0x5eed;

fn world_with(config: Config) -> World {
    World::new(config.resolve().expect("valid configuration"))
}

#[test]
fn spawn_at_threshold_releases_one_enemy_at_the_right_edge() {
    let mut world = world_with(Config::default());
    world.set_spawn_timer(119);
    let mut simulation = Simulation::from_world(world, SEED);

    let events = simulation.tick().to_vec();

    let spawned: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::EnemySpawned { enemy, row, .. } => Some((*enemy, *row)),
            _ => None,
        })
        .collect();
    assert_eq!(spawned.len(), 1);
    let (enemy, row) = spawned[0];
    let view = simulation.snapshot();
    assert_eq!(view.enemies.len(), 1);
    assert_eq!(view.enemies[0].id, enemy);
    assert_eq!(view.enemies[0].row, row);
    // Released at x = 770, then walked one step in the enemy phase of the same tick.
    assert_eq!(view.enemies[0].position.x, 769.0);
}

#[test]
fn ready_lane_tower_fires_once_and_restarts_its_cooldown() {
    let mut world = world_with(Config::default());
    let tower = world
        .place_tower(TowerKind::Basic, CellCoord::new(0, 0))
        .expect("placed");
    let _ = world.insert_enemy(EnemyKind::Normal, 0, 330.0);
    let mut simulation = Simulation::from_world(world, SEED);

    let events = simulation.tick().to_vec();

    let view = simulation.snapshot();
    assert_eq!(view.projectiles.len(), 1);
    let projectile = view.projectiles[0];
    assert_eq!(projectile.position, Vec2::new(130.0, 90.0));
    assert_eq!(projectile.motion, ProjectileMotion::Lane { speed: 5.0 });
    assert_eq!(view.towers[0].cooldown, 60);
    assert!(events.contains(&Event::ProjectileFired {
        projectile: projectile.id,
        tower,
    }));
}

#[test]
fn lethal_strike_removes_the_tower_and_clears_the_target() {
    let mut config = Config::default();
    if let Some(profile) = config.towers.basic.as_mut() {
        profile.health = 10;
    }
    let mut world = world_with(config);
    let cell = CellCoord::new(0, 0);
    let tower = world.place_tower(TowerKind::Basic, cell).expect("placed");
    let enemy = world.insert_enemy(EnemyKind::Normal, 0, 130.5);
    world.set_enemy_target(enemy, Some(tower));
    let mut simulation = Simulation::from_world(world, SEED);

    let events = simulation.tick().to_vec();

    assert!(events.contains(&Event::TowerDamaged {
        tower,
        enemy,
        remaining: 0,
    }));
    assert!(events.contains(&Event::TowerDestroyed { tower, cell }));
    let world = simulation.world();
    assert!(!query::contains_tower(world, tower));
    assert_eq!(query::tower_at(world, cell), None);
    assert_eq!(world.enemy(enemy).expect("live").target, None);
}

#[test]
fn enemy_past_the_left_edge_costs_exactly_one_life() {
    let mut world = world_with(Config::default());
    let enemy = world.insert_enemy(EnemyKind::Normal, 2, -1.0);
    let mut simulation = Simulation::from_world(world, SEED);

    let events = simulation.tick().to_vec();

    assert!(simulation.world().enemy(enemy).is_none());
    assert_eq!(simulation.snapshot().lives, 9);
    assert_eq!(events, vec![Event::EnemyEscaped { enemy, lives: 9 }]);
}

#[test]
fn last_life_ends_the_game_and_freezes_the_world() {
    let mut world = world_with(Config::default());
    world.set_lives(1);
    world.set_spawn_timer(100);
    let _ = world
        .place_tower(TowerKind::Basic, CellCoord::new(3, 0))
        .expect("placed");
    let _ = world.insert_enemy(EnemyKind::Normal, 1, -1.0);
    let _ = world.insert_enemy(EnemyKind::Normal, 3, 600.0);
    let mut simulation = Simulation::from_world(world, SEED);

    let events = simulation.tick().to_vec();
    assert!(events.contains(&Event::GameOver { final_score: 0 }));

    let frozen = simulation.snapshot();
    assert!(frozen.game_over);
    assert_eq!(frozen.lives, 0);

    for _ in 0..240 {
        assert!(simulation.tick().is_empty());
    }
    assert_eq!(simulation.snapshot(), frozen);
    assert_eq!(
        simulation.place_tower(CellCoord::new(0, 0), TowerKind::Basic),
        Err(PlacementError::GameOver)
    );
}

#[test]
fn unaffordable_placement_is_rejected_without_side_effects() {
    let mut world = world_with(Config::default());
    world.set_money(50);
    let mut simulation = Simulation::from_world(world, SEED);
    let before = simulation.snapshot();

    let result = simulation.place_tower(CellCoord::new(1, 1), TowerKind::Basic);

    assert_eq!(
        result,
        Err(PlacementError::InsufficientFunds {
            cost: 100,
            available: 50,
        })
    );
    assert_eq!(simulation.snapshot(), before);
}

#[test]
fn placement_uses_the_selected_kind() {
    let mut simulation = Simulation::new(&Config::default(), SEED).expect("stock config");
    simulation.select_tower_type(TowerKind::Seeker);

    let tower = simulation
        .place_selected(CellCoord::new(4, 2))
        .expect("affordable");

    let view = simulation.snapshot();
    assert_eq!(view.selected_tower, TowerKind::Seeker);
    assert_eq!(view.towers[0].id, tower);
    assert_eq!(view.towers[0].kind, TowerKind::Seeker);
    assert_eq!(view.money, 50);
}
