use lane_defence_core::{CellCoord, Config, EnemyKind, Event, TowerKind};
use lane_defence_system_enemy_combat::EnemyCombat;
use lane_defence_world::{apply, query, World};

fn world_with(config: Config) -> World {
    World::new(config.resolve().expect("valid configuration"))
}

/// Runs one enemy phase, applying each enemy's command before the next decides.
fn run_phase(system: &mut EnemyCombat, world: &mut World, events: &mut Vec<Event>) {
    system.prepare(world);
    let mut commands = Vec::new();
    for enemy in world.enemy_ids() {
        if world.is_game_over() {
            break;
        }
        system.handle(world, enemy, &mut commands);
        for command in commands.drain(..) {
            apply(world, command, events);
        }
    }
}

#[test]
fn walking_enemy_stops_at_the_first_blocking_tower() {
    let mut world = world_with(Config::default());
    let tower = world
        .place_tower(TowerKind::Basic, CellCoord::new(1, 0))
        .expect("placed");
    // Tower right edge sits at x = 130; the enemy closes in one pixel per tick.
    let enemy = world.insert_enemy(EnemyKind::Normal, 1, 133.0);
    let mut system = EnemyCombat::new();
    let mut events = Vec::new();

    for _ in 0..3 {
        run_phase(&mut system, &mut world, &mut events);
    }

    let walker = world.enemy(enemy).expect("live");
    assert_eq!(walker.position.x, 130.0);
    assert_eq!(walker.target, None);

    run_phase(&mut system, &mut world, &mut events);
    let walker = world.enemy(enemy).expect("live");
    assert_eq!(walker.target, Some(tower));
    assert_eq!(walker.position.x, 130.0);
    assert_eq!(events, vec![Event::EnemyEngaged { enemy, tower }]);
}

#[test]
fn enemies_in_other_lanes_walk_past() {
    let mut world = world_with(Config::default());
    let _ = world
        .place_tower(TowerKind::Basic, CellCoord::new(2, 0))
        .expect("placed");
    let enemy = world.insert_enemy(EnemyKind::Normal, 1, 130.5);
    let mut events = Vec::new();

    run_phase(&mut EnemyCombat::new(), &mut world, &mut events);

    assert_eq!(world.enemy(enemy).expect("live").position.x, 129.5);
    assert!(events.is_empty());
}

#[test]
fn simultaneous_killers_remove_the_tower_once() {
    let mut config = Config::default();
    if let Some(profile) = config.towers.basic.as_mut() {
        profile.health = 10;
    }
    let mut world = world_with(config);
    let cell = CellCoord::new(0, 0);
    let tower = world.place_tower(TowerKind::Basic, cell).expect("placed");
    let first = world.insert_enemy(EnemyKind::Normal, 0, 130.5);
    let second = world.insert_enemy(EnemyKind::Normal, 0, 130.5);
    for enemy in [first, second] {
        world.set_enemy_target(enemy, Some(tower));
    }
    let mut events = Vec::new();

    run_phase(&mut EnemyCombat::new(), &mut world, &mut events);

    let destroyed = events
        .iter()
        .filter(|event| matches!(event, Event::TowerDestroyed { .. }))
        .count();
    assert_eq!(destroyed, 1);
    assert!(!query::contains_tower(&world, tower));
    assert_eq!(query::tower_at(&world, cell), None);
    for enemy in [first, second] {
        assert_eq!(world.enemy(enemy).expect("live").target, None);
    }
    // The second enemy lost its target before acting and resumed walking.
    assert_eq!(world.enemy(second).expect("live").position.x, 129.5);
}

#[test]
fn enemy_past_the_left_edge_costs_one_life() {
    let mut world = world_with(Config::default());
    let enemy = world.insert_enemy(EnemyKind::Normal, 0, -1.0);
    let mut events = Vec::new();

    run_phase(&mut EnemyCombat::new(), &mut world, &mut events);

    assert!(world.enemy(enemy).is_none());
    assert_eq!(query::lives(&world), 9);
    assert_eq!(events, vec![Event::EnemyEscaped { enemy, lives: 9 }]);
}

#[test]
fn game_over_stops_the_phase_immediately() {
    let mut world = world_with(Config::default());
    world.set_lives(1);
    let escaping = world.insert_enemy(EnemyKind::Normal, 0, 0.5);
    let follower = world.insert_enemy(EnemyKind::Normal, 1, 400.0);
    let mut events = Vec::new();

    run_phase(&mut EnemyCombat::new(), &mut world, &mut events);

    assert!(world.is_game_over());
    assert!(world.enemy(escaping).is_none());
    assert_eq!(world.enemy(follower).expect("live").position.x, 400.0);
    assert_eq!(
        events,
        vec![
            Event::EnemyEscaped {
                enemy: escaping,
                lives: 0,
            },
            Event::GameOver { final_score: 0 },
        ]
    );

    run_phase(&mut EnemyCombat::new(), &mut world, &mut events);
    assert_eq!(world.enemy(follower).expect("live").position.x, 400.0);
}
