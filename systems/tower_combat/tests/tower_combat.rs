use glam::Vec2;
use lane_defence_core::{CellCoord, Config, EnemyKind, Event, ProjectileMotion, TowerKind};
use lane_defence_system_tower_combat::TowerCombat;
use lane_defence_world::{apply, query, World};

fn world() -> World {
    World::new(Config::default().resolve().expect("valid configuration"))
}

/// Runs one tower phase, applying each tower's command before the next aims.
fn run_phase(system: &mut TowerCombat, world: &mut World, events: &mut Vec<Event>) {
    system.prepare(world);
    let mut commands = Vec::new();
    for tower in world.tower_ids() {
        if world.is_game_over() {
            break;
        }
        system.handle(world, tower, &mut commands);
        for command in commands.drain(..) {
            apply(world, command, events);
        }
    }
}

#[test]
fn ready_lane_tower_fires_from_its_right_edge() {
    let mut world = world();
    let tower = world
        .place_tower(TowerKind::Basic, CellCoord::new(0, 0))
        .expect("placed");
    // Column 3 starts at x = 290.
    let _ = world.insert_enemy(EnemyKind::Normal, 0, 330.0);
    let mut events = Vec::new();

    run_phase(&mut TowerCombat::new(), &mut world, &mut events);

    assert_eq!(query::population(&world).2, 1);
    let (projectile, shot) = world.projectiles().next().expect("one projectile");
    assert_eq!(shot.position, Vec2::new(130.0, 90.0));
    assert_eq!(shot.damage, 20);
    assert_eq!(shot.motion, ProjectileMotion::Lane { speed: 5.0 });
    assert_eq!(world.tower(tower).expect("live").cooldown, 60);
    assert_eq!(events, vec![Event::ProjectileFired { projectile, tower }]);
}

#[test]
fn lane_tower_ignores_enemies_behind_it_or_in_other_lanes() {
    let mut world = world();
    let _ = world
        .place_tower(TowerKind::Basic, CellCoord::new(1, 4))
        .expect("placed");
    let _ = world.insert_enemy(EnemyKind::Normal, 1, 200.0);
    let _ = world.insert_enemy(EnemyKind::Normal, 2, 700.0);
    let mut events = Vec::new();

    run_phase(&mut TowerCombat::new(), &mut world, &mut events);

    assert!(events.is_empty());
    assert_eq!(query::population(&world).2, 0);
}

#[test]
fn towers_fire_in_placement_order() {
    let mut world = world();
    world.set_money(1_000);
    let second = world
        .place_tower(TowerKind::Heavy, CellCoord::new(0, 2))
        .expect("placed");
    let first = world
        .place_tower(TowerKind::Basic, CellCoord::new(0, 0))
        .expect("placed");
    let _ = world.insert_enemy(EnemyKind::Strong, 0, 700.0);
    let mut events = Vec::new();

    run_phase(&mut TowerCombat::new(), &mut world, &mut events);

    let shooters: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::ProjectileFired { tower, .. } => Some(*tower),
            _ => None,
        })
        .collect();
    assert_eq!(shooters, vec![second, first]);
    let damages: Vec<i32> = world.projectiles().map(|(_, shot)| shot.damage).collect();
    assert_eq!(damages, vec![50, 20]);
}

#[test]
fn seeker_out_of_range_holds_fire() {
    let mut world = world();
    let tower = world
        .place_tower(TowerKind::Seeker, CellCoord::new(0, 0))
        .expect("placed");
    let _ = world.insert_enemy(EnemyKind::Normal, 4, 700.0);
    let mut events = Vec::new();

    run_phase(&mut TowerCombat::new(), &mut world, &mut events);

    assert!(events.is_empty());
    assert_eq!(world.tower(tower).expect("live").cooldown, 0);
}
