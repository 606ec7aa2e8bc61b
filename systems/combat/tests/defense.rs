use std::time::Duration;

use delivery_rush_core::{Command, EnemyKind, EnemySpawn, Event, WorldPoint};
use delivery_rush_system_combat::CombatResolver;
use delivery_rush_world::{self as world, query, World};

#[test]
fn seven_hits_exhaust_seven_lives() {
    let mut world = World::new();
    let mut combat = CombatResolver::default();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::BeginLevel {
            level: 1,
            lives: 7,
            max_waves: 12,
        },
        &mut events,
    );
    let spawns = (0..8)
        .map(|_| EnemySpawn {
            kind: EnemyKind::LargeRobber,
            position: WorldPoint::new(100.0, 300.0),
            speed: 80.0,
        })
        .collect();
    world::apply(&mut world, Command::StartWave { wave: 1, spawns }, &mut events);

    let mut hits = 0;
    let mut exhausted = 0;
    for _ in 0..6_000 {
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );

        let mut commands = Vec::new();
        combat.handle(
            &events,
            query::defense_bounds(&world),
            query::player_bounds(&world),
            &query::enemy_view(&world),
            &mut commands,
        );
        events.clear();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }

        hits += events
            .iter()
            .filter(|event| matches!(event, Event::DefenseHit { .. }))
            .count();
        exhausted += events
            .iter()
            .filter(|event| matches!(event, Event::LivesExhausted))
            .count();
    }

    assert_eq!(hits, 7, "each life absorbs exactly one hit");
    assert_eq!(exhausted, 1, "lives run out exactly once");
    let state = query::level_state(&world);
    assert_eq!(state.lives, 0);
    assert_eq!(query::enemy_view(&world).len(), 1, "the eighth enemy survives");
}

#[test]
fn hits_are_spaced_by_the_invincibility_window() {
    let mut world = World::new();
    let mut combat = CombatResolver::default();
    let mut events = Vec::new();
    let spawns = (0..3)
        .map(|_| EnemySpawn {
            kind: EnemyKind::SmallRobber,
            position: WorldPoint::new(100.0, 300.0),
            speed: 120.0,
        })
        .collect();
    world::apply(&mut world, Command::StartWave { wave: 1, spawns }, &mut events);

    let mut hit_times = Vec::new();
    for _ in 0..1_000 {
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(10),
            },
            &mut events,
        );
        let mut commands = Vec::new();
        combat.handle(
            &events,
            query::defense_bounds(&world),
            query::player_bounds(&world),
            &query::enemy_view(&world),
            &mut commands,
        );
        events.clear();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        if events
            .iter()
            .any(|event| matches!(event, Event::DefenseHit { .. }))
        {
            hit_times.push(query::elapsed(&world));
        }
    }

    assert!(hit_times.len() >= 2, "expected repeated hits, got {hit_times:?}");
    for pair in hit_times.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(1_500));
    }
}
