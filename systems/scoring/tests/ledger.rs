use delivery_rush_core::{Command, Event, LevelHandoff};
use delivery_rush_system_scoring::{MemoryHighScoreStore, ScoreLedger};
use delivery_rush_world::{self as world, World};

fn play_level(world: &mut World, level: u32, distance: f64) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::BeginLevel {
            level,
            lives: 7,
            max_waves: 12,
        },
        &mut events,
    );
    world::apply(world, Command::AccrueDistance { amount: distance }, &mut events);
    world::apply(world, Command::SpawnDeliveryHouse, &mut events);
    world::apply(world, Command::CompleteLevel, &mut events);
    events
}

#[test]
fn delivery_after_final_wave_scores_distance_and_bonus() {
    let mut world = World::new();
    let mut ledger = ScoreLedger::new(MemoryHighScoreStore::default(), LevelHandoff::FIRST_LEVEL);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::BeginLevel {
            level: 1,
            lives: 5,
            max_waves: 12,
        },
        &mut events,
    );
    world::apply(&mut world, Command::AccrueDistance { amount: 500.3 }, &mut events);
    world::apply(&mut world, Command::SpawnDeliveryHouse, &mut events);
    world::apply(&mut world, Command::CompleteLevel, &mut events);

    let stats = ledger.handle(&events).expect("level completion yields stats");

    assert_eq!(stats.bonus, 500);
    assert_eq!(stats.level_score, 1_000);
    assert_eq!(stats.score, 1_000);
    assert_eq!(stats.next_level(), LevelHandoff::new(2, 1_000));
}

#[test]
fn run_ended_scores_distance_only() {
    let mut world = World::new();
    let mut ledger = ScoreLedger::new(MemoryHighScoreStore::default(), LevelHandoff::FIRST_LEVEL);
    let mut events = Vec::new();
    world::apply(&mut world, Command::AccrueDistance { amount: 120.0 }, &mut events);
    world::apply(&mut world, Command::EndRun, &mut events);

    let stats = ledger.handle(&events).expect("game over yields stats");

    assert_eq!(stats.score, 120);
    assert_eq!(stats.bonus, 0);
    assert_eq!(stats.high_score, 120);
}

#[test]
fn run_total_is_the_sum_of_level_scores() {
    let mut world = World::new();
    let mut ledger = ScoreLedger::new(
        MemoryHighScoreStore::with_value(10_000),
        LevelHandoff::FIRST_LEVEL,
    );
    let distances = [310.9, 42.0, 1_250.5, 0.4];

    let mut level_scores = 0;
    let mut handoff = LevelHandoff::FIRST_LEVEL;
    for distance in distances {
        ledger.begin_level(handoff);
        let events = play_level(&mut world, handoff.level(), distance);
        let stats = ledger.handle(&events).expect("every level completes");
        level_scores += stats.level_score;
        assert_eq!(stats.score, level_scores);
        handoff = stats.next_level();
    }

    assert_eq!(handoff.level(), 5);
    assert_eq!(handoff.total_score(), level_scores);
    assert_eq!(ledger.run().high_score(), 10_000);
}
