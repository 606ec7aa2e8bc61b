use std::time::Duration;

use delivery_rush_core::{Command, Event, MovementIntent, TimerKind};
use delivery_rush_system_level_flow::{Config, LevelFlow, LevelPhase};
use delivery_rush_world::{self as world, query, World};

struct Harness {
    world: World,
    flow: LevelFlow,
    log: Vec<Event>,
}

impl Harness {
    fn new(max_waves: u32) -> Self {
        let mut harness = Self {
            world: World::new(),
            flow: LevelFlow::new(Config::new(
                Duration::from_millis(2_500),
                Duration::from_millis(2_000),
                max_waves,
            )),
            log: Vec::new(),
        };
        harness.run(vec![Command::BeginLevel {
            level: 1,
            lives: 7,
            max_waves,
        }]);
        harness
    }

    /// Applies commands and lets the flow react until it goes quiet. Fired
    /// wave timers start an empty wave that clears at once.
    fn run(&mut self, mut commands: Vec<Command>) {
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }

            for event in &events {
                if let Event::TimerFired {
                    timer: TimerKind::WaveStart { wave },
                } = event
                {
                    commands.push(Command::StartWave {
                        wave: *wave,
                        spawns: Vec::new(),
                    });
                    commands.push(Command::ClearWave);
                }
            }
            self.flow.handle(&events, &mut commands);
            self.flow.check_delivery(
                query::player_bounds(&self.world),
                query::house_bounds(&self.world),
                &mut commands,
            );
            self.log.extend(events);
        }
    }

    fn tick(&mut self, millis: u64) {
        self.run(vec![Command::Tick {
            dt: Duration::from_millis(millis),
        }]);
    }

    fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.log.iter().filter(|event| predicate(event)).count()
    }
}

#[test]
fn level_runs_every_wave_then_spawns_the_house() {
    let mut harness = Harness::new(3);

    harness.tick(2_499);
    assert_eq!(harness.flow.phase(), LevelPhase::Intro);

    harness.tick(1);
    assert_eq!(harness.count(|event| matches!(event, Event::WaveCleared { wave: 1 })), 1);

    harness.tick(2_000);
    harness.tick(2_000);
    assert_eq!(harness.flow.phase(), LevelPhase::DeliveryPending);
    assert!(query::house_position(&harness.world).is_none());

    harness.tick(2_000);
    assert_eq!(harness.flow.phase(), LevelPhase::DeliveryHouseSpawned);
    assert_eq!(
        harness.count(|event| matches!(event, Event::DeliveryHouseSpawned { .. })),
        1
    );
    assert_eq!(harness.count(|event| matches!(event, Event::WaveStarted { .. })), 3);
}

#[test]
fn reaching_the_house_completes_the_level_exactly_once() {
    let mut harness = Harness::new(1);
    harness.tick(2_500);
    harness.tick(2_000);
    assert!(query::house_position(&harness.world).is_some());

    harness.run(vec![Command::SetMovementIntent {
        intent: MovementIntent::Right,
    }]);
    for _ in 0..200 {
        harness.tick(50);
    }

    assert_eq!(harness.flow.phase(), LevelPhase::LevelComplete);
    assert_eq!(
        harness.count(|event| matches!(event, Event::LevelCompleted { level: 1, .. })),
        1
    );
    assert!(query::level_state(&harness.world).level_complete_triggered);
}
